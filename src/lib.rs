//! Headless state & layout engine for admin-style data grids.
//!
//! The crate owns grid *state*, never rendering: column order, visibility,
//! and pinning with per-user persistence ([`engine`], [`store`]), sticky
//! offsets for pinned columns ([`position`]), row selection bookkeeping
//! ([`selection`]), and a total, memoized codec for the grid's query
//! parameters ([`query`]). Rendering, data fetching, and measurement are
//! host concerns wired in through the [`store::LayoutStorage`],
//! [`query::ParamBag`], and [`widths::WidthObserver`] boundaries.
//!
//! Everything is synchronous and single-threaded: mutations happen in
//! response to discrete host events, and the one asynchronous input (width
//! measurements) is consumed as plain data whenever the host delivers it.

pub mod column;
pub mod engine;
pub mod layout;
pub mod position;
pub mod query;
pub mod selection;
pub mod store;
pub mod widths;

pub use column::{ColumnDescriptor, FilterKind, SelectOption};
pub use engine::{ColumnEngine, GridConfig, ReorderToken};
pub use layout::{PinSide, PinnedColumns, TableLayoutState, Update};
pub use position::{calculate_position, Furniture, StickyOffset, DEFAULT_SELECTION_WIDTH};
pub use query::{
    decode, reset_pagination, step_page, PageDirection, PageInfo, ParamBag, QueryDecoder,
    QueryDescriptor, SortOrder, DEFAULT_PAGE_SIZE,
};
pub use selection::{GridRow, SelectionModel};
pub use store::{
    storage_key, JsonFileStorage, LayoutStorage, LayoutStore, MemoryStorage, StorageError,
    ANONYMOUS_IDENTITY,
};
pub use widths::{
    WidthCallback, WidthMap, WidthObserver, ACTIONS_COLUMN_KEY, SELECTION_COLUMN_KEY,
};
