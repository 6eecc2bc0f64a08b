//! Column management: order, visibility, pinning, and their persistence.
//!
//! `ColumnEngine` owns the mutable layout state for one table instance.
//! Every operation is a synchronous, infallible state transition; malformed
//! keys are no-ops, and validation of key existence is the caller's
//! responsibility. Each effective mutation is forwarded to the layout
//! store, which decides whether that means a write or a delete.

use std::collections::BTreeMap;

use crate::column::ColumnDescriptor;
use crate::layout::{PinSide, PinnedColumns, TableLayoutState, Update};
use crate::position::{calculate_position, Furniture, StickyOffset};
use crate::store::{LayoutStorage, LayoutStore};
use crate::widths::WidthMap;

/// Host-supplied configuration for one table instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridConfig {
    /// Persistence slot id. `None` keeps layout state purely in-memory:
    /// durable storage is never read or written for this instance.
    pub table_id: Option<String>,
    /// Authenticated user identifier; `None` persists under the anonymous
    /// identity.
    pub identity: Option<String>,
    /// A row-actions column is rendered at the left edge
    pub row_actions: bool,
    /// Group actions are configured, so a selection-checkbox column is
    /// rendered at the left edge
    pub group_actions: bool,
}

/// Opaque handle for an in-flight column reorder.
///
/// Produced by [`ColumnEngine::begin_reorder`] when an interaction starts
/// (a drag, a keyboard grab) and consumed by
/// [`ColumnEngine::complete_reorder`] on drop.
#[derive(Debug, Clone)]
pub struct ReorderToken {
    source: String,
}

impl ReorderToken {
    /// Key of the column being moved.
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Owns column order, visibility, and pinning for one table instance.
///
/// Construction loads any persisted layout for the `(identity, table_id)`
/// slot and reconciles it against the current column set, so the state
/// invariants hold even when the persisted record predates column changes.
#[derive(Debug)]
pub struct ColumnEngine<S: LayoutStorage> {
    columns: Vec<ColumnDescriptor>,
    config: GridConfig,
    state: TableLayoutState,
    default_state: TableLayoutState,
    store: LayoutStore<S>,
}

impl<S: LayoutStorage> ColumnEngine<S> {
    /// Build an engine for `columns`, restoring persisted layout state
    /// from `storage` when the config names a table id.
    pub fn new(columns: Vec<ColumnDescriptor>, config: GridConfig, storage: S) -> Self {
        let default_state = TableLayoutState::default_for(&columns);
        let mut store = LayoutStore::new(storage);

        let state = match &config.table_id {
            Some(table_id) => store
                .load(config.identity.as_deref(), table_id)
                .map(|loaded| loaded.reconcile(&columns))
                .unwrap_or_else(|| default_state.clone()),
            None => {
                // No slot to read: in-memory only for this instance
                store.mark_hydrated();
                default_state.clone()
            }
        };

        Self {
            columns,
            config,
            state,
            default_state,
            store,
        }
    }

    // ===== State queries =====

    /// The full, ordered descriptor list as declared by the host.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Descriptor for a key, if it is part of this table.
    pub fn descriptor(&self, key: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.key == key)
    }

    /// Current layout state.
    pub fn state(&self) -> &TableLayoutState {
        &self.state
    }

    /// Current pin lists.
    pub fn pinned(&self) -> &PinnedColumns {
        &self.state.pinned
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Furniture flags for the position calculator.
    pub fn furniture(&self) -> Furniture {
        Furniture {
            row_actions: self.config.row_actions,
            group_actions: self.config.group_actions,
        }
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.state.is_visible(key)
    }

    /// Visible descriptors in `column_order` order, pins ignored.
    pub fn visible_columns(&self) -> Vec<&ColumnDescriptor> {
        self.state
            .column_order
            .iter()
            .filter(|key| self.state.is_visible(key))
            .filter_map(|key| self.descriptor(key))
            .collect()
    }

    /// Visible descriptors in render order: left-pinned first (in left pin
    /// order), then unpinned (in `column_order` order), then right-pinned
    /// (in right pin order).
    pub fn sorted_visible_columns(&self) -> Vec<&ColumnDescriptor> {
        let mut columns = self.visible_columns();
        columns.sort_by_key(|col| self.render_rank(&col.key));
        columns
    }

    /// Sticky offset for a visible pinned column, given the current
    /// measured widths.
    pub fn position(&self, key: &str, side: PinSide, widths: &WidthMap) -> StickyOffset {
        calculate_position(key, side, &self.state.pinned, widths, self.furniture())
    }

    fn render_rank(&self, key: &str) -> (u8, usize) {
        if let Some(index) = self.state.pinned.left.iter().position(|k| k == key) {
            (0, index)
        } else if let Some(index) = self.state.pinned.right.iter().position(|k| k == key) {
            (2, index)
        } else {
            let index = self
                .state
                .column_order
                .iter()
                .position(|k| k == key)
                .unwrap_or(usize::MAX);
            (1, index)
        }
    }

    // ===== Setters =====

    /// Replace or update the column order and persist the result.
    pub fn set_column_order(&mut self, update: impl Into<Update<Vec<String>>>) {
        self.state.column_order = update.into().apply(&self.state.column_order);
        self.persist();
    }

    /// Replace or update the visibility map and persist the result.
    pub fn set_column_visibility(&mut self, update: impl Into<Update<BTreeMap<String, bool>>>) {
        self.state.column_visibility = update.into().apply(&self.state.column_visibility);
        self.persist();
    }

    /// Replace or update the pin lists and persist the result.
    pub fn set_pinned_columns(&mut self, update: impl Into<Update<PinnedColumns>>) {
        self.state.pinned = update.into().apply(&self.state.pinned);
        self.persist();
    }

    /// Show or hide one column. Unknown keys are no-ops.
    pub fn set_visible(&mut self, key: &str, visible: bool) {
        if !self.state.column_visibility.contains_key(key) {
            return;
        }
        self.state.column_visibility.insert(key.to_string(), visible);
        self.persist();
    }

    // ===== Pinning =====

    /// Toggle pin state for `key` on `side`, as one atomic transition.
    ///
    /// The key is removed from the opposite side unconditionally, then
    /// toggled on `side`: already pinned there means unpin, otherwise it
    /// is appended to the end of that side's list. Pinning a column pinned
    /// on the other side therefore *moves* it. A transition that changes
    /// nothing does not write to the store.
    pub fn pin_column(&mut self, key: &str, side: PinSide) {
        fn toggle(list: &mut Vec<String>, key: &str) {
            if let Some(pos) = list.iter().position(|k| k == key) {
                list.remove(pos);
            } else {
                list.push(key.to_string());
            }
        }

        let mut next = self.state.pinned.clone();
        match side {
            PinSide::Left => {
                next.right.retain(|k| k != key);
                toggle(&mut next.left, key);
            }
            PinSide::Right => {
                next.left.retain(|k| k != key);
                toggle(&mut next.right, key);
            }
        }

        if next == self.state.pinned {
            return;
        }
        self.state.pinned = next;
        self.persist();
    }

    // ===== Reordering =====

    /// Start a reorder interaction for `source_key`.
    pub fn begin_reorder(&self, source_key: &str) -> ReorderToken {
        ReorderToken {
            source: source_key.to_string(),
        }
    }

    /// Finish a reorder by dropping the token's column onto `target_key`.
    ///
    /// The source key is removed from the order and reinserted at the
    /// index then occupied by the target key, shifting intervening keys.
    /// Dropping a column onto itself, or naming a key outside the current
    /// order, changes nothing and writes nothing.
    pub fn complete_reorder(&mut self, token: ReorderToken, target_key: &str) {
        if token.source == target_key {
            return;
        }
        let Some(from) = self
            .state
            .column_order
            .iter()
            .position(|k| *k == token.source)
        else {
            return;
        };
        if !self.state.column_order.iter().any(|k| k == target_key) {
            return;
        }

        let mut next = self.state.column_order.clone();
        next.remove(from);
        let Some(to) = next.iter().position(|k| k == target_key) else {
            return;
        };
        next.insert(to, token.source);

        self.state.column_order = next;
        self.persist();
    }

    // ===== Reset =====

    /// Return to the default layout and clear the persisted record.
    pub fn reset_layout(&mut self) {
        self.state = self.default_state.clone();
        // Saving the default deletes the record rather than writing it
        self.persist();
    }

    fn persist(&mut self) {
        if let Some(table_id) = &self.config.table_id {
            self.store.save(
                self.config.identity.as_deref(),
                table_id,
                &self.state,
                &self.default_state,
            );
        }
    }
}
