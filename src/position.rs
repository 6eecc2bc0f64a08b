//! Sticky offsets for pinned columns.
//!
//! Given the ordered pin lists and the current width map, computes the
//! `left`/`right` CSS offset that keeps each pinned column stuck to its
//! viewport edge while neighbors resize. Unmeasured columns contribute 0;
//! the calculation is cheap and side-effect free, so it is simply re-run
//! as width batches arrive and the layout self-corrects.

use std::fmt;

use crate::layout::{PinSide, PinnedColumns};
use crate::widths::{WidthMap, ACTIONS_COLUMN_KEY, SELECTION_COLUMN_KEY};

/// Width assumed for the selection-checkbox column before its first
/// measurement arrives.
pub const DEFAULT_SELECTION_WIDTH: f64 = 30.0;

/// Fixed non-data columns rendered at the left edge.
///
/// Their widths are accounted for when computing left-pin offsets; the
/// right edge carries no furniture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Furniture {
    /// A row-actions column is rendered
    pub row_actions: bool,
    /// A selection-checkbox column is rendered (group actions configured)
    pub group_actions: bool,
}

/// Sticky offset for one column edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StickyOffset {
    /// Column is not pinned on the queried side; no sticky offset applies.
    Auto,
    /// Offset from the viewport edge, in pixels.
    Px(f64),
}

impl StickyOffset {
    pub fn is_auto(&self) -> bool {
        matches!(self, StickyOffset::Auto)
    }

    /// Pixel value, if pinned.
    pub fn px(&self) -> Option<f64> {
        match self {
            StickyOffset::Auto => None,
            StickyOffset::Px(value) => Some(*value),
        }
    }
}

impl fmt::Display for StickyOffset {
    /// Formats as a CSS value: `auto`, `100px`, `30.5px`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StickyOffset::Auto => write!(f, "auto"),
            StickyOffset::Px(value) if value.fract() == 0.0 => write!(f, "{:.0}px", value),
            StickyOffset::Px(value) => write!(f, "{}px", value),
        }
    }
}

/// Compute the sticky offset for `key` on `side`.
///
/// Left offsets accumulate the furniture widths plus every column before
/// `key` in the left pin list; right offsets accumulate every column after
/// `key` in the right pin list (furniture only occupies the left edge).
/// Keys not pinned on the queried side get [`StickyOffset::Auto`].
pub fn calculate_position(
    key: &str,
    side: PinSide,
    pins: &PinnedColumns,
    widths: &WidthMap,
    furniture: Furniture,
) -> StickyOffset {
    match side {
        PinSide::Left => {
            let Some(index) = pins.left.iter().position(|k| k == key) else {
                return StickyOffset::Auto;
            };

            let mut offset = 0.0;
            if furniture.row_actions {
                offset += widths.get(ACTIONS_COLUMN_KEY).unwrap_or(0.0);
            }
            if furniture.group_actions {
                offset += widths
                    .get(SELECTION_COLUMN_KEY)
                    .unwrap_or(DEFAULT_SELECTION_WIDTH);
            }
            for preceding in &pins.left[..index] {
                offset += widths.get(preceding).unwrap_or(0.0);
            }
            StickyOffset::Px(offset)
        }
        PinSide::Right => {
            let Some(index) = pins.right.iter().position(|k| k == key) else {
                return StickyOffset::Auto;
            };

            let offset = pins.right[index + 1..]
                .iter()
                .map(|following| widths.get(following).unwrap_or(0.0))
                .sum();
            StickyOffset::Px(offset)
        }
    }
}
