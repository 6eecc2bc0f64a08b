//! Mutable, persistable column-layout state.
//!
//! `TableLayoutState` is what the engine mutates and the layout store
//! persists: column order, visibility, and pinning. The serialized form
//! uses the same camelCase keys the records were historically written
//! with, so existing persisted layouts keep loading.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::column::ColumnDescriptor;

/// Which viewport edge a column is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinSide {
    Left,
    Right,
}

impl PinSide {
    /// The other edge.
    pub fn opposite(self) -> Self {
        match self {
            PinSide::Left => PinSide::Right,
            PinSide::Right => PinSide::Left,
        }
    }
}

/// Ordered pin lists for both edges.
///
/// Invariant: `left` and `right` are disjoint. A key may be pinned while
/// hidden; only visible pinned columns receive sticky offsets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PinnedColumns {
    #[serde(default)]
    pub left: Vec<String>,
    #[serde(default)]
    pub right: Vec<String>,
}

impl PinnedColumns {
    /// The ordered pin list for one side.
    pub fn side(&self, side: PinSide) -> &[String] {
        match side {
            PinSide::Left => &self.left,
            PinSide::Right => &self.right,
        }
    }

    /// Which side a key is pinned to, if any.
    pub fn side_of(&self, key: &str) -> Option<PinSide> {
        if self.left.iter().any(|k| k == key) {
            Some(PinSide::Left)
        } else if self.right.iter().any(|k| k == key) {
            Some(PinSide::Right)
        } else {
            None
        }
    }

    /// Whether a key is pinned to either side.
    pub fn is_pinned(&self, key: &str) -> bool {
        self.side_of(key).is_some()
    }

    /// Total number of pinned keys.
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Per-user, per-table column customization.
///
/// Invariants: `column_order` is a permutation of the known column keys,
/// every known key has a visibility entry, and the pin lists are disjoint.
/// States loaded from storage go through [`TableLayoutState::reconcile`]
/// to re-establish these invariants against the current column set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableLayoutState {
    pub column_order: Vec<String>,
    pub column_visibility: BTreeMap<String, bool>,
    #[serde(default, rename = "pinnedColumns")]
    pub pinned: PinnedColumns,
}

impl TableLayoutState {
    /// The default layout for a column set: declaration order, everything
    /// visible, nothing pinned.
    pub fn default_for(columns: &[ColumnDescriptor]) -> Self {
        Self {
            column_order: columns.iter().map(|c| c.key.clone()).collect(),
            column_visibility: columns.iter().map(|c| (c.key.clone(), true)).collect(),
            pinned: PinnedColumns::default(),
        }
    }

    /// Normalize a (possibly stale) state against the current column set.
    ///
    /// Persisted records can predate column additions or removals. Unknown
    /// keys are dropped from the order, the visibility map, and both pin
    /// lists; columns missing from the record are appended to the end of
    /// the order in declaration order and made visible. Duplicates keep
    /// their first occurrence, and a key found in both pin lists stays on
    /// the left.
    pub fn reconcile(mut self, columns: &[ColumnDescriptor]) -> Self {
        let known: BTreeSet<&str> = columns.iter().map(|c| c.key.as_str()).collect();

        let mut seen: BTreeSet<String> = BTreeSet::new();
        self.column_order
            .retain(|key| known.contains(key.as_str()) && seen.insert(key.clone()));
        for col in columns {
            if !seen.contains(&col.key) {
                self.column_order.push(col.key.clone());
            }
        }

        self.column_visibility
            .retain(|key, _| known.contains(key.as_str()));
        for col in columns {
            self.column_visibility.entry(col.key.clone()).or_insert(true);
        }

        let mut pinned_seen: BTreeSet<String> = BTreeSet::new();
        self.pinned
            .left
            .retain(|key| known.contains(key.as_str()) && pinned_seen.insert(key.clone()));
        self.pinned
            .right
            .retain(|key| known.contains(key.as_str()) && pinned_seen.insert(key.clone()));

        self
    }

    /// Whether a key is currently visible. Keys outside the known set
    /// report hidden.
    pub fn is_visible(&self, key: &str) -> bool {
        self.column_visibility.get(key).copied().unwrap_or(false)
    }
}

/// Replacement value or function of the previous value, for setters that
/// accept both forms.
pub enum Update<T> {
    /// Replace the value outright.
    Set(T),
    /// Derive the new value from the previous one.
    With(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Update<T> {
    /// Functional-update form.
    pub fn with(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Update::With(Box::new(f))
    }

    /// Resolve against the previous value.
    pub fn apply(self, prev: &T) -> T {
        match self {
            Update::Set(value) => value,
            Update::With(f) => f(prev),
        }
    }
}

impl<T> From<T> for Update<T> {
    fn from(value: T) -> Self {
        Update::Set(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Update<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Update::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Update::With(_) => f.write_str("With(..)"),
        }
    }
}
