//! Static column declarations supplied by the host.
//!
//! A table is constructed from an ordered list of `ColumnDescriptor`s; that
//! list is the source of truth for the full set of column keys the layout
//! engine knows about.

use serde::{Deserialize, Serialize};

/// One choice in a select-style column filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Value sent to the data source when this option is chosen
    pub value: String,
    /// Text shown in the filter dropdown
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Kind of filter control a column offers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Column is not filterable
    #[default]
    None,
    /// Free-text input
    Input,
    /// Dropdown restricted to the given options
    Select(Vec<SelectOption>),
    Date,
    Time,
    DateTime,
    /// Host renders its own filter control
    Custom,
}

/// Static, immutable description of one table column.
///
/// Descriptors never change for the lifetime of a table configuration;
/// everything mutable (order, visibility, pinning) lives in
/// [`TableLayoutState`](crate::layout::TableLayoutState).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Unique identifier, also used as the persistence and width-map key
    pub key: String,
    /// Header text
    pub label: String,
    /// Whether the column participates in sorting
    #[serde(default)]
    pub sortable: bool,
    /// Filter control offered for this column
    #[serde(default)]
    pub filter: FilterKind,
    /// Lower bound for user resizing, in pixels
    #[serde(default)]
    pub min_width: Option<f64>,
    /// Upper bound for user resizing, in pixels
    #[serde(default)]
    pub max_width: Option<f64>,
}

impl ColumnDescriptor {
    /// Create a plain, unsortable, unfilterable column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            filter: FilterKind::None,
            min_width: None,
            max_width: None,
        }
    }

    /// Mark the column sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Attach a filter control.
    pub fn with_filter(mut self, filter: FilterKind) -> Self {
        self.filter = filter;
        self
    }

    /// Constrain user resizing to a minimum width.
    pub fn with_min_width(mut self, px: f64) -> Self {
        self.min_width = Some(px);
        self
    }

    /// Constrain user resizing to a maximum width.
    pub fn with_max_width(mut self, px: f64) -> Self {
        self.max_width = Some(px);
        self
    }

    /// Clamp a candidate width to this column's resize bounds.
    pub fn clamp_width(&self, width: f64) -> f64 {
        let mut clamped = width;
        if let Some(min) = self.min_width {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max_width {
            clamped = clamped.min(max);
        }
        clamped
    }
}
