//! Row selection bookkeeping for the currently loaded page.
//!
//! Selection holds row values and compares them by id. It is scoped to
//! whatever `data` slice the host currently renders: nothing is pruned or
//! remapped when the page changes, and callers wanting selection to
//! survive pagination must re-match by id themselves.

/// A row the grid can select: anything with a comparable id.
pub trait GridRow {
    type Id: PartialEq;

    fn id(&self) -> Self::Id;
}

/// Set of selected rows, identity by [`GridRow::id`]. Never persisted.
#[derive(Debug, Clone)]
pub struct SelectionModel<R> {
    selected: Vec<R>,
}

impl<R> Default for SelectionModel<R> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
        }
    }
}

impl<R: GridRow + Clone> SelectionModel<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `row` in the selection.
    pub fn toggle_row(&mut self, row: &R) {
        if let Some(pos) = self.selected.iter().position(|r| r.id() == row.id()) {
            self.selected.remove(pos);
        } else {
            self.selected.push(row.clone());
        }
    }

    /// Select everything in `data`, or clear if everything already is.
    ///
    /// "Everything already is" means the selected count equals
    /// `data.len()`; toggling on an empty slice is an identity transition.
    pub fn toggle_select_all(&mut self, data: &[R]) {
        if self.selected.len() == data.len() {
            self.selected.clear();
        } else {
            self.selected = data.to_vec();
        }
    }

    /// Whether every row of `data` counts as selected.
    ///
    /// Deliberately a count comparison, not id-set equality: a selection
    /// seeded externally with the same number of different rows reports
    /// all-selected. Kept for compatibility with the select-all checkbox
    /// behavior this models.
    pub fn is_all_selected(&self, data: &[R]) -> bool {
        !data.is_empty() && self.selected.len() == data.len()
    }

    /// Whether this row's id is in the selection.
    pub fn is_selected(&self, row: &R) -> bool {
        self.selected.iter().any(|r| r.id() == row.id())
    }

    /// The selected rows, in selection order.
    pub fn selected(&self) -> &[R] {
        &self.selected
    }

    /// Replace the selection wholesale, e.g. when seeding from a host
    /// prop.
    pub fn set_selected(&mut self, rows: Vec<R>) {
        self.selected = rows;
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
