//! Measured pixel widths of rendered columns.
//!
//! The engine never measures anything itself. A host-owned width observer
//! reports batches of `column key -> pixel width` as layout or resizing
//! settles, and the core treats a missing entry as "not yet measured".

use std::collections::HashMap;

/// Width-map key for the row-actions furniture column.
pub const ACTIONS_COLUMN_KEY: &str = "actions";

/// Width-map key for the selection-checkbox furniture column.
pub const SELECTION_COLUMN_KEY: &str = "selection";

/// Live pixel widths keyed by column key (plus the synthetic furniture
/// keys). Ephemeral; rebuilt from observer reports, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidthMap {
    widths: HashMap<String, f64>,
}

impl WidthMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measured width for a key, if a measurement has arrived.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.widths.get(key).copied()
    }

    /// Whether a measurement exists for this key.
    pub fn is_measured(&self, key: &str) -> bool {
        self.widths.contains_key(key)
    }

    /// Record one measurement.
    pub fn set(&mut self, key: impl Into<String>, width: f64) {
        self.widths.insert(key.into(), width);
    }

    /// Fold a reported batch into the map. Later reports win per key;
    /// keys absent from the batch keep their previous measurement.
    pub fn merge(&mut self, batch: WidthMap) {
        self.widths.extend(batch.widths);
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }
}

impl FromIterator<(String, f64)> for WidthMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            widths: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, f64); N]> for WidthMap {
    fn from(entries: [(&str, f64); N]) -> Self {
        entries
            .into_iter()
            .map(|(k, w)| (k.to_string(), w))
            .collect()
    }
}

/// Callback invoked with each batch of changed widths.
pub type WidthCallback = Box<dyn FnMut(WidthMap)>;

/// Host-owned measurement collaborator.
///
/// Hosts wrap whatever actually watches rendered cells (a resize observer,
/// a layout pass) behind this trait; the core only ever consumes the
/// resulting batches.
pub trait WidthObserver {
    /// Register a callback for future width batches.
    fn subscribe(&mut self, on_widths_changed: WidthCallback);
}

/// Observer fed by explicit `emit` calls. Stands in for a real
/// measurement source in tests and headless hosts.
#[derive(Default)]
pub struct ManualWidthObserver {
    callbacks: Vec<WidthCallback>,
}

impl ManualWidthObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a batch to every subscriber.
    pub fn emit(&mut self, batch: WidthMap) {
        for callback in &mut self.callbacks {
            callback(batch.clone());
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.callbacks.len()
    }
}

impl WidthObserver for ManualWidthObserver {
    fn subscribe(&mut self, on_widths_changed: WidthCallback) {
        self.callbacks.push(on_widths_changed);
    }
}
