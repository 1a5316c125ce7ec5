use serde::Serialize;

///
/// EngineMetrics
///
/// Ephemeral, in-memory counters for one engine's query activity.
/// Snapshots are cheap copies; reset exists for test isolation.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EngineMetrics {
    // Query surface entrypoints
    pub filter_calls: u64,
    pub exclude_calls: u64,

    // Cache behavior
    pub cache_hits: u64,
    pub cache_misses: u64,

    // Rows touched
    pub rows_scanned: u64,
    pub rows_excluded: u64,
}

impl EngineMetrics {
    pub(crate) const fn record_scan(&mut self, rows: u64) {
        self.rows_scanned += rows;
    }

    pub(crate) const fn record_excluded(&mut self, rows: u64) {
        self.rows_excluded += rows;
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
