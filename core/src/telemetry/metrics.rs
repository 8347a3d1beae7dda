use std::sync::Mutex;

/// Counters collected over one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub processed: usize,
    pub rejected: usize,
    pub tacks: usize,
    pub fallbacks: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    fn bump(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut metrics);
        }
    }

    pub fn record_processed(&self) {
        self.bump(|m| m.processed += 1);
    }

    /// A stage produced a non-finite value that was dropped.
    pub fn record_rejected(&self) {
        self.bump(|m| m.rejected += 1);
    }

    pub fn record_tack(&self) {
        self.bump(|m| m.tacks += 1);
    }

    pub fn record_fallback(&self) {
        self.bump(|m| m.fallbacks += 1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|m| *m).unwrap_or_default()
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
