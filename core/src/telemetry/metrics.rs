use std::sync::Mutex;

/// Counters for one analysis run, shareable across the driver and its sources.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    frames_processed: usize,
    frames_skipped: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                frames_processed: 0,
                frames_skipped: 0,
                errors: 0,
            }),
        }
    }

    pub fn record_processed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_processed += 1;
        }
    }

    pub fn record_skipped_n(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_skipped += count;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                frames_processed: metrics.frames_processed,
                frames_skipped: metrics.frames_skipped,
                errors: metrics.errors,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_processed: usize,
    pub frames_skipped: usize,
    pub errors: usize,
}
