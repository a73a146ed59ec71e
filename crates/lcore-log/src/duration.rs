//! # Duration Timer
//!
//! Measures a block of work and logs the elapsed seconds when it ends.

use std::time::{Duration, Instant};

use serde_json::{Map, Value};

use crate::layer::Embedded;

/// A named timing record, configured before it starts.
///
/// ```ignore
/// let _timer = LogDuration::new("http call")
///     .duration_key("http_time_spent")
///     .field("api_version", "1.0")
///     .start();
/// ```
#[derive(Debug, Clone)]
pub struct LogDuration {
    event_name: String,
    duration_key: String,
    fields: Map<String, Value>,
}

impl LogDuration {
    pub fn new(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            duration_key: "duration".into(),
            fields: Map::new(),
        }
    }

    /// Key the elapsed seconds are logged under. Defaults to `duration`.
    pub fn duration_key(mut self, key: impl Into<String>) -> Self {
        self.duration_key = key.into();
        self
    }

    /// Extra field logged alongside the duration.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Start the clock. The record is logged when the guard drops.
    #[must_use = "the duration is logged when the guard is dropped"]
    pub fn start(self) -> DurationGuard {
        DurationGuard {
            timer: self,
            started: Instant::now(),
        }
    }

    /// Time `work` and return its result.
    pub fn time<T>(self, work: impl FnOnce() -> T) -> T {
        let _guard = self.start();
        work()
    }
}

/// Live measurement started by [`LogDuration::start`].
#[derive(Debug)]
pub struct DurationGuard {
    timer: LogDuration,
    started: Instant,
}

impl DurationGuard {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for DurationGuard {
    fn drop(&mut self) {
        let seconds = self.elapsed().as_secs_f64();
        let mut fields = std::mem::take(&mut self.timer.fields);
        fields.insert(self.timer.duration_key.clone(), Value::from(seconds));
        let fields = Embedded::from(fields);
        tracing::info!(embedded = %fields, "{}", self.timer.event_name);
    }
}
