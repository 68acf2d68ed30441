//! Progress logging at regular intervals of processed records

/// Counts records and logs each time the count passes a multiple of the interval.
///
/// ```
/// use r2rmod_core::progress::ProgressTracker;
///
/// let mut tracker = ProgressTracker::new("Processed records").with_interval(100);
/// for _ in 0..250 {
///     tracker.record(); // logs at 100 and 200
/// }
/// assert_eq!(tracker.count(), 250);
/// tracker.log_final(); // logs "Processed records 250 (complete)"
/// ```
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    interval: u64,
    message: String,
    count: u64,
}

impl ProgressTracker {
    /// New tracker with an interval of 100 000
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        ProgressTracker {
            interval: 100_000,
            message: message.into(),
            count: 0,
        }
    }

    /// Sets the logging interval; zero is treated as one
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds one to the count, logging if an interval boundary is reached.
    /// Returns whether it logged.
    pub fn record(&mut self) -> bool {
        self.count = self.count.saturating_add(1);
        if self.count.is_multiple_of(self.interval) {
            log::info!("{} {}", self.message, self.count);
            true
        } else {
            false
        }
    }

    /// Records seen so far
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Logs the final count unless the last [`ProgressTracker::record`] did
    pub fn log_final(&self) {
        if self.count > 0 && !self.count.is_multiple_of(self.interval) {
            log::info!("{} {} (complete)", self.message, self.count);
        }
    }
}
