use chrono::{DateTime, Duration, Utc};

/// Minimum spacing between automated announcement attempts.
pub const DEBOUNCE_WINDOW_SECS: i64 = 300;

/// Single-timestamp guard against repeated "went live" announcements.
#[derive(Debug, Clone)]
pub struct Debounce {
    window: Duration,
    last: Option<DateTime<Utc>>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(Duration::seconds(DEBOUNCE_WINDOW_SECS))
    }
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    /// True when nothing was attempted yet or the window has fully elapsed.
    /// A `now` earlier than the last attempt counts as inside the window.
    pub fn is_ready(&self, now: DateTime<Utc>) -> bool {
        match self.last {
            None => true,
            Some(last) => now - last > self.window,
        }
    }

    pub fn record(&mut self, now: DateTime<Utc>) {
        self.last = Some(now);
    }

    pub fn last(&self) -> Option<DateTime<Utc>> {
        self.last
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
