//! Clock port

use chrono::{DateTime, NaiveTime, Utc};

/// Source of the current instant.
///
/// Dwell times and the "today" window of the operator dashboard are computed
/// against this, so tests can pin the current instant.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Midnight UTC of the current day.
    fn today(&self) -> DateTime<Utc> {
        self.now().date_naive().and_time(NaiveTime::MIN).and_utc()
    }
}
