//! Wall-clock time.

use chrono::{DateTime, Utc};
use quay_application::ports::Clock;

/// [`Clock`] backed by the operating system's UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_starts_within_the_last_day() {
        let now = SystemClock.now();
        let today = SystemClock.today();
        assert!(today <= now);
        assert!(now - today < chrono::Duration::days(1));
    }
}
