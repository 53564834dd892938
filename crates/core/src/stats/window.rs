//! Computation of the fetch window for a statistics request.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::Frequency;

/// The date range a statistics request fetches entries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodWindow {
    /// Window start: `now - frequency_days * limit` days, floored to
    /// midnight UTC, so the oldest bucket covers whole days.
    pub start: DateTime<Utc>,
    /// Window end: `now` rounded up to the next 15-minute boundary, so
    /// consecutive requests within the same quarter hour share a window
    /// (and a cache key, where the gateway caches).
    pub end: DateTime<Utc>,
}

impl PeriodWindow {
    /// Computes the window for `limit` buckets of `frequency` width
    /// ending at `now`.
    #[must_use]
    pub fn compute(now: DateTime<Utc>, frequency: Frequency, limit: u32) -> Self {
        let span_days = frequency.days() * i64::from(limit);
        let start = (now - Duration::days(span_days))
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc();

        let secs = now.timestamp();
        let remainder = secs.rem_euclid(900);
        let end = if remainder == 0 {
            now
        } else {
            now + Duration::seconds(900 - remainder)
        };

        Self { start, end }
    }
}
