//! Validation for date-bounded transaction listings.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Maximum span of a period query, in days.
pub const MAX_PERIOD_DAYS: i64 = 60;

/// Errors for period validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// The start of the period is not before its end (day granularity).
    #[error("period start must be before period end")]
    StartNotBeforeEnd,

    /// The period spans more than [`MAX_PERIOD_DAYS`] days.
    #[error("period spans {0} days, more than the {MAX_PERIOD_DAYS}-day maximum")]
    TooLong(i64),
}

/// Validates a period's bounds at day granularity.
///
/// Both timestamps are floored to whole days since the epoch before
/// comparing, so two instants on the same day never form a valid period,
/// and the 60-day cap counts calendar-day differences.
///
/// # Errors
///
/// Returns an error if `start >= end` at day granularity or the span
/// exceeds [`MAX_PERIOD_DAYS`].
pub fn validate_period(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), PeriodError> {
    let start_day = start.timestamp().div_euclid(86_400);
    let end_day = end.timestamp().div_euclid(86_400);

    if start_day >= end_day {
        return Err(PeriodError::StartNotBeforeEnd);
    }

    let span = end_day - start_day;
    if span > MAX_PERIOD_DAYS {
        return Err(PeriodError::TooLong(span));
    }

    Ok(())
}
