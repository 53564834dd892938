//! Time-bucketed transaction statistics.
//!
//! A statistics request folds a date-bounded set of ledger entries into
//! fixed-width time windows, summing incoming and outgoing amounts per
//! window. Everything here is pure; the caller fetches the entries.

pub mod window;

pub use window::PeriodWindow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Bucket width for statistics aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    /// 1-day buckets.
    Day,
    /// 7-day buckets.
    Week,
    /// 30-day buckets.
    Month,
}

impl Frequency {
    /// Bucket width in days.
    #[must_use]
    pub const fn days(self) -> i64 {
        match self {
            Self::Day => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Default bucket count when the caller supplies none.
    #[must_use]
    pub const fn default_limit(self) -> u32 {
        match self {
            Self::Day => 30,
            Self::Week => 12,
            Self::Month => 6,
        }
    }

    /// Parses a frequency from its wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

/// Resolves the effective bucket count: a requested limit is capped at
/// twice the frequency default; no request means the default.
#[must_use]
pub fn effective_limit(frequency: Frequency, requested: Option<u32>) -> u32 {
    let default = frequency.default_limit();
    requested.map_or(default, |limit| limit.min(default * 2))
}

/// One direction of money flow within a bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Flow {
    /// Sum of amounts in this direction.
    pub amount: Decimal,
    /// Number of entries in this direction.
    pub count: u64,
}

/// A fixed-width time window with aggregated flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    /// Start of the window.
    pub date: DateTime<Utc>,
    /// Credits (`amount >= 0`).
    pub incoming: Flow,
    /// Debits (`amount < 0`).
    pub outgoing: Flow,
}

/// Aggregation result: one bucket per window plus the total entry count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// The buckets, oldest first.
    pub rows: Vec<Bucket>,
    /// Total number of entries that were aggregated.
    pub count: u64,
}

/// Minimal view of a ledger entry needed for aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatEntry {
    /// Signed amount.
    pub amount: Decimal,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Folds entries into `limit` buckets of `frequency` width starting at
/// `start`.
///
/// An entry exactly at `start` lands in bucket 0. Entries past the
/// nominal range (the window end is rounded, so a few may overshoot) are
/// clamped into the last bucket, never dropped. Entries with `amount >= 0`
/// accumulate into `incoming`, the rest into `outgoing`.
#[must_use]
pub fn aggregate(
    entries: &[StatEntry],
    start: DateTime<Utc>,
    frequency: Frequency,
    limit: u32,
) -> Statistics {
    let limit = limit.max(1) as usize;

    let mut rows: Vec<Bucket> = (0..limit)
        .map(|i| Bucket {
            date: start + chrono::Duration::days(frequency.days() * i as i64),
            incoming: Flow::default(),
            outgoing: Flow::default(),
        })
        .collect();

    for entry in entries {
        let days = (entry.created_at - start).num_days().max(0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = ((days / frequency.days()) as usize).min(limit - 1);

        let flow = if entry.amount >= Decimal::ZERO {
            &mut rows[index].incoming
        } else {
            &mut rows[index].outgoing
        };
        flow.amount += entry.amount;
        flow.count += 1;
    }

    Statistics {
        rows,
        count: entries.len() as u64,
    }
}
