/// Rainfall accumulation over the reporting window.
///
/// A total covers the complete calendar days before "today", so a request
/// made any time on 2026-10-16 sums rain that fell from 2026-10-09 00:00
/// up to 2026-10-16 00:00.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{ObservedAt, RainfallIncrement};

/// Half-open local-time period `[start, end)` of whole days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingWindow {
    pub start_date: NaiveDate,
    /// First day *not* included (normally today).
    pub end_date: NaiveDate,
}

impl ReportingWindow {
    /// The `days` complete days immediately before `today`.
    pub fn ending_before(today: NaiveDate, days: i64) -> Self {
        Self {
            start_date: today - Duration::days(days),
            end_date: today,
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start_date.and_time(chrono::NaiveTime::MIN)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end_date.and_time(chrono::NaiveTime::MIN)
    }

    /// Timed readings are end-of-interval: a reading stamped exactly at the
    /// window start belongs to the previous day, one stamped at the window
    /// end closes out the last day.
    pub fn contains_reading(&self, at: NaiveDateTime) -> bool {
        at > self.start() && at <= self.end()
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        day >= self.start_date && day < self.end_date
    }

    pub fn contains(&self, observed_at: ObservedAt) -> bool {
        match observed_at {
            ObservedAt::Timed(at) => self.contains_reading(at),
            ObservedAt::Day(day) => self.contains_day(day),
        }
    }
}

/// Sum of all increments, in inches.
pub fn cumulative_rainfall(increments: &[RainfallIncrement]) -> f64 {
    increments.iter().map(|i| i.inches).sum()
}

/// Total of the increments that fall inside `window`, or `None` when none do.
pub fn window_total(increments: &[RainfallIncrement], window: &ReportingWindow) -> Option<f64> {
    let in_window: Vec<RainfallIncrement> = increments
        .iter()
        .filter(|i| window.contains(i.observed_at))
        .cloned()
        .collect();

    if in_window.is_empty() {
        None
    } else {
        Some(cumulative_rainfall(&in_window))
    }
}

/// Round to hundredths of an inch.
///
/// Rounds the exact binary value of `inches`, sending true ties to the even
/// digit: 0.125 becomes 0.12, while 2.675 (stored just below the tie)
/// becomes 2.67. Non-finite input is returned unchanged.
pub fn round_inches(inches: f64) -> f64 {
    Decimal::from_f64_retain(inches)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_string().parse().ok())
        .unwrap_or(inches)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
