//! Closed date interval.
//!
//! [`Interval`] is the single unit every engine manipulates. An interval can
//! only be constructed with `start <= end`; anything that would be empty is
//! represented by `Option<Interval>::None` at the call site.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// A closed range of calendar days `[start, end]`.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::Interval;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
///
/// let march = Interval::new(start, end).unwrap();
/// assert_eq!(march.duration_days(), 31);
/// assert!(Interval::new(end, start).is_none());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RawInterval {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawInterval> for Interval {
    type Error = EngineError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end).ok_or_else(|| EngineError::InvalidOrdering {
            message: format!("interval start {} is after its end {}", raw.start, raw.end),
        })
    }
}

impl Interval {
    /// Creates an interval, or `None` if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Creates a one-day interval.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the first day of the interval.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last day of the interval.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive day count.
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Returns true if `date` lies within the interval, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true if the two intervals share at least one day.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns the days shared by both intervals.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        Interval::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Returns true if `other` starts on the day after this interval ends.
    pub fn is_adjacent_before(&self, other: &Interval) -> bool {
        self.end.succ_opt() == Some(other.start)
    }

    /// Moves the start, or `None` if the result would be empty.
    pub fn with_start(&self, start: NaiveDate) -> Option<Interval> {
        Interval::new(start, self.end)
    }

    /// Moves the end, or `None` if the result would be empty.
    pub fn with_end(&self, end: NaiveDate) -> Option<Interval> {
        Interval::new(self.start, end)
    }

    /// Cuts the interval so it holds at most `days` days.
    pub fn truncate_to_days(&self, days: i64) -> Option<Interval> {
        if days <= 0 {
            return None;
        }
        let last = self.start + Duration::days(days - 1);
        Interval::new(self.start, self.end.min(last))
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%d.%m.%Y"),
            self.end.format("%d.%m.%Y")
        )
    }
}
