//! Service-year anniversaries.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Interval;

/// Number of anniversaries tracked per employment.
pub const SERVICE_YEAR_COUNT: usize = 35;

/// The anniversaries of an employment start.
///
/// Entry `i` is the start plus `i` years, with February 29 clamped to
/// February 28 in common years. Service year `k` (one-based) covers
/// `[anniversary(k - 1), anniversary(k))`, so an anniversary day already
/// belongs to the new service year.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::ServiceYearTable;
/// use chrono::NaiveDate;
///
/// let table = ServiceYearTable::new(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
/// assert_eq!(table.anniversary(1), Some(NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()));
/// assert_eq!(table.service_year(NaiveDate::from_ymd_opt(2021, 2, 28).unwrap()), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceYearTable {
    anniversaries: Vec<NaiveDate>,
}

impl ServiceYearTable {
    /// Builds the table for an employment start.
    pub fn new(employment_start: NaiveDate) -> Self {
        let anniversaries = (0..SERVICE_YEAR_COUNT as u32)
            .map_while(|years| employment_start.checked_add_months(Months::new(12 * years)))
            .collect();
        Self { anniversaries }
    }

    /// First day of employment.
    pub fn employment_start(&self) -> NaiveDate {
        self.anniversaries[0]
    }

    /// The `years`-th anniversary, if tracked.
    pub fn anniversary(&self, years: usize) -> Option<NaiveDate> {
        self.anniversaries.get(years).copied()
    }

    /// Last tracked anniversary.
    pub fn last(&self) -> NaiveDate {
        self.anniversaries[self.anniversaries.len() - 1]
    }

    /// One-based service year `date` falls in; 0 before the employment start.
    pub fn service_year(&self, date: NaiveDate) -> u32 {
        self.anniversaries.partition_point(|a| *a <= date) as u32
    }

    /// Completed years of service on `date`.
    pub fn completed_years(&self, date: NaiveDate) -> u32 {
        self.service_year(date).saturating_sub(1)
    }

    /// Anniversaries `a` with `period.start() < a <= period.end()`.
    pub fn anniversaries_within(&self, period: &Interval) -> impl Iterator<Item = NaiveDate> + '_ {
        let (start, end) = (period.start(), period.end());
        self.anniversaries
            .iter()
            .copied()
            .filter(move |a| start < *a && *a <= end)
    }
}
