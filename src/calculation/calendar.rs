//! Calendar primitives: canton holidays, date arithmetic and business days.
//!
//! Every engine does its date arithmetic through this module. Month and year
//! shifts clamp to the end of the target month (31 January plus one month is
//! 29 February in a leap year) and saturate at the representable range
//! instead of failing.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

use crate::config::{HolidayDate, HolidayRule, RulesConfig};
use crate::models::{Canton, EndpointKind, Interval};

/// Public holidays of one canton.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::HolidayCalendar;
/// use emplaw_engine::config::ConfigLoader;
/// use emplaw_engine::models::Canton;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let zurich = HolidayCalendar::new(loader.config(), Canton::Zh);
///
/// // Sechseläuten is not a public holiday, 1 August is
/// assert!(!zurich.is_holiday(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()));
/// assert!(zurich.is_holiday(NaiveDate::from_ymd_opt(2024, 8, 1).unwrap()));
/// ```
#[derive(Debug, Clone)]
pub struct HolidayCalendar<'a> {
    rules: Vec<&'a HolidayRule>,
    canton: Canton,
}

impl<'a> HolidayCalendar<'a> {
    /// Selects the holiday rules observed in `canton`.
    pub fn new(config: &'a RulesConfig, canton: Canton) -> Self {
        let rules = config
            .holidays()
            .iter()
            .filter(|rule| rule.applies_to(canton))
            .collect();
        Self { rules, canton }
    }

    /// The canton this calendar belongs to.
    pub fn canton(&self) -> Canton {
        self.canton
    }

    /// Returns true if `date` is a public holiday in the canton.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holiday_name(date).is_some()
    }

    /// Returns the name of the holiday falling on `date`.
    pub fn holiday_name(&self, date: NaiveDate) -> Option<&'a str> {
        self.rules
            .iter()
            .find(|rule| resolve_holiday(&rule.date, date.year()) == Some(date))
            .map(|rule| rule.name.as_str())
    }

    /// Holidays within `period`, in date order.
    pub fn holidays_between(&self, period: &Interval) -> Vec<(NaiveDate, &'a str)> {
        let mut found: Vec<(NaiveDate, &'a str)> = (period.start().year()..=period.end().year())
            .flat_map(|year| {
                self.rules.iter().filter_map(move |rule| {
                    resolve_holiday(&rule.date, year).map(|d| (d, rule.name.as_str()))
                })
            })
            .filter(|(d, _)| period.contains(*d))
            .collect();
        found.sort();
        found
    }
}

/// Returns true if `date` is a public holiday in `canton`.
pub fn is_holiday(date: NaiveDate, canton: Canton, config: &RulesConfig) -> bool {
    HolidayCalendar::new(config, canton).is_holiday(date)
}

/// Computes Easter Sunday of the Gregorian calendar.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2024), NaiveDate::from_ymd_opt(2024, 3, 31));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    // Oudin's algorithm
    let g = year % 19;
    let c = year / 100;
    let h = (c - c / 4 - (8 * c + 13) / 25 + 19 * g + 15) % 30;
    let i = h - (h / 28) * (1 - (h / 28) * (29 / (h + 1)) * ((21 - g) / 11));
    let j = (year + year / 4 + i + 2 - c + c / 4) % 7;
    let p = i - j;
    let day = 1 + (p + 27 + (p + 6) / 40) % 31;
    let month = 3 + (p + 26) / 30;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Resolves a holiday rule to its date in `year`.
pub fn resolve_holiday(date: &HolidayDate, year: i32) -> Option<NaiveDate> {
    match *date {
        HolidayDate::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day),
        HolidayDate::Easter { offset } => {
            easter_sunday(year)?.checked_add_signed(Duration::days(offset))
        }
        HolidayDate::WeekdayOnOrAfter {
            month,
            day,
            weekday,
            offset,
        } => {
            let anchor = NaiveDate::from_ymd_opt(year, month, day)?;
            let ahead = (7 + weekday.num_days_from_monday() as i64
                - anchor.weekday().num_days_from_monday() as i64)
                % 7;
            anchor.checked_add_signed(Duration::days(ahead + offset))
        }
    }
}

/// Adds days, saturating at the representable range.
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Adds calendar months, clamping to the end of the target month.
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(if months >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Adds a month count forward, saturating at [`NaiveDate::MAX`].
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Adds calendar years; 29 February maps to 28 February in common years.
pub fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    shift_months(date, years.saturating_mul(12))
}

/// Inclusive day count of `[start, end]`; zero or negative when reversed.
pub fn period_length(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_months(Months::new(1))?
        .pred_opt()
}

/// Rounds `date` up to the next permitted termination date.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::push_to_endpoint;
/// use emplaw_engine::models::EndpointKind;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
/// assert_eq!(
///     push_to_endpoint(date, EndpointKind::Quarter),
///     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
/// );
/// assert_eq!(push_to_endpoint(date, EndpointKind::Anytime), date);
/// ```
pub fn push_to_endpoint(date: NaiveDate, endpoint: EndpointKind) -> NaiveDate {
    let pushed = match endpoint {
        EndpointKind::Anytime => Some(date),
        EndpointKind::Week => {
            let to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
            date.checked_add_signed(Duration::days(to_sunday))
        }
        EndpointKind::Unspecified | EndpointKind::Month => {
            last_day_of_month(date.year(), date.month())
        }
        EndpointKind::Quarter => {
            let quarter_end = date.month().div_ceil(3) * 3;
            last_day_of_month(date.year(), quarter_end)
        }
        EndpointKind::Year => NaiveDate::from_ymd_opt(date.year(), 12, 31),
    };
    pushed.unwrap_or(date)
}

/// Business days in `period`: dates on one of `workdays` that are not
/// holidays in the calendar's canton.
pub fn business_days<'c>(
    period: Interval,
    workdays: &'c [Weekday],
    calendar: &'c HolidayCalendar<'_>,
) -> impl Iterator<Item = NaiveDate> + 'c {
    period
        .start()
        .iter_days()
        .take_while(move |d| *d <= period.end())
        .filter(move |d| is_business_day(*d, workdays, calendar))
}

/// Returns true if `date` is a workday and not a holiday.
pub fn is_business_day(date: NaiveDate, workdays: &[Weekday], calendar: &HolidayCalendar<'_>) -> bool {
    workdays.contains(&date.weekday()) && !calendar.is_holiday(date)
}
