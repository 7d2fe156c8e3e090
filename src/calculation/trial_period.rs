//! Probation period and its extension (Art. 335b OR).
//!
//! A probation period is extended by the business days the employee missed
//! through incapacity within it. The missed days are made up after the
//! probation window and after the last incapacity that overlapped it, on
//! business days that are themselves free of incapacity.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{AuditStep, Interval};

use super::calendar::{add_days, add_months, business_days, is_business_day, HolidayCalendar};

/// Maximum number of days scanned for make-up business days.
pub const TRIAL_EXTENSION_SCAN_DAYS: i64 = 730;

/// The evaluated probation period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPeriodResult {
    /// Probation window before any extension.
    pub nominal: Interval,
    /// Probation window including the extension.
    pub trial: Interval,
    /// Business days missed within the nominal window.
    pub extension_days: u32,
    /// True if the scan ended before all missed days were made up.
    pub scan_exhausted: bool,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
}

impl TrialPeriodResult {
    /// First day of regular employment.
    pub fn regular_employment_start(&self) -> NaiveDate {
        add_days(self.trial.end(), 1)
    }
}

/// Last day of a probation of `months` months starting on `start`.
///
/// The period is inclusive, so a shift landing on the same day of month ends
/// one day earlier: one month from 1 March ends on 31 March.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::nominal_trial_end;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(nominal_trial_end(start, 1), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
/// ```
pub fn nominal_trial_end(start: NaiveDate, months: u32) -> NaiveDate {
    let shifted = add_months(start, months);
    if shifted.day() == start.day() {
        add_days(shifted, -1)
    } else {
        shifted
    }
}

/// Evaluates the probation period.
///
/// # Arguments
///
/// * `employment_start` - First day of employment
/// * `months` - Probation length; zero means no probation
/// * `cutoff` - Termination date, or the evaluation horizon without one
/// * `workdays` - Weekdays the employee normally works
/// * `calendar` - Holidays of the workplace canton
/// * `incapacities` - Merged incapacity periods
/// * `step_number` - The step number for audit trail sequencing
///
/// # Returns
///
/// `None` when there is no probation period.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::{evaluate_trial_period, HolidayCalendar};
/// use emplaw_engine::config::ConfigLoader;
/// use emplaw_engine::models::{Canton, Interval};
/// use chrono::{NaiveDate, Weekday};
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let calendar = HolidayCalendar::new(loader.config(), Canton::Zh);
/// let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let cutoff = NaiveDate::from_ymd_opt(2027, 1, 1).unwrap();
/// let workdays = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
///
/// let result = evaluate_trial_period(start, 1, cutoff, &workdays, &calendar, &[], 1).unwrap();
/// assert_eq!(result.trial.end(), NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
/// assert_eq!(result.extension_days, 0);
/// ```
pub fn evaluate_trial_period(
    employment_start: NaiveDate,
    months: u32,
    cutoff: NaiveDate,
    workdays: &[Weekday],
    calendar: &HolidayCalendar<'_>,
    incapacities: &[Interval],
    step_number: u32,
) -> Option<TrialPeriodResult> {
    if months == 0 {
        debug!("No probation period agreed");
        return None;
    }

    let end = nominal_trial_end(employment_start, months).min(cutoff);
    let nominal = Interval::new(employment_start, end.max(employment_start))?;

    let overlapping: Vec<&Interval> = incapacities
        .iter()
        .filter(|incapacity| incapacity.intersects(&nominal))
        .collect();

    let missed: usize = overlapping
        .iter()
        .filter_map(|incapacity| incapacity.intersection(&nominal))
        .map(|shared| business_days(shared, workdays, calendar).count())
        .sum();

    let mut trial = nominal;
    let mut scan_exhausted = false;

    if missed > 0 {
        let last_incapacity_end = overlapping
            .iter()
            .map(|incapacity| incapacity.end())
            .max()
            .unwrap_or(nominal.end());
        let scan_from = add_days(nominal.end().max(last_incapacity_end), 1);

        let make_up: Vec<NaiveDate> = scan_from
            .iter_days()
            .take(TRIAL_EXTENSION_SCAN_DAYS as usize)
            .filter(|day| is_business_day(*day, workdays, calendar))
            .take(missed)
            .collect();

        scan_exhausted = make_up.len() < missed;
        let extended_end = if scan_exhausted {
            add_days(scan_from, TRIAL_EXTENSION_SCAN_DAYS - 1)
        } else {
            make_up.last().copied().unwrap_or(nominal.end())
        };

        if let Some(extended) = nominal.with_end(extended_end.min(cutoff).max(nominal.end())) {
            trial = extended;
        }
        debug!(
            missed_days = missed,
            trial_end = %trial.end(),
            "Probation extended for missed business days"
        );
    }

    let extension_days = missed as u32;
    let reasoning = if missed == 0 {
        format!(
            "Probation of {} month(s) runs {}; no business day missed",
            months, trial
        )
    } else {
        format!(
            "Probation of {} month(s) nominally runs {}; {} business day(s) missed through \
             incapacity extend it to {}",
            months,
            nominal,
            missed,
            trial.end()
        )
    };

    Some(TrialPeriodResult {
        nominal,
        trial,
        extension_days,
        scan_exhausted,
        audit_step: AuditStep {
            step_number,
            rule_id: "trial_period".to_string(),
            rule_name: "Probation Period".to_string(),
            clause_ref: "Art. 335b OR".to_string(),
            input: serde_json::json!({
                "employment_start": employment_start.to_string(),
                "months": months,
                "cutoff": cutoff.to_string(),
                "workdays": workdays.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
                "overlapping_incapacities": overlapping.len(),
            }),
            output: serde_json::json!({
                "nominal_end": nominal.end().to_string(),
                "trial_end": trial.end().to_string(),
                "extension_days": extension_days,
            }),
            reasoning,
        },
    })
}
