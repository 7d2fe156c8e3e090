//! Embargo periods (Art. 336c OR).
//!
//! After probation, an employer may not terminate while the employee is
//! incapacitated. For illness and accident the protection is capped per
//! incapacity at 30, 90 or 180 days depending on seniority. Military service
//! longer than eleven days is protected from four weeks before until four
//! weeks after the service. Pregnancy is protected until sixteen weeks after
//! confinement.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AuditStep, EmbargoCap, EmbargoPeriod, IncapacityRecord, IncapacityType, Interval,
    ServiceYearTable,
};

use super::calendar::add_days;
use super::interval_algebra::{flatten, merge, split_at};

/// Service longer than this many days extends the embargo around it.
pub const MILITARY_SERVICE_THRESHOLD_DAYS: i64 = 11;

/// Weeks of maternity pay after confinement.
pub const MATERNITY_PAY_WEEKS: i64 = 14;

/// Weeks of protection after confinement.
pub const POST_CONFINEMENT_EMBARGO_WEEKS: i64 = 16;

/// The embargo chains and their merged periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbargoResult {
    /// One entry per period piece, in incapacity order.
    pub periods: Vec<EmbargoPeriod>,
    /// Merged embargo periods.
    pub embargo: Vec<Interval>,
    /// Income compensation window for military service or maternity.
    pub income_compensation: Option<Interval>,
    /// Incapacity periods dropped because they ended before regular employment.
    pub dropped_periods: usize,
    /// The audit step recording this computation.
    pub audit_step: AuditStep,
}

/// Computes the embargo periods of a case.
///
/// # Arguments
///
/// * `incapacity_type` - Kind of incapacity all periods belong to
/// * `record` - Dated incapacity periods
/// * `regular_start` - First day after probation
/// * `service_years` - Anniversaries of the employment start
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::compute_embargo;
/// use emplaw_engine::models::{IncapacityRecord, IncapacityType, Interval, ServiceYearTable};
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
/// let illness = Interval::new(
///     NaiveDate::from_ymd_opt(2020, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2020, 8, 31).unwrap(),
/// ).unwrap();
///
/// let result = compute_embargo(
///     IncapacityType::IllnessAccident,
///     &IncapacityRecord::new(vec![vec![illness]]),
///     start,
///     &ServiceYearTable::new(start),
///     1,
/// );
///
/// // First service year: 30 days of protection
/// assert_eq!(result.embargo[0].duration_days(), 30);
/// ```
pub fn compute_embargo(
    incapacity_type: IncapacityType,
    record: &IncapacityRecord,
    regular_start: NaiveDate,
    service_years: &ServiceYearTable,
    step_number: u32,
) -> EmbargoResult {
    let mut dropped_periods = 0;
    let mut income_compensation = None;

    let periods = match incapacity_type {
        IncapacityType::None => Vec::new(),
        IncapacityType::IllnessAccident => {
            illness_chains(record, regular_start, service_years, &mut dropped_periods)
        }
        IncapacityType::MilitaryService => {
            let mut periods = Vec::new();
            for (incapacity, service) in numbered_periods(record) {
                let protected = if service.duration_days() > MILITARY_SERVICE_THRESHOLD_DAYS {
                    Interval::new(
                        add_days(service.start(), -(4 * 7 + 1)),
                        add_days(service.end(), 4 * 7 + 1),
                    )
                    .unwrap_or(service)
                } else {
                    service
                };
                match clamp_to_regular(protected, regular_start) {
                    Some(interval) => {
                        income_compensation = Some(interval);
                        periods.push(uncapped(incapacity, interval));
                    }
                    None => dropped_periods += 1,
                }
            }
            periods
        }
        IncapacityType::Pregnancy => {
            let mut periods = Vec::new();
            for (incapacity, pregnancy) in numbered_periods(record) {
                let confinement = pregnancy.end();
                income_compensation = Interval::new(
                    confinement,
                    add_days(confinement, MATERNITY_PAY_WEEKS * 7),
                );
                let protected_until = confinement
                    .checked_add_signed(Duration::weeks(POST_CONFINEMENT_EMBARGO_WEEKS))
                    .map(|d| add_days(d, -1))
                    .unwrap_or(NaiveDate::MAX);
                let protected = pregnancy.with_end(protected_until).unwrap_or(pregnancy);
                match clamp_to_regular(protected, regular_start) {
                    Some(interval) => periods.push(uncapped(incapacity, interval)),
                    None => dropped_periods += 1,
                }
            }
            periods
        }
    };

    let embargo = merge(flatten(periods.iter().map(|p| &p.interval)));
    debug!(
        incapacity_type = ?incapacity_type,
        pieces = periods.len(),
        merged = embargo.len(),
        "Embargo periods computed"
    );

    let reasoning = match incapacity_type {
        IncapacityType::None => "No incapacity; no embargo".to_string(),
        IncapacityType::IllnessAccident => format!(
            "Illness/accident protection capped per incapacity by seniority (30/90/180 days); \
             {} merged embargo period(s)",
            embargo.len()
        ),
        IncapacityType::MilitaryService => format!(
            "Service protected, extended by four weeks on each side when longer than {} days",
            MILITARY_SERVICE_THRESHOLD_DAYS
        ),
        IncapacityType::Pregnancy => format!(
            "Pregnancy protected until {} weeks after confinement",
            POST_CONFINEMENT_EMBARGO_WEEKS
        ),
    };

    EmbargoResult {
        audit_step: AuditStep {
            step_number,
            rule_id: "embargo".to_string(),
            rule_name: "Embargo Periods".to_string(),
            clause_ref: "Art. 336c OR".to_string(),
            input: serde_json::json!({
                "incapacity_type": incapacity_type,
                "regular_employment_start": regular_start.to_string(),
                "periods": record.periods().count(),
            }),
            output: serde_json::json!({
                "embargo": embargo.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
                "dropped_periods": dropped_periods,
            }),
            reasoning,
        },
        periods,
        embargo,
        income_compensation,
        dropped_periods,
    }
}

fn numbered_periods(record: &IncapacityRecord) -> impl Iterator<Item = (usize, Interval)> + '_ {
    record
        .numbered()
        .flat_map(|(number, periods)| periods.iter().map(move |p| (number, *p)))
}

fn clamp_to_regular(period: Interval, regular_start: NaiveDate) -> Option<Interval> {
    if period.end() < regular_start {
        return None;
    }
    period.with_start(period.start().max(regular_start))
}

fn uncapped(incapacity: usize, interval: Interval) -> EmbargoPeriod {
    EmbargoPeriod {
        incapacity,
        interval: Some(interval),
        cap: None,
        claimed_days: interval.duration_days(),
    }
}

fn illness_chains(
    record: &IncapacityRecord,
    regular_start: NaiveDate,
    service_years: &ServiceYearTable,
    dropped_periods: &mut usize,
) -> Vec<EmbargoPeriod> {
    let thresholds: Vec<NaiveDate> = [1, 5]
        .into_iter()
        .filter_map(|years| service_years.anniversary(years))
        .collect();

    let mut chains = Vec::new();
    for (incapacity, periods) in record.numbered() {
        let mut claimed: i64 = 0;
        for period in periods {
            let Some(clipped) = clamp_to_regular(*period, regular_start) else {
                *dropped_periods += 1;
                continue;
            };

            for piece in split_at(clipped, thresholds.iter().copied()) {
                let cap = EmbargoCap::for_completed_years(service_years.completed_years(piece.start()));
                let interval = piece.truncate_to_days(cap.days() - claimed);
                claimed += interval.map_or(0, |i| i.duration_days());
                chains.push(EmbargoPeriod {
                    incapacity,
                    interval,
                    cap: Some(cap),
                    claimed_days: claimed,
                });
            }
        }
    }
    chains
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn iv(start: NaiveDate, end: NaiveDate) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn illness(start: NaiveDate, regular_start: NaiveDate, periods: Vec<Vec<Interval>>) -> EmbargoResult {
        compute_embargo(
            IncapacityType::IllnessAccident,
            &IncapacityRecord::new(periods),
            regular_start,
            &ServiceYearTable::new(start),
            1,
        )
    }

    // ==========================================================================
    // Illness and accident
    // ==========================================================================

    #[test]
    fn test_uncapped_illness_is_fully_protected() {
        let start = date(2020, 1, 1);
        let result = illness(start, start, vec![vec![iv(date(2021, 1, 1), date(2021, 1, 15))]]);
        assert_eq!(result.embargo, vec![iv(date(2021, 1, 1), date(2021, 1, 15))]);
        assert_eq!(result.periods[0].cap, Some(EmbargoCap::Days90));
    }

    #[test]
    fn test_split_at_first_anniversary_carries_claimed_days() {
        let start = date(2020, 1, 1);
        let result = illness(start, start, vec![vec![iv(date(2020, 12, 15), date(2021, 1, 15))]]);
        assert_eq!(result.periods.len(), 2);

        let first = &result.periods[0];
        assert_eq!(first.cap, Some(EmbargoCap::Days30));
        assert_eq!(first.interval, Some(iv(date(2020, 12, 15), date(2020, 12, 31))));
        assert_eq!(first.claimed_days, 17);

        let second = &result.periods[1];
        assert_eq!(second.cap, Some(EmbargoCap::Days90));
        assert_eq!(second.interval, Some(iv(date(2021, 1, 1), date(2021, 1, 15))));
        assert_eq!(second.claimed_days, 32);

        assert_eq!(result.embargo, vec![iv(date(2020, 12, 15), date(2021, 1, 15))]);
    }

    #[test]
    fn test_cap_spans_periods_of_one_incapacity() {
        let start = date(2020, 1, 1);
        let result = illness(
            start,
            start,
            vec![vec![
                iv(date(2020, 3, 1), date(2020, 3, 20)),
                iv(date(2020, 5, 1), date(2020, 5, 31)),
                iv(date(2020, 7, 1), date(2020, 7, 10)),
            ]],
        );
        assert_eq!(result.periods[0].claimed_days, 20);
        assert_eq!(result.periods[1].interval, Some(iv(date(2020, 5, 1), date(2020, 5, 10))));
        assert_eq!(result.periods[1].claimed_days, 30);
        assert_eq!(result.periods[2].interval, None);
        assert_eq!(result.periods[2].claimed_days, 30);
    }

    #[test]
    fn test_each_incapacity_has_its_own_cap() {
        let start = date(2020, 1, 1);
        let result = illness(
            start,
            start,
            vec![
                vec![iv(date(2020, 3, 1), date(2020, 4, 30))],
                vec![iv(date(2020, 6, 1), date(2020, 7, 31))],
            ],
        );
        let total: i64 = result.embargo.iter().map(Interval::duration_days).sum();
        assert_eq!(total, 60);
        assert_eq!(result.periods[1].incapacity, 2);
    }

    #[test]
    fn test_senior_employee_has_180_days() {
        let start = date(2010, 1, 1);
        let result = illness(start, start, vec![vec![iv(date(2020, 1, 1), date(2020, 12, 31))]]);
        assert_eq!(result.periods[0].cap, Some(EmbargoCap::Days180));
        assert_eq!(result.embargo[0].duration_days(), 180);
    }

    #[test]
    fn test_split_at_fifth_anniversary() {
        let start = date(2015, 1, 1);
        let result = illness(start, start, vec![vec![iv(date(2019, 12, 1), date(2020, 12, 31))]]);
        assert_eq!(result.periods[0].cap, Some(EmbargoCap::Days90));
        assert_eq!(result.periods[0].interval, Some(iv(date(2019, 12, 1), date(2019, 12, 31))));
        assert_eq!(result.periods[1].cap, Some(EmbargoCap::Days180));
        // 31 days claimed, 149 left under the new class
        assert_eq!(result.periods[1].interval.unwrap().duration_days(), 149);
        assert_eq!(result.periods[1].claimed_days, 180);
    }

    #[test]
    fn test_illness_during_probation_is_not_protected() {
        let start = date(2020, 1, 1);
        let regular_start = date(2020, 4, 1);
        let result = illness(
            start,
            regular_start,
            vec![vec![
                iv(date(2020, 2, 1), date(2020, 2, 10)),
                iv(date(2020, 3, 20), date(2020, 4, 5)),
            ]],
        );
        assert_eq!(result.dropped_periods, 1);
        assert_eq!(result.embargo, vec![iv(date(2020, 4, 1), date(2020, 4, 5))]);
    }

    // ==========================================================================
    // Military service
    // ==========================================================================

    #[test]
    fn test_long_service_is_extended_by_four_weeks() {
        let start = date(2020, 1, 1);
        let service = iv(date(2021, 6, 1), date(2021, 6, 21));
        let result = compute_embargo(
            IncapacityType::MilitaryService,
            &IncapacityRecord::new(vec![vec![service]]),
            start,
            &ServiceYearTable::new(start),
            1,
        );
        let expected = iv(date(2021, 5, 3), date(2021, 7, 20));
        assert_eq!(result.embargo, vec![expected]);
        assert_eq!(result.income_compensation, Some(expected));
        assert_eq!(result.periods[0].cap, None);
    }

    #[test]
    fn test_short_service_is_protected_as_is() {
        let start = date(2020, 1, 1);
        let service = iv(date(2021, 6, 1), date(2021, 6, 11));
        let result = compute_embargo(
            IncapacityType::MilitaryService,
            &IncapacityRecord::new(vec![vec![service]]),
            start,
            &ServiceYearTable::new(start),
            1,
        );
        assert_eq!(result.embargo, vec![service]);
    }

    // ==========================================================================
    // Pregnancy
    // ==========================================================================

    #[test]
    fn test_pregnancy_protected_sixteen_weeks_after_confinement() {
        let start = date(2020, 1, 1);
        let pregnancy = iv(date(2023, 10, 1), date(2024, 6, 10));
        let result = compute_embargo(
            IncapacityType::Pregnancy,
            &IncapacityRecord::new(vec![vec![pregnancy]]),
            start,
            &ServiceYearTable::new(start),
            1,
        );
        assert_eq!(result.embargo, vec![iv(date(2023, 10, 1), date(2024, 9, 29))]);
        assert_eq!(
            result.income_compensation,
            Some(iv(date(2024, 6, 10), date(2024, 9, 16)))
        );
    }

    #[test]
    fn test_no_incapacity_yields_no_embargo() {
        let start = date(2020, 1, 1);
        let result = compute_embargo(
            IncapacityType::None,
            &IncapacityRecord::default(),
            start,
            &ServiceYearTable::new(start),
            2,
        );
        assert!(result.embargo.is_empty());
        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.clause_ref, "Art. 336c OR");
    }
}
