//! Termination validity and the end of employment.
//!
//! A termination is classified by where its date falls. During probation
//! it is valid with the short probation notice (Art. 335b OR); during an
//! embargo period it is void (Art. 336c para. 2 OR); otherwise it is an
//! ordinary termination with the notice computed by the notice engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AuditStep, EmbargoPeriod, EmploymentEnd, Interval, NoticeLength, NoticePeriodResult,
    SickPayPeriod, TerminationCase, TerminationTerms,
};

use super::calendar::add_days;
use super::interval_algebra::{flatten, merge};

/// The resolved termination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationOutcome {
    /// Classification of the termination.
    pub case: TerminationCase,
    /// Notice period in force, if the termination is effective.
    pub notice: Option<NoticePeriodResult>,
    /// End of employment.
    pub employment_end: EmploymentEnd,
    /// Probation period, cut at the termination date when terminated during probation.
    pub trial: Option<Interval>,
    /// The audit step recording this decision.
    pub audit_step: AuditStep,
}

/// Periods left once employment has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTermination {
    /// Embargo chains without pieces starting after the end.
    pub embargo_periods: Vec<EmbargoPeriod>,
    /// Merged embargo periods.
    pub embargo: Vec<Interval>,
    /// Sick pay chains cut at the end.
    pub sick_pay_periods: Vec<SickPayPeriod>,
    /// Merged sick pay periods.
    pub sick_pay: Vec<Interval>,
    /// The audit step recording this cleanup.
    pub audit_step: AuditStep,
}

/// Classifies a termination on `date`.
///
/// Later cases win: a date inside an embargo period is an embargo case even
/// if it also falls within probation.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::classify_termination;
/// use emplaw_engine::models::{Interval, TerminationCase};
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2024, m, day).unwrap();
/// let trial = Interval::new(d(3, 1), d(3, 31));
///
/// assert_eq!(classify_termination(None, trial.as_ref(), &[]), TerminationCase::NoCase);
/// assert_eq!(classify_termination(Some(d(3, 15)), trial.as_ref(), &[]), TerminationCase::Trial);
/// assert_eq!(classify_termination(Some(d(4, 15)), trial.as_ref(), &[]), TerminationCase::Standard);
/// ```
pub fn classify_termination(
    date: Option<NaiveDate>,
    trial: Option<&Interval>,
    embargo: &[Interval],
) -> TerminationCase {
    let Some(date) = date else {
        return TerminationCase::NoCase;
    };

    let mut case = TerminationCase::Standard;
    if trial.is_some_and(|t| t.contains(date)) {
        case = case.max(TerminationCase::Trial);
    }
    if embargo.iter().any(|e| e.contains(date)) {
        case = case.max(TerminationCase::Embargo);
    }
    case
}

/// Notice running from the day after a termination during probation.
///
/// Returns `None` when no probation notice applies; employment then ends on
/// the termination date itself.
pub fn trial_notice(termination: NaiveDate, days: u32) -> Option<NoticePeriodResult> {
    let window = Interval::new(add_days(termination, 1), add_days(termination, days as i64))?;
    Some(NoticePeriodResult {
        length: NoticeLength::Days(days),
        regular_employment_end: None,
        regular_interval: window,
        compensation_interval: None,
        extension_interval: None,
        overlap_days: 0,
    })
}

/// Resolves the termination against probation and embargo.
///
/// # Arguments
///
/// * `terms` - Termination facts, if a termination is evaluated
/// * `trial` - Probation period including any extension
/// * `embargo` - Merged embargo periods
/// * `ordinary_notice` - Notice computed for an ordinary termination
/// * `step_number` - The step number for audit trail sequencing
pub fn validate_termination(
    terms: Option<&TerminationTerms>,
    trial: Option<Interval>,
    embargo: &[Interval],
    ordinary_notice: Option<NoticePeriodResult>,
    step_number: u32,
) -> TerminationOutcome {
    let case = classify_termination(terms.map(|t| t.date), trial.as_ref(), embargo);

    let (notice, employment_end, trial, reasoning) = match (case, terms) {
        (TerminationCase::Trial, Some(terms)) => {
            let days = terms.trial_notice_days.days();
            let notice = trial_notice(terms.date, days);
            let end = notice
                .as_ref()
                .map_or(terms.date, NoticePeriodResult::final_end);
            let cut = trial.and_then(|t| t.with_end(terms.date));
            (
                notice,
                EmploymentEnd::On(end),
                cut,
                format!(
                    "Termination on {} falls within probation; {} day(s) notice, employment ends {}",
                    terms.date, days, end
                ),
            )
        }
        (TerminationCase::Embargo, Some(terms)) => (
            None,
            EmploymentEnd::Continuing,
            trial,
            format!(
                "Termination on {} falls within an embargo period and is void",
                terms.date
            ),
        ),
        (TerminationCase::Standard, Some(terms)) => match ordinary_notice {
            Some(notice) => {
                let end = notice.final_end();
                (
                    Some(notice),
                    EmploymentEnd::On(end),
                    trial,
                    format!(
                        "Ordinary termination on {}; employment ends {}",
                        terms.date, end
                    ),
                )
            }
            None => (
                None,
                EmploymentEnd::On(terms.date),
                trial,
                format!("Ordinary termination on {} without notice", terms.date),
            ),
        },
        _ => (
            None,
            EmploymentEnd::NotEvaluated,
            trial,
            "No termination evaluated".to_string(),
        ),
    };

    debug!(case = ?case, employment_end = ?employment_end, "Termination classified");

    TerminationOutcome {
        audit_step: AuditStep {
            step_number,
            rule_id: "termination_validity".to_string(),
            rule_name: "Termination Validity".to_string(),
            clause_ref: match case {
                TerminationCase::Trial => "Art. 335b OR",
                TerminationCase::Embargo => "Art. 336c para. 2 OR",
                _ => "Art. 335c OR",
            }
            .to_string(),
            input: serde_json::json!({
                "termination_date": terms.map(|t| t.date.to_string()),
                "trial": trial.map(|t| t.to_string()),
                "embargo_periods": embargo.len(),
            }),
            output: serde_json::json!({
                "case": case,
                "verdict": case.verdict(),
                "reason": case.reason(),
                "employment_end": employment_end,
            }),
            reasoning,
        },
        case,
        notice,
        employment_end,
        trial,
    }
}

/// Removes protection and pay beyond the last day of employment.
///
/// Embargo pieces starting after `final_end` are dropped. Sick pay pieces
/// starting after it are dropped and those spanning it are cut.
pub fn clean_up_after_termination(
    final_end: NaiveDate,
    embargo_periods: &[EmbargoPeriod],
    sick_pay_periods: &[SickPayPeriod],
    step_number: u32,
) -> PostTermination {
    let embargo_periods: Vec<EmbargoPeriod> = embargo_periods
        .iter()
        .filter(|p| p.interval.is_none_or(|i| i.start() <= final_end))
        .cloned()
        .collect();

    let sick_pay_periods: Vec<SickPayPeriod> = sick_pay_periods
        .iter()
        .filter(|p| p.interval.is_none_or(|i| i.start() <= final_end))
        .map(|p| SickPayPeriod {
            interval: p.interval.and_then(|i| i.with_end(i.end().min(final_end))),
            ..p.clone()
        })
        .collect();

    let embargo = merge(flatten(embargo_periods.iter().map(|p| &p.interval)));
    let sick_pay = merge(flatten(sick_pay_periods.iter().map(|p| &p.interval)));

    PostTermination {
        audit_step: AuditStep {
            step_number,
            rule_id: "post_termination".to_string(),
            rule_name: "Post-Termination Cleanup".to_string(),
            clause_ref: "Art. 324a OR, Art. 336c OR".to_string(),
            input: serde_json::json!({ "employment_end": final_end.to_string() }),
            output: serde_json::json!({
                "embargo": embargo.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
                "sick_pay": sick_pay.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
            }),
            reasoning: format!("Periods beyond {final_end} removed"),
        },
        embargo_periods,
        embargo,
        sick_pay_periods,
        sick_pay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmbargoCap, EndpointKind, NoticeMonths, TrialNoticeDays, Verdict};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn iv(start: NaiveDate, end: NaiveDate) -> Interval {
        Interval::new(start, end).unwrap()
    }

    fn terms(on: NaiveDate, trial_notice_days: TrialNoticeDays) -> TerminationTerms {
        TerminationTerms {
            date: on,
            notice_months: NoticeMonths::Unspecified,
            endpoint: EndpointKind::Month,
            trial_notice_days,
        }
    }

    fn ordinary(end: NaiveDate) -> NoticePeriodResult {
        NoticePeriodResult {
            length: NoticeLength::Months(1),
            regular_employment_end: Some(date(2024, 4, 30)),
            regular_interval: iv(date(2024, 5, 1), end),
            compensation_interval: None,
            extension_interval: None,
            overlap_days: 0,
        }
    }

    // ==========================================================================
    // Classification
    // ==========================================================================

    #[test]
    fn test_trial_boundaries_are_inclusive() {
        let trial = iv(date(2024, 3, 1), date(2024, 3, 31));
        assert_eq!(
            classify_termination(Some(date(2024, 3, 31)), Some(&trial), &[]),
            TerminationCase::Trial
        );
        assert_eq!(
            classify_termination(Some(date(2024, 4, 1)), Some(&trial), &[]),
            TerminationCase::Standard
        );
    }

    #[test]
    fn test_embargo_outranks_trial() {
        let trial = iv(date(2024, 3, 1), date(2024, 3, 31));
        let embargo = [iv(date(2024, 3, 20), date(2024, 4, 10))];
        assert_eq!(
            classify_termination(Some(date(2024, 3, 25)), Some(&trial), &embargo),
            TerminationCase::Embargo
        );
    }

    // ==========================================================================
    // Resolution
    // ==========================================================================

    #[test]
    fn test_trial_termination_with_seven_days_notice() {
        let trial = iv(date(2024, 3, 1), date(2024, 3, 31));
        let outcome = validate_termination(
            Some(&terms(date(2024, 3, 15), TrialNoticeDays::Unspecified)),
            Some(trial),
            &[],
            None,
            4,
        );
        assert_eq!(outcome.case, TerminationCase::Trial);
        assert_eq!(outcome.case.verdict(), Verdict::Valid);
        assert_eq!(outcome.trial, Some(iv(date(2024, 3, 1), date(2024, 3, 15))));
        let notice = outcome.notice.unwrap();
        assert_eq!(notice.regular_interval, iv(date(2024, 3, 16), date(2024, 3, 22)));
        assert_eq!(notice.length, NoticeLength::Days(7));
        assert_eq!(outcome.employment_end, EmploymentEnd::On(date(2024, 3, 22)));
        assert_eq!(outcome.audit_step.clause_ref, "Art. 335b OR");
    }

    #[test]
    fn test_trial_termination_without_notice_ends_same_day() {
        let trial = iv(date(2024, 3, 1), date(2024, 3, 31));
        let outcome = validate_termination(
            Some(&terms(date(2024, 3, 15), TrialNoticeDays::Days(0))),
            Some(trial),
            &[],
            None,
            4,
        );
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.employment_end, EmploymentEnd::On(date(2024, 3, 15)));
    }

    #[test]
    fn test_embargo_termination_discards_notice() {
        let embargo = [iv(date(2024, 4, 1), date(2024, 4, 30))];
        let outcome = validate_termination(
            Some(&terms(date(2024, 4, 10), TrialNoticeDays::Unspecified)),
            None,
            &embargo,
            Some(ordinary(date(2024, 5, 31))),
            4,
        );
        assert_eq!(outcome.case.verdict(), Verdict::Invalid);
        assert_eq!(outcome.notice, None);
        assert_eq!(outcome.employment_end, EmploymentEnd::Continuing);
    }

    #[test]
    fn test_ordinary_termination_ends_with_notice() {
        let outcome = validate_termination(
            Some(&terms(date(2024, 4, 10), TrialNoticeDays::Unspecified)),
            None,
            &[],
            Some(ordinary(date(2024, 5, 31))),
            4,
        );
        assert_eq!(outcome.case, TerminationCase::Standard);
        assert_eq!(outcome.employment_end, EmploymentEnd::On(date(2024, 5, 31)));
    }

    #[test]
    fn test_no_termination_is_not_evaluated() {
        let outcome = validate_termination(None, None, &[], None, 1);
        assert_eq!(outcome.case.verdict(), Verdict::NotEvaluated);
        assert_eq!(outcome.employment_end, EmploymentEnd::NotEvaluated);
    }

    // ==========================================================================
    // Cleanup
    // ==========================================================================

    #[test]
    fn test_cleanup_cuts_sick_pay_and_drops_later_embargo() {
        let embargo_periods = vec![
            EmbargoPeriod {
                incapacity: 1,
                interval: Some(iv(date(2024, 5, 1), date(2024, 5, 20))),
                cap: Some(EmbargoCap::Days90),
                claimed_days: 20,
            },
            EmbargoPeriod {
                incapacity: 2,
                interval: Some(iv(date(2024, 7, 1), date(2024, 7, 10))),
                cap: Some(EmbargoCap::Days90),
                claimed_days: 10,
            },
        ];
        let sick_pay_periods = vec![
            SickPayPeriod {
                service_year: 2,
                interval: Some(iv(date(2024, 5, 25), date(2024, 6, 15))),
                cap: None,
                claimed_days: 22,
            },
            SickPayPeriod {
                service_year: 2,
                interval: Some(iv(date(2024, 7, 1), date(2024, 7, 10))),
                cap: None,
                claimed_days: 32,
            },
        ];

        let cleaned =
            clean_up_after_termination(date(2024, 6, 10), &embargo_periods, &sick_pay_periods, 6);

        assert_eq!(cleaned.embargo, vec![iv(date(2024, 5, 1), date(2024, 5, 20))]);
        assert_eq!(cleaned.embargo_periods.len(), 1);
        assert_eq!(cleaned.sick_pay, vec![iv(date(2024, 5, 25), date(2024, 6, 10))]);
        assert_eq!(cleaned.sick_pay_periods.len(), 1);
    }
}
