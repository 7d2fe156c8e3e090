//! The evaluation pipeline.
//!
//! Runs the engines in order over one set of case facts: probation,
//! embargo, notice, termination validity, sick pay and the cleanup after
//! the end of employment. Every run owns its intermediate results.

use std::time::Instant;

use tracing::debug;

use crate::config::RulesConfig;
use crate::error::EngineResult;
use crate::models::{
    AuditTrace, CaseFacts, EmploymentEnd, EmploymentTimeline, Evaluation, IncapacityRecord,
    Interval, NoticePeriodResult, RowLabel, ServiceYearTable, TerminationCase, TimelineRow,
    TimelineTables,
};

use super::calendar::HolidayCalendar;
use super::embargo::compute_embargo;
use super::interval_algebra::merge;
use super::notice_period::compute_notice_period;
use super::sick_pay::compute_sick_pay;
use super::termination::{classify_termination, clean_up_after_termination, validate_termination};
use super::trial_period::{TrialPeriodResult, evaluate_trial_period};

/// Evaluates a case.
///
/// # Errors
///
/// Returns the validation error of [`CaseFacts::validate`] if the facts are
/// incomplete or inconsistent.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::evaluate_case;
/// use emplaw_engine::config::ConfigLoader;
/// use emplaw_engine::models::{
///     CaseFacts, Canton, EndpointKind, NoticeMonths, TerminationTerms, TrialNoticeDays, Verdict,
/// };
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::builtin().unwrap();
/// let facts = CaseFacts {
///     termination: Some(TerminationTerms {
///         date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///         notice_months: NoticeMonths::Unspecified,
///         endpoint: EndpointKind::Month,
///         trial_notice_days: TrialNoticeDays::Unspecified,
///     }),
///     ..CaseFacts::new(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(), Canton::Zh)
/// };
///
/// let evaluation = evaluate_case(&facts, loader.config()).unwrap();
/// assert_eq!(evaluation.verdict, Verdict::Valid);
/// ```
pub fn evaluate_case(facts: &CaseFacts, rules: &RulesConfig) -> EngineResult<Evaluation> {
    let started = Instant::now();
    facts.validate()?;

    let mut trace = AuditTrace::default();
    let service_years = ServiceYearTable::new(facts.employment_start);
    let calendar = HolidayCalendar::new(rules, facts.canton);
    let horizon = facts.horizon.unwrap_or(service_years.last());
    let termination = facts.termination.as_ref();
    let cutoff = termination.map_or(horizon, |t| t.date);
    let incapacities = merge(facts.incapacities.periods().copied());

    let trial = facts.trial.as_ref().and_then(|terms| {
        evaluate_trial_period(
            facts.employment_start,
            terms.months.months(),
            cutoff,
            &terms.workdays,
            &calendar,
            &incapacities,
            trace.next_step_number(),
        )
    });
    if let Some(result) = &trial {
        trace.push(result.audit_step.clone());
        if result.scan_exhausted {
            trace.warn(
                "TRIAL_EXTENSION_INCOMPLETE",
                format!(
                    "Not all {} missed business day(s) could be made up within two years",
                    result.extension_days
                ),
                "medium",
            );
        }
    }
    let regular_start = trial
        .as_ref()
        .map_or(facts.employment_start, TrialPeriodResult::regular_employment_start);

    let embargo = compute_embargo(
        facts.incapacity_type,
        &facts.incapacities,
        regular_start,
        &service_years,
        trace.next_step_number(),
    );
    trace.push(embargo.audit_step.clone());
    if embargo.dropped_periods > 0 {
        trace.warn(
            "INCAPACITY_DURING_PROBATION",
            format!(
                "{} incapacity period(s) ended before regular employment and carry no embargo",
                embargo.dropped_periods
            ),
            "low",
        );
    }

    let trial_interval = trial.as_ref().map(|t| t.trial);
    let case = classify_termination(
        termination.map(|t| t.date),
        trial_interval.as_ref(),
        &embargo.embargo,
    );
    let ordinary_notice = match (case, termination) {
        (TerminationCase::Standard | TerminationCase::Embargo, Some(terms)) => {
            let evaluation = compute_notice_period(
                terms,
                &service_years,
                &embargo.embargo,
                trace.next_step_number(),
            );
            trace.push(evaluation.audit_step);
            Some(evaluation.notice)
        }
        _ => None,
    };

    let outcome = validate_termination(
        termination,
        trial_interval,
        &embargo.embargo,
        ordinary_notice.clone(),
        trace.next_step_number(),
    );
    trace.push(outcome.audit_step.clone());

    let pay_until = match outcome.employment_end {
        EmploymentEnd::On(end) => end,
        EmploymentEnd::Continuing | EmploymentEnd::NotEvaluated => horizon,
    };
    let sick_pay = compute_sick_pay(
        facts.incapacity_type,
        &facts.incapacities,
        embargo.income_compensation,
        &service_years,
        rules,
        facts.canton,
        Some(pay_until),
        trace.next_step_number(),
    );
    trace.push(sick_pay.audit_step.clone());

    let (mut embargo_periods, mut embargo_merged) = (embargo.periods, embargo.embargo);
    if outcome.case == TerminationCase::Trial {
        embargo_periods.clear();
        embargo_merged.clear();
    }
    let (mut sick_pay_periods, mut sick_pay_merged) = (sick_pay.periods, sick_pay.sick_pay);
    if let EmploymentEnd::On(final_end) = outcome.employment_end {
        let cleaned = clean_up_after_termination(
            final_end,
            &embargo_periods,
            &sick_pay_periods,
            trace.next_step_number(),
        );
        trace.push(cleaned.audit_step);
        embargo_periods = cleaned.embargo_periods;
        embargo_merged = cleaned.embargo;
        sick_pay_periods = cleaned.sick_pay_periods;
        sick_pay_merged = cleaned.sick_pay;
    }

    let regular_employment = match outcome.case {
        TerminationCase::Trial => None,
        TerminationCase::Standard => ordinary_notice
            .as_ref()
            .and_then(|n| n.regular_employment_end)
            .and_then(|end| Interval::new(regular_start, end)),
        TerminationCase::NoCase | TerminationCase::Embargo => Interval::new(regular_start, horizon),
    };

    let timeline = EmploymentTimeline {
        employment_start: facts.employment_start,
        trial: outcome.trial,
        trial_extension_days: trial.as_ref().map_or(0, |t| t.extension_days),
        regular_employment,
        embargo_periods,
        embargo: embargo_merged,
        sick_pay_periods,
        sick_pay: sick_pay_merged,
        notice_period: outcome.notice,
        termination_case: outcome.case,
        employment_end: outcome.employment_end,
    };
    let tables = build_tables(&timeline, &facts.incapacities);

    trace.duration_us = started.elapsed().as_micros() as u64;
    debug!(
        case = ?timeline.termination_case,
        steps = trace.steps.len(),
        duration_us = trace.duration_us,
        "Evaluation completed"
    );

    Ok(Evaluation {
        verdict: timeline.termination_case.verdict(),
        reason: timeline.termination_case.reason(),
        timeline,
        tables,
        audit_trace: trace,
    })
}

/// Builds the display rows of a timeline.
pub fn build_tables(timeline: &EmploymentTimeline, incapacities: &IncapacityRecord) -> TimelineTables {
    let mut tables = TimelineTables::default();

    if let Some(trial) = &timeline.trial {
        tables.trial.push(TimelineRow::new(RowLabel::TrialPeriod, trial));
    }
    if let Some(regular) = &timeline.regular_employment {
        tables
            .trial
            .push(TimelineRow::new(RowLabel::RegularEmployment, regular));
    }

    for (incapacity, periods) in incapacities.numbered() {
        for (index, period) in periods.iter().enumerate() {
            tables.incapacity.push(TimelineRow::new(
                RowLabel::Incapacity {
                    incapacity,
                    period: index + 1,
                },
                period,
            ));
        }
    }

    tables.embargo = numbered_rows(&timeline.embargo, |number| RowLabel::Embargo { number });
    tables.sick_pay = numbered_rows(&timeline.sick_pay, |number| RowLabel::SickPay { number });

    if let Some(notice) = &timeline.notice_period {
        tables.notice_period = notice_rows(notice);
    }
    tables
}

fn numbered_rows(intervals: &[Interval], label: impl Fn(usize) -> RowLabel) -> Vec<TimelineRow> {
    intervals
        .iter()
        .enumerate()
        .map(|(index, interval)| TimelineRow::new(label(index + 1), interval))
        .collect()
}

fn notice_rows(notice: &NoticePeriodResult) -> Vec<TimelineRow> {
    let mut rows = vec![TimelineRow::new(
        RowLabel::NoticePeriod,
        &notice.regular_interval,
    )];
    if let Some(compensation) = &notice.compensation_interval {
        rows.push(TimelineRow::new(RowLabel::NoticeCompensation, compensation));
    }
    if let Some(extension) = &notice.extension_interval {
        rows.push(TimelineRow::new(RowLabel::NoticeExtension, extension));
    }
    rows
}
