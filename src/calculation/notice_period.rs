//! Notice period with compensation for embargo days (Art. 335c, 336c OR).
//!
//! The notice runs from the day after the termination takes effect and ends
//! on a permitted termination date. Notice days falling into an embargo are
//! suspended and appended after the window; the result is then rounded up
//! to the next permitted termination date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AuditStep, EndpointKind, Interval, NoticeLength, NoticeMonths, NoticePeriodResult,
    ServiceYearTable, TerminationTerms,
};

use super::calendar::{add_days, add_months, push_to_endpoint};
use super::interval_algebra::{grow, total_overlap};

/// The computed notice period and its audit step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeEvaluation {
    /// The notice period.
    pub notice: NoticePeriodResult,
    /// The audit step recording this computation.
    pub audit_step: AuditStep,
}

/// Statutory notice in months by seniority on the termination date.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::statutory_notice_months;
/// use emplaw_engine::models::ServiceYearTable;
/// use chrono::NaiveDate;
///
/// let table = ServiceYearTable::new(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
/// assert_eq!(statutory_notice_months(&table, NaiveDate::from_ymd_opt(2015, 6, 1).unwrap()), 1);
/// assert_eq!(statutory_notice_months(&table, NaiveDate::from_ymd_opt(2017, 6, 1).unwrap()), 2);
/// assert_eq!(statutory_notice_months(&table, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), 3);
/// ```
pub fn statutory_notice_months(service_years: &ServiceYearTable, termination: NaiveDate) -> u32 {
    match service_years.completed_years(termination) {
        0 => 1,
        1..=4 => 2,
        _ => 3,
    }
}

/// Computes the notice window for a termination.
///
/// Returns the last day of regular employment and the window. The window is
/// moved forward in whole months for as long as a full notice period still
/// fits before its end.
pub fn notice_window(
    termination: NaiveDate,
    months: u32,
    endpoint: EndpointKind,
) -> (NaiveDate, Interval) {
    let mut regular_end = push_to_endpoint(termination, endpoint);
    let mut start = add_days(regular_end, 1);
    let end = push_to_endpoint(add_months(regular_end, months), endpoint).max(start);

    loop {
        let next_start = add_months(start, 1);
        let latest_full_notice_end = add_days(add_months(next_start, months), -1);
        // A saturated date cannot show that a full notice still fits
        if next_start <= start
            || latest_full_notice_end >= add_days(NaiveDate::MAX, -1)
            || latest_full_notice_end > end
        {
            break;
        }
        start = next_start;
        regular_end = add_days(start, -1);
    }

    (regular_end, Interval::new(start, end).unwrap_or(Interval::single(start)))
}

/// Computes the notice period for a termination outside probation.
///
/// # Arguments
///
/// * `terms` - The termination facts
/// * `service_years` - Anniversaries of the employment start
/// * `embargo` - Merged embargo periods
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::compute_notice_period;
/// use emplaw_engine::models::{EndpointKind, NoticeMonths, ServiceYearTable,
///     TerminationTerms, TrialNoticeDays};
/// use chrono::NaiveDate;
///
/// let table = ServiceYearTable::new(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap());
/// let terms = TerminationTerms {
///     date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     notice_months: NoticeMonths::Unspecified,
///     endpoint: EndpointKind::Unspecified,
///     trial_notice_days: TrialNoticeDays::Unspecified,
/// };
///
/// let result = compute_notice_period(&terms, &table, &[], 1);
/// assert_eq!(result.notice.regular_interval.end(), NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());
/// ```
pub fn compute_notice_period(
    terms: &TerminationTerms,
    service_years: &ServiceYearTable,
    embargo: &[Interval],
    step_number: u32,
) -> NoticeEvaluation {
    let months = match terms.notice_months {
        NoticeMonths::Months(n) => n,
        NoticeMonths::Unspecified => statutory_notice_months(service_years, terms.date),
    };

    let (regular_end, window) = notice_window(terms.date, months, terms.endpoint);
    let overlap_days = total_overlap(&window, embargo);

    let mut compensation_interval = None;
    let mut extension_interval = None;
    if overlap_days > 0 {
        let compensation = Interval::new(
            add_days(window.end(), 1),
            add_days(window.end(), overlap_days),
        )
        .map(|c| grow(c, embargo));

        if terms.endpoint != EndpointKind::Anytime
            && let Some(c) = compensation
        {
            extension_interval =
                Interval::new(add_days(c.end(), 1), push_to_endpoint(c.end(), terms.endpoint));
        }
        compensation_interval = compensation;
    }

    let notice = NoticePeriodResult {
        length: NoticeLength::Months(months),
        regular_employment_end: Some(regular_end),
        regular_interval: window,
        compensation_interval,
        extension_interval,
        overlap_days,
    };
    let final_end = notice.final_end();

    debug!(
        notice_months = months,
        window = %window,
        overlap_days,
        final_end = %final_end,
        "Notice period computed"
    );

    let reasoning = if overlap_days > 0 {
        format!(
            "{} month(s) notice runs {}; {} day(s) fell into an embargo and are made up, \
             employment ends {}",
            months, window, overlap_days, final_end
        )
    } else {
        format!("{} month(s) notice runs {}; employment ends {}", months, window, final_end)
    };

    NoticeEvaluation {
        audit_step: AuditStep {
            step_number,
            rule_id: "notice_period".to_string(),
            rule_name: "Notice Period".to_string(),
            clause_ref: "Art. 335c OR, Art. 336c para. 2 OR".to_string(),
            input: serde_json::json!({
                "termination_date": terms.date.to_string(),
                "notice_months": terms.notice_months,
                "endpoint": terms.endpoint,
                "completed_service_years": service_years.completed_years(terms.date),
            }),
            output: serde_json::json!({
                "regular_employment_end": regular_end.to_string(),
                "notice_period": window.to_string(),
                "overlap_days": overlap_days,
                "final_end": final_end.to_string(),
            }),
            reasoning,
        },
        notice,
    }
}
