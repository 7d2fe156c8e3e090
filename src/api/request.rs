//! Request types for the employment law engine API.
//!
//! This module defines the JSON request structures for the `/evaluate`
//! endpoint. Dates arrive as strings in Swiss (`DD.MM.YYYY`) or ISO
//! (`YYYY-MM-DD`) notation and are checked when converted to [`CaseFacts`].

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::calculation::shift_years;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Canton, CaseFacts, EndpointKind, IncapacityRecord, IncapacityType, Interval, NoticeMonths,
    TerminationTerms, TrialMonths, TrialNoticeDays, TrialTerms, parse_date,
};

/// Years past the request date covered when no termination is evaluated.
pub const DEFAULT_HORIZON_YEARS: i32 = 3;

/// Request body for the `/evaluate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// First day of employment.
    pub employment_start: String,
    /// Canton abbreviation, e.g. "ZH".
    pub canton: String,
    /// Kind of incapacity the periods belong to.
    #[serde(default)]
    pub incapacity_type: IncapacityType,
    /// Up to three incapacities of up to three periods each.
    #[serde(default)]
    pub incapacities: Vec<Vec<PeriodRequest>>,
    /// Probation facts.
    #[serde(default)]
    pub trial: Option<TrialRequest>,
    /// Termination facts.
    #[serde(default)]
    pub termination: Option<TerminationRequest>,
    /// End of the evaluation window when no termination is evaluated.
    #[serde(default)]
    pub horizon: Option<String>,
}

/// A dated period in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// First day.
    pub start: String,
    /// Last day.
    pub end: String,
}

/// Probation facts in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialRequest {
    /// Days of the week the employee normally works.
    pub workdays: Vec<Weekday>,
    /// Agreed probation length.
    #[serde(default = "unspecified_trial")]
    pub months: TrialMonths,
}

/// Termination facts in a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerminationRequest {
    /// Day the notice of termination was received.
    pub date: String,
    /// Agreed notice length.
    #[serde(default = "unspecified_notice")]
    pub notice_months: NoticeMonths,
    /// Agreed termination date rule.
    #[serde(default)]
    pub endpoint: EndpointKind,
    /// Agreed notice during probation.
    #[serde(default = "unspecified_trial_notice")]
    pub trial_notice_days: TrialNoticeDays,
}

fn unspecified_trial() -> TrialMonths {
    TrialMonths::Unspecified
}

fn unspecified_notice() -> NoticeMonths {
    NoticeMonths::Unspecified
}

fn unspecified_trial_notice() -> TrialNoticeDays {
    TrialNoticeDays::Unspecified
}

impl EvaluationRequest {
    /// Converts the request into case facts.
    ///
    /// Without a termination or an explicit horizon the evaluation window
    /// ends [`DEFAULT_HORIZON_YEARS`] after `today`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidDate`] for an unparseable date
    /// - [`EngineError::UnknownCanton`] for an unknown canton abbreviation
    /// - [`EngineError::InvalidOrdering`] for a period ending before it starts
    pub fn into_facts(self, today: NaiveDate) -> EngineResult<CaseFacts> {
        let employment_start = parse_date("employment_start", &self.employment_start)?;
        let canton: Canton = self.canton.parse()?;

        let incapacities = self
            .incapacities
            .iter()
            .enumerate()
            .map(|(i, periods)| {
                periods
                    .iter()
                    .enumerate()
                    .map(|(p, period)| period.to_interval(i + 1, p + 1))
                    .collect::<EngineResult<Vec<_>>>()
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let termination = self
            .termination
            .map(|t| -> EngineResult<TerminationTerms> {
                Ok(TerminationTerms {
                    date: parse_date("termination.date", &t.date)?,
                    notice_months: t.notice_months,
                    endpoint: t.endpoint,
                    trial_notice_days: t.trial_notice_days,
                })
            })
            .transpose()?;

        let horizon = match &self.horizon {
            Some(value) => Some(parse_date("horizon", value)?),
            None if termination.is_none() => Some(shift_years(today, DEFAULT_HORIZON_YEARS)),
            None => None,
        };

        Ok(CaseFacts {
            employment_start,
            canton,
            incapacity_type: self.incapacity_type,
            incapacities: IncapacityRecord::new(incapacities),
            trial: self.trial.map(|t| TrialTerms {
                workdays: t.workdays,
                months: t.months,
            }),
            termination,
            horizon,
        })
    }
}

impl PeriodRequest {
    fn to_interval(&self, incapacity: usize, period: usize) -> EngineResult<Interval> {
        let field = |part: &str| format!("incapacities[{incapacity}][{period}].{part}");
        let start = parse_date(&field("start"), &self.start)?;
        let end = parse_date(&field("end"), &self.end)?;
        Interval::new(start, end).ok_or_else(|| EngineError::InvalidOrdering {
            message: format!(
                "incapacity {incapacity}, period {period} ends on {end} before it starts on {start}"
            ),
        })
    }
}
