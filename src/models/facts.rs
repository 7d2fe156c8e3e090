//! Case facts: the typed input of an evaluation.
//!
//! This module contains [`CaseFacts`] and the option enums describing what a
//! contract says (or does not say) about probation, notice and the
//! termination date. [`CaseFacts::validate`] enforces every precondition the
//! engines rely on, so the calculation modules can assume well-formed input.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::{Canton, Interval};

/// Maximum number of distinct incapacities per case.
pub const MAX_INCAPACITIES: usize = 3;

/// Maximum number of periods per incapacity.
pub const MAX_PERIODS_PER_INCAPACITY: usize = 3;

/// Longest agreed probation in months (Art. 335b para. 2 OR).
pub const MAX_TRIAL_MONTHS: u32 = 3;

/// Longest agreed notice period in months.
pub const MAX_NOTICE_MONTHS: u32 = 12;

/// Default trial notice in days (Art. 335b para. 1 OR).
pub const DEFAULT_TRIAL_NOTICE_DAYS: u32 = 7;

/// The kind of incapacity to work that the case concerns.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::IncapacityType;
///
/// let kind: IncapacityType = serde_json::from_str("\"military_service\"").unwrap();
/// assert_eq!(kind, IncapacityType::MilitaryService);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncapacityType {
    /// No incapacity.
    #[default]
    None,
    /// Illness or accident.
    IllnessAccident,
    /// Military or civil service.
    MilitaryService,
    /// Pregnancy up to confinement.
    Pregnancy,
}

/// Probation length as agreed in the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialMonths {
    /// The contract does not mention a probation period.
    Unspecified,
    /// The contract excludes a probation period.
    None,
    /// Explicit length in months.
    Months(u32),
}

impl TrialMonths {
    /// Resolves the agreement to a month count.
    ///
    /// An unspecified probation defaults to one month; an excluded one is
    /// zero months.
    pub fn months(&self) -> u32 {
        match self {
            TrialMonths::Unspecified => 1,
            TrialMonths::None => 0,
            TrialMonths::Months(n) => *n,
        }
    }
}

/// Notice period length as agreed in the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeMonths {
    /// Statutory length by seniority applies.
    Unspecified,
    /// Explicit length in months.
    Months(u32),
}

/// Notice during probation as agreed in the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialNoticeDays {
    /// Statutory seven days apply.
    Unspecified,
    /// Explicit length in days.
    Days(u32),
}

impl TrialNoticeDays {
    /// Resolves the agreement to a day count.
    pub fn days(&self) -> u32 {
        match self {
            TrialNoticeDays::Unspecified => DEFAULT_TRIAL_NOTICE_DAYS,
            TrialNoticeDays::Days(n) => *n,
        }
    }
}

/// The date on which employment may end after notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// The contract is silent; the statutory end of month applies.
    #[default]
    #[serde(alias = "none")]
    Unspecified,
    /// End of a calendar week (Sunday).
    Week,
    /// End of a calendar month.
    Month,
    /// End of a calendar quarter.
    Quarter,
    /// End of a calendar year.
    Year,
    /// Any day.
    Anytime,
}

/// Probation facts, present when the probation period is to be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialTerms {
    /// Days of the week the employee normally works.
    pub workdays: Vec<Weekday>,
    /// Agreed probation length.
    pub months: TrialMonths,
}

/// Termination facts, present when a termination is to be evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminationTerms {
    /// Day the notice of termination was received.
    pub date: NaiveDate,
    /// Agreed notice length.
    pub notice_months: NoticeMonths,
    /// Agreed termination date rule.
    pub endpoint: EndpointKind,
    /// Agreed notice during probation.
    pub trial_notice_days: TrialNoticeDays,
}

/// Dated incapacities of a case.
///
/// Up to three incapacities, each with up to three periods. Incapacity
/// numbers are one-based in labels and audit output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncapacityRecord(Vec<Vec<Interval>>);

impl IncapacityRecord {
    /// Creates a record from per-incapacity period lists.
    pub fn new(incapacities: Vec<Vec<Interval>>) -> Self {
        Self(incapacities)
    }

    /// Returns the periods of each incapacity.
    pub fn incapacities(&self) -> &[Vec<Interval>] {
        &self.0
    }

    /// Iterates over `(incapacity_number, periods)`, numbers starting at 1.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &[Interval])> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, periods)| (idx + 1, periods.as_slice()))
    }

    /// Every period of every incapacity, in record order.
    pub fn periods(&self) -> impl Iterator<Item = &Interval> {
        self.0.iter().flatten()
    }

    /// Returns true if the record holds no period at all.
    pub fn is_empty(&self) -> bool {
        self.periods().next().is_none()
    }
}

/// All facts of one legal case.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::{CaseFacts, Canton, EndpointKind, NoticeMonths,
///     TerminationTerms, TrialNoticeDays};
/// use chrono::NaiveDate;
///
/// let facts = CaseFacts {
///     termination: Some(TerminationTerms {
///         date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///         notice_months: NoticeMonths::Unspecified,
///         endpoint: EndpointKind::Month,
///         trial_notice_days: TrialNoticeDays::Unspecified,
///     }),
///     ..CaseFacts::new(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(), Canton::Zh)
/// };
/// assert!(facts.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFacts {
    /// First day of employment.
    pub employment_start: NaiveDate,
    /// Canton of the workplace.
    pub canton: Canton,
    /// Kind of incapacity all periods belong to.
    #[serde(default)]
    pub incapacity_type: IncapacityType,
    /// Dated incapacity periods.
    #[serde(default)]
    pub incapacities: IncapacityRecord,
    /// Probation facts, if the probation period is evaluated.
    #[serde(default)]
    pub trial: Option<TrialTerms>,
    /// Termination facts, if a termination is evaluated.
    #[serde(default)]
    pub termination: Option<TerminationTerms>,
    /// End of the evaluation window when no termination is evaluated.
    #[serde(default)]
    pub horizon: Option<NaiveDate>,
}

impl CaseFacts {
    /// Creates facts with no case parameter selected.
    pub fn new(employment_start: NaiveDate, canton: Canton) -> Self {
        Self {
            employment_start,
            canton,
            incapacity_type: IncapacityType::None,
            incapacities: IncapacityRecord::default(),
            trial: None,
            termination: None,
            horizon: None,
        }
    }

    /// Checks the facts for completeness and consistency.
    ///
    /// # Errors
    ///
    /// - [`EngineError::ConfigurationConflict`] if no case parameter is
    ///   selected, probation is evaluated without workdays, an agreed month
    ///   count is out of range, or the incapacity type and periods disagree.
    /// - [`EngineError::InvalidOrdering`] if incapacity dates are not
    ///   chronological or the termination precedes the employment start.
    pub fn validate(&self) -> EngineResult<()> {
        if self.incapacity_type == IncapacityType::None
            && self.trial.is_none()
            && self.termination.is_none()
        {
            return Err(conflict("no case parameter selected"));
        }

        if let Some(trial) = &self.trial
            && trial.workdays.is_empty()
        {
            return Err(conflict("probation evaluated without any workday selected"));
        }

        if let Some(trial) = &self.trial
            && trial.months.months() > MAX_TRIAL_MONTHS
        {
            return Err(conflict(&format!(
                "agreed probation may not exceed {MAX_TRIAL_MONTHS} months"
            )));
        }

        self.validate_incapacities()?;

        if let Some(termination) = &self.termination {
            if termination.date < self.employment_start {
                return Err(EngineError::InvalidOrdering {
                    message: format!(
                        "termination {} precedes employment start {}",
                        termination.date, self.employment_start
                    ),
                });
            }
            match termination.notice_months {
                NoticeMonths::Months(0) => {
                    return Err(conflict("agreed notice must be at least one month"));
                }
                NoticeMonths::Months(n) if n > MAX_NOTICE_MONTHS => {
                    return Err(conflict(&format!(
                        "agreed notice may not exceed {MAX_NOTICE_MONTHS} months"
                    )));
                }
                _ => {}
            }
        }

        if let Some(horizon) = self.horizon
            && horizon < self.employment_start
        {
            return Err(EngineError::InvalidOrdering {
                message: format!(
                    "horizon {} precedes employment start {}",
                    horizon, self.employment_start
                ),
            });
        }

        Ok(())
    }

    fn validate_incapacities(&self) -> EngineResult<()> {
        let record = self.incapacities.incapacities();

        match self.incapacity_type {
            IncapacityType::None => {
                if !self.incapacities.is_empty() {
                    return Err(conflict("incapacity periods given without an incapacity type"));
                }
                return Ok(());
            }
            IncapacityType::IllnessAccident => {
                if record.len() > MAX_INCAPACITIES {
                    return Err(conflict(&format!(
                        "at most {MAX_INCAPACITIES} incapacities are supported"
                    )));
                }
                if record.iter().any(|p| p.len() > MAX_PERIODS_PER_INCAPACITY) {
                    return Err(conflict(&format!(
                        "at most {MAX_PERIODS_PER_INCAPACITY} periods per incapacity are supported"
                    )));
                }
            }
            IncapacityType::MilitaryService | IncapacityType::Pregnancy => {
                if self.incapacities.periods().count() > 1 {
                    return Err(conflict(
                        "military service and pregnancy take exactly one period",
                    ));
                }
            }
        }

        if self.incapacities.is_empty() {
            return Err(conflict("incapacity type selected without any period"));
        }
        if record.iter().any(|periods| periods.is_empty()) {
            return Err(conflict("incapacity without any period"));
        }

        let mut previous: Option<&Interval> = None;
        for period in self.incapacities.periods() {
            if let Some(prev) = previous
                && period.start() < prev.end()
            {
                return Err(EngineError::InvalidOrdering {
                    message: format!("incapacity period {period} starts before {prev} ends"),
                });
            }
            previous = Some(period);
        }

        Ok(())
    }
}

fn conflict(message: &str) -> EngineError {
    EngineError::ConfigurationConflict {
        message: message.to_string(),
    }
}

/// Parses a date in Swiss (`DD.MM.YYYY`) or ISO (`YYYY-MM-DD`) notation.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(parse_date("termination_date", "15.03.2024").unwrap(), expected);
/// assert_eq!(parse_date("termination_date", "2024-03-15").unwrap(), expected);
/// assert!(parse_date("termination_date", "31.02.2024").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| EngineError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        })
}
