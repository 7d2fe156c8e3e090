//! Evaluation output models.
//!
//! This module contains the [`EmploymentTimeline`] produced by the engines,
//! the termination classification, and the display rows handed to
//! presentation layers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{AuditTrace, EmbargoPeriod, Interval, SickPayPeriod};

/// Length of a notice period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLength {
    /// Ordinary notice in months (Art. 335c OR).
    Months(u32),
    /// Probation notice in days (Art. 335b OR).
    Days(u32),
}

/// Notice period with compensation for days lost to embargo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticePeriodResult {
    /// Notice length applied.
    pub length: NoticeLength,
    /// Last day of regular employment before notice runs; absent during probation.
    pub regular_employment_end: Option<NaiveDate>,
    /// The notice window itself.
    pub regular_interval: Interval,
    /// Days appended for notice days lost to embargo.
    pub compensation_interval: Option<Interval>,
    /// Days appended to reach the next permitted termination date.
    pub extension_interval: Option<Interval>,
    /// Notice days that coincided with an embargo.
    pub overlap_days: i64,
}

impl NoticePeriodResult {
    /// Last day of employment after notice, compensation and extension.
    pub fn final_end(&self) -> NaiveDate {
        self.extension_interval
            .or(self.compensation_interval)
            .unwrap_or(self.regular_interval)
            .end()
    }
}

/// Outcome of a termination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The termination is effective.
    Valid,
    /// The termination is void.
    Invalid,
    /// No termination was evaluated.
    NotEvaluated,
}

/// Machine-readable justification for a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// No termination was evaluated.
    NoTerminationEvaluated,
    /// Ordinary termination with statutory notice.
    RegularTermination,
    /// Termination during probation.
    TerminationDuringTrial,
    /// Termination during an embargo period (Art. 336c para. 2 OR).
    TerminationDuringEmbargo,
}

/// Classification of the termination event.
///
/// Variants are listed in precedence order; a later variant wins over an
/// earlier one when several apply.
///
/// # Example
///
/// ```
/// use emplaw_engine::models::{ReasonCode, TerminationCase, Verdict};
///
/// assert_eq!(TerminationCase::Embargo.verdict(), Verdict::Invalid);
/// assert_eq!(TerminationCase::Trial.reason(), ReasonCode::TerminationDuringTrial);
/// assert!(TerminationCase::Embargo > TerminationCase::Trial);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationCase {
    /// No termination evaluated.
    NoCase,
    /// Termination after probation and outside any embargo.
    Standard,
    /// Termination during probation.
    Trial,
    /// Termination during an embargo period.
    Embargo,
}

impl TerminationCase {
    /// Verdict of this case.
    pub fn verdict(&self) -> Verdict {
        match self {
            TerminationCase::NoCase => Verdict::NotEvaluated,
            TerminationCase::Standard | TerminationCase::Trial => Verdict::Valid,
            TerminationCase::Embargo => Verdict::Invalid,
        }
    }

    /// Reason code of this case.
    pub fn reason(&self) -> ReasonCode {
        match self {
            TerminationCase::NoCase => ReasonCode::NoTerminationEvaluated,
            TerminationCase::Standard => ReasonCode::RegularTermination,
            TerminationCase::Trial => ReasonCode::TerminationDuringTrial,
            TerminationCase::Embargo => ReasonCode::TerminationDuringEmbargo,
        }
    }
}

/// When the employment relationship ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum EmploymentEnd {
    /// Employment ends on the given day.
    On(NaiveDate),
    /// The termination was void; employment continues.
    Continuing,
    /// No termination was evaluated.
    NotEvaluated,
}

/// The complete, self-consistent result of the engines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentTimeline {
    /// First day of employment.
    pub employment_start: NaiveDate,
    /// Probation period including any extension.
    pub trial: Option<Interval>,
    /// Business days the probation was extended by.
    pub trial_extension_days: u32,
    /// Employment after probation and before notice runs.
    pub regular_employment: Option<Interval>,
    /// Embargo chains per incapacity.
    pub embargo_periods: Vec<EmbargoPeriod>,
    /// Merged embargo periods.
    pub embargo: Vec<Interval>,
    /// Sick pay chains per service year.
    pub sick_pay_periods: Vec<SickPayPeriod>,
    /// Merged sick pay periods.
    pub sick_pay: Vec<Interval>,
    /// Notice period, when a termination is effective.
    pub notice_period: Option<NoticePeriodResult>,
    /// Classification of the termination.
    pub termination_case: TerminationCase,
    /// End of employment.
    pub employment_end: EmploymentEnd,
}

/// What a display row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RowLabel {
    /// Probation period.
    TrialPeriod,
    /// Regular employment.
    RegularEmployment,
    /// A dated incapacity period.
    Incapacity {
        /// One-based incapacity number.
        incapacity: usize,
        /// One-based period number within the incapacity.
        period: usize,
    },
    /// A merged embargo period.
    Embargo {
        /// One-based row number.
        number: usize,
    },
    /// A merged sick pay period.
    SickPay {
        /// One-based row number.
        number: usize,
    },
    /// The notice window.
    NoticePeriod,
    /// Compensation for notice lost to embargo.
    NoticeCompensation,
    /// Extension to the next permitted termination date.
    NoticeExtension,
}

impl std::fmt::Display for RowLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowLabel::TrialPeriod => f.write_str("Trial period"),
            RowLabel::RegularEmployment => f.write_str("Regular employment"),
            RowLabel::Incapacity { incapacity, period } => {
                write!(f, "Incapacity {incapacity}, period {period}")
            }
            RowLabel::Embargo { number } => write!(f, "Embargo period {number}"),
            RowLabel::SickPay { number } => write!(f, "Sick pay period {number}"),
            RowLabel::NoticePeriod => f.write_str("Notice period"),
            RowLabel::NoticeCompensation => f.write_str("Notice compensation"),
            RowLabel::NoticeExtension => f.write_str("Notice extension"),
        }
    }
}

/// One display row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineRow {
    /// What the row describes.
    pub label: RowLabel,
    /// First day.
    pub start: NaiveDate,
    /// Last day.
    pub end: NaiveDate,
    /// Inclusive day count.
    pub duration_days: i64,
}

impl TimelineRow {
    /// Builds a row from an interval.
    pub fn new(label: RowLabel, interval: &Interval) -> Self {
        Self {
            label,
            start: interval.start(),
            end: interval.end(),
            duration_days: interval.duration_days(),
        }
    }
}

/// Display rows grouped by table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimelineTables {
    /// Probation and regular employment.
    pub trial: Vec<TimelineRow>,
    /// Dated incapacities.
    pub incapacity: Vec<TimelineRow>,
    /// Embargo periods.
    pub embargo: Vec<TimelineRow>,
    /// Sick pay periods.
    pub sick_pay: Vec<TimelineRow>,
    /// Notice, compensation and extension.
    pub notice_period: Vec<TimelineRow>,
}

/// Everything an evaluation returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// The computed timeline.
    pub timeline: EmploymentTimeline,
    /// Verdict on the termination.
    pub verdict: Verdict,
    /// Reason for the verdict.
    pub reason: ReasonCode,
    /// Display rows.
    pub tables: TimelineTables,
    /// Rule applications.
    pub audit_trace: AuditTrace,
}
