//! Core data models for the employment law engine.
//!
//! This module contains the case facts handed to the engine, the interval
//! and period types the engines exchange, and the evaluation output.

mod audit;
mod canton;
mod facts;
mod interval;
mod periods;
mod service_years;
mod timeline;

pub use audit::{AuditStep, AuditTrace, AuditWarning};
pub use canton::Canton;
pub use facts::{
    parse_date, CaseFacts, EndpointKind, IncapacityRecord, IncapacityType, NoticeMonths,
    TerminationTerms, TrialMonths, TrialNoticeDays, TrialTerms, DEFAULT_TRIAL_NOTICE_DAYS,
    MAX_INCAPACITIES, MAX_NOTICE_MONTHS, MAX_PERIODS_PER_INCAPACITY, MAX_TRIAL_MONTHS,
};
pub use interval::Interval;
pub use periods::{DurationUnit, EmbargoCap, EmbargoPeriod, SickPayCap, SickPayPeriod};
pub use service_years::{ServiceYearTable, SERVICE_YEAR_COUNT};
pub use timeline::{
    EmploymentEnd, EmploymentTimeline, Evaluation, NoticeLength, NoticePeriodResult, ReasonCode,
    RowLabel, TerminationCase, TimelineRow, TimelineTables, Verdict,
};
