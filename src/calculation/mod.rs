//! Calculation logic for the employment law deadline engine.
//!
//! This module contains the canton holiday calendar and date arithmetic,
//! the interval algebra shared by all engines, the probation, embargo,
//! notice and sick pay engines, termination validity, and the pipeline
//! running them over one case.

mod calendar;
mod embargo;
mod evaluation;
mod interval_algebra;
mod notice_period;
mod sick_pay;
mod termination;
mod trial_period;

pub use calendar::{
    HolidayCalendar, add_days, add_months, business_days, easter_sunday, is_business_day, is_holiday,
    period_length, push_to_endpoint, resolve_holiday, shift_months, shift_years,
};
pub use embargo::{
    EmbargoResult, MATERNITY_PAY_WEEKS, MILITARY_SERVICE_THRESHOLD_DAYS,
    POST_CONFINEMENT_EMBARGO_WEEKS, compute_embargo,
};
pub use evaluation::{build_tables, evaluate_case};
pub use interval_algebra::{flatten, grow, merge, overlap, overlap_days, split_at, total_overlap};
pub use notice_period::{
    NoticeEvaluation, compute_notice_period, notice_window, statutory_notice_months,
};
pub use sick_pay::{SickPayResult, compute_sick_pay, entitlement_days};
pub use termination::{
    PostTermination, TerminationOutcome, classify_termination, clean_up_after_termination,
    trial_notice, validate_termination,
};
pub use trial_period::{
    TRIAL_EXTENSION_SCAN_DAYS, TrialPeriodResult, evaluate_trial_period, nominal_trial_end,
};
