//! Deadline engine for Swiss employment law
//!
//! This crate computes the statutory periods of an employment relationship
//! under the Swiss Code of Obligations: probation and its extension
//! (Art. 335b OR), notice periods (Art. 335c OR), embargo periods during
//! incapacity (Art. 336c OR) and sick pay entitlement (Art. 324a OR), and
//! decides whether a given termination is valid.
//!
//! # Example
//!
//! ```
//! use emplaw_engine::calculation::evaluate_case;
//! use emplaw_engine::config::ConfigLoader;
//! use emplaw_engine::models::{
//!     Canton, CaseFacts, EndpointKind, NoticeMonths, TerminationTerms, TrialNoticeDays,
//!     TrialMonths, TrialTerms, Verdict,
//! };
//! use chrono::{NaiveDate, Weekday};
//!
//! let loader = ConfigLoader::builtin().unwrap();
//! let facts = CaseFacts {
//!     trial: Some(TrialTerms {
//!         workdays: vec![Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri],
//!         months: TrialMonths::Unspecified,
//!     }),
//!     termination: Some(TerminationTerms {
//!         date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//!         notice_months: NoticeMonths::Unspecified,
//!         endpoint: EndpointKind::Unspecified,
//!         trial_notice_days: TrialNoticeDays::Unspecified,
//!     }),
//!     ..CaseFacts::new(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), Canton::Zh)
//! };
//!
//! let evaluation = evaluate_case(&facts, loader.config()).unwrap();
//! assert_eq!(evaluation.verdict, Verdict::Valid);
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
