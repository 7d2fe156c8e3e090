//! Configuration loading and management for the employment law engine.
//!
//! This module loads the canton rule tables from YAML files: public holidays
//! and the sick pay scales.
//!
//! # Example
//!
//! ```no_run
//! use emplaw_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ch").unwrap();
//! println!("Loaded {} holiday rules", config.config().holidays().len());
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    HolidayConfig, HolidayDate, HolidayRule, RulesConfig, SickPayConfig, SickPayScale,
};
