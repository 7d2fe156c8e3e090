//! Embargo and sick pay period chains.

use serde::{Deserialize, Serialize};

use super::Interval;

/// Statutory embargo length by seniority (Art. 336c para. 1 lit. b OR).
///
/// # Example
///
/// ```
/// use emplaw_engine::models::EmbargoCap;
///
/// assert_eq!(EmbargoCap::for_completed_years(0), EmbargoCap::Days30);
/// assert_eq!(EmbargoCap::for_completed_years(4), EmbargoCap::Days90);
/// assert_eq!(EmbargoCap::for_completed_years(5).days(), 180);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbargoCap {
    /// First service year.
    Days30,
    /// Second to fifth service year.
    Days90,
    /// From the sixth service year.
    Days180,
}

impl EmbargoCap {
    /// Selects the cap class for a number of completed service years.
    pub fn for_completed_years(years: u32) -> Self {
        match years {
            0 => EmbargoCap::Days30,
            1..=4 => EmbargoCap::Days90,
            _ => EmbargoCap::Days180,
        }
    }

    /// Cap length in days.
    pub fn days(&self) -> i64 {
        match self {
            EmbargoCap::Days30 => 30,
            EmbargoCap::Days90 => 90,
            EmbargoCap::Days180 => 180,
        }
    }
}

/// One link of an embargo chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbargoPeriod {
    /// One-based incapacity this period belongs to.
    pub incapacity: usize,
    /// Protected days, absent once the cap is exhausted.
    pub interval: Option<Interval>,
    /// Cap class in force; absent for service and pregnancy periods.
    pub cap: Option<EmbargoCap>,
    /// Days of the incapacity claimed up to and including this period.
    pub claimed_days: i64,
}

/// Unit a sick pay scale is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    /// Calendar days.
    Days,
    /// Calendar weeks.
    Weeks,
    /// Calendar months.
    Months,
}

/// A sick pay entitlement for one service year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickPayCap {
    /// Entitlement in `unit`.
    pub amount: u32,
    /// Unit of `amount`.
    pub unit: DurationUnit,
    /// Entitlement resolved to days from the first day of the service year's claim.
    pub days: i64,
}

/// One link of a sick pay chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickPayPeriod {
    /// One-based service year the period is filed under.
    pub service_year: u32,
    /// Paid days, absent once the entitlement is exhausted.
    pub interval: Option<Interval>,
    /// Entitlement in force; absent for military and maternity compensation.
    pub cap: Option<SickPayCap>,
    /// Days of the service year claimed up to and including this period.
    pub claimed_days: i64,
}
