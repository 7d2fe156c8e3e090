//! Sick pay entitlement (Art. 324a OR).
//!
//! Wages continue during illness or accident once the employment has lasted
//! three months. The entitlement is granted per service year: three weeks in
//! the first year, then according to the court scale applied in the canton
//! (Zurich, Basel or Bern). Income compensation for military service and
//! maternity pay are filed under the first service year without a cap.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{RulesConfig, SickPayScale};
use crate::models::{
    AuditStep, Canton, DurationUnit, IncapacityRecord, IncapacityType, Interval, ServiceYearTable,
    SickPayCap, SickPayPeriod,
};

use super::calendar::{add_days, add_months, period_length};
use super::interval_algebra::{flatten, merge, split_at};

/// The sick pay chains and their merged periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SickPayResult {
    /// One entry per period piece, ordered by service year.
    pub periods: Vec<SickPayPeriod>,
    /// Merged sick pay periods.
    pub sick_pay: Vec<Interval>,
    /// Name of the scale applied.
    pub scale: String,
    /// The audit step recording this computation.
    pub audit_step: AuditStep,
}

/// Resolves an entitlement to days counted from `from`.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::entitlement_days;
/// use emplaw_engine::models::DurationUnit;
/// use chrono::NaiveDate;
///
/// let from = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
/// assert_eq!(entitlement_days(from, 1, DurationUnit::Months), 29);
/// assert_eq!(entitlement_days(from, 8, DurationUnit::Weeks), 56);
/// ```
pub fn entitlement_days(from: NaiveDate, amount: u32, unit: DurationUnit) -> i64 {
    let until = match unit {
        DurationUnit::Days => add_days(from, amount as i64),
        DurationUnit::Weeks => add_days(from, 7 * amount as i64),
        DurationUnit::Months => add_months(from, amount),
    };
    period_length(from, add_days(until, -1)).max(0)
}

/// Computes the sick pay periods of a case.
///
/// # Arguments
///
/// * `incapacity_type` - Kind of incapacity all periods belong to
/// * `record` - Dated incapacity periods
/// * `income_compensation` - Military or maternity compensation window
/// * `service_years` - Anniversaries of the employment start
/// * `rules` - Rule tables holding the scales
/// * `canton` - Canton of the workplace
/// * `employment_end` - Last day of employment, if it ends
/// * `step_number` - The step number for audit trail sequencing
#[allow(clippy::too_many_arguments)]
pub fn compute_sick_pay(
    incapacity_type: IncapacityType,
    record: &IncapacityRecord,
    income_compensation: Option<Interval>,
    service_years: &ServiceYearTable,
    rules: &RulesConfig,
    canton: Canton,
    employment_end: Option<NaiveDate>,
    step_number: u32,
) -> SickPayResult {
    let scale = rules.scale_for(canton);
    let cap_at_end = |piece: Interval| match employment_end {
        Some(end) => piece.with_end(piece.end().min(end)),
        None => Some(piece),
    };

    let periods = match incapacity_type {
        IncapacityType::None => Vec::new(),
        IncapacityType::MilitaryService | IncapacityType::Pregnancy => income_compensation
            .map(|window| {
                let interval = cap_at_end(window);
                vec![SickPayPeriod {
                    service_year: 1,
                    interval,
                    cap: None,
                    claimed_days: interval.map_or(0, |i| i.duration_days()),
                }]
            })
            .unwrap_or_default(),
        IncapacityType::IllnessAccident => {
            let qualifying =
                add_months(service_years.employment_start(), rules.sick_pay().qualifying_months);
            let buckets = bucket_by_service_year(record, qualifying, service_years);

            let mut periods = Vec::new();
            for (service_year, pieces) in buckets {
                let Some(first) = pieces.first() else {
                    continue;
                };
                let cap = service_year_cap(
                    service_year,
                    first.start(),
                    rules.sick_pay().first_year_days,
                    scale,
                );

                let mut claimed: i64 = 0;
                for piece in pieces {
                    let interval = cap_at_end(piece)
                        .and_then(|p| p.truncate_to_days(cap.days - claimed));
                    claimed += interval.map_or(0, |i| i.duration_days());
                    periods.push(SickPayPeriod {
                        service_year,
                        interval,
                        cap: Some(cap),
                        claimed_days: claimed,
                    });
                }
            }
            periods
        }
    };

    let sick_pay = merge(flatten(periods.iter().map(|p| &p.interval)));
    debug!(
        canton = %canton,
        scale = %scale.name,
        pieces = periods.len(),
        merged = sick_pay.len(),
        "Sick pay periods computed"
    );

    let paid_days: i64 = sick_pay.iter().map(Interval::duration_days).sum();
    let reasoning = match incapacity_type {
        IncapacityType::None => "No incapacity; no sick pay".to_string(),
        IncapacityType::IllnessAccident => format!(
            "{} applies in {}; {} day(s) of sick pay across {} period(s)",
            scale.name,
            canton,
            paid_days,
            sick_pay.len()
        ),
        IncapacityType::MilitaryService => {
            format!("Income compensation for {} day(s) of service", paid_days)
        }
        IncapacityType::Pregnancy => format!("Maternity pay for {} day(s)", paid_days),
    };

    SickPayResult {
        audit_step: AuditStep {
            step_number,
            rule_id: "sick_pay".to_string(),
            rule_name: "Sick Pay".to_string(),
            clause_ref: "Art. 324a OR".to_string(),
            input: serde_json::json!({
                "incapacity_type": incapacity_type,
                "canton": canton,
                "employment_end": employment_end.map(|d| d.to_string()),
            }),
            output: serde_json::json!({
                "sick_pay": sick_pay.iter().map(|i| i.to_string()).collect::<Vec<_>>(),
                "paid_days": paid_days,
            }),
            reasoning,
        },
        scale: scale.name.clone(),
        periods,
        sick_pay,
    }
}

fn bucket_by_service_year(
    record: &IncapacityRecord,
    qualifying: NaiveDate,
    service_years: &ServiceYearTable,
) -> BTreeMap<u32, Vec<Interval>> {
    let mut buckets: BTreeMap<u32, Vec<Interval>> = BTreeMap::new();
    for period in record.periods() {
        if period.end() < qualifying {
            continue;
        }
        let Some(claimable) = period.with_start(period.start().max(qualifying)) else {
            continue;
        };
        let anniversaries: Vec<NaiveDate> = service_years.anniversaries_within(&claimable).collect();
        for piece in split_at(claimable, anniversaries) {
            buckets
                .entry(service_years.service_year(piece.start()))
                .or_default()
                .push(piece);
        }
    }
    for pieces in buckets.values_mut() {
        pieces.sort();
    }
    buckets
}

fn service_year_cap(
    service_year: u32,
    from: NaiveDate,
    first_year_days: u32,
    scale: &SickPayScale,
) -> SickPayCap {
    let (amount, unit) = if service_year <= 1 {
        (first_year_days, DurationUnit::Days)
    } else {
        (scale.duration_for(service_year), scale.unit)
    };
    SickPayCap {
        amount,
        unit,
        days: entitlement_days(from, amount, unit),
    }
}
