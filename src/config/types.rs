//! Configuration types for the canton rule tables.
//!
//! This module contains the strongly-typed structures deserialized from the
//! YAML files in a rules directory.

use chrono::Weekday;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{Canton, DurationUnit};

/// How a holiday's date is determined each year.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HolidayDate {
    /// The same calendar day every year.
    Fixed {
        /// Month, 1-12.
        month: u32,
        /// Day of month.
        day: u32,
    },
    /// A day relative to Easter Sunday.
    Easter {
        /// Days after (negative: before) Easter Sunday.
        offset: i64,
    },
    /// The first given weekday on or after a calendar day, plus an offset.
    WeekdayOnOrAfter {
        /// Month of the anchor day.
        month: u32,
        /// Anchor day of month.
        day: u32,
        /// Weekday searched for from the anchor day.
        weekday: Weekday,
        /// Days added to the weekday found.
        #[serde(default)]
        offset: i64,
    },
}

/// A public holiday rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HolidayRule {
    /// Name of the holiday.
    pub name: String,
    /// How the date is determined.
    pub date: HolidayDate,
    /// Cantons observing the holiday; absent means all cantons.
    #[serde(default)]
    pub cantons: Option<Vec<Canton>>,
}

impl HolidayRule {
    /// Returns true if the holiday is observed in `canton`.
    pub fn applies_to(&self, canton: Canton) -> bool {
        self.cantons
            .as_ref()
            .is_none_or(|cantons| cantons.contains(&canton))
    }
}

/// Holiday configuration from holidays.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct HolidayConfig {
    /// All holiday rules.
    pub holidays: Vec<HolidayRule>,
}

/// A court scale of sick pay entitlements.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SickPayScale {
    /// Name of the scale.
    pub name: String,
    /// Unit of the entitlements.
    pub unit: DurationUnit,
    /// Cantons applying the scale; absent marks the fallback scale.
    #[serde(default)]
    pub cantons: Option<Vec<Canton>>,
    /// Entitlement from service year 2 on; the last entry repeats.
    pub durations: Vec<u32>,
}

impl SickPayScale {
    /// Entitlement in service year `service_year` (2 or later).
    pub fn duration_for(&self, service_year: u32) -> u32 {
        let idx = service_year.saturating_sub(2) as usize;
        self.durations
            .get(idx)
            .or(self.durations.last())
            .copied()
            .unwrap_or(0)
    }
}

/// Sick pay configuration from sick_pay.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct SickPayConfig {
    /// Flat entitlement in the first service year, in days.
    pub first_year_days: u32,
    /// Months of employment before any entitlement arises.
    pub qualifying_months: u32,
    /// Court scales.
    pub scales: Vec<SickPayScale>,
}

/// The complete rule tables.
///
/// Construction checks that every canton resolves to exactly one sick pay
/// scale, so lookups cannot fail afterwards.
#[derive(Debug, Clone)]
pub struct RulesConfig {
    holidays: Vec<HolidayRule>,
    sick_pay: SickPayConfig,
    fallback_scale: usize,
}

impl RulesConfig {
    /// Creates the rule tables from their parts.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParseError`] if there is not exactly one
    /// fallback scale, a canton is listed in more than one scale, or a scale
    /// has no entries.
    pub fn new(holidays: Vec<HolidayRule>, sick_pay: SickPayConfig) -> EngineResult<Self> {
        let invalid = |message: String| EngineError::ConfigParseError {
            path: "sick_pay.yaml".to_string(),
            message,
        };

        let fallbacks: Vec<usize> = sick_pay
            .scales
            .iter()
            .enumerate()
            .filter(|(_, scale)| scale.cantons.is_none())
            .map(|(idx, _)| idx)
            .collect();
        let &[fallback_scale] = fallbacks.as_slice() else {
            return Err(invalid(format!(
                "expected exactly one scale without cantons, found {}",
                fallbacks.len()
            )));
        };

        if let Some(scale) = sick_pay.scales.iter().find(|s| s.durations.is_empty()) {
            return Err(invalid(format!("scale '{}' has no durations", scale.name)));
        }

        for canton in Canton::ALL {
            let listed = sick_pay
                .scales
                .iter()
                .filter(|s| s.cantons.as_ref().is_some_and(|c| c.contains(&canton)))
                .count();
            if listed > 1 {
                return Err(invalid(format!("canton {canton} is listed in {listed} scales")));
            }
        }

        Ok(Self {
            holidays,
            sick_pay,
            fallback_scale,
        })
    }

    /// Returns all holiday rules.
    pub fn holidays(&self) -> &[HolidayRule] {
        &self.holidays
    }

    /// Returns the sick pay configuration.
    pub fn sick_pay(&self) -> &SickPayConfig {
        &self.sick_pay
    }

    /// Returns the sick pay scale applied in `canton`.
    pub fn scale_for(&self, canton: Canton) -> &SickPayScale {
        self.sick_pay
            .scales
            .iter()
            .find(|s| s.cantons.as_ref().is_some_and(|c| c.contains(&canton)))
            .unwrap_or(&self.sick_pay.scales[self.fallback_scale])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(name: &str, cantons: Option<Vec<Canton>>) -> SickPayScale {
        SickPayScale {
            name: name.to_string(),
            unit: DurationUnit::Months,
            cantons,
            durations: vec![1, 2, 3],
        }
    }

    fn sick_pay(scales: Vec<SickPayScale>) -> SickPayConfig {
        SickPayConfig {
            first_year_days: 21,
            qualifying_months: 3,
            scales,
        }
    }

    #[test]
    fn test_holiday_date_deserializes_all_kinds() {
        let yaml = r#"
- { kind: fixed, month: 8, day: 1 }
- { kind: easter, offset: -2 }
- { kind: weekday_on_or_after, month: 9, day: 1, weekday: Sun, offset: 15 }
"#;
        let dates: Vec<HolidayDate> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(dates[0], HolidayDate::Fixed { month: 8, day: 1 });
        assert_eq!(dates[1], HolidayDate::Easter { offset: -2 });
        assert_eq!(
            dates[2],
            HolidayDate::WeekdayOnOrAfter {
                month: 9,
                day: 1,
                weekday: Weekday::Sun,
                offset: 15
            }
        );
    }

    #[test]
    fn test_rule_without_cantons_applies_everywhere() {
        let rule = HolidayRule {
            name: "Bundesfeier".to_string(),
            date: HolidayDate::Fixed { month: 8, day: 1 },
            cantons: None,
        };
        assert!(Canton::ALL.iter().all(|c| rule.applies_to(*c)));
    }

    #[test]
    fn test_scale_duration_repeats_last_entry() {
        let s = scale("Test", None);
        assert_eq!(s.duration_for(2), 1);
        assert_eq!(s.duration_for(4), 3);
        assert_eq!(s.duration_for(30), 3);
    }

    #[test]
    fn test_scale_for_falls_back() {
        let config = RulesConfig::new(
            vec![],
            sick_pay(vec![
                scale("Zurich", Some(vec![Canton::Zh])),
                scale("Bern", None),
            ]),
        )
        .unwrap();
        assert_eq!(config.scale_for(Canton::Zh).name, "Zurich");
        assert_eq!(config.scale_for(Canton::Vd).name, "Bern");
    }

    #[test]
    fn test_two_fallback_scales_are_rejected() {
        let result = RulesConfig::new(vec![], sick_pay(vec![scale("A", None), scale("B", None)]));
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_canton_in_two_scales_is_rejected() {
        let result = RulesConfig::new(
            vec![],
            sick_pay(vec![
                scale("A", Some(vec![Canton::Zh])),
                scale("B", Some(vec![Canton::Zh])),
                scale("C", None),
            ]),
        );
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }
}
