//! Property tests for the interval algebra and the period chains.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use emplaw_engine::calculation::{
    add_days, compute_embargo, compute_sick_pay, grow, merge, split_at,
};
use emplaw_engine::config::ConfigLoader;
use emplaw_engine::models::{
    Canton, IncapacityRecord, IncapacityType, Interval, ServiceYearTable,
};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn interval() -> impl Strategy<Value = Interval> {
    (0i64..2000, 0i64..120).prop_map(|(offset, length)| {
        let start = base() + Duration::days(offset);
        Interval::new(start, start + Duration::days(length)).unwrap()
    })
}

/// Chronological, non-overlapping periods grouped into up to three incapacities.
fn incapacity_record() -> impl Strategy<Value = IncapacityRecord> {
    prop::collection::vec((1i64..60, 0i64..200), 1..=9).prop_map(|gaps| {
        let mut cursor = base();
        let periods: Vec<Interval> = gaps
            .into_iter()
            .map(|(gap, length)| {
                let start = cursor + Duration::days(gap);
                let end = start + Duration::days(length);
                cursor = end;
                Interval::new(start, end).unwrap()
            })
            .collect();
        IncapacityRecord::new(periods.chunks(3).map(<[Interval]>::to_vec).collect())
    })
}

proptest! {
    #[test]
    fn merged_sets_are_sorted_and_separated(intervals in prop::collection::vec(interval(), 0..20)) {
        let merged = merge(intervals);
        for pair in merged.windows(2) {
            prop_assert!(add_days(pair[0].end(), 1) < pair[1].start());
        }
    }

    #[test]
    fn merge_is_idempotent(intervals in prop::collection::vec(interval(), 0..20)) {
        let once = merge(intervals);
        prop_assert_eq!(merge(once.clone()), once);
    }

    #[test]
    fn merge_covers_every_input_day(intervals in prop::collection::vec(interval(), 1..10)) {
        let merged = merge(intervals.clone());
        for interval in &intervals {
            prop_assert!(merged.iter().any(|m| m.start() <= interval.start() && interval.end() <= m.end()));
        }
    }

    #[test]
    fn grow_never_shrinks(main in interval(), blockers in prop::collection::vec(interval(), 0..6)) {
        let grown = grow(main, &merge(blockers));
        prop_assert_eq!(grown.start(), main.start());
        prop_assert!(grown.end() >= main.end());
    }

    #[test]
    fn grow_ignores_blockers_outside(main in interval(), gap in 1i64..100, length in 0i64..30) {
        let after = add_days(main.end(), gap);
        let blocker = Interval::new(after, add_days(after, length)).unwrap();
        prop_assert_eq!(grow(main, &[blocker]), main);
    }

    #[test]
    fn split_preserves_days(period in interval(), cuts in prop::collection::vec(0i64..2200, 0..5)) {
        let thresholds: Vec<NaiveDate> = cuts.iter().map(|d| base() + Duration::days(*d)).collect();
        let pieces = split_at(period, thresholds);
        let total: i64 = pieces.iter().map(Interval::duration_days).sum();
        prop_assert_eq!(total, period.duration_days());
        prop_assert_eq!(pieces.first().map(Interval::start), Some(period.start()));
        prop_assert_eq!(pieces.last().map(Interval::end), Some(period.end()));
    }

    #[test]
    fn embargo_claims_stay_within_cap(record in incapacity_record()) {
        let table = ServiceYearTable::new(base());
        let result = compute_embargo(IncapacityType::IllnessAccident, &record, base(), &table, 1);
        for period in &result.periods {
            if let Some(cap) = period.cap {
                prop_assert!(period.claimed_days <= cap.days());
            }
        }
    }

    #[test]
    fn sick_pay_claims_stay_within_cap(record in incapacity_record()) {
        let loader = ConfigLoader::builtin().unwrap();
        let table = ServiceYearTable::new(base());
        let result = compute_sick_pay(
            IncapacityType::IllnessAccident,
            &record,
            None,
            &table,
            loader.config(),
            Canton::Zh,
            None,
            1,
        );
        for period in &result.periods {
            if let Some(cap) = period.cap {
                prop_assert!(period.claimed_days <= cap.days);
            }
        }
        for pair in result.sick_pay.windows(2) {
            prop_assert!(add_days(pair[0].end(), 1) < pair[1].start());
        }
    }
}
