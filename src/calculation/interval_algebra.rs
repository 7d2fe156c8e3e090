//! Overlap, merge, grow and split operations on date intervals.

use chrono::NaiveDate;

use crate::models::Interval;

use super::calendar::add_days;

/// Number of days shared by `[a_start, a_end]` and `[b_start, b_end]`.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::overlap;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// assert_eq!(overlap(d(1), d(10), d(15), d(20)), 6);
/// assert_eq!(overlap(d(1), d(16), d(15), d(20)), 0);
/// ```
pub fn overlap(a_start: NaiveDate, b_start: NaiveDate, a_end: NaiveDate, b_end: NaiveDate) -> i64 {
    let days = (a_end.min(b_end) - a_start.max(b_start)).num_days() + 1;
    days.max(0)
}

/// Number of days shared by two intervals.
pub fn overlap_days(a: &Interval, b: &Interval) -> i64 {
    overlap(a.start(), b.start(), a.end(), b.end())
}

/// Total days `period` shares with each of `others`.
pub fn total_overlap(period: &Interval, others: &[Interval]) -> i64 {
    others.iter().map(|other| overlap_days(period, other)).sum()
}

/// Merges intervals into the minimal sorted set of disjoint intervals.
///
/// Overlapping intervals and intervals that touch (one starting the day
/// after the other ends) coalesce.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::merge;
/// use emplaw_engine::models::Interval;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// let merged = merge(vec![
///     Interval::new(d(10), d(12)).unwrap(),
///     Interval::new(d(1), d(5)).unwrap(),
///     Interval::new(d(6), d(8)).unwrap(),
/// ]);
/// assert_eq!(merged, vec![
///     Interval::new(d(1), d(8)).unwrap(),
///     Interval::new(d(10), d(12)).unwrap(),
/// ]);
/// ```
pub fn merge<I>(intervals: I) -> Vec<Interval>
where
    I: IntoIterator<Item = Interval>,
{
    let mut sorted: Vec<Interval> = intervals.into_iter().collect();
    sorted.sort();

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start() <= add_days(last.end(), 1) => {
                if interval.end() > last.end()
                    && let Some(extended) = last.with_end(interval.end())
                {
                    *last = extended;
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Drops absent intervals.
pub fn flatten<'a, I>(intervals: I) -> impl Iterator<Item = Interval> + 'a
where
    I: IntoIterator<Item = &'a Option<Interval>>,
    I::IntoIter: 'a,
{
    intervals.into_iter().filter_map(|interval| *interval)
}

/// Extends `main` past every blocker it runs into.
///
/// Blockers are visited in order. A blocker ending before `main` starts is
/// ignored; the scan stops at the first blocker starting after the growing
/// end. Otherwise the end moves to the later of its current value and the
/// blocker's end, plus the days the blocker overlapped.
///
/// # Example
///
/// ```
/// use emplaw_engine::calculation::grow;
/// use emplaw_engine::models::Interval;
/// use chrono::NaiveDate;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
/// let compensation = Interval::new(d(1), d(3)).unwrap();
/// let embargo = [Interval::new(d(3), d(5)).unwrap()];
///
/// // One day lost on the 3rd, pushed behind the embargo
/// assert_eq!(grow(compensation, &embargo), Interval::new(d(1), d(6)).unwrap());
/// ```
pub fn grow(main: Interval, blockers: &[Interval]) -> Interval {
    let mut sorted = blockers.to_vec();
    sorted.sort();

    let start = main.start();
    let mut end = main.end();
    for blocker in &sorted {
        if blocker.end() < start {
            continue;
        }
        if blocker.start() > end {
            break;
        }
        let lost = overlap(start, blocker.start(), end, blocker.end());
        end = add_days(end.max(blocker.end()), lost);
    }
    main.with_end(end).unwrap_or(main)
}

/// Splits `period` before every threshold `t` with `start < t <= end`.
///
/// The pieces are `[start, t - 1]`, `[t, ...]` and so on; a threshold on the
/// start day does not split.
pub fn split_at<I>(period: Interval, thresholds: I) -> Vec<Interval>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut cuts: Vec<NaiveDate> = thresholds
        .into_iter()
        .filter(|t| period.start() < *t && *t <= period.end())
        .collect();
    cuts.sort();
    cuts.dedup();

    let mut pieces = Vec::with_capacity(cuts.len() + 1);
    let mut piece_start = period.start();
    for cut in cuts {
        if let Some(piece) = Interval::new(piece_start, add_days(cut, -1)) {
            pieces.push(piece);
        }
        piece_start = cut;
    }
    if let Some(last) = period.with_start(piece_start) {
        pieces.push(last);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn iv(start: NaiveDate, end: NaiveDate) -> Interval {
        Interval::new(start, end).unwrap()
    }

    // ==========================================================================
    // Overlap
    // ==========================================================================

    #[test]
    fn test_overlap_of_nested_intervals() {
        assert_eq!(
            overlap(date(2024, 1, 1), date(2024, 1, 10), date(2024, 1, 31), date(2024, 1, 12)),
            3
        );
    }

    #[test]
    fn test_overlap_of_single_shared_day() {
        let a = iv(date(2024, 1, 1), date(2024, 1, 10));
        let b = iv(date(2024, 1, 10), date(2024, 1, 20));
        assert_eq!(overlap_days(&a, &b), 1);
    }

    #[test]
    fn test_total_overlap_sums_each_blocker() {
        let window = iv(date(2024, 2, 1), date(2024, 2, 29));
        let embargo = [
            iv(date(2024, 1, 20), date(2024, 2, 5)),
            iv(date(2024, 2, 20), date(2024, 3, 10)),
        ];
        assert_eq!(total_overlap(&window, &embargo), 5 + 10);
    }

    // ==========================================================================
    // Merge
    // ==========================================================================

    #[test]
    fn test_merge_empty() {
        assert!(merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_coalesces_touching_intervals() {
        let merged = merge(vec![
            iv(date(2024, 1, 1), date(2024, 1, 10)),
            iv(date(2024, 1, 11), date(2024, 1, 20)),
        ]);
        assert_eq!(merged, vec![iv(date(2024, 1, 1), date(2024, 1, 20))]);
    }

    #[test]
    fn test_merge_keeps_gaps() {
        let merged = merge(vec![
            iv(date(2024, 1, 12), date(2024, 1, 20)),
            iv(date(2024, 1, 1), date(2024, 1, 10)),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].start(), date(2024, 1, 1));
    }

    #[test]
    fn test_merge_absorbs_contained_interval() {
        let merged = merge(vec![
            iv(date(2024, 1, 1), date(2024, 1, 31)),
            iv(date(2024, 1, 5), date(2024, 1, 6)),
        ]);
        assert_eq!(merged, vec![iv(date(2024, 1, 1), date(2024, 1, 31))]);
    }

    #[test]
    fn test_flatten_drops_absent() {
        let items = [None, Some(iv(date(2024, 1, 1), date(2024, 1, 2))), None];
        assert_eq!(flatten(&items).count(), 1);
    }

    // ==========================================================================
    // Grow
    // ==========================================================================

    #[test]
    fn test_grow_without_blockers_is_identity() {
        let main = iv(date(2024, 3, 1), date(2024, 3, 5));
        assert_eq!(grow(main, &[]), main);
    }

    #[test]
    fn test_grow_ignores_earlier_and_later_blockers() {
        let main = iv(date(2024, 3, 10), date(2024, 3, 15));
        let blockers = [
            iv(date(2024, 3, 1), date(2024, 3, 5)),
            iv(date(2024, 3, 20), date(2024, 3, 25)),
        ];
        assert_eq!(grow(main, &blockers), main);
    }

    #[test]
    fn test_grow_chains_through_successive_blockers() {
        let main = iv(date(2024, 3, 1), date(2024, 3, 3));
        let blockers = [
            // overlaps the 3rd: end -> 05 + 1 = 06
            iv(date(2024, 3, 3), date(2024, 3, 5)),
            // overlaps the 6th: end -> 08 + 1 = 09
            iv(date(2024, 3, 6), date(2024, 3, 8)),
        ];
        assert_eq!(
            grow(main, &blockers),
            iv(date(2024, 3, 1), date(2024, 3, 9))
        );
    }

    // ==========================================================================
    // Split
    // ==========================================================================

    #[test]
    fn test_split_at_threshold_inside() {
        let period = iv(date(2020, 12, 15), date(2021, 1, 15));
        let pieces = split_at(period, [date(2021, 1, 1)]);
        assert_eq!(
            pieces,
            vec![
                iv(date(2020, 12, 15), date(2020, 12, 31)),
                iv(date(2021, 1, 1), date(2021, 1, 15)),
            ]
        );
    }

    #[test]
    fn test_split_ignores_threshold_on_start_day() {
        let period = iv(date(2021, 1, 1), date(2021, 1, 15));
        assert_eq!(split_at(period, [date(2021, 1, 1)]), vec![period]);
    }

    #[test]
    fn test_split_at_end_day_yields_single_day_piece() {
        let period = iv(date(2020, 12, 15), date(2021, 1, 1));
        let pieces = split_at(period, [date(2021, 1, 1)]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[1], Interval::single(date(2021, 1, 1)));
    }

    #[test]
    fn test_split_at_several_thresholds() {
        let period = iv(date(2020, 6, 1), date(2022, 6, 1));
        let pieces = split_at(period, [date(2022, 1, 1), date(2021, 1, 1)]);
        assert_eq!(pieces.len(), 3);
        let total: i64 = pieces.iter().map(Interval::duration_days).sum();
        assert_eq!(total, period.duration_days());
    }
}
