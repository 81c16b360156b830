use num_traits::{PrimInt, Signed};

use super::ClosestFinder;
use closestrs_core::errors::IntervalResult;
use closestrs_core::models::interval::check_bounds;
use closestrs_core::models::{Interval, Placement};

/// A flat list of intervals answered by scanning every entry per query.
///
/// `O(n)` per query with no build cost beyond validation. Fine for small groups, and a
/// straightforward cross-check for [`crate::IntervalTree`].
///
/// ```
/// use closestrs::{ClosestFinder, LinearScan, Interval};
///
/// let scan = LinearScan::build(vec![
///     Interval { start: 7000i64, end: 8500, id: 0i64 },
/// ]).unwrap();
///
/// let hits = scan.find_closest(5000, 6000).unwrap();
/// assert_eq!(hits.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LinearScan<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub intervals: Vec<Interval<I, T>>,
}

impl<I, T> ClosestFinder<I, T> for LinearScan<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> IntervalResult<Self>
    where
        Self: Sized,
    {
        for interval in intervals.iter() {
            interval.validate()?;
        }
        Ok(LinearScan { intervals })
    }

    fn find_closest(&self, start: I, end: I) -> IntervalResult<Vec<&Interval<I, T>>> {
        check_bounds(start, end)?;

        let mut overlaps = Vec::new();
        let mut upstream: Option<(I, Vec<&Interval<I, T>>)> = None;
        let mut downstream: Option<(I, Vec<&Interval<I, T>>)> = None;

        for interval in self.intervals.iter() {
            match interval.placement(start, end) {
                Placement::Overlap(_) => overlaps.push(interval),
                Placement::Left(gap) => keep_nearest(&mut upstream, gap, interval),
                Placement::Right(gap) => keep_nearest(&mut downstream, gap, interval),
            }
        }

        if !overlaps.is_empty() {
            return Ok(overlaps);
        }

        let mut closest = upstream.map(|(_, ivs)| ivs).unwrap_or_default();
        if let Some((_, ivs)) = downstream {
            closest.extend(ivs);
        }
        Ok(closest)
    }

    #[inline]
    fn len(&self) -> usize {
        self.intervals.len()
    }
}

/// Track the intervals tied for the smallest gap seen so far on one side.
#[inline]
fn keep_nearest<'a, I, T>(
    best: &mut Option<(I, Vec<&'a Interval<I, T>>)>,
    gap: I,
    interval: &'a Interval<I, T>,
) where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    match best {
        Some((best_gap, ties)) if gap == *best_gap => ties.push(interval),
        Some((best_gap, _)) if gap > *best_gap => {}
        _ => *best = Some((gap, vec![interval])),
    }
}
