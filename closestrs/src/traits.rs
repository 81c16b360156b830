use num_traits::{PrimInt, Signed};

use closestrs_core::errors::IntervalResult;
pub use closestrs_core::models::Interval;

/// An index over one group's reference intervals that answers closest queries.
///
/// Implementations are built once per group and only read afterwards, so a single
/// index can serve queries from several threads.
pub trait ClosestFinder<I, T>: Send + Sync
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Index `intervals`, failing if any has `start > end` or an out-of-range coordinate.
    fn build(intervals: Vec<Interval<I, T>>) -> IntervalResult<Self>
    where
        Self: Sized;

    /// All intervals overlapping `start .. end` if there are any; otherwise the intervals
    /// tied for the smallest gap upstream followed by those tied for the smallest gap
    /// downstream.
    fn find_closest(&self, start: I, end: I) -> IntervalResult<Vec<&Interval<I, T>>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
