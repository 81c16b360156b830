use num_traits::{PrimInt, Signed};
use std::cmp::{max, min};

use crate::errors::{IntervalError, IntervalResult};

/// Represent a range from [start, end)
/// Inclusive start, exclusive of end. `id` is an opaque back-reference to the
/// row the interval came from and is carried through a join untouched.
///
/// Coordinates must lie within `-(I::MAX >> 1) ..= I::MAX >> 1` (about ±4.6e18 for `i64`),
/// so that the gap between any two intervals fits in `I`.
#[derive(Eq, PartialEq, Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub id: T,
}

/// Where an interval sits relative to a query range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<I> {
    /// Shares part of the query range. Carries the intersection width, which is 0 when a
    /// zero-width interval sits strictly inside the other.
    Overlap(I),
    /// Upstream of the query: the gap from this interval's end to the query start.
    Left(I),
    /// Downstream of the query: the gap from the query end to this interval's start.
    Right(I),
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    /// Create a new interval, rejecting `start > end`.
    pub fn new(start: I, end: I, id: T) -> IntervalResult<Self> {
        check_bounds(start, end)?;
        Ok(Interval { start, end, id })
    }

    /// Fail if `start > end` or a coordinate is out of range.
    #[inline]
    pub fn validate(&self) -> IntervalResult<()> {
        check_bounds(self.start, self.end)
    }

    /// Signed size of the intersection with `start .. end`.
    ///
    /// Positive when the ranges share a positive-length range, zero when they abut or one is
    /// a point inside the other, and the negated gap between them otherwise.
    #[inline]
    pub fn intersect_raw(&self, start: I, end: I) -> I {
        min(self.end, end) - max(self.start, start)
    }

    /// Check if the interval overlaps `start .. end`.
    /// Abutting ranges do not overlap; a point strictly inside the other range does.
    #[inline]
    pub fn overlap(&self, start: I, end: I) -> bool {
        self.start < end && self.end > start
    }

    /// Classify this interval against the query range `start .. end`.
    ///
    /// An interval that is both at or after the query end and at or before the query
    /// start (a zero-width interval sitting on a zero-width query) is placed on the right.
    pub fn placement(&self, start: I, end: I) -> Placement<I> {
        if self.overlap(start, end) {
            Placement::Overlap(self.intersect_raw(start, end))
        } else if self.start >= end {
            Placement::Right(self.start - end)
        } else {
            Placement::Left(start - self.end)
        }
    }
}

/// Fail with [`IntervalError::InvalidInterval`] if `start > end`, or with
/// [`IntervalError::CoordinateOutOfRange`] if either end lies outside
/// `-(I::MAX >> 1) ..= I::MAX >> 1`.
#[inline]
pub fn check_bounds<I>(start: I, end: I) -> IntervalResult<()>
where
    I: PrimInt + Signed,
{
    if start > end {
        return Err(IntervalError::InvalidInterval {
            start: start.to_i128().unwrap_or_default(),
            end: end.to_i128().unwrap_or_default(),
        });
    }
    let limit = coordinate_limit::<I>();
    if start < -limit || end > limit {
        return Err(IntervalError::CoordinateOutOfRange {
            start: start.to_i128().unwrap_or_default(),
            end: end.to_i128().unwrap_or_default(),
        });
    }
    Ok(())
}

/// Largest magnitude a coordinate may have. Half of `I::MAX`, so any difference of two
/// coordinates, and its negation, stays representable.
#[inline]
pub fn coordinate_limit<I: PrimInt>() -> I {
    I::max_value() >> 1
}
