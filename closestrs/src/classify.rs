//! Overlap and signed distance between a query interval and one of its closest matches.
use num_traits::{PrimInt, Signed, identities::zero};

use closestrs_core::models::Interval;

///
/// Compute `(overlap, distance)` for a query and a candidate reference interval.
///
/// - overlapping pairs give the overlap width and a distance of 0
/// - a candidate downstream of the query (starting after its end) gives a positive distance
/// - a candidate upstream gives a negative distance
///
/// Abutting pairs, and a zero-width interval sitting inside the other, have neither overlap
/// width nor gap and come out as `(0, 0)`.
///
/// Both intervals are expected to have passed [`Interval::validate`], which keeps the gap
/// between them representable in `I`.
///
/// ```
/// use closestrs::{classify, Interval};
///
/// let query = Interval { start: 5000i64, end: 6000, id: 0i64 };
/// let downstream = Interval { start: 7000, end: 8500, id: 0 };
/// assert_eq!(classify(&query, &downstream), (0, 1000));
/// ```
#[inline]
pub fn classify<I, T>(query: &Interval<I, T>, candidate: &Interval<I, T>) -> (I, I)
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    let raw = candidate.intersect_raw(query.start, query.end);
    if raw > zero() {
        (raw, zero())
    } else if candidate.start > query.end {
        (zero(), -raw)
    } else {
        (zero(), raw)
    }
}
