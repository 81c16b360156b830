use num_traits::{PrimInt, Signed};

use crate::classify::classify;
use crate::traits::ClosestFinder;
use closestrs_core::errors::IntervalResult;
use closestrs_core::models::{ClosestOutput, Interval, MatchResult};

///
/// Run one query interval against a built index and append a row per closest match.
///
/// # Arguments
/// - finder: index over the reference intervals of the query's group
/// - query: the query interval; its `id` becomes `query_id` on every appended row
/// - output: accumulator the rows are appended to
///
/// # Returns
/// - the number of rows appended
///
pub fn closest_for_query<F, I, T>(
    finder: &F,
    query: &Interval<I, T>,
    output: &mut ClosestOutput<I, T>,
) -> IntervalResult<usize>
where
    F: ClosestFinder<I, T>,
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    let candidates = finder.find_closest(query.start, query.end)?;
    for candidate in candidates.iter() {
        let (overlap, distance) = classify(query, candidate);
        output.push(MatchResult {
            query_id: query.id.clone(),
            ref_id: candidate.id.clone(),
            overlap,
            distance,
        });
    }
    Ok(candidates.len())
}

/// Run every query interval, in order, against one index.
pub fn closest_for_queries<'q, F, I, T, Q>(
    finder: &F,
    queries: Q,
    output: &mut ClosestOutput<I, T>,
) -> IntervalResult<usize>
where
    F: ClosestFinder<I, T>,
    I: PrimInt + Signed + Send + Sync + 'q,
    T: Eq + Clone + Send + Sync + 'q,
    Q: IntoIterator<Item = &'q Interval<I, T>>,
{
    let mut total = 0;
    for query in queries {
        total += closest_for_query(finder, query, output)?;
    }
    Ok(total)
}
