//! Closest joins across grouped interval collections.
//!
//! The driver pairs each reference group with the query group carrying the same key, builds
//! one index per reference group, and runs every query interval of the paired group against
//! it. Keys present on only one side produce nothing.
//!
//! # Examples
//!
//! ```
//! use closestrs::{ClosestConfig, closest_grouped};
//! use closestrs_core::models::IntervalGroup;
//!
//! let query = IntervalGroup::group_by_key(vec![
//!     ("chr1", 500i64, 600i64, 0i64),
//!     ("chr2", 5000, 6000, 0),
//! ]);
//! let reference = IntervalGroup::group_by_key(vec![
//!     ("chr1", 100i64, 200i64, 0i64),
//!     ("chr1", 150, 200, 1),
//!     ("chr1", 550, 580, 2),
//!     ("chr2", 7000, 8500, 0),
//! ]);
//!
//! let output = closest_grouped(&query, &reference, &ClosestConfig::default()).unwrap();
//!
//! assert_eq!(output.query_ids, vec![0, 0]);
//! assert_eq!(output.ref_ids, vec![2, 0]);
//! assert_eq!(output.overlaps, vec![30, 0]);
//! assert_eq!(output.distances, vec![0, 1000]);
//! ```
use fxhash::{FxHashMap, FxHashSet};
use log::{debug, info, trace};
use num_traits::{PrimInt, Signed};

use crate::config::ClosestConfig;
use crate::engine::closest_for_queries;
use crate::errors::{ClosestError, ClosestResult};
use crate::{ClosestFinder, FinderType, IntervalTree, LinearScan};
use closestrs_core::errors::{GroupError, GroupSide};
use closestrs_core::models::{ClosestOutput, IntervalGroup};

/// A query group and the reference group it was matched with.
type GroupPair<'a, I, T> = (&'a IntervalGroup<I, T>, &'a IntervalGroup<I, T>);

///
/// Find the closest reference interval(s) for every query interval, matching groups by exact
/// key equality.
///
/// Rows come out in reference-group order, then in query order within each group. An
/// invalid interval anywhere aborts the whole join.
///
/// # Arguments
/// - query: query-side groups
/// - reference: reference-side groups
/// - config: which index to build and whether to run groups in parallel
///
pub fn closest_grouped<I, T>(
    query: &[IntervalGroup<I, T>],
    reference: &[IntervalGroup<I, T>],
    config: &ClosestConfig,
) -> ClosestResult<ClosestOutput<I, T>>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    let pairs = pair_groups(query, reference)?;
    run_pairs(pairs, config)
}

///
/// Like [`closest_grouped`], but groups are matched with a caller-supplied key equality,
/// e.g. to treat `chr1` and `1` as the same chromosome.
///
/// Two keys on the same side that `key_eq` considers equal are rejected as duplicates.
///
pub fn closest_grouped_by<I, T, F>(
    query: &[IntervalGroup<I, T>],
    reference: &[IntervalGroup<I, T>],
    config: &ClosestConfig,
    key_eq: F,
) -> ClosestResult<ClosestOutput<I, T>>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
    F: Fn(&str, &str) -> bool,
{
    let pairs = pair_groups_by(query, reference, key_eq)?;
    run_pairs(pairs, config)
}

/// Match reference groups to query groups by exact key, in reference order.
fn pair_groups<'a, I, T>(
    query: &'a [IntervalGroup<I, T>],
    reference: &'a [IntervalGroup<I, T>],
) -> Result<Vec<GroupPair<'a, I, T>>, GroupError>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    let mut query_by_key: FxHashMap<&str, &IntervalGroup<I, T>> = FxHashMap::default();
    for group in query.iter() {
        if query_by_key.insert(group.key.as_str(), group).is_some() {
            return Err(GroupError::DuplicateGroupKey {
                key: group.key.clone(),
                side: GroupSide::Query,
            });
        }
    }

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut pairs = Vec::new();
    for group in reference.iter() {
        if !seen.insert(group.key.as_str()) {
            return Err(GroupError::DuplicateGroupKey {
                key: group.key.clone(),
                side: GroupSide::Reference,
            });
        }
        match query_by_key.get(group.key.as_str()) {
            Some(query_group) => pairs.push((*query_group, group)),
            None => trace!("Skipping reference group {}: no query group", group.key),
        }
    }

    Ok(pairs)
}

/// Match reference groups to query groups with `key_eq`, in reference order.
fn pair_groups_by<'a, I, T, F>(
    query: &'a [IntervalGroup<I, T>],
    reference: &'a [IntervalGroup<I, T>],
    key_eq: F,
) -> Result<Vec<GroupPair<'a, I, T>>, GroupError>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
    F: Fn(&str, &str) -> bool,
{
    check_distinct_keys(query, GroupSide::Query, &key_eq)?;
    check_distinct_keys(reference, GroupSide::Reference, &key_eq)?;

    let mut pairs = Vec::new();
    for group in reference.iter() {
        match query.iter().find(|q| key_eq(&q.key, &group.key)) {
            Some(query_group) => pairs.push((query_group, group)),
            None => trace!("Skipping reference group {}: no query group", group.key),
        }
    }

    Ok(pairs)
}

fn check_distinct_keys<I, T, F>(
    groups: &[IntervalGroup<I, T>],
    side: GroupSide,
    key_eq: &F,
) -> Result<(), GroupError>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
    F: Fn(&str, &str) -> bool,
{
    for (i, group) in groups.iter().enumerate() {
        if groups[..i].iter().any(|prev| key_eq(&prev.key, &group.key)) {
            return Err(GroupError::DuplicateGroupKey {
                key: group.key.clone(),
                side,
            });
        }
    }
    Ok(())
}

fn run_pairs<I, T>(
    pairs: Vec<GroupPair<'_, I, T>>,
    config: &ClosestConfig,
) -> ClosestResult<ClosestOutput<I, T>>
where
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    let output = match config.finder {
        FinderType::IntervalTree => {
            run_pairs_with::<IntervalTree<I, T>, I, T>(&pairs, config.parallel)?
        }
        FinderType::LinearScan => {
            run_pairs_with::<LinearScan<I, T>, I, T>(&pairs, config.parallel)?
        }
    };

    info!(
        "Closest join finished: {} paired groups, {} matches",
        pairs.len(),
        output.len()
    );
    Ok(output)
}

fn run_pairs_with<F, I, T>(
    pairs: &[GroupPair<'_, I, T>],
    parallel: bool,
) -> ClosestResult<ClosestOutput<I, T>>
where
    F: ClosestFinder<I, T>,
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    if parallel {
        #[cfg(feature = "parallel")]
        return run_pairs_parallel::<F, I, T>(pairs);

        #[cfg(not(feature = "parallel"))]
        log::warn!(
            "Parallel closest join requested but the `parallel` feature is disabled; running sequentially"
        );
    }

    let mut output = ClosestOutput::new();
    for (query_group, reference_group) in pairs.iter() {
        let mut group_output = closest_group::<F, I, T>(query_group, reference_group)?;
        output.append(&mut group_output);
    }
    Ok(output)
}

/// Run each pair on the rayon pool and concatenate the per-group outputs in pair order.
#[cfg(feature = "parallel")]
fn run_pairs_parallel<F, I, T>(pairs: &[GroupPair<'_, I, T>]) -> ClosestResult<ClosestOutput<I, T>>
where
    F: ClosestFinder<I, T>,
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    use rayon::prelude::*;

    let group_outputs = pairs
        .par_iter()
        .map(|(query_group, reference_group)| {
            closest_group::<F, I, T>(query_group, reference_group)
        })
        .collect::<ClosestResult<Vec<_>>>()?;

    let total = group_outputs.iter().map(|o| o.len()).sum();
    let mut output = ClosestOutput::with_capacity(total);
    for mut group_output in group_outputs {
        output.append(&mut group_output);
    }
    Ok(output)
}

/// Build an index over one reference group and run the paired query group against it.
fn closest_group<F, I, T>(
    query_group: &IntervalGroup<I, T>,
    reference_group: &IntervalGroup<I, T>,
) -> ClosestResult<ClosestOutput<I, T>>
where
    F: ClosestFinder<I, T>,
    I: PrimInt + Signed + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    // keys can differ under a custom key equality, so each error names its own group
    let finder = F::build(reference_group.intervals.clone()).map_err(|source| {
        ClosestError::InvalidGroupInterval {
            key: reference_group.key.clone(),
            source,
        }
    })?;
    let mut output = ClosestOutput::with_capacity(query_group.len());
    closest_for_queries(&finder, query_group, &mut output).map_err(|source| {
        ClosestError::InvalidGroupInterval {
            key: query_group.key.clone(),
            source,
        }
    })?;

    debug!(
        "Group {}: {} queries against {} reference intervals, {} matches",
        reference_group.key,
        query_group.len(),
        finder.len(),
        output.len()
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    use closestrs_core::errors::IntervalError;
    use closestrs_core::models::Interval;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    type Group = IntervalGroup<i64, i64>;

    fn group(key: &str, coords: &[(i64, i64)]) -> Group {
        let intervals = coords
            .iter()
            .enumerate()
            .map(|(id, &(start, end))| Interval {
                start,
                end,
                id: id as i64,
            })
            .collect();
        IntervalGroup::new(key, intervals)
    }

    #[fixture]
    fn query() -> Vec<Group> {
        vec![
            group("chr1", &[(500, 600)]),
            group("chr2", &[(5000, 6000)]),
            group("chr3", &[(1, 2)]),
        ]
    }

    #[fixture]
    fn reference() -> Vec<Group> {
        vec![
            group("chr1", &[(100, 200), (150, 200), (550, 580)]),
            group("chr2", &[(7000, 8500)]),
            group("chrY", &[(0, 10)]),
        ]
    }

    #[rstest]
    #[case(FinderType::IntervalTree)]
    #[case(FinderType::LinearScan)]
    fn test_sample_join(
        query: Vec<Group>,
        reference: Vec<Group>,
        #[case] finder: FinderType,
    ) {
        let config = ClosestConfig::default().with_finder(finder);
        let output = closest_grouped(&query, &reference, &config).unwrap();

        assert_eq!(output.query_ids, vec![0, 0]);
        assert_eq!(output.ref_ids, vec![2, 0]);
        assert_eq!(output.overlaps, vec![30, 0]);
        assert_eq!(output.distances, vec![0, 1000]);
    }

    #[rstest]
    fn test_output_follows_reference_group_order(query: Vec<Group>, reference: Vec<Group>) {
        let mut reference = reference;
        reference.reverse();

        let output = closest_grouped(&query, &reference, &ClosestConfig::default()).unwrap();
        assert_eq!(output.ref_ids, vec![0, 2]);
        assert_eq!(output.distances, vec![1000, 0]);
    }

    #[rstest]
    fn test_empty_reference_group() {
        let query = vec![group("chr1", &[(0, 10), (20, 30)])];
        let reference = vec![group("chr1", &[])];
        let output = closest_grouped(&query, &reference, &ClosestConfig::default()).unwrap();
        assert_eq!(output.is_empty(), true);
    }

    #[rstest]
    fn test_no_shared_keys() {
        let query = vec![group("chr1", &[(0, 10)])];
        let reference = vec![group("chr2", &[(0, 10)])];
        let output = closest_grouped(&query, &reference, &ClosestConfig::default()).unwrap();
        assert_eq!(output.is_empty(), true);
    }

    #[rstest]
    fn test_duplicate_keys_rejected(query: Vec<Group>, reference: Vec<Group>) {
        let mut dup_query = query.clone();
        dup_query.push(group("chr1", &[(0, 1)]));
        assert_eq!(
            closest_grouped(&dup_query, &reference, &ClosestConfig::default()),
            Err(ClosestError::Group(GroupError::DuplicateGroupKey {
                key: "chr1".to_string(),
                side: GroupSide::Query,
            }))
        );

        let mut dup_reference = reference.clone();
        dup_reference.push(group("chr2", &[(0, 1)]));
        assert_eq!(
            closest_grouped(&query, &dup_reference, &ClosestConfig::default()),
            Err(ClosestError::Group(GroupError::DuplicateGroupKey {
                key: "chr2".to_string(),
                side: GroupSide::Reference,
            }))
        );
    }

    #[rstest]
    fn test_invalid_interval_aborts_join(query: Vec<Group>) {
        let reference = vec![
            group("chr1", &[(100, 200)]),
            group("chr2", &[(8500, 7000)]),
        ];
        assert_eq!(
            closest_grouped(&query, &reference, &ClosestConfig::default()),
            Err(ClosestError::InvalidGroupInterval {
                key: "chr2".to_string(),
                source: IntervalError::InvalidInterval {
                    start: 8500,
                    end: 7000
                },
            })
        );
    }

    #[rstest]
    fn test_invalid_query_interval_aborts_join(reference: Vec<Group>) {
        let query = vec![group("chr1", &[(600, 500)])];
        let result = closest_grouped(&query, &reference, &ClosestConfig::default());
        assert_eq!(
            matches!(result, Err(ClosestError::InvalidGroupInterval { ref key, .. }) if key == "chr1"),
            true
        );
    }

    #[rstest]
    fn test_custom_key_equality(reference: Vec<Group>) {
        let query = vec![group("1", &[(500, 600)]), group("2", &[(5000, 6000)])];
        let strip = |k: &str| k.strip_prefix("chr").unwrap_or(k).to_string();

        let output = closest_grouped_by(&query, &reference, &ClosestConfig::default(), |a, b| {
            strip(a) == strip(b)
        })
        .unwrap();
        assert_eq!(output.ref_ids, vec![2, 0]);

        let exact = closest_grouped(&query, &reference, &ClosestConfig::default()).unwrap();
        assert_eq!(exact.is_empty(), true);
    }

    #[rstest]
    fn test_custom_key_equality_duplicates() {
        let query = vec![group("chr1", &[(0, 1)]), group("1", &[(0, 1)])];
        let reference = vec![group("chr1", &[(0, 1)])];
        let result = closest_grouped_by(&query, &reference, &ClosestConfig::default(), |a, b| {
            a.trim_start_matches("chr") == b.trim_start_matches("chr")
        });
        assert_eq!(
            result,
            Err(ClosestError::Group(GroupError::DuplicateGroupKey {
                key: "1".to_string(),
                side: GroupSide::Query,
            }))
        );
    }

    #[rstest]
    fn test_idempotent(query: Vec<Group>, reference: Vec<Group>) {
        let config = ClosestConfig::default();
        let first = closest_grouped(&query, &reference, &config).unwrap();
        let second = closest_grouped(&query, &reference, &config).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn test_invalid_query_interval_reports_query_key(reference: Vec<Group>) {
        let query = vec![group("1", &[(600, 500)])];
        let result = closest_grouped_by(&query, &reference, &ClosestConfig::default(), |a, b| {
            a.trim_start_matches("chr") == b.trim_start_matches("chr")
        });
        assert_eq!(
            result,
            Err(ClosestError::InvalidGroupInterval {
                key: "1".to_string(),
                source: IntervalError::InvalidInterval {
                    start: 600,
                    end: 500
                },
            })
        );
    }

    #[rstest]
    fn test_invalid_reference_interval_reports_reference_key() {
        let query = vec![group("1", &[(0, 10)])];
        let reference = vec![group("chr1", &[(20, 10)])];
        let result = closest_grouped_by(&query, &reference, &ClosestConfig::default(), |a, b| {
            a.trim_start_matches("chr") == b.trim_start_matches("chr")
        });
        assert_eq!(
            matches!(result, Err(ClosestError::InvalidGroupInterval { ref key, .. }) if key == "chr1"),
            true
        );
    }

    #[cfg(feature = "parallel")]
    #[rstest]
    fn test_parallel_matches_sequential(query: Vec<Group>, reference: Vec<Group>) {
        let pairs = pair_groups(&query, &reference).unwrap();

        let sequential = run_pairs_with::<IntervalTree<i64, i64>, i64, i64>(&pairs, false).unwrap();
        let parallel = run_pairs_parallel::<IntervalTree<i64, i64>, i64, i64>(&pairs).unwrap();
        assert_eq!(sequential, parallel);

        let scanned = run_pairs_parallel::<LinearScan<i64, i64>, i64, i64>(&pairs).unwrap();
        assert_eq!(scanned, sequential);

        let config = ClosestConfig::default().with_parallel(true);
        assert_eq!(closest_grouped(&query, &reference, &config).unwrap(), sequential);
    }

    #[cfg(feature = "parallel")]
    #[rstest]
    fn test_parallel_propagates_invalid_interval(query: Vec<Group>) {
        let reference = vec![group("chr1", &[(100, 200)]), group("chr2", &[(9, 1)])];
        let pairs = pair_groups(&query, &reference).unwrap();
        let result = run_pairs_parallel::<IntervalTree<i64, i64>, i64, i64>(&pairs);
        assert_eq!(
            matches!(result, Err(ClosestError::InvalidGroupInterval { ref key, .. }) if key == "chr2"),
            true
        );
    }

    #[cfg(not(feature = "parallel"))]
    #[rstest]
    fn test_parallel_request_runs_sequentially_without_feature(
        query: Vec<Group>,
        reference: Vec<Group>,
    ) {
        let sequential = closest_grouped(&query, &reference, &ClosestConfig::default()).unwrap();
        let requested = closest_grouped(
            &query,
            &reference,
            &ClosestConfig::default().with_parallel(true),
        )
        .unwrap();
        assert_eq!(sequential, requested);
    }
}
