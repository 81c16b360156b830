//! Closest-feature joins between grouped genomic interval sets.
//!
//! For every interval in a query set, closestrs finds the nearest interval(s) in a reference
//! set on the same chromosome and reports either how much they overlap or how far apart they
//! are. It is the computational core of a `closest` operation in a genomic interval toolkit;
//! reading BED files and assembling the output table are left to the caller.
//!
//! ## Features
//!
//! - **Overlap first**: if any reference intervals overlap a query, exactly those are reported
//! - **Ties included**: otherwise every reference interval tied for the smallest gap upstream
//!   and downstream is reported
//! - **Signed distances**: negative upstream, positive downstream, zero for overlaps
//! - **Per-chromosome**: one index per reference group, groups joined by key
//! - **Parallel**: with the `parallel` feature, groups run on the rayon thread pool with
//!   output identical to a sequential run
//!
//! ## Quick Start
//!
//! ```rust
//! use closestrs::{ClosestConfig, closest_grouped};
//! use closestrs_core::models::IntervalGroup;
//!
//! let genes = IntervalGroup::group_by_key(vec![
//!     ("chr1", 1000i64, 2000i64, 0i64),
//!     ("chr1", 5000, 6000, 1),
//! ]);
//! let peaks = IntervalGroup::group_by_key(vec![
//!     ("chr1", 2500i64, 2600i64, 0i64),
//! ]);
//!
//! // nearest gene on each side of every peak
//! let output = closest_grouped(&peaks, &genes, &ClosestConfig::default()).unwrap();
//!
//! assert_eq!(output.ref_ids, vec![0, 1]);
//! assert_eq!(output.overlaps, vec![0, 0]);
//! assert_eq!(output.distances, vec![-500, 2400]);
//! ```

/// Overlap/distance classification of a query and candidate pair.
pub mod classify;

/// Join configuration.
pub mod config;

/// Grouped closest joins.
///
/// See [`closest_grouped`] for the main entry point.
pub mod driver;

/// Single-query closest lookups.
pub mod engine;

pub mod errors;

/// Augmented interval tree.
///
/// See [`IntervalTree`] for details.
pub mod interval_tree;

/// Linear-scan fallback index.
///
/// See [`LinearScan`] for details.
pub mod linear_scan;

/// Core traits for closest queries.
///
/// See [`ClosestFinder`] for the main trait.
pub mod traits;

use serde::{Deserialize, Serialize};

// re-exports
pub use self::classify::classify;
pub use self::config::ClosestConfig;
pub use self::driver::{closest_grouped, closest_grouped_by};
pub use self::engine::{closest_for_queries, closest_for_query};
pub use self::errors::{ClosestError, ClosestResult};
pub use self::interval_tree::IntervalTree;
pub use self::linear_scan::LinearScan;
pub use self::traits::{ClosestFinder, Interval};

/// The type of index built over each reference group.
///
/// # Variants
///
/// * `IntervalTree` - Augmented interval tree, `O(log n + k)` per query. The default.
/// * `LinearScan` - Scan every interval per query. Only sensible for small groups.
///
#[derive(Deserialize, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinderType {
    #[default]
    IntervalTree,
    LinearScan,
}
