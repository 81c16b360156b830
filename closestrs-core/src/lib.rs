//! Core models for closest-feature joins over genomic intervals.
//!
//! This crate holds the data types shared by the rest of closestrs: the half-open
//! [`Interval`](models::Interval), the per-chromosome [`IntervalGroup`](models::IntervalGroup),
//! and the columnar [`ClosestOutput`](models::ClosestOutput) that a closest join produces.
//! The indexes and the join itself live in the `closestrs` crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use closestrs_core::models::{Interval, IntervalGroup};
//!
//! let records = vec![
//!     ("chr1".to_string(), 100i64, 200i64, 0usize),
//!     ("chr2".to_string(), 50, 80, 1),
//!     ("chr1".to_string(), 300, 400, 2),
//! ];
//!
//! let groups = IntervalGroup::group_by_key(records);
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].key, "chr1");
//! assert_eq!(groups[0].intervals[1], Interval { start: 300, end: 400, id: 2 });
//! ```
pub mod errors;
pub mod models;
