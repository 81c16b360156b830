pub mod interval;
pub mod interval_group;
pub mod match_result;

// re-export for cleaner imports
pub use self::interval::{Interval, Placement};
pub use self::interval_group::IntervalGroup;
pub use self::match_result::{ClosestOutput, MatchResult};
