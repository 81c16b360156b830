use std::fmt::{self, Display};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntervalError {
    #[error("Invalid interval: start ({start}) is greater than end ({end})")]
    InvalidInterval { start: i128, end: i128 },
    #[error("Interval coordinates out of range: {start}..{end}")]
    CoordinateOutOfRange { start: i128, end: i128 },
}

/// Which of the two collections in a join a group came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSide {
    Query,
    Reference,
}

impl Display for GroupSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSide::Query => write!(f, "query"),
            GroupSide::Reference => write!(f, "reference"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("Group key appears more than once in the {side} collection: {key}")]
    DuplicateGroupKey { key: String, side: GroupSide },
}

pub type IntervalResult<T> = std::result::Result<T, IntervalError>;
