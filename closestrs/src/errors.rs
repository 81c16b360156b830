use thiserror::Error;

use closestrs_core::errors::{GroupError, IntervalError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClosestError {
    #[error("Invalid interval in group {key}: {source}")]
    InvalidGroupInterval {
        key: String,
        #[source]
        source: IntervalError,
    },
    #[error(transparent)]
    Interval(#[from] IntervalError),
    #[error(transparent)]
    Group(#[from] GroupError),
}

pub type ClosestResult<T> = std::result::Result<T, ClosestError>;
