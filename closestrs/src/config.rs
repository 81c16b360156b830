use std::fs::read_to_string;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::FinderType;

///
/// Settings for a closest join.
///
/// Loaded from TOML; every field is optional:
///
/// ```toml
/// finder = "linear_scan"
/// parallel = true
/// ```
///
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ClosestConfig {
    /// Index built over each reference group.
    #[serde(default)]
    pub finder: FinderType,
    /// Process groups on the rayon thread pool. Needs the `parallel` feature.
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Error, Debug)]
pub enum ClosestConfigError {
    #[error("Invalid finder type: {0}. Expected `interval_tree` or `linear_scan`")]
    InvalidFinderType(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type ClosestConfigResult<T> = std::result::Result<T, ClosestConfigError>;

impl ClosestConfig {
    pub fn with_finder(mut self, finder: FinderType) -> Self {
        self.finder = finder;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl FromStr for ClosestConfig {
    type Err = ClosestConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config = toml::from_str(s)?;
        Ok(config)
    }
}

impl TryFrom<&Path> for ClosestConfig {
    type Error = ClosestConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        toml_str.parse()
    }
}

impl FromStr for FinderType {
    type Err = ClosestConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interval_tree" | "intervaltree" | "tree" => Ok(FinderType::IntervalTree),
            "linear_scan" | "linearscan" | "scan" => Ok(FinderType::LinearScan),
            _ => Err(ClosestConfigError::InvalidFinderType(s.to_string())),
        }
    }
}
