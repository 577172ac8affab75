//! Report modes

use super::errors::ZoeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which kind of file a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    /// Full snapshot of every extracted record
    New,
    /// Difference between a previous snapshot and the current one
    Delta,
}

impl ReportMode {
    /// File type code written in the header and trailer
    pub fn file_type(self) -> &'static str {
        match self {
            ReportMode::New => "LOAD",
            ReportMode::Delta => "UPDT",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportMode::New => f.write_str("NEW"),
            ReportMode::Delta => f.write_str("DELTA"),
        }
    }
}

impl FromStr for ReportMode {
    type Err = ZoeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NEW" => Ok(Self::New),
            "DELTA" => Ok(Self::Delta),
            _ => Err(ZoeError::InvalidMode(s.to_string())),
        }
    }
}
