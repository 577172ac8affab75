//! Domain identifier types
//!
//! Newtype wrappers for the identifiers that flow through the pipeline. Keeping the
//! person key and the snapshot key apart prevents comparing a source-row key with a
//! key parsed back out of a written report line.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Person number newtype wrapper
///
/// The join key between a primary-source row (position 1) and the secondary-source
/// customer table. Values are compared as rendered, trimmed text so an integer
/// `1042` from one source matches the string `"1042"` from the other.
///
/// # Examples
///
/// ```
/// use zoe::domain::ids::PersonNbr;
///
/// let persnbr = PersonNbr::new(" 1042 ").unwrap();
/// assert_eq!(persnbr.as_str(), "1042");
/// assert!(PersonNbr::new("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonNbr(String);

impl PersonNbr {
    /// Creates a person number, returning `None` for blank input
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Returns the person number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonNbr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PersonNbr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Snapshot key newtype wrapper
///
/// The business identifier found at position 6 of a written detail line.
/// Unlike [`PersonNbr`] the value is kept verbatim: it is compared exactly as
/// it appears in the file.
///
/// # Examples
///
/// ```
/// use zoe::domain::ids::SnapshotKey;
/// use std::str::FromStr;
///
/// let key = SnapshotKey::from_str("000123").unwrap();
/// assert_eq!(key.numeric_value(), Some(123));
///
/// let key = SnapshotKey::from_str("C").unwrap();
/// assert_eq!(key.numeric_value(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    /// Creates a snapshot key from a field value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of the key if it consists solely of ASCII digits
    ///
    /// Keys too large for `u128` saturate rather than being dropped from the sum.
    pub fn numeric_value(&self) -> Option<u128> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        Some(self.0.parse::<u128>().unwrap_or(u128::MAX))
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SnapshotKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for SnapshotKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
