//! Trailer record
//!
//! The trailer closes every report with 19 `CODE:value` pairs. Record count
//! and account hash have no sensible default, so building a trailer without
//! them fails.

use crate::core::report::layout::LineFormat;
use crate::domain::{Result, ZoeError};
use chrono::{DateTime, Local};

/// Constant source tag of the trailer
pub const TRAILER_SOURCE: &str = "ZOE";

/// Inputs of a trailer line
#[derive(Debug, Clone, Default)]
pub struct TrailerInputs {
    record_count: Option<usize>,
    account_hash: Option<u128>,
    added: usize,
    changed: usize,
    deleted: usize,
    file_time: Option<DateTime<Local>>,
    created_at: Option<DateTime<Local>>,
}

impl TrailerInputs {
    /// Starts an empty set of inputs
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lines of the file: body plus header and trailer
    pub fn record_count(mut self, count: usize) -> Self {
        self.record_count = Some(count);
        self
    }

    /// Sum of numeric keys
    pub fn account_hash(mut self, hash: u128) -> Self {
        self.account_hash = Some(hash);
        self
    }

    /// Added records
    pub fn added(mut self, added: usize) -> Self {
        self.added = added;
        self
    }

    /// Changed records
    pub fn changed(mut self, changed: usize) -> Self {
        self.changed = changed;
        self
    }

    /// Deleted records
    pub fn deleted(mut self, deleted: usize) -> Self {
        self.deleted = deleted;
        self
    }

    /// Time the trailer's time fields and epoch are taken from; defaults to now
    pub fn file_time(mut self, time: Option<DateTime<Local>>) -> Self {
        self.file_time = time;
        self
    }

    /// Creation date of the file; defaults to now
    pub fn created_at(mut self, time: DateTime<Local>) -> Self {
        self.created_at = Some(time);
        self
    }

    /// Renders the trailer line
    ///
    /// # Errors
    ///
    /// Returns [`ZoeError::MissingTrailerInput`] if the record count or the
    /// account hash was not supplied.
    pub fn build(&self, format: &LineFormat) -> Result<String> {
        let record_count = self
            .record_count
            .ok_or(ZoeError::MissingTrailerInput("Record Count"))?;
        let account_hash = self
            .account_hash
            .ok_or(ZoeError::MissingTrailerInput("Account Hash"))?;

        let now = Local::now();
        let created_at = self.created_at.unwrap_or(now);
        let file_time = self.file_time.unwrap_or(now);

        let pairs: [(&str, String); 19] = [
            ("CDE0083", created_at.format("%Y%m%d").to_string()),
            // Always 9 characters: HHMMSS and zero-padded milliseconds
            ("CDE0084", file_time.format("%H%M%S%3f").to_string()),
            ("CDE0110", account_hash.to_string()),
            ("CDE0111", self.added.to_string()),
            ("CDE0120", self.changed.to_string()),
            ("CDE0121", self.deleted.to_string()),
            ("CDE0123", String::new()),
            ("CDE0133", record_count.to_string()),
            ("CDE0139", TRAILER_SOURCE.to_string()),
            // Reserved: bank id, region, transfer date/time, process end date/time
            ("CDE0151", String::new()),
            ("CDE0165", String::new()),
            ("CDE0418", String::new()),
            ("CDE0419", String::new()),
            ("CDE0429", String::new()),
            ("CDE0430", String::new()),
            ("CDE0467", file_time.timestamp().to_string()),
            ("CDE0674", String::new()),
            ("CDE0676", "A".to_string()),
            ("CDE0811", String::new()),
        ];

        let mut line = format.trailer_prefix();
        for (code, value) in &pairs {
            line.push('|');
            line.push_str(code);
            line.push(':');
            line.push_str(value);
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReportMode;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 14, h, m, s)
            .unwrap()
            + chrono::Duration::milliseconds(ms.into())
    }

    fn pairs(line: &str) -> Vec<(String, String)> {
        line.split('|')
            .skip(4)
            .map(|p| {
                let (k, v) = p.split_once(':').unwrap();
                (k.to_string(), v.to_string())
            })
            .collect()
    }

    #[test]
    fn test_missing_record_count() {
        let err = TrailerInputs::new()
            .account_hash(1)
            .build(&LineFormat::new(ReportMode::New, false))
            .unwrap_err();
        assert!(matches!(err, ZoeError::MissingTrailerInput("Record Count")));
    }

    #[test]
    fn test_missing_account_hash() {
        let err = TrailerInputs::new()
            .record_count(2)
            .build(&LineFormat::new(ReportMode::New, false))
            .unwrap_err();
        assert!(matches!(err, ZoeError::MissingTrailerInput("Account Hash")));
    }

    #[test]
    fn test_trailer_layout() {
        let file_time = at(9, 5, 7, 42);
        let line = TrailerInputs::new()
            .record_count(5)
            .account_hash(3003)
            .added(2)
            .changed(1)
            .file_time(Some(file_time))
            .created_at(at(12, 0, 0, 0))
            .build(&LineFormat::new(ReportMode::Delta, true))
            .unwrap();

        assert!(line.starts_with("9|UPDT|03|FTF|"));

        let pairs = pairs(&line);
        assert_eq!(pairs.len(), 19);

        let value = |code: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == code)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(value("CDE0083"), "20250314");
        assert_eq!(value("CDE0084"), "090507042");
        assert_eq!(value("CDE0110"), "3003");
        assert_eq!(value("CDE0111"), "2");
        assert_eq!(value("CDE0120"), "1");
        assert_eq!(value("CDE0121"), "0");
        assert_eq!(value("CDE0133"), "5");
        assert_eq!(value("CDE0139"), "ZOE");
        assert_eq!(value("CDE0467"), file_time.timestamp().to_string());
        assert_eq!(value("CDE0676"), "A");
        assert_eq!(value("CDE0811"), "");

        let codes: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(codes.first(), Some(&"CDE0083"));
        assert_eq!(codes.last(), Some(&"CDE0811"));
    }

    #[test]
    fn test_creation_time_whole_second() {
        let line = TrailerInputs::new()
            .record_count(2)
            .account_hash(0)
            .file_time(Some(at(23, 59, 1, 0)))
            .build(&LineFormat::new(ReportMode::New, false))
            .unwrap();

        let pairs = pairs(&line);
        let (_, time) = pairs.iter().find(|(k, _)| k == "CDE0084").unwrap();
        assert_eq!(time, "235901000");
    }
}
