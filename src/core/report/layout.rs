//! Report line layout
//!
//! Every report file has four parts: the constant field-code line, a `1`
//! header, `6` detail lines and a `9` trailer.

use crate::core::normalize::FIELD_DELIMITER;
use crate::domain::ReportMode;
use regex::Regex;
use std::sync::OnceLock;

/// Source tag written after the mode code
pub const SOURCE_TAG: &str = "FTF";

/// Record type of the header line
pub const HEADER_RECORD_TYPE: &str = "1";

/// Record type of detail lines
pub const DETAIL_RECORD_TYPE: &str = "6";

/// Record type of the trailer line
pub const TRAILER_RECORD_TYPE: &str = "9";

/// Detail fields carried by a NEW report line
pub const NEW_DETAIL_FIELDS: usize = 56;

/// Field codes of the constant first line
pub const FIELD_CODES: [&str; 61] = [
    "CDE0380", "CDE0377", "CDE0276", "CDE0157", "CDE0557", "CDE0014", "CDE0011", "CDE1023",
    "CDE0019", "CDE1024", "CDE1025", "CDE0023", "CDE0029", "CDE0032", "CDE0033", "CDE0036",
    "CDE0055", "CDE0056", "CDE0077", "CDE0100", "CDE1026", "CDE0141", "CDE0145", "CDE0166",
    "CDE0175", "CDE0182", "CDE0192", "CDE0199", "CDE0206", "CDE0215", "CDE0216", "CDE0219",
    "CDE0222", "CDE0227", "CDE0233", "CDE0277", "CDE1027", "CDE0238", "CDE0283", "CDE0284",
    "CDE0290", "CDE0299", "CDE0309", "CDE0319", "CDE0320", "CDE0321", "CDE0322", "CDE0323",
    "CDE0324", "CDE0334", "CDE0345", "CDE0354", "CDE0408", "CDE0409", "CDE0802", "CDE1275",
    "CDE1271", "CDE1272", "CDE1273", "CDE1274", "CDE0010",
];

/// The constant field-code line
pub fn code_line() -> String {
    FIELD_CODES.join("|")
}

/// Formats the record prefixes of one report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineFormat {
    mode: ReportMode,
    test: bool,
}

impl LineFormat {
    /// Creates a format for a mode; `test` selects mode code `03`
    pub fn new(mode: ReportMode, test: bool) -> Self {
        Self { mode, test }
    }

    /// Report mode
    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    /// `03` for test runs, `01` otherwise
    pub fn mode_code(&self) -> &'static str {
        if self.test {
            "03"
        } else {
            "01"
        }
    }

    /// `1|<FileType>|<ModeCode>|FTF`
    pub fn header(&self) -> String {
        self.record_prefix(HEADER_RECORD_TYPE)
    }

    /// `9|<FileType>|<ModeCode>|FTF`, without the trailer pairs
    pub fn trailer_prefix(&self) -> String {
        self.record_prefix(TRAILER_RECORD_TYPE)
    }

    fn record_prefix(&self, record_type: &str) -> String {
        format!(
            "{record_type}|{}|{}|{SOURCE_TAG}",
            self.mode.file_type(),
            self.mode_code()
        )
    }

    /// `6|<action>|<ModeCode>|FTF|<seq>|<content>`
    pub fn detail(&self, action: &str, sequence: usize, content: &str) -> String {
        format!(
            "{DETAIL_RECORD_TYPE}|{action}|{}|{SOURCE_TAG}|{sequence}|{content}",
            self.mode_code()
        )
    }
}

fn tab_runs() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\t+").expect("tab pattern is valid"))
}

/// Trims a line and collapses each run of tabs to one space
pub fn clean_line(line: &str) -> String {
    tab_runs().replace_all(line.trim(), " ").into_owned()
}

/// The first `NEW_DETAIL_FIELDS` fields of a cleaned line
pub fn new_detail_content(cleaned: &str) -> String {
    cleaned
        .split(FIELD_DELIMITER)
        .take(NEW_DETAIL_FIELDS)
        .collect::<Vec<_>>()
        .join("|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_line() {
        let line = code_line();
        assert!(line.starts_with("CDE0380|CDE0377|"));
        assert!(line.ends_with("|CDE1274|CDE0010"));
        assert_eq!(line.split('|').count(), 61);
    }

    #[test]
    fn test_header() {
        assert_eq!(LineFormat::new(ReportMode::New, true).header(), "1|LOAD|03|FTF");
        assert_eq!(LineFormat::new(ReportMode::Delta, false).header(), "1|UPDT|01|FTF");
    }

    #[test]
    fn test_trailer_prefix() {
        assert_eq!(
            LineFormat::new(ReportMode::Delta, true).trailer_prefix(),
            "9|UPDT|03|FTF"
        );
    }

    #[test]
    fn test_detail() {
        let format = LineFormat::new(ReportMode::New, false);
        assert_eq!(format.detail("A", 7, "a|b"), "6|A|01|FTF|7|a|b");
    }

    #[test]
    fn test_clean_line() {
        assert_eq!(clean_line("  a\t\t\tb|c\td \t"), "a b|c d");
        assert_eq!(clean_line("\ta|b"), "a|b");
    }

    #[test]
    fn test_new_detail_content_truncates() {
        let line = (0..57).map(|i| i.to_string()).collect::<Vec<_>>().join("|");
        let content = new_detail_content(&line);

        assert_eq!(content.split('|').count(), NEW_DETAIL_FIELDS);
        assert!(content.ends_with("|55"));
    }

    #[test]
    fn test_new_detail_content_short() {
        assert_eq!(new_detail_content("a|b"), "a|b");
    }
}
