//! Snapshot hash index
//!
//! Parses a previously written report file into key → content, in file order,
//! plus the additive account hash over numeric keys. Only detail lines
//! contribute: the constant-code line starts with `CDE`, the header has too few
//! fields and the trailer is recognized by its record type.

use crate::core::normalize::FIELD_DELIMITER;
use crate::domain::SnapshotKey;
use indexmap::IndexMap;
use std::io::ErrorKind;
use std::path::Path;

/// Field index of the key in a written detail line
pub const KEY_FIELD: usize = 6;

/// Field index where the compared content starts
pub const CONTENT_START: usize = 5;

const CODE_LINE_MARKER: &str = "CDE";
const TRAILER_RECORD_TYPE: &str = "9";

/// Key → content mapping of one snapshot file
#[derive(Debug, Clone, Default)]
pub struct SnapshotIndex {
    entries: IndexMap<SnapshotKey, String>,
    account_hash: u128,
    skipped_lines: usize,
    duplicate_keys: usize,
}

impl SnapshotIndex {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot file
    ///
    /// A missing or unreadable file yields an empty index; the failure is
    /// logged, never returned.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Snapshot file not found, treating as empty");
                return Self::new();
            }
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read snapshot file, treating as empty"
                );
                return Self::new();
            }
        };

        let index = Self::parse_str(&decode_snapshot(bytes));

        tracing::info!(
            path = %path.display(),
            keys = index.len(),
            account_hash = %index.account_hash,
            skipped_lines = index.skipped_lines,
            duplicate_keys = index.duplicate_keys,
            "Loaded snapshot"
        );

        index
    }

    /// Parses snapshot text
    pub fn parse_str(text: &str) -> Self {
        let mut index = Self::new();
        for line in text.lines() {
            index.insert_line(line);
        }
        index
    }

    /// Adds one line of a report file
    ///
    /// Blank lines, the constant-code line, the trailer and lines without a
    /// delimiter are ignored. Lines with seven or more fields are indexed; shorter ones are
    /// counted as skipped. A repeated key replaces the earlier content but keeps
    /// its original position, and every numeric key occurrence is hashed.
    pub fn insert_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with(CODE_LINE_MARKER) || !line.contains(FIELD_DELIMITER)
        {
            return;
        }

        let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
        if parts[0] == TRAILER_RECORD_TYPE {
            return;
        }
        if parts.len() <= KEY_FIELD {
            self.skipped_lines += 1;
            return;
        }

        let key = SnapshotKey::new(parts[KEY_FIELD]);
        if let Some(value) = key.numeric_value() {
            self.account_hash = self.account_hash.saturating_add(value);
        }

        let content = parts[CONTENT_START..].join("|");
        if self.entries.insert(key, content).is_some() {
            self.duplicate_keys += 1;
            tracing::debug!(key = parts[KEY_FIELD], "Duplicate snapshot key, keeping last content");
        }
    }

    /// Content stored for a key
    pub fn get(&self, key: &SnapshotKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &SnapshotKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&SnapshotKey, &str)> {
        self.entries.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key was indexed
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every numeric key read
    pub fn account_hash(&self) -> u128 {
        self.account_hash
    }

    /// Lines with a delimiter but too few fields
    pub fn skipped_lines(&self) -> usize {
        self.skipped_lines
    }

    /// Lines whose key was already present
    pub fn duplicate_keys(&self) -> usize {
        self.duplicate_keys
    }
}

/// Decodes snapshot bytes as UTF-8, falling back to Windows-1252
///
/// Windows-1252 stands in for ISO-8859-1. The two agree on every byte except
/// 0x80-0x9F, where Latin-1 has C1 control characters and Windows-1252 has
/// printable ones (0x80 is `€`). Snapshot content is compared as text, so a
/// byte in that range decodes to the Windows-1252 character.
pub fn decode_snapshot(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            tracing::debug!("Snapshot is not valid UTF-8, decoding as Windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}
