//! Report file writer
//!
//! Streams the four parts of a report to disk through a buffered writer.
//! The trailer's file time is the modification time the output path had
//! before this run replaced it.

use crate::core::reconcile::Reconciliation;
use crate::core::report::layout::{clean_line, code_line, new_detail_content, LineFormat};
use crate::core::report::trailer::TrailerInputs;
use crate::core::snapshot::KEY_FIELD;
use crate::domain::{ReportMode, Result, SnapshotKey, ZoeError};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What was written to a report file
#[derive(Debug, Clone, Serialize)]
pub struct ReportStats {
    /// Output path
    pub path: PathBuf,
    /// Report mode
    pub mode: ReportMode,
    /// Detail lines written
    pub body_lines: usize,
    /// Record count written to the trailer
    pub record_count: usize,
    /// Account hash written to the trailer
    pub account_hash: u128,
    /// Added records
    pub added: usize,
    /// Changed records
    pub changed: usize,
    /// Deleted records
    pub deleted: usize,
}

/// Writes one report file
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    format: LineFormat,
}

impl ReportWriter {
    /// Creates a writer for `path`
    pub fn new(path: impl Into<PathBuf>, format: LineFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes a NEW report from extracted lines
    ///
    /// Every line becomes an `A` detail carrying its first 56 fields. The
    /// account hash is summed over position 6 of the written detail lines
    /// (the snapshot key), so a later snapshot parse of this file yields the
    /// same `CDE0110`. It is not the sum of the fourth field of the cleaned
    /// source lines, which files produced by other tools may carry.
    pub fn write_new(&self, lines: &[String]) -> Result<ReportStats> {
        let file_time = prior_file_time(&self.path);
        let mut out = self.create()?;

        self.write_preamble(&mut out)?;

        let mut account_hash: u128 = 0;
        for (index, line) in lines.iter().enumerate() {
            let content = new_detail_content(&clean_line(line));
            let detail = self.format.detail("A", index + 1, &content);
            if let Some(value) = detail_key(&detail).and_then(|k| k.numeric_value()) {
                account_hash = account_hash.saturating_add(value);
            }
            self.write_line(&mut out, &detail)?;
        }

        let stats = ReportStats {
            path: self.path.clone(),
            mode: self.format.mode(),
            body_lines: lines.len(),
            record_count: lines.len() + 2,
            account_hash,
            added: lines.len(),
            changed: 0,
            deleted: 0,
        };
        self.finish(out, &stats, file_time)?;
        Ok(stats)
    }

    /// Writes a DELTA report from a reconciliation
    ///
    /// `account_hash` is the hash of the current snapshot.
    pub fn write_delta(
        &self,
        reconciliation: &Reconciliation,
        account_hash: u128,
    ) -> Result<ReportStats> {
        let file_time = prior_file_time(&self.path);
        let mut out = self.create()?;

        self.write_preamble(&mut out)?;

        for entry in &reconciliation.entries {
            let detail = self
                .format
                .detail(entry.action.code(), entry.sequence, &entry.content);
            self.write_line(&mut out, &detail)?;
        }

        let counts = &reconciliation.counts;
        let body_lines = reconciliation.entries.len();
        let stats = ReportStats {
            path: self.path.clone(),
            mode: self.format.mode(),
            body_lines,
            record_count: body_lines + 2,
            account_hash,
            added: counts.added,
            changed: counts.changed,
            deleted: counts.deleted,
        };
        self.finish(out, &stats, file_time)?;
        Ok(stats)
    }

    fn create(&self) -> Result<BufWriter<File>> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ZoeError::Report(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(&self.path).map_err(|e| {
            ZoeError::Report(format!("Failed to create {}: {}", self.path.display(), e))
        })?;
        Ok(BufWriter::new(file))
    }

    fn write_preamble(&self, out: &mut BufWriter<File>) -> Result<()> {
        self.write_line(out, &code_line())?;
        self.write_line(out, &self.format.header())
    }

    fn write_line(&self, out: &mut BufWriter<File>, line: &str) -> Result<()> {
        writeln!(out, "{line}").map_err(|e| {
            ZoeError::Report(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn finish(
        &self,
        mut out: BufWriter<File>,
        stats: &ReportStats,
        file_time: Option<DateTime<Local>>,
    ) -> Result<()> {
        let trailer = TrailerInputs::new()
            .record_count(stats.record_count)
            .account_hash(stats.account_hash)
            .added(stats.added)
            .changed(stats.changed)
            .deleted(stats.deleted)
            .file_time(file_time)
            .build(&self.format)?;
        self.write_line(&mut out, &trailer)?;

        out.flush().map_err(|e| {
            ZoeError::Report(format!("Failed to flush {}: {}", self.path.display(), e))
        })?;

        tracing::info!(
            path = %self.path.display(),
            mode = %stats.mode,
            body_lines = stats.body_lines,
            added = stats.added,
            changed = stats.changed,
            account_hash = %stats.account_hash,
            "Report written"
        );
        Ok(())
    }
}

/// Modification time of an existing file, if any
pub fn prior_file_time(path: &Path) -> Option<DateTime<Local>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Local>::from)
}

fn detail_key(detail: &str) -> Option<SnapshotKey> {
    detail.split('|').nth(KEY_FIELD).map(SnapshotKey::new)
}
