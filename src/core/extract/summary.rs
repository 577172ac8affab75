//! Extraction summary and reporting
//!
//! This module defines structures for tracking what the extraction workers did.

use crate::core::query::QuerySlot;
use serde::Serialize;
use std::time::Duration;

/// Summary of one extraction pass
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    /// Number of workers dispatched
    pub workers: usize,

    /// Rows fetched from the data sources
    pub rows_fetched: usize,

    /// Detail lines produced
    pub lines: usize,

    /// Rows too short to normalize
    pub skipped_rows: usize,

    /// Persons with a customer override available
    pub customer_overrides: usize,

    /// Duration of the extraction
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,

    /// Work abandoned along the way
    pub failures: Vec<ExtractionFailure>,
}

impl ExtractionSummary {
    /// Create a new empty summary
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            rows_fetched: 0,
            lines: 0,
            skipped_rows: 0,
            customer_overrides: 0,
            duration: Duration::from_secs(0),
            failures: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Folds one worker's report into the summary
    pub fn absorb(&mut self, report: WorkerReport) {
        self.rows_fetched += report.rows_fetched;
        self.lines += report.lines;
        self.skipped_rows += report.skipped_rows;
        self.failures.extend(report.failures);
    }

    /// Add a failure
    pub fn add_failure(&mut self, failure: ExtractionFailure) {
        self.failures.push(failure);
    }

    /// Check if every slot ran to completion
    pub fn is_successful(&self) -> bool {
        self.failures.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            workers = self.workers,
            rows_fetched = self.rows_fetched,
            lines = self.lines,
            skipped_rows = self.skipped_rows,
            customer_overrides = self.customer_overrides,
            duration_ms = self.duration.as_millis() as u64,
            "Extraction completed"
        );

        if !self.failures.is_empty() {
            tracing::warn!(
                failure_count = self.failures.len(),
                "Extraction completed with failures"
            );
            for failure in &self.failures {
                tracing::warn!(
                    kind = ?failure.kind,
                    worker_id = failure.worker_id,
                    slot = failure.slot.map(|s| s.name()).unwrap_or("-"),
                    message = %failure.message,
                    "Extraction failure"
                );
            }
        }
    }
}

pub(crate) fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// What one worker did
#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    /// Worker id
    pub worker_id: usize,
    /// Rows fetched
    pub rows_fetched: usize,
    /// Lines produced
    pub lines: usize,
    /// Rows too short to normalize
    pub skipped_rows: usize,
    /// Abandoned work
    pub failures: Vec<ExtractionFailure>,
}

impl WorkerReport {
    /// Create an empty report for a worker
    pub fn new(worker_id: usize) -> Self {
        Self {
            worker_id,
            ..Self::default()
        }
    }
}

/// Kind of abandoned work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    /// A connection could not be opened; every slot on that source was skipped
    Connection,
    /// A query failed; the rest of that slot was skipped
    Query,
    /// The worker task panicked or was cancelled
    Worker,
}

/// Abandoned work with context
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionFailure {
    /// Type of failure
    pub kind: FailureKind,

    /// Worker that hit the failure
    pub worker_id: usize,

    /// Slot being run, if any
    pub slot: Option<QuerySlot>,

    /// Error message
    pub message: String,
}

impl ExtractionFailure {
    /// Create a new failure
    pub fn new(kind: FailureKind, worker_id: usize, message: String) -> Self {
        Self {
            kind,
            worker_id,
            slot: None,
            message,
        }
    }

    /// Attach the slot that failed
    pub fn with_slot(mut self, slot: QuerySlot) -> Self {
        self.slot = Some(slot);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_creation() {
        let summary = ExtractionSummary::new(4);

        assert_eq!(summary.workers, 4);
        assert_eq!(summary.lines, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.is_successful());
    }

    #[test]
    fn test_summary_absorb() {
        let mut summary = ExtractionSummary::new(2);

        let mut report = WorkerReport::new(1);
        report.rows_fetched = 10;
        report.lines = 9;
        report.skipped_rows = 1;
        report.failures.push(
            ExtractionFailure::new(FailureKind::Query, 1, "timeout".to_string())
                .with_slot(QuerySlot::Org),
        );

        summary.absorb(report);
        summary.absorb(WorkerReport::new(0));

        assert_eq!(summary.rows_fetched, 10);
        assert_eq!(summary.lines, 9);
        assert_eq!(summary.skipped_rows, 1);
        assert!(!summary.is_successful());
        assert_eq!(summary.failures[0].slot, Some(QuerySlot::Org));
    }

    #[test]
    fn test_summary_serializes_millis() {
        let summary = ExtractionSummary::new(1).with_duration(Duration::from_millis(1500));
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["duration_ms"], 1500);
        assert_eq!(json["workers"], 1);
    }

    #[test]
    fn test_failure_serializes() {
        let failure = ExtractionFailure::new(FailureKind::Connection, 3, "refused".to_string())
            .with_slot(QuerySlot::CardOwnPers);
        let json = serde_json::to_value(&failure).unwrap();

        assert_eq!(json["kind"], "connection");
        assert_eq!(json["slot"], "card_own_pers");
        assert_eq!(json["worker_id"], 3);
    }
}
