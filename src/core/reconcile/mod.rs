//! Snapshot reconciliation
//!
//! Compares the current snapshot with the previous one and classifies every
//! current key as added, changed or unchanged. Keys that disappeared are not
//! reported, so the deleted count is always zero.

use crate::core::snapshot::SnapshotIndex;
use crate::domain::SnapshotKey;
use serde::Serialize;
use std::fmt;

/// Action code of a delta line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DeltaAction {
    /// Key not present in the previous snapshot
    Added,
    /// Key present with different content
    Changed,
}

impl DeltaAction {
    /// Single-letter code written to the report
    pub fn code(self) -> &'static str {
        match self {
            DeltaAction::Added => "A",
            DeltaAction::Changed => "C",
        }
    }
}

impl fmt::Display for DeltaAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One emitted delta line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaEntry {
    /// 1-based, gapless
    pub sequence: usize,
    /// Snapshot key
    pub key: SnapshotKey,
    /// Current content
    pub content: String,
    /// Classification
    pub action: DeltaAction,
}

/// Running totals of a reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeltaCounts {
    /// Added keys
    pub added: usize,
    /// Changed keys
    pub changed: usize,
    /// Removed keys (never computed)
    pub deleted: usize,
    /// Keys present with identical content
    pub unchanged: usize,
}

impl DeltaCounts {
    /// Lines emitted
    pub fn emitted(&self) -> usize {
        self.added + self.changed
    }

    fn record(&mut self, action: DeltaAction) {
        match action {
            DeltaAction::Added => self.added += 1,
            DeltaAction::Changed => self.changed += 1,
        }
    }
}

/// Result of comparing two snapshots
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// Emitted lines in current-snapshot order
    pub entries: Vec<DeltaEntry>,
    /// Totals
    pub counts: DeltaCounts,
}

/// Classifies every key of `current` against `previous`
pub fn reconcile(previous: &SnapshotIndex, current: &SnapshotIndex) -> Reconciliation {
    let mut result = Reconciliation::default();

    for (key, content) in current.iter() {
        let action = match previous.get(key) {
            None => DeltaAction::Added,
            Some(old) if old != content => DeltaAction::Changed,
            Some(_) => {
                result.counts.unchanged += 1;
                continue;
            }
        };

        result.counts.record(action);
        result.entries.push(DeltaEntry {
            sequence: result.entries.len() + 1,
            key: key.clone(),
            content: content.to_string(),
            action,
        });
    }

    tracing::info!(
        added = result.counts.added,
        changed = result.counts.changed,
        unchanged = result.counts.unchanged,
        "Reconciled snapshots"
    );

    result
}
