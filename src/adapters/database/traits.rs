//! Data source abstraction traits
//!
//! This module defines the traits that data source adapters must implement
//! to feed the extraction pipeline.

use crate::domain::{RawRecord, Result, ResultSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two databases a run reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Account system holding persons, cards and organizations
    Primary,
    /// Customer system holding overrides and P2P customers
    Secondary,
}

impl DataSource {
    /// Configuration section name of this source
    pub fn as_str(self) -> &'static str {
        match self {
            DataSource::Primary => "primary",
            DataSource::Secondary => "secondary",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Worker partition bound to the `:max_thread` and `:thread_id` parameters
///
/// Templates usually filter with `MOD(key, :max_thread) = :thread_id`, so the
/// partitions of one run cover every row exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    /// Total number of workers
    pub max_thread: i64,
    /// Zero-based id of this worker
    pub thread_id: i64,
}

impl Partition {
    /// Creates the partition of worker `thread_id` out of `max_thread`
    pub fn new(max_thread: usize, thread_id: usize) -> Self {
        Self {
            max_thread: max_thread as i64,
            thread_id: thread_id as i64,
        }
    }
}

/// Receives one page of rows at a time
pub type PageSink<'a> = &'a mut (dyn FnMut(Vec<RawRecord>) + Send);

/// Opens connections to the configured data sources
///
/// Implementations are shared by every extraction worker.
#[async_trait]
pub trait SourceConnector: Send + Sync {
    /// Opens a dedicated connection to `source`
    ///
    /// The connection is released when the returned value is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::SourceError::ConnectionFailed`] or
    /// [`crate::domain::SourceError::Pool`] if no connection can be obtained.
    async fn connect(&self, source: DataSource) -> Result<Box<dyn SourceConnection>>;
}

/// One open connection owned by a single worker
#[async_trait]
pub trait SourceConnection: Send {
    /// Runs `sql` and hands its rows to `on_page` in pages of at most `page_size`
    ///
    /// When `partition` is given, the named parameters `:max_thread` and
    /// `:thread_id` are bound from it.
    ///
    /// # Returns
    ///
    /// The total number of rows delivered.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement cannot be prepared or executed, or if a
    /// page fetch fails. Pages delivered before the failure stay delivered.
    async fn stream_query(
        &mut self,
        sql: &str,
        partition: Option<Partition>,
        page_size: usize,
        on_page: PageSink<'_>,
    ) -> Result<usize>;

    /// Runs an unparameterized statement and fetches every row with column names
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    async fn query_all(&mut self, sql: &str) -> Result<ResultSet>;
}
