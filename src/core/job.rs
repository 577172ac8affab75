//! Report job orchestration
//!
//! A job resolves the report mode, then either extracts and writes a NEW
//! report or reconciles two snapshot files into a DELTA report.

use crate::adapters::database::{create_source_connector, SourceConnector};
use crate::config::ZoeConfig;
use crate::core::extract::summary::serialize_millis;
use crate::core::extract::{
    load_customer_index, ExtractionCoordinator, ExtractionSettings, ExtractionSummary,
};
use crate::core::query::QueryPlan;
use crate::core::reconcile::reconcile;
use crate::core::report::{LineFormat, ReportStats, ReportWriter};
use crate::core::snapshot::SnapshotIndex;
use crate::domain::{ReportMode, Result, ZoeError};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Outcome of one job run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Unique id of this run
    pub run_id: Uuid,

    /// Mode the report was written in
    pub mode: ReportMode,

    /// What was written
    pub report: ReportStats,

    /// Keys present in both snapshots with identical content (DELTA only)
    pub unchanged: usize,

    /// Extraction results (NEW only)
    pub extraction: Option<ExtractionSummary>,

    /// Wall time of the run
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl RunSummary {
    /// Whether every piece of extraction work completed
    pub fn is_successful(&self) -> bool {
        self.extraction
            .as_ref()
            .map_or(true, ExtractionSummary::is_successful)
    }

    /// Log the run summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            mode = %self.mode,
            path = %self.report.path.display(),
            body_lines = self.report.body_lines,
            record_count = self.report.record_count,
            added = self.report.added,
            changed = self.report.changed,
            unchanged = self.unchanged,
            duration_ms = self.duration.as_millis() as u64,
            "Report job completed"
        );
    }
}

/// Resolves the report mode
///
/// The command-line value wins over the configured one. Missing or unknown
/// values fail with [`ZoeError::InvalidMode`].
pub fn resolve_mode(cli: Option<&str>, configured: Option<&str>) -> Result<ReportMode> {
    match cli.or(configured) {
        Some(value) => ReportMode::from_str(value),
        None => Err(ZoeError::InvalidMode(String::new())),
    }
}

/// Runs one report
pub struct ReportJob {
    config: ZoeConfig,
    connector: Option<Arc<dyn SourceConnector>>,
}

impl ReportJob {
    /// Creates a job that connects to the configured data sources on demand
    pub fn new(config: ZoeConfig) -> Self {
        Self {
            config,
            connector: None,
        }
    }

    /// Creates a job that extracts through `connector`
    pub fn with_connector(config: ZoeConfig, connector: Arc<dyn SourceConnector>) -> Self {
        Self {
            config,
            connector: Some(connector),
        }
    }

    /// Configuration of this job
    pub fn config(&self) -> &ZoeConfig {
        &self.config
    }

    /// Executes the job in `mode`
    ///
    /// # Errors
    ///
    /// Returns an error if DELTA snapshot paths are missing, the data sources
    /// cannot be set up, or the report file cannot be written. Extraction
    /// failures are reported in the summary instead.
    pub async fn execute(&self, mode: ReportMode) -> Result<RunSummary> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let format = LineFormat::new(mode, self.config.job.test);
        let writer = ReportWriter::new(self.config.job.output_file(), format);

        tracing::info!(
            run_id = %run_id,
            mode = %mode,
            test = self.config.job.test,
            output = %writer.path().display(),
            "Starting report job"
        );

        let (report, unchanged, extraction) = match mode {
            ReportMode::New => {
                let (report, extraction) = self.run_new(&writer).await?;
                (report, 0, Some(extraction))
            }
            ReportMode::Delta => {
                let (report, unchanged) = self.run_delta(&writer)?;
                (report, unchanged, None)
            }
        };

        let summary = RunSummary {
            run_id,
            mode,
            report,
            unchanged,
            extraction,
            duration: start.elapsed(),
        };
        summary.log_summary();
        Ok(summary)
    }

    async fn run_new(&self, writer: &ReportWriter) -> Result<(ReportStats, ExtractionSummary)> {
        let connector = match &self.connector {
            Some(connector) => Arc::clone(connector),
            None => create_source_connector(&self.config)?,
        };

        let plan = QueryPlan::from_config(&self.config.queries);
        let customers = load_customer_index(connector.as_ref(), plan.customer_sql()).await;

        let job = &self.config.job;
        let settings = ExtractionSettings {
            max_threads: job.max_threads,
            fetch_batch_size: job.fetch_batch_size,
            home_country: job.home_country.clone(),
            connect_stagger: Duration::from_millis(job.connect_stagger_ms),
        };

        let output = ExtractionCoordinator::new(connector, plan, customers, settings)
            .run()
            .await;
        output.summary.log_summary();

        let report = writer.write_new(&output.lines)?;
        Ok((report, output.summary))
    }

    fn run_delta(&self, writer: &ReportWriter) -> Result<(ReportStats, usize)> {
        let (old_path, new_path) = self
            .config
            .job
            .snapshot_paths()
            .map_err(ZoeError::Configuration)?;

        let previous = SnapshotIndex::load(&old_path);
        let current = SnapshotIndex::load(&new_path);
        let reconciliation = reconcile(&previous, &current);

        let report = writer.write_delta(&reconciliation, current.account_hash())?;
        Ok((report, reconciliation.counts.unchanged))
    }
}
