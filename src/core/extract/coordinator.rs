//! Parallel extraction coordinator
//!
//! Fork-join over `max_threads` tokio tasks. Every worker runs the whole query
//! plan against its own partition of the primary source, normalizes each row
//! and sends the line down a shared channel. The coordinator waits for every
//! worker before draining the channel.

use crate::adapters::database::{DataSource, Partition, SourceConnection, SourceConnector};
use crate::core::extract::summary::{
    ExtractionFailure, ExtractionSummary, FailureKind, WorkerReport,
};
use crate::core::normalize::Normalizer;
use crate::core::query::{PlannedQuery, QueryPlan};
use crate::domain::{CustomerIndex, RawRecord};
use crate::{log_query_complete, log_query_start};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};

/// Worker pool settings
#[derive(Debug, Clone)]
pub struct ExtractionSettings {
    /// Number of workers
    pub max_threads: usize,
    /// Rows per page fetch
    pub fetch_batch_size: usize,
    /// Preferred identity document country
    pub home_country: String,
    /// Delay before worker `n` starts, multiplied by `n`
    pub connect_stagger: Duration,
}

/// Lines gathered by every worker plus what happened
#[derive(Debug)]
pub struct ExtractionOutput {
    /// Detail lines in arrival order
    pub lines: Vec<String>,
    /// Extraction summary
    pub summary: ExtractionSummary,
}

/// Runs the query plan across the worker pool
pub struct ExtractionCoordinator {
    connector: Arc<dyn SourceConnector>,
    plan: Arc<QueryPlan>,
    customers: Arc<CustomerIndex>,
    settings: ExtractionSettings,
}

#[derive(Clone)]
struct WorkerContext {
    connector: Arc<dyn SourceConnector>,
    plan: Arc<QueryPlan>,
    customers: Arc<CustomerIndex>,
    settings: Arc<ExtractionSettings>,
}

impl ExtractionCoordinator {
    /// Create a new coordinator
    pub fn new(
        connector: Arc<dyn SourceConnector>,
        plan: QueryPlan,
        customers: CustomerIndex,
        settings: ExtractionSettings,
    ) -> Self {
        Self {
            connector,
            plan: Arc::new(plan),
            customers: Arc::new(customers),
            settings,
        }
    }

    /// Dispatches every worker and waits for all of them
    ///
    /// Never fails as a whole: connection, query and worker failures are
    /// recorded in the summary and the remaining work carries on.
    pub async fn run(&self) -> ExtractionOutput {
        let start = Instant::now();
        let workers = self.settings.max_threads.max(1);

        tracing::info!(
            workers,
            slots = self.plan.queries().len(),
            customer_overrides = self.customers.len(),
            "Dispatching extraction workers"
        );

        let ctx = WorkerContext {
            connector: Arc::clone(&self.connector),
            plan: Arc::clone(&self.plan),
            customers: Arc::clone(&self.customers),
            settings: Arc::new(self.settings.clone()),
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let handles: Vec<_> = (0..workers)
            .map(|worker_id| tokio::spawn(run_worker(ctx.clone(), worker_id, workers, tx.clone())))
            .collect();
        drop(tx);

        let results = join_all(handles).await;

        let mut summary = ExtractionSummary::new(workers);
        summary.customer_overrides = self.customers.len();

        for (worker_id, result) in results.into_iter().enumerate() {
            match result {
                Ok(report) => summary.absorb(report),
                Err(e) => {
                    tracing::error!(worker_id, error = %e, "Extraction worker terminated abnormally");
                    summary.add_failure(ExtractionFailure::new(
                        FailureKind::Worker,
                        worker_id,
                        e.to_string(),
                    ));
                }
            }
        }

        // Every sender is gone once the workers are joined
        let mut lines = Vec::new();
        while let Some(line) = rx.recv().await {
            lines.push(line);
        }
        summary.lines = lines.len();

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();

        ExtractionOutput { lines, summary }
    }
}

async fn run_worker(
    ctx: WorkerContext,
    worker_id: usize,
    workers: usize,
    tx: UnboundedSender<String>,
) -> WorkerReport {
    let mut report = WorkerReport::new(worker_id);

    if !ctx.settings.connect_stagger.is_zero() && worker_id > 0 {
        tokio::time::sleep(ctx.settings.connect_stagger * worker_id as u32).await;
    }
    tracing::debug!(worker_id, "Worker started");

    let normalizer = Normalizer::new(&ctx.customers, &ctx.settings.home_country);
    let mut connections: HashMap<DataSource, Box<dyn SourceConnection>> = HashMap::new();
    let mut unavailable: HashSet<DataSource> = HashSet::new();

    for planned in ctx.plan.queries() {
        // Unpartitioned slots would return the same rows on every worker
        if !planned.slot.is_partitioned() && worker_id != 0 {
            continue;
        }

        let source = planned.slot.source();
        if unavailable.contains(&source) {
            tracing::debug!(worker_id, slot = %planned.slot, "Skipping slot, source unavailable");
            continue;
        }

        if !connections.contains_key(&source) {
            match ctx.connector.connect(source).await {
                Ok(conn) => {
                    connections.insert(source, conn);
                }
                Err(e) => {
                    tracing::error!(
                        worker_id,
                        source = %source,
                        slot = %planned.slot,
                        error = %e,
                        "Failed to open connection"
                    );
                    report.failures.push(
                        ExtractionFailure::new(FailureKind::Connection, worker_id, e.to_string())
                            .with_slot(planned.slot),
                    );
                    unavailable.insert(source);
                    continue;
                }
            }
        }

        let Some(conn) = connections.get_mut(&source) else {
            continue;
        };

        let partition = planned
            .slot
            .is_partitioned()
            .then(|| Partition::new(workers, worker_id));

        run_slot(
            conn.as_mut(),
            planned,
            partition,
            &normalizer,
            ctx.settings.fetch_batch_size,
            &tx,
            &mut report,
        )
        .await;
    }

    // Connections go back to their pools here
    drop(connections);
    tracing::debug!(worker_id, lines = report.lines, "Worker finished");
    report
}

async fn run_slot(
    conn: &mut dyn SourceConnection,
    planned: &PlannedQuery,
    partition: Option<Partition>,
    normalizer: &Normalizer<'_>,
    page_size: usize,
    tx: &UnboundedSender<String>,
    report: &mut WorkerReport,
) {
    let worker_id = report.worker_id;
    let is_organization = planned.slot.is_organization();
    let started = Instant::now();
    let mut lines = 0usize;
    let mut skipped = 0usize;

    log_query_start!(planned.slot, worker_id);

    let mut on_page = |page: Vec<RawRecord>| {
        for row in &page {
            match normalizer.normalize(row, is_organization) {
                Some(record) => {
                    // The receiver outlives every worker
                    let _ = tx.send(record.to_line());
                    lines += 1;
                }
                None => skipped += 1,
            }
        }
    };

    let result = conn
        .stream_query(&planned.sql, partition, page_size, &mut on_page)
        .await;

    report.lines += lines;
    report.skipped_rows += skipped;

    match result {
        Ok(rows) => {
            report.rows_fetched += rows;
            log_query_complete!(planned.slot, worker_id, rows, started.elapsed());
        }
        Err(e) => {
            report.rows_fetched += lines + skipped;
            tracing::error!(
                worker_id,
                slot = %planned.slot,
                lines_kept = lines,
                error = %e,
                "Query failed, abandoning slot"
            );
            report.failures.push(
                ExtractionFailure::new(FailureKind::Query, worker_id, e.to_string())
                    .with_slot(planned.slot),
            );
        }
    }
}
