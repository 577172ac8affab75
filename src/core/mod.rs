//! Core business logic for ZOE.
//!
//! # Modules
//!
//! - [`query`] - Query slots and the resolved query plan
//! - [`normalize`] - Raw row to detail record normalization
//! - [`extract`] - Parallel extraction across partitioned workers
//! - [`snapshot`] - Snapshot file index
//! - [`reconcile`] - Snapshot comparison
//! - [`report`] - Report file assembly
//! - [`job`] - Run orchestration
//!
//! # Workflow
//!
//! A NEW run loads the customer overrides, extracts and normalizes every
//! query slot, and writes each line as an added record. A DELTA run reads
//! two snapshot files, reconciles them and writes added and changed records.
//!
//! ```rust,no_run
//! use zoe::config::load_config;
//! use zoe::core::job::{resolve_mode, ReportJob};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("zoe.toml")?;
//! let mode = resolve_mode(Some("new"), config.job.mode.as_deref())?;
//!
//! let summary = ReportJob::new(config).execute(mode).await?;
//! println!("Wrote {} detail lines", summary.report.body_lines);
//! # Ok(())
//! # }
//! ```

pub mod extract;
pub mod job;
pub mod normalize;
pub mod query;
pub mod reconcile;
pub mod report;
pub mod snapshot;
