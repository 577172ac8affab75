// ZOE - Account reporting file generator
// Copyright (c) 2025 ZOE Contributors
// Licensed under the MIT License

//! # ZOE - Account reporting file generator
//!
//! ZOE extracts account holder records from two PostgreSQL-protocol data
//! sources and writes them as a pipe-delimited report file, either as a full
//! load (NEW) or as the difference between two earlier files (DELTA).
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Extraction, normalization, reconciliation and report assembly
//! - [`adapters`] - Data source integrations (PostgreSQL)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use zoe::config::load_config;
//! use zoe::core::job::ReportJob;
//! use zoe::domain::ReportMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("zoe.toml")?;
//!     let summary = ReportJob::new(config).execute(ReportMode::New).await?;
//!
//!     println!("Wrote {} records", summary.report.record_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Report layout
//!
//! Every file starts with a constant line of field codes and a `1` header,
//! carries one `6` detail line per record and ends with a `9` trailer holding
//! the record count, the account hash and the added/changed totals.
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`]. Data source failures during
//! extraction are isolated per worker and reported in the run summary; only
//! configuration, mode, trailer and output errors abort a run.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
