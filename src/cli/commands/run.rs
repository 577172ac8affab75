//! Run command implementation
//!
//! This module implements the `run` command, which writes a NEW or DELTA
//! report file.

use crate::config::{load_config, ZoeConfig};
use crate::core::job::{resolve_mode, ReportJob, RunSummary};
use crate::domain::ZoeError;
use crate::log_error_with_context;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Report mode (new or delta), overrides job.mode
    #[arg(long)]
    pub mode: Option<String>,

    /// Mark the report as a test file
    #[arg(long)]
    pub test: bool,

    /// Override the number of extraction workers
    #[arg(long)]
    pub max_threads: Option<usize>,

    /// Override the report file path
    #[arg(long)]
    pub output_file: Option<PathBuf>,

    /// Previous snapshot file (DELTA)
    #[arg(long)]
    pub old_snapshot: Option<PathBuf>,

    /// Current snapshot file (DELTA)
    #[arg(long)]
    pub new_snapshot: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting run command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let mode = match resolve_mode(self.mode.as_deref(), config.job.mode.as_deref()) {
            Ok(mode) => mode,
            Err(e) => {
                tracing::error!(error = %e, "Invalid report mode");
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let summary = match ReportJob::new(config).execute(mode).await {
            Ok(s) => s,
            Err(e @ ZoeError::Configuration(_)) => {
                tracing::error!(error = %e, "Report job misconfigured");
                eprintln!("{e}");
                return Ok(2);
            }
            Err(e) => {
                log_error_with_context!(&e, "Report job failed");
                eprintln!("Report job failed: {e}");
                return Ok(5);
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&summary);
        }

        if summary.is_successful() {
            Ok(0)
        } else {
            Ok(1)
        }
    }

    fn apply_overrides(&self, config: &mut ZoeConfig) {
        if self.test {
            tracing::info!("Marking report as test file from CLI");
            config.job.test = true;
        }

        if let Some(threads) = self.max_threads {
            tracing::info!(max_threads = threads, "Overriding worker count from CLI");
            config.job.max_threads = threads;
        }

        if let Some(path) = &self.output_file {
            tracing::info!(output_file = %path.display(), "Overriding output file from CLI");
            config.job.output_file_path = path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default();
            config.job.output_file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
        }

        if let Some(path) = &self.old_snapshot {
            config.job.old_snapshot = Some(path.clone());
        }

        if let Some(path) = &self.new_snapshot {
            config.job.new_snapshot = Some(path.clone());
        }
    }
}

fn print_summary(summary: &RunSummary) {
    let report = &summary.report;

    println!();
    println!("📊 {} Report Summary:", summary.mode);
    println!("  Run ID: {}", summary.run_id);
    println!("  Output: {}", report.path.display());
    println!("  Detail Lines: {}", report.body_lines);
    println!("  Record Count: {}", report.record_count);
    println!("  Added: {}", report.added);
    println!("  Changed: {}", report.changed);
    println!("  Unchanged: {}", summary.unchanged);
    println!("  Account Hash: {}", report.account_hash);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if let Some(extraction) = &summary.extraction {
        println!("  Rows Fetched: {}", extraction.rows_fetched);
        println!("  Skipped Rows: {}", extraction.skipped_rows);
        println!("  Customer Overrides: {}", extraction.customer_overrides);
        println!();

        if !extraction.failures.is_empty() {
            println!("⚠️  Extraction failures:");
            for failure in &extraction.failures {
                println!(
                    "  - {:?} (worker {}, slot {}): {}",
                    failure.kind,
                    failure.worker_id,
                    failure.slot.map(|s| s.name()).unwrap_or("-"),
                    failure.message
                );
            }
            println!();
        }
    }

    if summary.is_successful() {
        println!("✅ Report completed successfully!");
    } else {
        println!("⚠️  Report completed with extraction failures");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    const CONFIG: &str = r#"
[job]
output_file_path = "/data/out"
output_file_name = "zoe.txt"

[primary]
connection_string = "postgresql://u:p@localhost/dna"

[secondary]
connection_string = "postgresql://u:p@localhost/p2p"

[queries]
sql_qq = "WITH qq AS (SELECT 1)"
card_tax_rpt_for_pers = "SELECT 1"
card_own_pers = "SELECT 2"
no_card_tax_rpt_for_pers = "SELECT 3"
no_card_own_pers = "SELECT 4"
card_own_pers_org = "SELECT 5"
org = "SELECT 6"
p2p_cust_org = "SELECT 7"
"#;

    fn args() -> RunArgs {
        RunArgs {
            mode: None,
            test: false,
            max_threads: None,
            output_file: None,
            old_snapshot: None,
            new_snapshot: None,
            json: false,
        }
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = parse_config(CONFIG).unwrap();
        args().apply_overrides(&mut config);

        assert!(!config.job.test);
        assert_eq!(config.job.output_file(), PathBuf::from("/data/out/zoe.txt"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = parse_config(CONFIG).unwrap();
        let args = RunArgs {
            test: true,
            max_threads: Some(2),
            output_file: Some(PathBuf::from("/tmp/reports/delta.txt")),
            old_snapshot: Some(PathBuf::from("old.txt")),
            new_snapshot: Some(PathBuf::from("new.txt")),
            ..args()
        };
        args.apply_overrides(&mut config);

        assert!(config.job.test);
        assert_eq!(config.job.max_threads, 2);
        assert_eq!(config.job.output_file(), PathBuf::from("/tmp/reports/delta.txt"));
        assert_eq!(
            config.job.snapshot_paths().unwrap(),
            (PathBuf::from("old.txt"), PathBuf::from("new.txt"))
        );
    }
}
