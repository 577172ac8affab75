//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the ZOE configuration file.

use crate::config::{load_config, redact_connection_string, DataSourceConfig};
use crate::domain::ReportMode;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates, so a loaded file is a valid one.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        match config.job.mode.as_deref() {
            Some(mode) if mode.parse::<ReportMode>().is_err() => {
                println!("  Mode: {mode} (not NEW or DELTA, --mode required)")
            }
            Some(mode) => println!("  Mode: {mode}"),
            None => println!("  Mode: (from --mode)"),
        }
        println!("  Test File: {}", config.job.test);
        println!("  Workers: {}", config.job.max_threads);
        println!("  Fetch Batch Size: {}", config.job.fetch_batch_size);
        println!("  Home Country: {}", config.job.home_country);
        println!("  Output File: {}", config.job.output_file().display());
        print_source("Primary", &config.primary);
        print_source("Secondary", &config.secondary);
        println!();
        Ok(0)
    }
}

fn print_source(label: &str, source: &DataSourceConfig) {
    println!(
        "  {label} Source: {} (max {} connections, ssl {})",
        redact_connection_string(source.connection_string.expose_secret().as_ref()),
        source.max_connections,
        source.ssl_mode
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}
            .execute("does-not-exist.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
