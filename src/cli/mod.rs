//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for ZOE using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// ZOE - Account reporting file generator
#[derive(Parser, Debug)]
#[command(name = "zoe")]
#[command(version, about, long_about = None)]
#[command(author = "ZOE Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "zoe.toml", env = "ZOE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ZOE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a NEW or DELTA report file
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
