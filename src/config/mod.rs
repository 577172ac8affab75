//! Configuration management for ZOE.
//!
//! # Overview
//!
//! ZOE reads one TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ZOE_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`JobConfig`] - Mode, worker count, home country, output and snapshot files
//! - [`DataSourceConfig`] - `[primary]` and `[secondary]` connections
//! - [`QueriesConfig`] - Named SQL templates
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [job]
//! max_threads = 8
//! output_file_path = "/data/out"
//! output_file_name = "zoe_report.txt"
//!
//! [primary]
//! connection_string = "${ZOE_DNA_DSN}"
//!
//! [secondary]
//! connection_string = "${ZOE_P2P_DSN}"
//!
//! [queries]
//! sql_qq = "WITH qq AS (...)"
//! card_tax_rpt_for_pers = "SELECT ... WHERE MOD(persnbr, :max_thread) = :thread_id"
//! # ...
//! ```
//!
//! ```rust,no_run
//! use zoe::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("zoe.toml")?;
//! println!("Workers: {}", config.job.max_threads);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, DataSourceConfig, JobConfig, LoggingConfig, QueriesConfig, ZoeConfig,
};
pub use secret::{redact_connection_string, secret_string, SecretString, SecretValue};
