//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with thread ids
//! - JSON-formatted file logs with daily or hourly rotation
//! - Configurable log levels (`RUST_LOG` overrides the configured level)
//!
//! # Example
//!
//! ```no_run
//! use zoe::logging::init_logging;
//! use zoe::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(slot = "org", worker_id = 0, "Extraction started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a query slot on a worker
///
/// # Example
///
/// ```no_run
/// use zoe::log_query_start;
///
/// log_query_start!("card_own_pers", 3);
/// ```
#[macro_export]
macro_rules! log_query_start {
    ($slot:expr, $worker_id:expr) => {
        tracing::debug!(
            slot = %$slot,
            worker_id = $worker_id,
            "Starting query"
        );
    };
}

/// Log the completion of a query slot on a worker
///
/// # Example
///
/// ```no_run
/// use zoe::log_query_complete;
/// use std::time::Duration;
///
/// log_query_complete!("org", 0, 1250, Duration::from_secs(4));
/// ```
#[macro_export]
macro_rules! log_query_complete {
    ($slot:expr, $worker_id:expr, $rows:expr, $duration:expr) => {
        tracing::info!(
            slot = %$slot,
            worker_id = $worker_id,
            rows = $rows,
            duration_ms = $duration.as_millis() as u64,
            "Query completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use zoe::log_error_with_context;
/// use zoe::domain::ZoeError;
///
/// let error = ZoeError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
