//! Parallel extraction
//!
//! - [`customers`] - Customer override lookup, loaded once before dispatch
//! - [`coordinator`] - Worker pool running the query plan
//! - [`summary`] - Per-run and per-worker reporting

pub mod coordinator;
pub mod customers;
pub mod summary;

pub use coordinator::{ExtractionCoordinator, ExtractionOutput, ExtractionSettings};
pub use customers::load_customer_index;
pub use summary::{ExtractionFailure, ExtractionSummary, FailureKind, WorkerReport};
