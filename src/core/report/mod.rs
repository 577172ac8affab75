//! Report file assembly
//!
//! - [`layout`] - Constant line, record prefixes and line cleaning
//! - [`trailer`] - Trailer pairs and their mandatory inputs
//! - [`writer`] - NEW and DELTA file writers

pub mod layout;
pub mod trailer;
pub mod writer;

pub use layout::{code_line, LineFormat};
pub use trailer::TrailerInputs;
pub use writer::{prior_file_time, ReportStats, ReportWriter};
