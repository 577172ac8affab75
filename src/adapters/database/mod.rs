//! Data source abstraction layer
//!
//! This module provides a trait-based abstraction over the databases ZOE reads
//! from, so the extraction pipeline never depends on a driver directly.

pub mod factory;
pub mod traits;

pub use factory::create_source_connector;
pub use traits::{DataSource, PageSink, Partition, SourceConnection, SourceConnector};
