//! Domain models and types for ZOE.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Raw rows** ([`RawRecord`], [`FieldValue`], [`ResultSet`]) as returned by the data sources
//! - **Customer overrides** ([`CustomerIndex`], [`CustomerOverride`]) from the secondary source
//! - **Strongly-typed identifiers** ([`PersonNbr`], [`SnapshotKey`])
//! - **Report modes** ([`ReportMode`])
//! - **Error types** ([`ZoeError`], [`SourceError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ZoeError>`]:
//!
//! ```rust
//! use zoe::domain::{ReportMode, Result};
//! use std::str::FromStr;
//!
//! fn example() -> Result<()> {
//!     let mode = ReportMode::from_str("delta")?;
//!     assert_eq!(mode.file_type(), "UPDT");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod customer;
pub mod errors;
pub mod ids;
pub mod mode;
pub mod record;
pub mod result;

pub use customer::{CustomerIndex, CustomerOverride};
pub use errors::{SourceError, ZoeError};
pub use ids::{PersonNbr, SnapshotKey};
pub use mode::ReportMode;
pub use record::{FieldValue, RawRecord, ResultSet};
pub use result::Result;
