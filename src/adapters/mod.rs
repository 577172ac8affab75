//! External system integrations for ZOE.
//!
//! - [`database`] - Data source abstraction (connector and connection traits)
//! - [`postgresql`] - PostgreSQL implementation with pooled connections
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with mock implementations. The extraction pipeline only talks
//! to [`database::SourceConnector`] and [`database::SourceConnection`].
//!
//! ```rust,no_run
//! use zoe::adapters::database::{create_source_connector, DataSource};
//! use zoe::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("zoe.toml")?;
//! let connector = create_source_connector(&config)?;
//! let mut conn = connector.connect(DataSource::Secondary).await?;
//! let customers = conn.query_all(&config.queries.p2p_cust_org).await?;
//! println!("{} customers", customers.rows().len());
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod postgresql;
