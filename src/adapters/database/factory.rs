//! Data source connector factory

use crate::adapters::database::traits::SourceConnector;
use crate::adapters::postgresql::PostgresConnector;
use crate::config::schema::ZoeConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the connector for the configured data sources
///
/// Both sources speak the PostgreSQL protocol, so this always builds a
/// [`PostgresConnector`]. Callers only see the trait object, which lets tests
/// substitute an in-memory connector.
///
/// # Errors
///
/// Returns an error if a connection pool cannot be created
pub fn create_source_connector(config: &ZoeConfig) -> Result<Arc<dyn SourceConnector>> {
    tracing::info!("Creating PostgreSQL source connector");
    let connector = PostgresConnector::new(config)?;
    Ok(Arc::new(connector) as Arc<dyn SourceConnector>)
}
