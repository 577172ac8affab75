//! Customer override lookup loading

use crate::adapters::database::{DataSource, SourceConnector};
use crate::domain::CustomerIndex;

/// Loads the customer override lookup from the secondary source
///
/// Runs `sql` once without parameters. The primary source stays authoritative
/// for its own fields, so any failure is logged and yields an empty lookup.
pub async fn load_customer_index(connector: &dyn SourceConnector, sql: &str) -> CustomerIndex {
    let mut conn = match connector.connect(DataSource::Secondary).await {
        Ok(conn) => conn,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Secondary source unavailable, continuing without customer overrides"
            );
            return CustomerIndex::new();
        }
    };

    match conn.query_all(sql).await {
        Ok(set) => {
            let index = CustomerIndex::from_result_set(&set);
            tracing::info!(
                rows = set.rows().len(),
                overrides = index.len(),
                "Loaded customer overrides"
            );
            index
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Customer query failed, continuing without customer overrides"
            );
            CustomerIndex::new()
        }
    }
}
