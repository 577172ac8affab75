//! PostgreSQL adapter implementing the data source traits

use crate::adapters::database::traits::{
    DataSource, PageSink, Partition, SourceConnection, SourceConnector,
};
use crate::adapters::postgresql::client::PostgresSourceClient;
use crate::adapters::postgresql::models::{bind_values, row_to_record, translate_named_params};
use crate::config::schema::ZoeConfig;
use crate::domain::{RawRecord, Result, ResultSet, SourceError};
use async_trait::async_trait;
use deadpool_postgres::Object;
use tokio_postgres::types::ToSql;

/// PostgreSQL implementation of [`SourceConnector`]
///
/// Holds one pool per data source.
pub struct PostgresConnector {
    primary: PostgresSourceClient,
    secondary: PostgresSourceClient,
}

impl PostgresConnector {
    /// Create a connector from the `[primary]` and `[secondary]` sections
    ///
    /// # Errors
    ///
    /// Returns an error if either pool cannot be created.
    pub fn new(config: &ZoeConfig) -> Result<Self> {
        let primary = PostgresSourceClient::new(DataSource::Primary, &config.primary)?;
        let secondary = PostgresSourceClient::new(DataSource::Secondary, &config.secondary)?;

        tracing::info!(
            primary = %primary.connection_string_safe(),
            secondary = %secondary.connection_string_safe(),
            "Created PostgreSQL connection pools"
        );

        Ok(Self { primary, secondary })
    }

    fn client(&self, source: DataSource) -> &PostgresSourceClient {
        match source {
            DataSource::Primary => &self.primary,
            DataSource::Secondary => &self.secondary,
        }
    }
}

#[async_trait]
impl SourceConnector for PostgresConnector {
    async fn connect(&self, source: DataSource) -> Result<Box<dyn SourceConnection>> {
        let client = self.client(source).get_connection().await?;
        tracing::debug!(source = %source, "Checked out connection");
        Ok(Box::new(PostgresConnection { client, source }))
    }
}

/// A pooled connection checked out by one worker
///
/// Dropping it returns the connection to its pool.
pub struct PostgresConnection {
    client: Object,
    source: DataSource,
}

#[async_trait]
impl SourceConnection for PostgresConnection {
    async fn stream_query(
        &mut self,
        sql: &str,
        partition: Option<Partition>,
        page_size: usize,
        on_page: PageSink<'_>,
    ) -> Result<usize> {
        let translated = translate_named_params(sql);
        let page_size = i32::try_from(page_size.max(1)).unwrap_or(i32::MAX);

        // Portals only live inside a transaction
        let tx = self
            .client
            .transaction()
            .await
            .map_err(|e| SourceError::QueryFailed(format!("Failed to begin transaction: {e}")))?;

        let stmt = tx
            .prepare(&translated.sql)
            .await
            .map_err(|e| SourceError::QueryFailed(e.to_string()))?;

        let values = bind_values(&translated.params, stmt.params(), partition)?;
        let refs: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();

        let portal = tx
            .bind(&stmt, &refs)
            .await
            .map_err(|e| SourceError::QueryFailed(e.to_string()))?;

        let mut total = 0usize;
        loop {
            let rows = tx
                .query_portal(&portal, page_size)
                .await
                .map_err(|e| SourceError::FetchFailed {
                    rows: total,
                    message: e.to_string(),
                })?;

            if rows.is_empty() {
                break;
            }

            let page = rows
                .iter()
                .map(row_to_record)
                .collect::<std::result::Result<Vec<RawRecord>, _>>()?;
            total += page.len();
            on_page(page);
        }

        tx.commit()
            .await
            .map_err(|e| SourceError::QueryFailed(format!("Failed to close transaction: {e}")))?;

        tracing::debug!(source = %self.source, rows = total, "Query stream finished");
        Ok(total)
    }

    async fn query_all(&mut self, sql: &str) -> Result<ResultSet> {
        let stmt = self
            .client
            .prepare(sql)
            .await
            .map_err(|e| SourceError::QueryFailed(e.to_string()))?;

        let columns = stmt
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>();

        let rows = self
            .client
            .query(&stmt, &[])
            .await
            .map_err(|e| SourceError::QueryFailed(e.to_string()))?;

        let records = rows
            .iter()
            .map(row_to_record)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(source = %self.source, rows = records.len(), "Fetched result set");
        Ok(ResultSet::new(columns, records))
    }
}
