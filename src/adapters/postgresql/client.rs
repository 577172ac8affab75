//! PostgreSQL client implementation
//!
//! One pooled client per data source. Pools are created lazily by deadpool, so
//! building a client never touches the network.

use crate::adapters::database::traits::DataSource;
use crate::config::schema::DataSourceConfig;
use crate::config::secret::redact_connection_string;
use crate::domain::{Result, SourceError, ZoeError};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::NoTls;

/// Pooled PostgreSQL client for one data source
pub struct PostgresSourceClient {
    /// Connection pool
    pool: Pool,

    /// Which source this pool serves
    source: DataSource,

    /// Statement timeout applied to every checked-out connection (0 = none)
    statement_timeout_seconds: u64,

    /// Connection string with credentials removed
    safe_connection_string: String,
}

impl PostgresSourceClient {
    /// Create a new PostgreSQL client
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed, the TLS
    /// connector cannot be built or the pool cannot be created.
    pub fn new(source: DataSource, config: &DataSourceConfig) -> Result<Self> {
        let conn_str = config.connection_string.expose_secret();
        let mut pg_config: tokio_postgres::Config = conn_str.parse().map_err(|e| {
            ZoeError::Configuration(format!(
                "Invalid {source} connection string: {e}"
            ))
        })?;

        let ssl_mode = parse_ssl_mode(&config.ssl_mode)?;
        pg_config.ssl_mode(ssl_mode);
        pg_config.connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if ssl_mode == SslMode::Disable {
            Manager::from_config(pg_config, NoTls, manager_config)
        } else {
            let connector = native_tls::TlsConnector::builder().build().map_err(|e| {
                ZoeError::Configuration(format!("Failed to build TLS connector: {e}"))
            })?;
            Manager::from_config(pg_config, MakeTlsConnector::new(connector), manager_config)
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| SourceError::Pool(format!("Failed to create {source} pool: {e}")))?;

        Ok(Self {
            pool,
            source,
            statement_timeout_seconds: config.statement_timeout_seconds,
            safe_connection_string: redact_connection_string(conn_str.as_ref()),
        })
    }

    /// Get a connection from the pool with the statement timeout applied
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::ConnectionFailed`] if no connection can be obtained
    /// or the session cannot be configured.
    pub async fn get_connection(&self) -> Result<Object> {
        let client = self.pool.get().await.map_err(|e| SourceError::ConnectionFailed {
            source_name: self.source.to_string(),
            message: e.to_string(),
        })?;

        if self.statement_timeout_seconds > 0 {
            let timeout_query = format!(
                "SET statement_timeout = {}",
                self.statement_timeout_seconds * 1000
            );
            client
                .batch_execute(&timeout_query)
                .await
                .map_err(|e| SourceError::ConnectionFailed {
                    source_name: self.source.to_string(),
                    message: format!("Failed to set statement timeout: {e}"),
                })?;
        }

        Ok(client)
    }

    /// Which source this client serves
    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Get the connection string (without password)
    pub fn connection_string_safe(&self) -> &str {
        &self.safe_connection_string
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

fn parse_ssl_mode(mode: &str) -> Result<SslMode> {
    match mode {
        "disable" => Ok(SslMode::Disable),
        "prefer" => Ok(SslMode::Prefer),
        "require" => Ok(SslMode::Require),
        other => Err(ZoeError::Configuration(format!(
            "Unsupported ssl_mode '{other}'"
        ))),
    }
}
