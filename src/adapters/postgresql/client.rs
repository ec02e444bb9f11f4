//! PostgreSQL client with a lazily created connection pool
//!
//! The pool is built on first use and published through a
//! [`LazyConnection`], so concurrent first requests share a single
//! connection attempt and later requests never wait on a lock.

use super::models::CollectionStatements;
use crate::adapters::database::traits::StoreResult;
use crate::adapters::database::LazyConnection;
use crate::config::DatabaseConfig;
use crate::domain::StoreError;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use std::sync::Arc;
use tokio_postgres::NoTls;

/// Role used when no credentials are configured
const DEFAULT_USER: &str = "postgres";

/// PostgreSQL client for one collection table
pub struct PostgreSQLClient {
    config: DatabaseConfig,
    statements: CollectionStatements,
    pool: LazyConnection<Pool>,
}

impl PostgreSQLClient {
    /// Create a new client; no connection is made until the first operation
    pub fn new(config: DatabaseConfig) -> Self {
        let statements = CollectionStatements::new(&config.collection);
        Self {
            config,
            statements,
            pool: LazyConnection::new(),
        }
    }

    /// Statements for the configured collection
    pub fn statements(&self) -> &CollectionStatements {
        &self.statements
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Whether a pool is currently published
    pub fn is_connected(&self) -> bool {
        self.pool.is_connected()
    }

    /// Builds the tokio-postgres connection settings
    fn connection_config(&self) -> tokio_postgres::Config {
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&self.config.host)
            .port(self.config.port)
            .dbname(&self.config.database)
            .application_name(env!("CARGO_PKG_NAME"))
            .connect_timeout(self.config.timeout());

        match self.config.credentials() {
            Some((username, password)) => {
                pg_config.user(username).password(password);
            }
            None => {
                pg_config.user(DEFAULT_USER);
            }
        }

        pg_config
    }

    fn build_pool(&self) -> StoreResult<Pool> {
        let manager = Manager::from_config(
            self.connection_config(),
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Some(self.config.timeout());
        Pool::builder(manager)
            .max_size(self.config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| StoreError::backend("create connection pool", e))
    }

    /// Builds a pool, proves it can reach the server and creates the table
    async fn connect(&self) -> StoreResult<Pool> {
        tracing::info!(
            location = %self.config.display_location(),
            "Connecting to PostgreSQL"
        );

        let pool = self.build_pool()?;

        let ensure_table = async {
            let client = pool
                .get()
                .await
                .map_err(|e| StoreError::backend("connect", e))?;
            client
                .batch_execute(&self.statements.create_table)
                .await
                .map_err(|e| StoreError::backend("ensure collection table", e))
        };

        if let Err(e) = ensure_table.await {
            pool.close();
            tracing::error!(error = %e, "PostgreSQL connection failed");
            return Err(e);
        }

        tracing::info!(collection = %self.config.collection, "PostgreSQL connection established");
        Ok(pool)
    }

    /// The shared pool, connecting first if necessary
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the pool cannot be created or the
    /// server cannot be reached.
    pub async fn pool(&self) -> StoreResult<Arc<Pool>> {
        self.pool.get_or_connect(|| self.connect()).await
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if a connection cannot be obtained.
    pub async fn get_connection(&self) -> StoreResult<Object> {
        let pool = self.pool().await?;
        pool.get()
            .await
            .map_err(|e| StoreError::backend("get connection from pool", e))
    }

    /// Closes the pool if one is published; a no-op otherwise
    pub async fn disconnect(&self) {
        if let Some(pool) = self.pool.disconnect().await {
            pool.close();
            tracing::info!(collection = %self.config.collection, "PostgreSQL connection closed");
        }
    }

    /// Get the pool statistics, if connected
    pub fn pool_status(&self) -> Option<deadpool_postgres::Status> {
        self.pool.current().map(|pool| pool.status())
    }
}
