//! Rule store backends.
//!
//! [`RuleStore`] is the seam between the client and the key-value backend.
//! [`RedisRuleStore`] is the production implementation; tests substitute
//! in-memory or failing stores.

use crate::config::RedisConfig;
use crate::error::StoreResult;
use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tracing::{debug, info, instrument};

/// Key-value backend holding one rule document per key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous document.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Reads the document stored under `key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Removes the document stored under `key`. Missing keys are not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;
}

/// Redis-backed rule store.
///
/// Holds a multiplexed connection manager that reconnects on its own after a
/// dropped connection. Each operation works on a clone of the manager, so the
/// store can be shared across tasks.
#[derive(Clone)]
pub struct RedisRuleStore {
    connection: ConnectionManager,
}

impl RedisRuleStore {
    /// Connects to the Redis server described by `config`.
    ///
    /// Fails if the server cannot be reached within the configured connection
    /// timeout and retry budget.
    #[instrument(skip_all, fields(host = %config.host, port = config.port, db = config.db))]
    pub async fn connect(config: &RedisConfig) -> StoreResult<Self> {
        debug!("Connecting to rule cache");

        let client = Client::open(config.connection_info())?;
        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(config.connection_timeout())
            .set_response_timeout(config.response_timeout())
            .set_number_of_retries(config.connection_retries);

        let connection = ConnectionManager::new_with_config(client, manager_config).await?;

        info!(
            "Connected to rule cache: {}:{} (db={})",
            config.host, config.port, config.db
        );
        Ok(Self { connection })
    }
}

#[async_trait]
impl RuleStore for RedisRuleStore {
    #[instrument(skip(self, value), fields(len = value.len()))]
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.set(key, value).await?;
        debug!("SET rule document");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await?;
        debug!(found = value.is_some(), "GET rule document");
        Ok(value)
    }

    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> StoreResult<()> {
        let mut conn = self.connection.clone();
        let removed: i64 = conn.del(key).await?;
        debug!(removed, "DEL rule document");
        Ok(())
    }
}
