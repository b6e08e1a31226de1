//! Redis test environment backed by testcontainers.

use redis::{AsyncCommands, Client};
use secgroup_redis::RedisConfig;
use testcontainers::{
    core::{ContainerPort, WaitFor},
    runners::AsyncRunner,
    GenericImage,
};

/// Redis test environment with containerized Redis instance
pub struct RedisTestEnv {
    _container: testcontainers::ContainerAsync<GenericImage>,
    pub client: Client,
    pub host: String,
    pub port: u16,
}

impl RedisTestEnv {
    /// Start a new Redis container for testing
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        let container = GenericImage::new("redis", "7-alpine")
            .with_exposed_port(ContainerPort::Tcp(6379))
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await?;

        let host = container.get_host().await?.to_string();
        let port = container.get_host_port_ipv4(6379).await?;

        let client = Client::open(format!("redis://{}:{}", host, port))?;

        Ok(Self {
            _container: container,
            client,
            host,
            port,
        })
    }

    /// Client configuration pointing at the container.
    pub fn config(&self) -> RedisConfig {
        RedisConfig::new(self.host.clone(), self.port)
    }

    /// Get a raw key value
    pub async fn get(&self, key: &str) -> Result<Option<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.get(key).await
    }

    /// Check if a key exists
    pub async fn exists(&self, key: &str) -> Result<bool, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.exists(key).await
    }
}
