//! Security group rule cache client.
//!
//! Propagates per-port security group rules to Redis so that an enforcement
//! agent on the hypervisor can read them without querying the control plane:
//!
//! - [`rule_key`]: derives the cache key for a (device, MAC) pair
//! - [`serialize_groups`]: builds the enforcement-ready rule document
//! - [`SecurityGroupClient`]: writes documents, containing backend failures
//! - [`RuleStore`]: backend seam, implemented for Redis by [`RedisRuleStore`]
//!
//! # Architecture
//!
//! ```text
//! control plane                   secgroup-redis                     Redis
//! ─────────────                   ──────────────                     ─────
//! port create/update ──▶ apply_rules(device, mac, groups)
//!                          ├─ rule_key ──────────▶ "<device>.<mac>"
//!                          ├─ serialize_groups ──▶ {"id", "rules": [...]}
//!                          └─ RuleStore::set ─────────────────────▶ SET key doc
//! ```
//!
//! # Example
//!
//! ```ignore
//! use secgroup_redis::{RedisConfig, SecurityGroupClient};
//!
//! let client = SecurityGroupClient::connect(&RedisConfig::default()).await?;
//! client.apply_rules(&device_id, mac.to_u64(), &groups).await;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod key;
pub mod serializer;
pub mod store;

pub use client::{SecurityGroupClient, WriteOutcome};
pub use config::{RedisConfig, SecgroupConfig, DEFAULT_CONFIG_PATH};
pub use error::{Result, SecurityGroupError, StoreError, StoreResult};
pub use key::rule_key;
pub use serializer::{serialize_groups, RuleAction, SerializedPayload, SerializedRule};
pub use store::{RedisRuleStore, RuleStore};
