//! Security group rule cache client.
//!
//! Pushing rules to the cache is a best-effort side effect of a control-plane
//! operation such as port creation. The rule set of record lives in the
//! relational store, so:
//!
//! - an unreachable cache at construction is an error
//!   ([`SecurityGroupError::CouldNotBeApplied`]), since no later write could
//!   succeed;
//! - a failed write is logged and contained, so the triggering operation
//!   still completes. The next triggering event overwrites the document.

use crate::config::RedisConfig;
use crate::error::{Result, SecurityGroupError};
use crate::key::rule_key;
use crate::serializer::{serialize_groups, SerializedPayload};
use crate::store::{RedisRuleStore, RuleStore};
use secgroup_types::SecurityGroup;
use tracing::{debug, error, instrument, warn};

/// Result of a best-effort cache write.
#[derive(Debug)]
#[must_use]
pub enum WriteOutcome {
    /// The backend accepted the write.
    Applied,
    /// The write did not reach the backend; the cache may be stale.
    Degraded(SecurityGroupError),
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }
}

/// Client writing per-interface rule documents to the rule cache.
pub struct SecurityGroupClient<S = RedisRuleStore> {
    store: S,
}

impl SecurityGroupClient<RedisRuleStore> {
    /// Connects to the Redis rule cache.
    ///
    /// # Errors
    ///
    /// Returns [`SecurityGroupError::CouldNotBeApplied`] if the cache cannot
    /// be reached.
    #[instrument(skip_all, fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &RedisConfig) -> Result<Self> {
        match RedisRuleStore::connect(config).await {
            Ok(store) => Ok(Self::with_store(store)),
            Err(e) => {
                error!(error = %e, "Rule cache unavailable, security groups cannot be applied");
                Err(SecurityGroupError::could_not_be_applied(e.to_string()))
            }
        }
    }
}

impl<S: RuleStore> SecurityGroupClient<S> {
    /// Creates a client over an already connected store.
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the cache key for a device interface.
    pub fn rule_key(&self, device_id: &str, mac_address: u64) -> String {
        rule_key(device_id, mac_address)
    }

    /// Builds the rule document for `groups` without writing it.
    pub fn serialize(&self, groups: &[SecurityGroup]) -> SerializedPayload {
        serialize_groups(groups)
    }

    /// Writes the rule document for a device interface.
    ///
    /// The caller resolves the port to its owning device. Backend failures
    /// are logged and never returned; see [`Self::write_rules`] for the
    /// outcome.
    pub async fn apply_rules(&self, device_id: &str, mac_address: u64, groups: &[SecurityGroup]) {
        if !self.write_rules(device_id, mac_address, groups).await.is_applied() {
            debug!(device_id, "Rule cache left stale until the next apply");
        }
    }

    /// Writes the rule document for a device interface and reports whether
    /// the backend accepted it.
    ///
    /// Issues exactly one backend write.
    #[instrument(skip(self, groups), fields(groups = groups.len()))]
    pub async fn write_rules(
        &self,
        device_id: &str,
        mac_address: u64,
        groups: &[SecurityGroup],
    ) -> WriteOutcome {
        let key = self.rule_key(device_id, mac_address);
        let payload = self.serialize(groups);

        let document = match serde_json::to_string(&payload) {
            Ok(document) => document,
            Err(e) => {
                error!(key, error = %e, "Failed to encode rule document");
                return WriteOutcome::Degraded(e.into());
            }
        };

        match self.store.set(&key, &document).await {
            Ok(()) => {
                debug!(key, rules = payload.rules.len(), "Applied security group rules");
                WriteOutcome::Applied
            }
            Err(e) => {
                log_degraded("apply", &key, &e);
                WriteOutcome::Degraded(e.into())
            }
        }
    }

    /// Removes the rule document for a device interface, e.g. when its port
    /// is deleted.
    ///
    /// Failures are contained the same way as writes.
    #[instrument(skip(self))]
    pub async fn delete_rules(&self, device_id: &str, mac_address: u64) -> WriteOutcome {
        let key = self.rule_key(device_id, mac_address);

        match self.store.delete(&key).await {
            Ok(()) => {
                debug!(key, "Removed security group rules");
                WriteOutcome::Applied
            }
            Err(e) => {
                log_degraded("delete", &key, &e);
                WriteOutcome::Degraded(e.into())
            }
        }
    }

    /// Reads back the rule document stored for a device interface.
    ///
    /// # Errors
    ///
    /// Returns backend errors and documents that do not decode.
    #[instrument(skip(self))]
    pub async fn get_rules(
        &self,
        device_id: &str,
        mac_address: u64,
    ) -> Result<Option<SerializedPayload>> {
        let key = self.rule_key(device_id, mac_address);

        match self.store.get(&key).await? {
            Some(document) => Ok(Some(serde_json::from_str(&document)?)),
            None => Ok(None),
        }
    }
}

fn log_degraded(operation: &str, key: &str, err: &crate::error::StoreError) {
    if err.is_connection() {
        warn!(operation, key, error = %err, "Rule cache unreachable, continuing without it");
    } else {
        error!(operation, key, error = %err, "Rule cache rejected command, continuing without it");
    }
}
