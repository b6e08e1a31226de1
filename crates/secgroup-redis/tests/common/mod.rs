//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod redis_env;

use async_trait::async_trait;
use secgroup_redis::{RuleStore, StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-memory rule store recording every write.
#[derive(Default)]
pub struct MemoryRuleStore {
    documents: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self, key: &str) -> Option<String> {
        self.documents.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.documents.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.documents
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.document(key))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.documents.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Rule store whose every operation fails as if the server went away.
#[derive(Default)]
pub struct UnreachableRuleStore {
    attempts: AtomicUsize,
}

impl UnreachableRuleStore {
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fail(&self) -> StoreError {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        StoreError::Connection("Connection reset by peer".to_string())
    }
}

#[async_trait]
impl RuleStore for UnreachableRuleStore {
    async fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(self.fail())
    }

    async fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(self.fail())
    }

    async fn delete(&self, _key: &str) -> StoreResult<()> {
        Err(self.fail())
    }
}
