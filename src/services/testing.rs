//! In-memory fakes of the service ports.

use super::events::{LifecycleEvent, LifecycleEvents};
use super::identity::IdentityProvider;
use super::record_store::RecordStore;
use crate::models::Identity;
use crate::utils::{IdentityError, StoreError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryRecordStore {
    rows: Mutex<HashMap<String, Vec<serde_json::Value>>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(self, collection: &str, row: serde_json::Value) -> Self {
        self.rows
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(row);
        self
    }

    /// Every call against `collection` fails
    pub fn failing_on(mut self, collection: &str) -> Self {
        self.failing.insert(collection.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn rows(&self, collection: &str) -> Vec<serde_json::Value> {
        self.rows.lock().unwrap().get(collection).cloned().unwrap_or_default()
    }

    fn check(&self, collection: &str) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(collection.to_string());
        if self.failing.contains(collection) {
            return Err(StoreError::Database(format!(
                "ns not found: {}",
                collection
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn delete_where(&self, collection: &str, user_id: &str) -> Result<u64, StoreError> {
        self.check(collection)?;
        let mut rows = self.rows.lock().unwrap();
        let Some(table) = rows.get_mut(collection) else {
            return Ok(0);
        };
        let before = table.len();
        table.retain(|row| row["user_id"] != user_id);
        Ok((before - table.len()) as u64)
    }

    async fn select_where(
        &self,
        collection: &str,
        user_id: &str,
    ) -> Result<Vec<serde_json::Value>, StoreError> {
        self.check(collection)?;
        Ok(self
            .rows(collection)
            .into_iter()
            .filter(|row| row["user_id"] == user_id)
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryIdentityProvider {
    users: Mutex<HashMap<String, Identity>>,
    fail_deletes: bool,
    fail_lookups: bool,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user_id: &str, email: &str) -> Self {
        self.users.lock().unwrap().insert(
            user_id.to_string(),
            Identity {
                user_id: user_id.to_string(),
                email: Some(email.to_string()),
            },
        );
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.users.lock().unwrap().contains_key(user_id)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn get_user(&self, user_id: &str) -> Result<Option<Identity>, IdentityError> {
        if self.fail_lookups {
            return Err(IdentityError::Transport("connection refused".to_string()));
        }
        Ok(self.users.lock().unwrap().get(user_id).cloned())
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), IdentityError> {
        if self.fail_deletes {
            return Err(IdentityError::Rejected {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        self.users
            .lock()
            .unwrap()
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| IdentityError::NotFound(user_id.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingEvents {
    events: Mutex<Vec<LifecycleEvent>>,
}

impl RecordingEvents {
    pub fn events(&self) -> Vec<LifecycleEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn warnings(&self) -> Vec<LifecycleEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level() == log::Level::Warn)
            .collect()
    }
}

impl LifecycleEvents for RecordingEvents {
    fn emit(&self, event: LifecycleEvent) {
        self.events.lock().unwrap().push(event);
    }
}
