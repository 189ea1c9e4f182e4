//! Session store contract and the library-provided in-memory store.
//!
//! The store is a small persistent key-value area tied to one client session.
//! It is exclusively owned by the authentication state provider for the
//! session's lifetime; no concurrent writers are assumed.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::AppResult;

pub const KEY_TOKEN: &str = "token";
pub const KEY_USER_ID: &str = "userId";
pub const KEY_EMAIL: &str = "email";
pub const KEY_NAME: &str = "name";
pub const KEY_COURSE_ID: &str = "courseId";
pub const KEY_DISCIPLINES: &str = "disciplines";

/// Contract consumed by the state provider. Every operation is fallible:
/// a failed store surfaces to the caller, there is no fallback store.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;
    async fn clear(&self) -> AppResult<()>;
}

/// In-process store backing a single session.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of the stored keys, sorted for stable assertions.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.write().clear();
        Ok(())
    }
}
