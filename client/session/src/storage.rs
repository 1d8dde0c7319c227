use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::SessionResult;

/// Storage key holding the encoded Basic-Auth credential.
pub const CREDENTIAL_KEY: &str = "token";
/// Storage key holding the cached current-user JSON blob.
pub const USER_KEY: &str = "user";

/// Durable client-side key/value store, the localStorage of whatever host
/// the session runs in. Reads and writes are synchronous.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> SessionResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;
    fn remove(&self, key: &str) -> SessionResult<()>;
}

/// Process-local backend. Clones share state, so a handle kept by a test
/// observes writes made through the session.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> SessionResult<Option<String>> {
        let entries = self.entries.read().expect("storage lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut entries = self.entries.write().expect("storage lock poisoned");
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut entries = self.entries.write().expect("storage lock poisoned");
        entries.remove(key);
        Ok(())
    }
}
