#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use client_session::{
    ApiConfig, MemoryStorage, Navigator, SessionStorage, SessionStore, CREDENTIAL_KEY, USER_KEY,
};

/// Navigator double recording every navigation request.
#[derive(Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().expect("navigator lock poisoned").clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited
            .lock()
            .expect("navigator lock poisoned")
            .push(path.to_owned());
    }
}

/// Store wired to a mock backend with fresh storage. The returned storage
/// handle shares state with the store.
pub fn store_for(base_url: &str) -> (SessionStore, MemoryStorage, Arc<RecordingNavigator>) {
    let storage = MemoryStorage::new();
    let navigator = Arc::new(RecordingNavigator::default());
    let store = SessionStore::builder(ApiConfig::new(base_url))
        .with_storage(Arc::new(storage.clone()))
        .with_navigator(navigator.clone())
        .build();
    (store, storage, navigator)
}

/// Store built over storage seeded with a credential and, optionally, a
/// cached user blob, as a returning visitor's browser would hold.
pub fn seeded_store_for(
    base_url: &str,
    token: &str,
    user: Option<&serde_json::Value>,
) -> (SessionStore, MemoryStorage, Arc<RecordingNavigator>) {
    let storage = MemoryStorage::new();
    storage.set(CREDENTIAL_KEY, token).expect("seed credential");
    if let Some(user) = user {
        storage
            .set(USER_KEY, &user.to_string())
            .expect("seed user cache");
    }
    let navigator = Arc::new(RecordingNavigator::default());
    let store = SessionStore::builder(ApiConfig::new(base_url))
        .with_storage(Arc::new(storage.clone()))
        .with_navigator(navigator.clone())
        .build();
    (store, storage, navigator)
}
