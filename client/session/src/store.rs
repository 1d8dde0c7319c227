use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::warn;

use crate::client::{AuthClient, RequestOptions};
use crate::config::ApiConfig;
use crate::error::{SessionError, SessionResult};
use crate::navigator::{Navigator, NoopNavigator};
use crate::roles::Role;
use crate::storage::{MemoryStorage, SessionStorage, USER_KEY};
use crate::user::{RegistrationResponse, User};

/// Route the store drives the navigator to after a logout.
pub const LOGIN_ROUTE: &str = "/login";

/// Point-in-time view of the session for guard checks. Captured before a
/// transition so the checks stay synchronous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub role: Option<Role>,
}

/// Client-side session state: the stored credential decides authentication,
/// the in-memory user record caches the last fetched profile. Clones share
/// state, so one store can serve every component of a view tree.
#[derive(Clone)]
pub struct SessionStore {
    client: AuthClient,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    user: Arc<RwLock<Option<User>>>,
}

pub struct SessionStoreBuilder {
    config: ApiConfig,
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    http: Option<reqwest::Client>,
}

impl SessionStoreBuilder {
    fn new(config: ApiConfig) -> Self {
        Self {
            config,
            storage: Arc::new(MemoryStorage::new()),
            navigator: Arc::new(NoopNavigator),
            http: None,
        }
    }

    pub fn with_storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Assemble the store and hydrate the user cache from storage, so a
    /// fresh load resumes from the last committed state.
    pub fn build(self) -> SessionStore {
        let client = match self.http {
            Some(http) => AuthClient::with_client(http, self.config, self.storage.clone()),
            None => AuthClient::new(self.config, self.storage.clone()),
        };
        let user = hydrate_user(self.storage.as_ref());
        SessionStore {
            client,
            storage: self.storage,
            navigator: self.navigator,
            user: Arc::new(RwLock::new(user)),
        }
    }
}

fn hydrate_user(storage: &dyn SessionStorage) -> Option<User> {
    let blob = match storage.get(USER_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => return None,
        Err(err) => {
            warn!(error = %err, "user cache unreadable at startup, starting anonymous");
            return None;
        }
    };
    match serde_json::from_str(&blob) {
        Ok(user) => Some(user),
        Err(err) => {
            warn!(error = %err, "stored user cache failed to parse, discarding");
            None
        }
    }
}

impl SessionStore {
    pub fn builder(config: ApiConfig) -> SessionStoreBuilder {
        SessionStoreBuilder::new(config)
    }

    /// Store with in-memory storage and no navigation wiring.
    pub fn new(config: ApiConfig) -> Self {
        SessionStoreBuilder::new(config).build()
    }

    pub fn client(&self) -> &AuthClient {
        &self.client
    }

    /// Authentication is keyed to credential presence alone; the user
    /// record is only a cache of the last fetched profile.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    pub fn current_user(&self) -> Option<User> {
        self.user.read().expect("session lock poisoned").clone()
    }

    pub fn current_role(&self) -> Option<Role> {
        self.user
            .read()
            .expect("session lock poisoned")
            .as_ref()
            .map(|user| user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.current_role() == Some(Role::Admin)
    }

    pub fn is_personnel(&self) -> bool {
        self.current_role() == Some(Role::Personnel)
    }

    pub fn is_provider(&self) -> bool {
        self.current_role() == Some(Role::Provider)
    }

    pub fn is_customer(&self) -> bool {
        self.current_role() == Some(Role::Customer)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            authenticated: self.is_authenticated(),
            role: self.current_role(),
        }
    }

    /// Exchange credentials for a profile. On success the validated
    /// credential is already persisted by the client and the returned user
    /// becomes the cached current user; on failure state is untouched.
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<User> {
        let user = self.client.login(username, password).await?;
        self.set_user(Some(user.clone()))?;
        Ok(user)
    }

    /// Register a new account. When the backend embeds the created user the
    /// profile cache adopts it; no credential is derived, so the session
    /// stays unauthenticated until `login`.
    pub async fn register(&self, payload: &Value) -> SessionResult<RegistrationResponse> {
        let response = self.client.register(payload).await?;
        if let Some(user) = &response.user {
            self.set_user(Some(user.clone()))?;
        }
        Ok(response)
    }

    /// Tear the session down. Remote invalidation is best-effort, local
    /// state is always cleared, and the navigator is always pointed at the
    /// login route; callers never see a failure.
    pub async fn logout(&self) {
        if let Err(err) = self.client.logout().await {
            warn!(error = %err, "remote session invalidation failed, clearing local state anyway");
        }
        if let Err(err) = self.set_user(None) {
            warn!(error = %err, "failed to clear persisted user cache");
            *self.user.write().expect("session lock poisoned") = None;
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// Resolve the current user, from cache unless `force_reload` is set.
    /// Any refresh failure is treated as credential invalidity: the session
    /// is torn down before the original error propagates.
    pub async fn fetch_current_user(&self, force_reload: bool) -> SessionResult<User> {
        if !self.is_authenticated() {
            return Err(SessionError::NotAuthenticated);
        }
        if !force_reload {
            if let Some(user) = self.current_user() {
                return Ok(user);
            }
        }
        match self.refresh_user().await {
            Ok(user) => Ok(user),
            Err(err) => {
                warn!(error = %err, "current-user refresh failed, invalidating session");
                self.logout().await;
                Err(err)
            }
        }
    }

    async fn refresh_user(&self) -> SessionResult<User> {
        let user = self.client.current_user().await?;
        self.set_user(Some(user.clone()))?;
        Ok(user)
    }

    /// Authenticated pass-through request. A failure that classifies as an
    /// authentication failure tears the session down before propagating;
    /// anything else leaves the session alone.
    pub async fn fetch_authenticated(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> SessionResult<Value> {
        match self.client.fetch_authenticated(endpoint, options).await {
            Ok(value) => Ok(value),
            Err(err) if err.is_auth_failure() => {
                warn!(error = %err, "authenticated request rejected, invalidating session");
                self.logout().await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Single write path keeping the in-memory record and the persisted
    /// cache consistent. Persists first; memory is only updated once the
    /// write sticks.
    fn set_user(&self, user: Option<User>) -> SessionResult<()> {
        match &user {
            Some(user) => {
                let blob = serde_json::to_string(user)
                    .map_err(|err| SessionError::Storage(err.to_string()))?;
                self.storage.set(USER_KEY, &blob)?;
            }
            None => self.storage.remove(USER_KEY)?,
        }
        *self.user.write().expect("session lock poisoned") = user;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::CREDENTIAL_KEY;

    fn seeded_storage(entries: &[(&str, &str)]) -> Arc<MemoryStorage> {
        let storage = MemoryStorage::new();
        for (key, value) in entries {
            storage.set(key, value).unwrap();
        }
        Arc::new(storage)
    }

    fn store_with(storage: Arc<MemoryStorage>) -> SessionStore {
        SessionStore::builder(ApiConfig::new("http://backend.test"))
            .with_storage(storage)
            .build()
    }

    #[test]
    fn hydrates_cached_user_from_storage() {
        let blob = json!({"id": 4, "username": "carol", "role": 2}).to_string();
        let store = store_with(seeded_storage(&[(USER_KEY, &blob)]));

        let user = store.current_user().expect("hydrated user");
        assert_eq!(user.username, "carol");
        assert!(store.is_provider());
        assert!(!store.is_admin());
    }

    #[test]
    fn corrupt_user_cache_hydrates_as_anonymous() {
        let store = store_with(seeded_storage(&[(USER_KEY, "{not json")]));
        assert!(store.current_user().is_none());
        assert_eq!(store.current_role(), None);
    }

    #[test]
    fn authentication_tracks_credential_not_user_cache() {
        let blob = json!({"id": 4, "username": "carol", "role": 2}).to_string();

        // User cache without a credential: a profile, but not a session.
        let store = store_with(seeded_storage(&[(USER_KEY, &blob)]));
        assert!(!store.is_authenticated());
        assert!(store.current_user().is_some());

        // Credential without a user cache: a session awaiting its profile.
        let store = store_with(seeded_storage(&[(CREDENTIAL_KEY, "YWxpY2U6cHc=")]));
        assert!(store.is_authenticated());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn snapshot_combines_credential_and_role() {
        let blob = json!({"id": 9, "username": "dan", "role": 3}).to_string();
        let store = store_with(seeded_storage(&[
            (CREDENTIAL_KEY, "ZGFuOnB3"),
            (USER_KEY, &blob),
        ]));

        assert_eq!(
            store.snapshot(),
            SessionSnapshot {
                authenticated: true,
                role: Some(Role::Customer),
            }
        );
    }

    #[test]
    fn clones_share_session_state() {
        let blob = json!({"id": 1, "username": "alice", "role": 0}).to_string();
        let store = store_with(seeded_storage(&[(USER_KEY, &blob)]));
        let clone = store.clone();

        store.set_user(None).unwrap();
        assert!(clone.current_user().is_none());
    }
}
