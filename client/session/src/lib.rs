pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod navigator;
pub mod roles;
pub mod storage;
pub mod store;
pub mod user;

pub use client::{AuthClient, RequestOptions};
pub use config::ApiConfig;
pub use credential::Credential;
pub use error::{SessionError, SessionResult};
pub use navigator::{Navigator, NoopNavigator};
pub use roles::{Role, UnknownRole};
pub use storage::{MemoryStorage, SessionStorage, CREDENTIAL_KEY, USER_KEY};
pub use store::{SessionSnapshot, SessionStore, SessionStoreBuilder, LOGIN_ROUTE};
pub use user::{RegistrationResponse, User};
