use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::config::ApiConfig;
use crate::credential::Credential;
use crate::error::{SessionError, SessionResult};
use crate::storage::{SessionStorage, CREDENTIAL_KEY};
use crate::user::{RegistrationResponse, User};

const REGISTER_PATH: &str = "users/";
const CURRENT_USER_PATH: &str = "users/me/";
const LOGOUT_PATH: &str = "users/logout/";

/// Message shown when an error body cannot be parsed at all.
const FALLBACK_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Caller-controlled pieces of a pass-through request. Defaults to a GET
/// with no body and no extra headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// HTTP client for the backend API. Owns the credential lifecycle in
/// storage: `login` writes the key, `logout` removes it, and authenticated
/// requests replay it.
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    config: ApiConfig,
    storage: Arc<dyn SessionStorage>,
}

impl AuthClient {
    pub fn new(config: ApiConfig, storage: Arc<dyn SessionStorage>) -> Self {
        Self::with_client(Client::new(), config, storage)
    }

    pub fn with_client(http: Client, config: ApiConfig, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            http,
            config,
            storage,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Credential presence in storage is the authentication source of truth.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.storage.get(CREDENTIAL_KEY), Ok(Some(_)))
    }

    pub fn stored_credential(&self) -> SessionResult<Option<Credential>> {
        Ok(self.storage.get(CREDENTIAL_KEY)?.map(Credential::from_token))
    }

    /// `GET /users/me/` with a credential derived from the given pair. The
    /// credential is persisted only after the backend accepts it, so a
    /// failed login leaves storage untouched.
    pub async fn login(&self, username: &str, password: &str) -> SessionResult<User> {
        let credential = Credential::basic(username, password);

        let response = self
            .http
            .get(self.config.endpoint(CURRENT_USER_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, auth_header(&credential)?)
            .send()
            .await
            .map_err(|err| SessionError::Network(err.to_string()))?;

        let body = read_json(response).await?;
        let user: User =
            serde_json::from_value(body).map_err(|err| SessionError::Decode(err.to_string()))?;

        self.storage.set(CREDENTIAL_KEY, credential.token())?;
        debug!(user_id = user.id, role = %user.role, "login credential validated");
        Ok(user)
    }

    /// `POST /users/`. Unauthenticated; the backend may embed the created
    /// user in the response body.
    pub async fn register(&self, payload: &Value) -> SessionResult<RegistrationResponse> {
        let response = self
            .http
            .post(self.config.endpoint(REGISTER_PATH))
            .json(payload)
            .send()
            .await
            .map_err(|err| SessionError::Network(err.to_string()))?;

        let body = read_json(response).await?;
        RegistrationResponse::try_from(body)
    }

    /// `GET /users/me/` with the stored credential.
    pub async fn current_user(&self) -> SessionResult<User> {
        let credential = self
            .stored_credential()?
            .ok_or(SessionError::NotAuthenticated)?;

        let response = self
            .http
            .get(self.config.endpoint(CURRENT_USER_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, auth_header(&credential)?)
            .send()
            .await
            .map_err(|err| SessionError::Network(err.to_string()))?;

        let body = read_json(response).await?;
        serde_json::from_value(body).map_err(|err| SessionError::Decode(err.to_string()))
    }

    /// Best-effort `POST /users/logout/`. The stored credential is removed
    /// even when the remote call fails; the failure is returned so the
    /// caller can decide how loudly to report it.
    pub async fn logout(&self) -> SessionResult<()> {
        let invalidation = match self.stored_credential()? {
            Some(credential) => self.invalidate_remote(&credential).await,
            None => Ok(()),
        };
        self.storage.remove(CREDENTIAL_KEY)?;
        invalidation
    }

    async fn invalidate_remote(&self, credential: &Credential) -> SessionResult<()> {
        let response = self
            .http
            .post(self.config.endpoint(LOGOUT_PATH))
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, auth_header(credential)?)
            .send()
            .await
            .map_err(|err| SessionError::Network(err.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }
        Ok(())
    }

    /// Authenticated pass-through request. Caller headers are applied over
    /// the content-type and authorization defaults.
    pub async fn fetch_authenticated(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> SessionResult<Value> {
        let RequestOptions {
            method,
            headers: extra,
            body,
        } = options;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(credential) = self.stored_credential()? {
            headers.insert(AUTHORIZATION, auth_header(&credential)?);
        }
        for (name, value) in &extra {
            headers.insert(name.clone(), value.clone());
        }

        let mut request = self.http.request(method, self.config.endpoint(endpoint));
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|err| SessionError::Network(err.to_string()))?;
        read_json(response).await
    }
}

fn auth_header(credential: &Credential) -> SessionResult<HeaderValue> {
    HeaderValue::from_str(&credential.header_value())
        .map_err(|_| SessionError::Storage("stored credential is not a valid header value".into()))
}

async fn read_json(response: Response) -> SessionResult<Value> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    response
        .json()
        .await
        .map_err(|err| SessionError::Decode(err.to_string()))
}

/// Normalize a non-success response the way the views expect: the backend's
/// `message` field when the body carries one, `"<status>: <reason>"` when it
/// does not, and a fixed fallback when the body is not JSON at all.
async fn error_from_response(response: Response) -> SessionError {
    let status = response.status();
    let message = match response.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| status_message(status)),
        Err(_) => FALLBACK_ERROR_MESSAGE.to_owned(),
    };
    SessionError::Http {
        status: status.as_u16(),
        message,
    }
}

fn status_message(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{}: {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}
