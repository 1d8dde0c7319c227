mod support;

use anyhow::Result;
use client_session::{Role, SessionError, SessionStorage, CREDENTIAL_KEY, USER_KEY};
use httpmock::prelude::*;
use serde_json::json;

use support::store_for;

#[tokio::test]
async fn login_persists_credential_only_after_backend_accepts_it() -> Result<()> {
    let server = MockServer::start();
    let me = server.mock(|when, then| {
        when.method(GET)
            .path("/users/me/")
            .header("authorization", "Basic YWxpY2U6cHc=");
        then.status(200)
            .header("content-type", "application/json")
            .body(json!({"id": 1, "username": "alice", "role": 1}).to_string());
    });

    let (store, storage, navigator) = store_for(&server.base_url());
    let user = store.login("alice", "pw").await?;

    assert_eq!(user.username, "alice");
    assert_eq!(user.role, Role::Personnel);
    assert!(store.is_authenticated());
    assert!(store.is_personnel());
    assert!(!store.is_provider());
    assert_eq!(
        storage.get(CREDENTIAL_KEY)?.as_deref(),
        Some("YWxpY2U6cHc=")
    );

    let cached = storage.get(USER_KEY)?.expect("user cache persisted");
    let blob: serde_json::Value = serde_json::from_str(&cached)?;
    assert_eq!(blob["username"], json!("alice"));
    assert!(navigator.visited().is_empty());
    me.assert();
    Ok(())
}

#[tokio::test]
async fn failed_login_leaves_storage_untouched() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/me/");
        then.status(401)
            .header("content-type", "application/json")
            .body(json!({"message": "invalid credentials"}).to_string());
    });

    let (store, storage, navigator) = store_for(&server.base_url());
    let err = store.login("alice", "wrong").await.unwrap_err();

    assert_eq!(err.to_string(), "invalid credentials");
    assert!(matches!(err, SessionError::Http { status: 401, .. }));
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(CREDENTIAL_KEY)?, None);
    assert_eq!(storage.get(USER_KEY)?, None);
    assert!(navigator.visited().is_empty());
    Ok(())
}

#[tokio::test]
async fn error_body_without_message_falls_back_to_the_status_line() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/me/");
        then.status(404)
            .header("content-type", "application/json")
            .body(json!({"detail": "no such user"}).to_string());
    });

    let (store, _storage, _navigator) = store_for(&server.base_url());
    let err = store.login("ghost", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "404: Not Found");
    Ok(())
}

#[tokio::test]
async fn unparseable_error_body_gets_the_fallback_message() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/users/me/");
        then.status(502).body("<html>bad gateway</html>");
    });

    let (store, _storage, _navigator) = store_for(&server.base_url());
    let err = store.login("alice", "pw").await.unwrap_err();
    assert_eq!(err.to_string(), "An unexpected error occurred");
    Ok(())
}

#[tokio::test]
async fn register_adopts_embedded_user_without_authenticating() -> Result<()> {
    let server = MockServer::start();
    let register = server.mock(|when, then| {
        when.method(POST)
            .path("/users/")
            .json_body(json!({"username": "bob", "password": "pw", "role": 3}));
        then.status(201)
            .header("content-type", "application/json")
            .body(
                json!({
                    "detail": "created",
                    "user": {"id": 2, "username": "bob", "role": 3},
                })
                .to_string(),
            );
    });

    let (store, storage, _navigator) = store_for(&server.base_url());
    let response = store
        .register(&json!({"username": "bob", "password": "pw", "role": 3}))
        .await?;

    let created = response.user.as_ref().expect("embedded user");
    assert_eq!(created.username, "bob");
    assert!(store.is_customer());
    assert!(!store.is_authenticated());
    assert_eq!(storage.get(CREDENTIAL_KEY)?, None);
    assert!(storage.get(USER_KEY)?.is_some());
    register.assert();
    Ok(())
}

#[tokio::test]
async fn register_without_embedded_user_leaves_the_cache_empty() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/users/");
        then.status(201)
            .header("content-type", "application/json")
            .body(json!({"detail": "verification email sent"}).to_string());
    });

    let (store, _storage, _navigator) = store_for(&server.base_url());
    let response = store.register(&json!({"username": "bob"})).await?;

    assert!(response.user.is_none());
    assert_eq!(response.raw["detail"], json!("verification email sent"));
    assert!(store.current_user().is_none());
    Ok(())
}

#[tokio::test]
async fn register_error_propagates_the_backend_message() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/users/");
        then.status(400)
            .header("content-type", "application/json")
            .body(json!({"message": "username taken"}).to_string());
    });

    let (store, _storage, _navigator) = store_for(&server.base_url());
    let err = store.register(&json!({"username": "bob"})).await.unwrap_err();

    assert_eq!(err.to_string(), "username taken");
    assert!(store.current_user().is_none());
    Ok(())
}
