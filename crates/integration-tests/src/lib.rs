//! Integration tests for Buffet Simone.
//!
//! Both routers are driven in-process with `tower::ServiceExt::oneshot`
//! over the in-memory document store, in-memory local store and in-memory
//! session store. No database or socket is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p buffet-simone-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront` - Menu, cart, quote request, FAQ and gallery
//! - `admin_auth` - Login gate and password recovery
//! - `admin_menu` - Dish and category maintenance
//! - `admin_gallery` - Photo and photo category maintenance

#![cfg_attr(not(test), forbid(unsafe_code))]
// Test support: failures here should abort the test that hit them.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;

use buffet_simone_admin::config::AdminConfig;
use buffet_simone_admin::middleware::create_session_layer;
use buffet_simone_core::auth::AdminCredentials;
use buffet_simone_core::recovery::VerificationCode;
use buffet_simone_store::{
    DocumentStore, InMemoryDocumentStore, LocalStore, MemoryLocalStore, PhotoLibrary, SyncedList,
};
use buffet_simone_storefront::config::StorefrontConfig;
use buffet_simone_storefront::content::FaqStore;

/// Recovery code handed out by the test admin panel.
pub const RECOVERY_CODE: &str = "2468";

/// Multipart boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "buffet-simone-boundary";

const SYNC_TIMEOUT: Duration = Duration::from_secs(5);

/// A decoded response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// `Null` for an empty body, a string for non-JSON text.
    pub body: Value,
}

/// Sends requests to a router, carrying the session cookie like a browser.
pub struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    #[must_use]
    pub const fn new(app: Router) -> Self {
        Self { app, cookie: None }
    }

    /// Same router, fresh cookie jar.
    #[must_use]
    pub fn fresh(&self) -> Self {
        Self::new(self.app.clone())
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, Body::empty()).await
    }

    pub async fn post(&mut self, uri: &str, json: Value) -> TestResponse {
        self.send_json(Method::POST, uri, &json).await
    }

    pub async fn put(&mut self, uri: &str, json: Value) -> TestResponse {
        self.send_json(Method::PUT, uri, &json).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None, Body::empty()).await
    }

    /// POST a `multipart/form-data` body built by [`multipart_body`].
    pub async fn post_multipart(&mut self, uri: &str, body: Vec<u8>) -> TestResponse {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        self.send(Method::POST, uri, Some(&content_type), Body::from(body))
            .await
    }

    async fn send_json(&mut self, method: Method, uri: &str, json: &Value) -> TestResponse {
        self.send(
            method,
            uri,
            Some("application/json"),
            Body::from(serde_json::to_vec(json).unwrap()),
        )
        .await
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: Body,
    ) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            request = request.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            self.cookie = set_cookie
                .to_str()
                .ok()
                .and_then(|value| value.split(';').next())
                .map(str::to_owned);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Build a `multipart/form-data` body with text fields and one file.
#[must_use]
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Wait until a mirrored list satisfies `done`.
pub async fn wait_until<T, F>(
    mut rx: tokio::sync::watch::Receiver<SyncedList<T>>,
    done: F,
) -> SyncedList<T>
where
    T: Clone,
    F: FnMut(&SyncedList<T>) -> bool,
{
    tokio::time::timeout(SYNC_TIMEOUT, rx.wait_for(done))
        .await
        .unwrap()
        .unwrap()
        .clone()
}

// =============================================================================
// Storefront
// =============================================================================

/// A running storefront over in-memory backends.
pub struct Storefront {
    pub client: TestClient,
    pub state: buffet_simone_storefront::state::AppState,
    pub documents: Arc<InMemoryDocumentStore>,
    pub local: Arc<MemoryLocalStore>,
}

#[must_use]
pub fn storefront_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: Url::parse("http://localhost:3000").unwrap(),
        local_store_dir: PathBuf::from("data/local"),
        whatsapp_number: "5511960882764".to_owned(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Start a storefront sharing `documents` and `local` with the caller.
pub async fn storefront_with(
    documents: Arc<InMemoryDocumentStore>,
    local: Arc<MemoryLocalStore>,
) -> Storefront {
    let state = buffet_simone_storefront::state::AppState::new(
        storefront_config(),
        Arc::clone(&documents) as Arc<dyn DocumentStore>,
        Arc::clone(&local) as Arc<dyn LocalStore>,
        FaqStore::bundled().unwrap(),
    )
    .await
    .unwrap();

    let session_layer =
        buffet_simone_storefront::middleware::create_session_layer(MemoryStore::default(), false);
    Storefront {
        client: TestClient::new(buffet_simone_storefront::routes::app(
            state.clone(),
            session_layer,
        )),
        state,
        documents,
        local,
    }
}

pub async fn storefront() -> Storefront {
    storefront_with(
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(MemoryLocalStore::new()),
    )
    .await
}

// =============================================================================
// Admin
// =============================================================================

/// A running admin panel over in-memory backends.
pub struct Admin {
    pub client: TestClient,
    pub state: buffet_simone_admin::state::AppState,
    pub documents: Arc<InMemoryDocumentStore>,
    pub local: Arc<MemoryLocalStore>,
}

impl Admin {
    /// Log the client in with the built-in pair.
    pub async fn login(&mut self) {
        let response = self
            .client
            .post(
                "/admin/login",
                serde_json::json!({ "username": "Admin", "password": "12345678" }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}

#[must_use]
pub fn admin_config() -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://localhost/unused"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3001,
        base_url: Url::parse("http://localhost:3001").unwrap(),
        credentials: AdminCredentials::default(),
        recovery_code: Some(VerificationCode::parse(RECOVERY_CODE).unwrap()),
        local_store_dir: PathBuf::from("data/local"),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Start an admin panel sharing `documents` and `local` with the caller.
pub async fn admin_with(
    documents: Arc<InMemoryDocumentStore>,
    local: Arc<MemoryLocalStore>,
) -> Admin {
    let photos = PhotoLibrary::load(Arc::clone(&local) as Arc<dyn LocalStore>)
        .await
        .unwrap();
    let state = buffet_simone_admin::state::AppState::new(
        admin_config(),
        Arc::clone(&documents) as Arc<dyn DocumentStore>,
        Arc::new(photos),
    )
    .await
    .unwrap();

    let session_layer = create_session_layer(MemoryStore::default(), false);
    Admin {
        client: TestClient::new(buffet_simone_admin::routes::app(state.clone(), session_layer)),
        state,
        documents,
        local,
    }
}

pub async fn admin() -> Admin {
    admin_with(
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(MemoryLocalStore::new()),
    )
    .await
}

/// An admin panel with a logged-in client.
pub async fn logged_in_admin() -> Admin {
    let mut admin = admin().await;
    admin.login().await;
    admin
}
