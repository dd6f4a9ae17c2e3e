//! HTTP client for the ParkEase backend with two cross-cutting behaviors: the
//! bearer token is read from the session store at send time, and any 401
//! response clears the session before the error reaches the caller. Everything
//! else passes through; the typed wrappers in the submodules add no retries,
//! caching or deduplication.

pub mod auth;
pub mod bookings;
pub mod financials;
pub mod lots;
pub mod rules;
pub mod types;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::SessionStore;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info_span, Instrument};

/// Request timeout applied to every call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Single HTTP client instance shared by all feature wrappers.
///
/// Holds the session store explicitly so the live-token read and the forced
/// logout are visible in the constructor signature rather than hidden behind a
/// global.
pub struct ApiClient {
    http: Client,
    base_url: String,
    store: Arc<SessionStore>,
}

impl ApiClient {
    /// Build a client against the configured base URL.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &AppConfig, store: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    /// The session store this client reads tokens from and logs out through.
    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path));
        let response = self.dispatch(request, "GET", path).await?;
        parse_json(response).await
    }

    pub(crate) async fn get_json_query<Q: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let request = self.http.get(self.url(path)).query(query);
        let response = self.dispatch(request, "GET", path).await?;
        parse_json(response).await
    }

    /// GET that treats 404 as "nothing configured yet".
    pub(crate) async fn get_optional_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        let request = self.http.get(self.url(path));
        let response = self.dispatch(request, "GET", path).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_json(response).await.map(Some)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path)).json(body);
        let response = self.dispatch(request, "POST", path).await?;
        parse_json(response).await
    }

    pub(crate) async fn post_json_query<B: Serialize, Q: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        query: &Q,
    ) -> Result<T, ApiError> {
        let request = self.http.post(self.url(path)).query(query).json(body);
        let response = self.dispatch(request, "POST", path).await?;
        parse_json(response).await
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.put(self.url(path)).json(body);
        let response = self.dispatch(request, "PUT", path).await?;
        parse_json(response).await
    }

    pub(crate) async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.http.patch(self.url(path)).json(body);
        let response = self.dispatch(request, "PATCH", path).await?;
        parse_json(response).await
    }

    pub(crate) async fn delete_empty(&self, path: &str) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(path));
        let response = self.dispatch(request, "DELETE", path).await?;
        expect_success(response).await
    }

    /// Attach the live token, send, and apply the 401 reaction.
    ///
    /// The generation recorded before the request is sent guards against a
    /// stale 401 clearing a session established after it.
    async fn dispatch(
        &self,
        request: RequestBuilder,
        method: &str,
        path: &str,
    ) -> Result<Response, ApiError> {
        let generation = self.store.generation();
        let request = match self.store.token() {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        };

        let span = info_span!(
            "api.request",
            http.method = method,
            path = path
        );
        let response = request
            .send()
            .instrument(span)
            .await
            .map_err(map_transport_error)?;

        if response.status() == StatusCode::UNAUTHORIZED {
            debug!("Unauthorized response for {method} {path}, clearing session");
            self.store.invalidate(generation);
            let message = sanitize_body(response.text().await.unwrap_or_default());
            return Err(ApiError::Http {
                status: 401,
                message,
            });
        }

        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("store", &self.store)
            .finish()
    }
}

fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message: sanitize_body(body),
        })
    }
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message: sanitize_body(body),
        })
    }
}

fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::types::{Role, User};
    use super::*;
    use crate::session::MemorySessionStorage;
    use anyhow::{anyhow, Result};
    use secrecy::SecretString;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn store() -> Arc<SessionStore> {
        Arc::new(SessionStore::new(Box::new(MemorySessionStorage::new())))
    }

    fn client_for(server: &MockServer, store: Arc<SessionStore>) -> Result<ApiClient> {
        let config = AppConfig {
            api_base_url: server.uri(),
            maps_api_key: String::new(),
            payment_public_key: String::new(),
        };
        Ok(ApiClient::new(&config, store)?)
    }

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            name: "Asha".to_string(),
            phone: "+919876543210".to_string(),
            role: Role::Driver,
            ..User::default()
        }
    }

    #[tokio::test]
    async fn attaches_bearer_token_at_send_time() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let store = store();
        let client = client_for(&server, store.clone())?;

        Mock::given(method("GET"))
            .and(path("/api/my-bookings"))
            .and(header("authorization", "Bearer t-later"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        // Token set after client construction; must still be attached.
        store.set_auth(SecretString::from("t-later".to_string()), sample_user());

        let bookings: Vec<serde_json::Value> = client.get_json("/api/my-bookings").await?;
        assert!(bookings.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn sends_no_authorization_header_when_logged_out() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let client = client_for(&server, store())?;

        Mock::given(method("GET"))
            .and(path("/api/search/availability"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let _: Vec<serde_json::Value> = client.get_json("/api/search/availability").await?;

        let requests = server
            .received_requests()
            .await
            .ok_or_else(|| anyhow!("expected recorded requests"))?;
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
        Ok(())
    }

    #[tokio::test]
    async fn unauthorized_response_forces_logout() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let store = store();
        let client = client_for(&server, store.clone())?;
        store.set_auth(SecretString::from("t1".to_string()), sample_user());

        Mock::given(method("GET"))
            .and(path("/lots/my-lots"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": "Token expired"})),
            )
            .mount(&server)
            .await;

        let result: Result<Vec<serde_json::Value>, ApiError> =
            client.get_json("/lots/my-lots").await;
        let err = result.err().ok_or_else(|| anyhow!("expected error"))?;
        assert!(err.is_unauthorized());

        // Session cleared without the caller touching the store.
        assert!(store.token().is_none());
        assert!(store.user().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn non_2xx_surfaces_backend_body() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let store = store();
        let client = client_for(&server, store.clone())?;
        store.set_auth(SecretString::from("t1".to_string()), sample_user());

        Mock::given(method("POST"))
            .and(path("/api/book/"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                "Sorry, this spot is no longer available for the selected time.",
            ))
            .mount(&server)
            .await;

        let result: Result<serde_json::Value, ApiError> =
            client.post_json("/api/book/", &json!({})).await;
        let err = result.err().ok_or_else(|| anyhow!("expected error"))?;
        match err {
            ApiError::Http { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("no longer available"));
            }
            other => return Err(anyhow!("unexpected error: {other}")),
        }

        // Non-401 failures leave the session alone.
        assert!(store.is_authenticated());
        Ok(())
    }

    #[tokio::test]
    async fn optional_get_maps_404_to_none() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        let client = client_for(&server, store())?;

        Mock::given(method("GET"))
            .and(path("/api/financials/account"))
            .respond_with(ResponseTemplate::new(404).set_body_string("No payout account"))
            .mount(&server)
            .await;

        let account: Option<serde_json::Value> =
            client.get_optional_json("/api/financials/account").await?;
        assert!(account.is_none());
        Ok(())
    }
}
