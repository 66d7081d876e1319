//! Shared HTTP client for the document service.
//!
//! Provides a minimal client with optional Bearer auth, generic GET/POST/DELETE
//! helpers that map every failure onto [`AppError`], and domain methods for the
//! four endpoints the console consumes (see [`api`]).

pub mod api;
pub mod error_page;

use docdesk_core::{AppError, ClientConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use error_page::extract_error_message;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
}

/// HTTP client for the document service.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Option<Auth>,
    use_login: bool,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, auth: Option<Auth>) -> Result<Self, AppError> {
        Self::with_timeout(base_url, auth, Duration::from_secs(60))
    }

    pub fn with_timeout(
        base_url: impl Into<String>,
        auth: Option<Auth>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            use_login: true,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        Self::with_timeout(
            config.api_url.clone(),
            config.api_token.clone().map(Auth::Bearer),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Create client from environment: DOCDESK_API_URL (or API_URL), DOCDESK_API_TOKEN.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_config(&ClientConfig::from_env()?)
    }

    /// Whether auth headers are attached at all (the `useLogin` switch of `/auth_setup`).
    pub fn with_login(mut self, use_login: bool) -> Self {
        self.use_login = use_login;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn uses_login(&self) -> bool {
        self.use_login
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach `Authorization` when login is in use. A per-call token wins over
    /// the configured one.
    fn apply_auth(&self, request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        if !self.use_login {
            return request;
        }
        match (token, &self.auth) {
            (Some(token), _) => request.bearer_auth(token),
            (None, Some(Auth::Bearer(token))) => request.bearer_auth(token),
            (None, None) => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Request to document service failed");
            AppError::Transport(e.to_string())
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
        response
            .json()
            .await
            .map_err(|e| AppError::InvalidResponse(format!("Failed to parse response as JSON: {}", e)))
    }

    /// Turn a non-success JSON response (`{"error": ...}`) into `ServerRejected`.
    async fn json_failure(response: Response) -> AppError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&text)
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or_else(|| "Unknown error".to_string());
        AppError::ServerRejected { status, message }
    }

    /// Turn a non-success HTML response into `ServerRejected` using its first paragraph.
    async fn html_failure(response: Response) -> AppError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();
        let message = extract_error_message(&text).unwrap_or_else(|| "Unknown error".to_string());
        AppError::ServerRejected { status, message }
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, AppError> {
        let request = self.apply_auth(self.client.get(self.build_url(path)), token);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(Self::json_failure(response).await);
        }

        Self::parse_json(response).await
    }

    /// POST multipart form and deserialize response. Error bodies are HTML.
    ///
    /// No `Content-Type` is set here; reqwest computes the multipart boundary.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        token: Option<&str>,
    ) -> Result<T, AppError> {
        let request = self.apply_auth(self.client.post(self.build_url(path)).multipart(form), token);
        let response = self.send(request).await?;

        if !response.status().is_success() {
            return Err(Self::html_failure(response).await);
        }

        Self::parse_json(response).await
    }

    /// DELETE with a JSON body. Only `200 OK` counts as success.
    pub async fn delete_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> Result<(), AppError> {
        let request = self.apply_auth(self.client.delete(self.build_url(path)).json(body), token);
        let response = self.send(request).await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(Self::json_failure(response).await);
        }

        Ok(())
    }

    /// Raw client for custom requests. Caller must apply auth.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let client = ApiClient::new("http://localhost:50505/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:50505");
        assert_eq!(
            client.build_url("/get_docs_info"),
            "http://localhost:50505/get_docs_info"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig {
            api_url: "https://docs.example.com".to_string(),
            api_token: Some("secret".to_string()),
            http_timeout_secs: 5,
            environment: "test".to_string(),
        };
        let client = ApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://docs.example.com");
        assert!(client.uses_login());
    }

    #[tokio::test]
    async fn test_get_attaches_configured_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer configured")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Some(Auth::Bearer("configured".to_string()))).unwrap();
        let body: Vec<serde_json::Value> = client.get("/ping", None).await.unwrap();
        assert!(body.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_per_call_token_overrides_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", "Bearer per-call")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), Some(Auth::Bearer("configured".to_string()))).unwrap();
        let _: serde_json::Value = client.get("/ping", Some("per-call")).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_auth_header_without_login() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("authorization", mockito::Matcher::Missing)
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), None)
            .unwrap()
            .with_login(false);
        let _: serde_json::Value = client.get("/ping", Some("ignored")).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_failure_uses_json_error_field() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ping")
            .with_status(500)
            .with_body(r#"{"error": "search index unavailable"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), None).unwrap();
        let err = client.get::<serde_json::Value>("/ping", None).await.unwrap_err();
        match err {
            AppError::ServerRejected { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "search index unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is not expected to be listening locally.
        let client = ApiClient::with_timeout("http://127.0.0.1:9", None, Duration::from_secs(2)).unwrap();
        let err = client.get::<serde_json::Value>("/ping", None).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/ping")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let client = ApiClient::new(server.url(), None).unwrap();
        let err = client.get::<serde_json::Value>("/ping", None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidResponse(_)));
    }
}
