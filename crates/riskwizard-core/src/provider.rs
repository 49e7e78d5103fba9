//! Startup lookup of the submission endpoint.
//!
//! The server exposes `GET /api/config` returning `{ "webhookUrl": "..." }`.
//! Any failure to obtain a usable absolute URL falls back to
//! [`DEFAULT_WEBHOOK_URL`]; startup never fails on this.

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5678/webhook/risk-assessment";

/// Body of `GET /api/config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub webhook_url: String,
}

/// Fetch the webhook URL from `<server_base>/api/config`, or the default.
pub async fn fetch_webhook_url(server_base: &str) -> String {
    match try_fetch(server_base).await {
        Ok(url) => {
            tracing::info!(webhook_url = %url, "webhook URL loaded");
            url
        }
        Err(reason) => {
            tracing::warn!(%reason, default = DEFAULT_WEBHOOK_URL, "failed to load config, using default");
            DEFAULT_WEBHOOK_URL.to_string()
        }
    }
}

async fn try_fetch(server_base: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let endpoint = Url::parse(server_base)?.join("/api/config")?;
    let response = reqwest::get(endpoint).await?.error_for_status()?;
    let config: ClientConfig = response.json().await?;
    Url::parse(&config.webhook_url)?;
    Ok(config.webhook_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_webhook_url_from_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"webhookUrl":"https://hooks.example/risk"}"#)
            .create_async()
            .await;

        assert_eq!(fetch_webhook_url(&server.url()).await, "https://hooks.example/risk");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_body_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        assert_eq!(fetch_webhook_url(&server.url()).await, DEFAULT_WEBHOOK_URL);
    }

    #[tokio::test]
    async fn error_status_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/config")
            .with_status(500)
            .create_async()
            .await;

        assert_eq!(fetch_webhook_url(&server.url()).await, DEFAULT_WEBHOOK_URL);
    }

    #[tokio::test]
    async fn unusable_webhook_url_falls_back() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"webhookUrl":""}"#)
            .create_async()
            .await;
        assert_eq!(fetch_webhook_url(&server.url()).await, DEFAULT_WEBHOOK_URL);

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/config")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"webhookUrl":"/webhook/risk"}"#)
            .create_async()
            .await;
        assert_eq!(fetch_webhook_url(&server.url()).await, DEFAULT_WEBHOOK_URL);
    }

    #[tokio::test]
    async fn bad_base_url_falls_back() {
        assert_eq!(fetch_webhook_url("::nope::").await, DEFAULT_WEBHOOK_URL);
    }
}
