//! HTTP server: static assets, the client config endpoint, and health.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use clap::Args;
use riskwizard_core::{Catalog, ClientConfig, Config};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (default from config)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (default from config / PORT)
    #[arg(long)]
    port: Option<u16>,
    /// Directory of static assets served at `/`
    #[arg(long)]
    public: Option<PathBuf>,
}

#[derive(Clone)]
pub(crate) struct AppState {
    webhook_url: Arc<str>,
    catalog: Arc<Catalog>,
}

impl AppState {
    pub(crate) fn new(webhook_url: impl Into<Arc<str>>, catalog: Catalog) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            catalog: Arc::new(catalog),
        }
    }
}

pub(crate) fn create_router(state: AppState, public_dir: PathBuf) -> Router {
    Router::new()
        .route("/api/config", get(client_config))
        .route("/api/catalog", get(catalog))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn client_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(ClientConfig {
        webhook_url: state.webhook_url.to_string(),
    })
}

async fn catalog(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "categories": state.catalog.categories(),
        "scoreOptions": riskwizard_core::SCORE_OPTIONS,
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

pub fn run(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default().with_env_overrides();
    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let public_dir = args
        .public
        .unwrap_or_else(|| PathBuf::from(&config.server.public_dir));
    let addr: SocketAddr = format!("{host}:{port}").parse()?;

    let webhook_url = config.webhook.url;
    let state = AppState::new(webhook_url.as_str(), Catalog::builtin());
    let app = create_router(state, public_dir.clone());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, public_dir = %public_dir.display(), "risk assessment wizard listening");
        tracing::info!("access with email: http://{addr}/?email=test@example.com");
        tracing::info!(%webhook_url, "submissions go to webhook");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}
