use crate::core::QuoteError;
use crate::core::config::AppConfig;
use crate::core::quote::QuoteResponse;
use crate::core::store::{QuoteHook, QuoteStore};
use crate::providers::QuoteFetcher;
use crate::store;
use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::sync::Arc;
use tracing::{error, info};

pub const WELCOME_MESSAGE: &str = "Bem-vindo ao servidor de cotação do dólar!";

#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<QuoteFetcher>,
    provider_url: Arc<str>,
}

impl AppState {
    pub fn new(fetcher: QuoteFetcher, provider_url: &str) -> Self {
        AppState {
            fetcher: Arc::new(fetcher),
            provider_url: Arc::from(provider_url),
        }
    }
}

impl IntoResponse for QuoteError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Wires the fetcher to the provider and, when persistence is on, opens the
/// storage once and attaches the store as the post-decode hook.
pub fn build_state(config: &AppConfig) -> Result<AppState> {
    let mut fetcher = QuoteFetcher::new()?.with_timeout(config.fetch_timeout());

    if config.persist {
        let storage = store::open_storage(config)?;
        let quote_store: Arc<dyn QuoteHook> =
            Arc::new(QuoteStore::with_timeout(storage, config.store_timeout()));
        fetcher = fetcher.with_hook(quote_store);
    } else {
        info!("Persistence disabled, quotes will not be stored");
    }

    Ok(AppState::new(fetcher, &config.provider_url))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/cotacao", get(get_quote))
        .route("/hello", get(hello))
        .with_state(state)
}

async fn hello() -> &'static str {
    WELCOME_MESSAGE
}

async fn get_quote(State(state): State<AppState>) -> Result<Json<QuoteResponse>, QuoteError> {
    match state.fetcher.fetch(&state.provider_url).await {
        Ok(quotes) => Ok(Json(quotes)),
        Err(e) => {
            error!(error = %e, "Quote fetch failed");
            Err(e)
        }
    }
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = build_state(config)?;
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    info!("Listening on {}", config.listen_addr);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
