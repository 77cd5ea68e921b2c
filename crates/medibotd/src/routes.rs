//! API routes for medibotd

use crate::error::ApiError;
use crate::render::render_history;
use crate::server::AppState;
use crate::store::ExchangeStore;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use medibot_common::{ChatRequest, ChatResponse, Exchange, HealthResponse, NewExchange};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Chat Routes
// ============================================================================

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new().route("/api/chat", post(chat))
}

/// Query → generation → evaluation → persistence → response.
///
/// Generation failure short-circuits: nothing is evaluated or stored.
async fn chat(
    State(state): State<AppStateArc>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::BytesRejection(rejection)) => {
            warn!("Failed to read chat body: {}", rejection.body_text());
            return Err(ApiError::Body {
                status: rejection.status(),
                message: rejection.body_text(),
            });
        }
        Err(rejection) => {
            debug!("Rejected chat body: {}", rejection);
            ChatRequest::default()
        }
    };

    let query = request
        .query()
        .ok_or_else(|| ApiError::Validation("No query provided".to_string()))?
        .to_string();

    info!("Chat query received ({} chars)", query.chars().count());

    let response = state.generator.generate(&query).await.map_err(|e| {
        error!("Error communicating with generation endpoint: {}", e);
        ApiError::GenerationUnavailable(e)
    })?;

    let scores = state.evaluator.evaluate(&query, &response).await;

    let exchange = append_exchange(&state.store, NewExchange::new(query, response, scores))
        .await
        .map_err(|e| {
            error!("Failed to persist exchange: {:#}", e);
            ApiError::Storage(e)
        })?;

    info!(
        "Exchange {} stored with {}/4 scores",
        exchange.id,
        exchange.scores.recovered()
    );

    Ok(Json(ChatResponse::success(exchange.response, exchange.scores)))
}

async fn append_exchange(store: &ExchangeStore, exchange: NewExchange) -> anyhow::Result<Exchange> {
    let store = store.clone();
    tokio::task::spawn_blocking(move || store.append(exchange)).await?
}

// ============================================================================
// History Routes
// ============================================================================

pub fn history_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(history_page))
        .route("/api/history", get(history_json))
}

async fn list_exchanges(store: &ExchangeStore) -> anyhow::Result<Vec<Exchange>> {
    let store = store.clone();
    tokio::task::spawn_blocking(move || store.list_all()).await?
}

async fn history_page(State(state): State<AppStateArc>) -> Result<Html<String>, ApiError> {
    let exchanges = list_exchanges(&state.store).await.map_err(|e| {
        error!("Failed to list exchanges: {:#}", e);
        ApiError::Storage(e)
    })?;
    Ok(Html(render_history(&exchanges)))
}

async fn history_json(State(state): State<AppStateArc>) -> Result<Json<Vec<Exchange>>, ApiError> {
    let exchanges = list_exchanges(&state.store).await.map_err(|e| {
        error!("Failed to list exchanges: {:#}", e);
        ApiError::Storage(e)
    })?;
    Ok(Json(exchanges))
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
