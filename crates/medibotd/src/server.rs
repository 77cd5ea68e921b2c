//! HTTP server for medibotd

use crate::config::{Config, ServerConfig};
use crate::evaluation::{DisabledEvaluator, Evaluator, GeminiEvaluator};
use crate::generation::{Generator, OllamaGenerator};
use crate::routes;
use crate::store::ExchangeStore;
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Application state shared across handlers.
///
/// Immutable once built: handlers share the adapters but no mutable data.
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub evaluator: Arc<dyn Evaluator>,
    pub store: ExchangeStore,
}

impl AppState {
    pub fn new(
        generator: Arc<dyn Generator>,
        evaluator: Arc<dyn Evaluator>,
        store: ExchangeStore,
    ) -> Self {
        Self {
            generator,
            evaluator,
            store,
        }
    }

    /// Build the production adapters from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let generator = OllamaGenerator::new(config.generation.clone())?;
        info!(
            "Generation: {} via {}",
            config.generation.model, config.generation.endpoint
        );

        let store = ExchangeStore::open(&config.storage.db_path)
            .context("Failed to initialize exchange store")?;

        Ok(Self::new(
            Arc::new(generator),
            build_evaluator(config)?,
            store,
        ))
    }
}

pub(crate) fn build_evaluator(config: &Config) -> Result<Arc<dyn Evaluator>> {
    let eval = &config.evaluation;

    if !eval.enabled {
        info!("Evaluation disabled in configuration");
        return Ok(Arc::new(DisabledEvaluator));
    }

    match eval.api_key() {
        Ok(key) => {
            info!("Evaluation: {} via {}", eval.model, eval.endpoint);
            Ok(Arc::new(GeminiEvaluator::new(eval.clone(), key)?))
        }
        Err(e) => {
            warn!("Evaluation disabled, exchanges will be stored without scores: {}", e);
            Ok(Arc::new(DisabledEvaluator))
        }
    }
}

/// Assemble the router with all route groups and layers
pub fn router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let app = Router::new()
        .merge(routes::chat_routes())
        .merge(routes::history_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(server.body_limit_bytes))
        .layer(TraceLayer::new_for_http());

    if server.cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Run the HTTP server until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config)?);
    let app = router(state, &config.server);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
