//! Agromind AI Server
//!
//! HTTP front for the inference core.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     AGROMIND SERVER                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐        ┌───────────────────────────────────┐ │
//! │  │  Router   │ ─────▶ │  spawn_blocking                   │ │
//! │  │  (Axum)   │        │  Engine (crop / pest)             │ │
//! │  └───────────┘        └────────────────┬──────────────────┘ │
//! │                                        ▼                    │
//! │                               ┌─────────────────┐           │
//! │                               │  ModelRegistry  │           │
//! │                               │  (ONNX models)  │           │
//! │                               └─────────────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agromind_core::{Engine, ModelConfig};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging; `log` records from the core are bridged in
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "agromind_server=debug,agromind_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();
    let model_config = ModelConfig::from_env();

    tracing::info!("Agromind AI Server starting ({})...", config.environment);
    tracing::info!("Crop model: {}", model_config.crop_model_path.display());
    tracing::info!("Vision model: {}", model_config.vision_model_path.display());

    // Load models off the runtime threads; failures leave the fallbacks active
    let engine = Arc::new(Engine::new(model_config));
    let loader = Arc::clone(&engine);
    tokio::task::spawn_blocking(move || loader.load())
        .await
        .context("model loading task panicked")?;

    let status = engine.status();
    tracing::info!(
        crop_loaded = status.crop_model.loaded,
        vision_loaded = status.vision_model.loaded,
        "Model registry ready"
    );

    // Build application state
    let state = AppState {
        engine,
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let ml_routes = Router::new()
        .route("/api/v1/ml/status", get(handlers::ml::status))
        .route("/api/v1/ml/crop-recommendation", post(handlers::ml::crop_recommendation))
        .route("/api/v1/ml/crop-recommendation/top", post(handlers::ml::top_crops))
        .route("/api/v1/ml/pest-detection", post(handlers::ml::pest_detection));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(ml_routes)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
