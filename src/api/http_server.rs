// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! HTTP server wiring
//!
//! Builds the axum router and starts the listener. The loaded model is
//! injected through [`AppState`] rather than reached through a global,
//! so tests can drive the same router with a stub embedder.

use axum::{routing::post, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::embeddings::TextEmbedder;

use super::embed::embed_handler;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    /// Model loaded once at startup, read-only afterwards
    pub embedder: Arc<dyn TextEmbedder>,
}

impl AppState {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }
}

/// Builds the service router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/embed", post(embed_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until ctrl-c
pub async fn start_server(config: &ServiceConfig, embedder: Arc<dyn TextEmbedder>) -> anyhow::Result<()> {
    let app = build_router(AppState::new(embedder));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!("Embedding API listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
