// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /embed HTTP handler
//!
//! Passes the text batch to the loaded model and wraps the vectors in
//! the response envelope. No validation of the batch beyond what the
//! JSON extractor already enforced; an empty batch comes back as an
//! empty `embeddings` array.

use axum::extract::State;
use axum::Json;
use tracing::{debug, error};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

use super::{EmbedRequest, EmbedResponse};

/// POST /embed
///
/// # Request Body
/// ```json
/// ["text1", "text2"]
/// ```
///
/// # Response Body
/// ```json
/// {"embeddings": [[0.1, 0.2, ...], [0.3, 0.4, ...]]}
/// ```
pub async fn embed_handler(
    State(state): State<AppState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    debug!(
        "Embedding batch of {} texts with {}",
        request.len(),
        state.embedder.model_name()
    );

    let embeddings = state
        .embedder
        .embed_batch(&request.texts)
        .await
        .map_err(|e| {
            error!("Embedding inference failed: {}", e);
            ApiError::InternalError(e.to_string())
        })?;

    Ok(Json(EmbedResponse { embeddings }))
}
