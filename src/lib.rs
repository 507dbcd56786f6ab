// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod embeddings;
pub mod version;

// Re-export main types
pub use api::{build_router, start_server, ApiError, AppState, EmbedRequest, EmbedResponse};
pub use config::ServiceConfig;
pub use embeddings::{OnnxEmbeddingModel, StubEmbedder, TextEmbedder, EMBEDDING_DIMENSION};
