// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response type for POST /embed
//!
//! ```json
//! {
//!   "embeddings": [
//!     [0.1, 0.2, ...],
//!     [0.3, 0.4, ...]
//!   ]
//! }
//! ```
//!
//! One inner array per input text, in input order, each of the model's
//! fixed dimension.

use serde::{Deserialize, Serialize};

/// Batch of embedding vectors, one per input text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
}

impl EmbedResponse {
    /// Number of embeddings in the response
    pub fn embedding_count(&self) -> usize {
        self.embeddings.len()
    }
}

impl From<Vec<Vec<f32>>> for EmbedResponse {
    fn from(embeddings: Vec<Vec<f32>>) -> Self {
        Self { embeddings }
    }
}
