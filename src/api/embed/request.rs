// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request type for POST /embed
//!
//! The wire format is a bare JSON array of strings, not an object:
//!
//! ```json
//! ["Hello world", "Another text"]
//! ```
//!
//! The wrapper is `#[serde(transparent)]` so the handler still works
//! with a named type. No length or content constraints are enforced;
//! anything that deserializes as `Vec<String>` is passed to the model.

use serde::{Deserialize, Serialize};

/// Batch of texts to embed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbedRequest {
    pub texts: Vec<String>,
}

impl EmbedRequest {
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
