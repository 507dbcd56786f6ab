// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding model layer
//!
//! The HTTP handler only sees the [`TextEmbedder`] trait; the real ONNX
//! model and the deterministic stub used in tests both implement it.

pub mod fetcher;
pub mod onnx_model;

pub use fetcher::ensure_model_files;
pub use onnx_model::OnnxEmbeddingModel;

use anyhow::Result;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Output dimension of e5-small-v2
pub const EMBEDDING_DIMENSION: usize = 384;

/// A loaded embedding model
///
/// Implementations must be safe to share across concurrent requests;
/// inference does not mutate the model.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Generates one unit-length embedding per input text, in input order.
    ///
    /// An empty input batch yields an empty output batch.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Output dimension of every embedding this model produces
    fn dimension(&self) -> usize;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

/// Deterministic stand-in for the ONNX model
///
/// Derives each vector from a hash of the input text, so tests get
/// stable, text-dependent, unit-length embeddings without model files
/// on disk.
#[derive(Debug, Clone)]
pub struct StubEmbedder {
    dimension: usize,
}

impl StubEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();

        let mut embedding = Vec::with_capacity(self.dimension);
        let mut current_seed = seed;
        for i in 0..self.dimension {
            // Linear congruential step keyed by position
            current_seed =
                (current_seed.wrapping_mul(1664525).wrapping_add(1013904223)) ^ (i as u64);
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self::new(EMBEDDING_DIMENSION)
    }
}

#[async_trait]
impl TextEmbedder for StubEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}
