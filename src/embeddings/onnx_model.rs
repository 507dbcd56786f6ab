// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX wrapper for the e5-small-v2 sentence transformer
//!
//! Loads the ONNX export of intfloat/e5-small-v2 plus its tokenizer and
//! turns text batches into 384-dimensional unit vectors:
//! tokenize with padding, run the encoder, mean-pool token embeddings
//! over the attention mask, then L2-normalize.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

use super::{TextEmbedder, EMBEDDING_DIMENSION};

/// ONNX-based embedding model (e5-small-v2)
///
/// The session is behind `Arc<Mutex>` because ort sessions need `&mut`
/// to run; the tokenizer is shared read-only. Cloning is cheap.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads the model and tokenizer from disk
    ///
    /// Runs one throwaway inference after loading to verify the model
    /// outputs `[batch, seq_len, 384]`; startup fails otherwise.
    ///
    /// # Errors
    /// Returns an error if either file is missing, the ONNX session
    /// cannot be created, or the output shape is not the expected one.
    pub async fn load<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        info!("Loading ONNX embedding model: {}", model_name);
        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .context(format!(
                "Failed to load ONNX model from {}",
                model_path.display()
            ))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        let model = Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension: EMBEDDING_DIMENSION,
        };

        // Validation inference: one short text through the full pipeline
        let probe = model.encode_batch(&["validation test".to_string()])?;
        if probe.len() != 1 || probe[0].len() != EMBEDDING_DIMENSION {
            anyhow::bail!(
                "Model validation inference returned unexpected shape: {} vectors of {} dims",
                probe.len(),
                probe.first().map(|v| v.len()).unwrap_or(0)
            );
        }

        info!(
            "Embedding model loaded: {} ({} dimensions)",
            model.model_name, model.dimension
        );

        Ok(model)
    }

    /// Tokenizes, runs inference, pools and normalizes a batch of texts
    fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings: Vec<_> = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(text.as_str(), true)
                    .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        // Pad every sequence to the longest one in the batch
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(texts.len() * max_len);
        let mut attention_mask = Vec::with_capacity(texts.len() * max_len);
        let mut token_type_ids = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(mask.iter().map(|&m| m as i64));
            token_type_ids.extend(std::iter::repeat(0i64).take(ids.len()));

            let padding = max_len - ids.len();
            input_ids.extend(std::iter::repeat(0i64).take(padding));
            attention_mask.extend(std::iter::repeat(0i64).take(padding));
            token_type_ids.extend(std::iter::repeat(0i64).take(padding));
        }

        let mask_for_pooling = attention_mask.clone();

        let input_ids_array = Array2::from_shape_vec((texts.len(), max_len), input_ids)
            .context("Failed to create batch input_ids array")?;
        let attention_mask_array = Array2::from_shape_vec((texts.len(), max_len), attention_mask)
            .context("Failed to create batch attention_mask array")?;
        let token_type_ids_array = Array2::from_shape_vec((texts.len(), max_len), token_type_ids)
            .context("Failed to create batch token_type_ids array")?;

        // Lock the session for the duration of the inference call
        let mut session = self.session.lock().unwrap();
        let outputs = session.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids_array)?,
            "attention_mask" => Value::from_array(attention_mask_array)?,
            "token_type_ids" => Value::from_array(token_type_ids_array)?
        ])?;

        // Output index 0 holds token-level embeddings: [batch, seq_len, hidden_dim]
        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch_idx in 0..texts.len() {
            let token_embeddings = output_array.index_axis(Axis(0), batch_idx);
            let seq_len = token_embeddings.shape()[0];
            let hidden_dim = token_embeddings.shape()[1];

            let item_mask = &mask_for_pooling[batch_idx * max_len..(batch_idx + 1) * max_len];

            // Mean pooling weighted by the attention mask so padding
            // tokens do not contribute
            let mut pooled = vec![0.0f32; hidden_dim];
            let mut mask_sum = 0.0f32;
            for i in 0..seq_len {
                let mask_value = item_mask[i] as f32;
                mask_sum += mask_value;
                for j in 0..hidden_dim {
                    pooled[j] += token_embeddings[[i, j]] * mask_value;
                }
            }
            for value in &mut pooled {
                *value /= mask_sum.max(1e-9);
            }

            l2_normalize(&mut pooled);

            if pooled.len() != self.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    batch_idx,
                    pooled.len(),
                    self.dimension
                );
            }

            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbeddingModel {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.encode_batch(texts)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Scales a vector in place to unit Euclidean length
fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
