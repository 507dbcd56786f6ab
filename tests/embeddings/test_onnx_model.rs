// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Tests against the real ONNX model
//!
//! These need `model.onnx` and `tokenizer.json` on disk (the service
//! downloads them on first start), so they are #[ignore]-gated:
//!
//!   cargo test --test embeddings_tests -- --ignored

use fabstir_embed_node::{OnnxEmbeddingModel, TextEmbedder, EMBEDDING_DIMENSION};

const MODEL_PATH: &str = "./models/e5-small-v2-onnx/model.onnx";
const TOKENIZER_PATH: &str = "./models/e5-small-v2-onnx/tokenizer.json";

async fn load_model() -> OnnxEmbeddingModel {
    OnnxEmbeddingModel::load("e5-small-v2", MODEL_PATH, TOKENIZER_PATH)
        .await
        .expect("Model files must be downloaded first")
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_model_load() {
    let model = load_model().await;
    assert_eq!(model.dimension(), EMBEDDING_DIMENSION);
    assert_eq!(model.model_name(), "e5-small-v2");
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_embed_batch_shape_and_norm() {
    let model = load_model().await;

    let texts = vec!["hello".to_string(), "world".to_string()];
    let embeddings = model.embed_batch(&texts).await.unwrap();

    assert_eq!(embeddings.len(), 2);
    for embedding in &embeddings {
        assert_eq!(embedding.len(), EMBEDDING_DIMENSION);

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-3, "Expected unit norm, got {}", norm);
    }
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_embed_batch_empty() {
    let model = load_model().await;
    let embeddings = model.embed_batch(&[]).await.unwrap();
    assert!(embeddings.is_empty());
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_embed_deterministic() {
    let model = load_model().await;

    let text = vec!["the same sentence".to_string()];
    let first = model.embed_batch(&text).await.unwrap();
    let second = model.embed_batch(&text).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
#[ignore] // Only run if model files are downloaded
async fn test_similar_texts_are_closer() {
    let model = load_model().await;

    let texts = vec![
        "a cat sat on the mat".to_string(),
        "a kitten rested on the rug".to_string(),
        "quarterly revenue exceeded forecasts".to_string(),
    ];
    let embeddings = model.embed_batch(&texts).await.unwrap();

    // Unit vectors, so cosine similarity is the dot product
    let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };

    let related = dot(&embeddings[0], &embeddings[1]);
    let unrelated = dot(&embeddings[0], &embeddings[2]);
    assert!(
        related > unrelated,
        "Related texts should score higher ({} vs {})",
        related,
        unrelated
    );
}
