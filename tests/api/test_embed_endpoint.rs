// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end tests for POST /embed
//!
//! These tests drive the full router with a deterministic stub
//! embedder, so they exercise the wire format without model files:
//! - bare JSON array in, `{"embeddings": [[...]]}` out
//! - one unit-length vector per input, in input order
//! - empty batch passes through as an empty array
//! - malformed bodies are rejected by the framework's JSON extractor
//! - inference failure surfaces as a 500 with the error envelope

use anyhow::Result;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use fabstir_embed_node::{
    build_router, AppState, StubEmbedder, TextEmbedder, EMBEDDING_DIMENSION,
};
use std::sync::Arc;
use tower::ServiceExt;

/// Embedder whose inference always fails, for the error-path tests
struct FailingEmbedder;

#[async_trait]
impl TextEmbedder for FailingEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        anyhow::bail!("inference backend unavailable")
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    fn model_name(&self) -> &str {
        "failing"
    }
}

fn test_router() -> axum::Router {
    build_router(AppState::new(Arc::new(StubEmbedder::default())))
}

fn failing_router() -> axum::Router {
    build_router(AppState::new(Arc::new(FailingEmbedder)))
}

fn embed_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/embed")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_embed_two_texts() {
    let response = test_router()
        .oneshot(embed_request(r#"["hello", "world"]"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    let embeddings = json["embeddings"].as_array().expect("embeddings array");
    assert_eq!(embeddings.len(), 2, "One embedding per input text");

    for embedding in embeddings {
        let vector = embedding.as_array().expect("numeric array");
        assert_eq!(vector.len(), EMBEDDING_DIMENSION);

        let norm: f64 = vector
            .iter()
            .map(|v| {
                let x = v.as_f64().expect("float element");
                x * x
            })
            .sum::<f64>()
            .sqrt();
        assert!(
            (norm - 1.0).abs() < 0.01,
            "Embedding should be unit length, got norm {}",
            norm
        );
    }
}

#[tokio::test]
async fn test_embed_preserves_order() {
    let forward = response_json(
        test_router()
            .oneshot(embed_request(r#"["alpha", "beta"]"#))
            .await
            .unwrap(),
    )
    .await;
    let reversed = response_json(
        test_router()
            .oneshot(embed_request(r#"["beta", "alpha"]"#))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(forward["embeddings"][0], reversed["embeddings"][1]);
    assert_eq!(forward["embeddings"][1], reversed["embeddings"][0]);
}

#[tokio::test]
async fn test_embed_is_deterministic() {
    let first = response_json(
        test_router()
            .oneshot(embed_request(r#"["same text"]"#))
            .await
            .unwrap(),
    )
    .await;
    let second = response_json(
        test_router()
            .oneshot(embed_request(r#"["same text"]"#))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_embed_empty_batch() {
    let response = test_router().oneshot(embed_request("[]")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = response_json(response).await;
    assert_eq!(json["embeddings"], serde_json::json!([]));
}

#[tokio::test]
async fn test_embed_rejects_object_body() {
    let response = test_router()
        .oneshot(embed_request(r#"{"texts": ["hello"]}"#))
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "Object body should be a client error, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_embed_rejects_non_string_elements() {
    let response = test_router()
        .oneshot(embed_request("[1, 2, 3]"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_embed_rejects_invalid_json() {
    let response = test_router()
        .oneshot(embed_request("not json at all"))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_inference_failure_returns_500_with_error_envelope() {
    let response = failing_router()
        .oneshot(embed_request(r#"["hello"]"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = response_json(response).await;
    assert_eq!(json["error_type"], "internal_error");
    let message = json["message"].as_str().expect("message string");
    assert!(
        message.contains("inference backend unavailable"),
        "Error message should carry the inference failure, got {:?}",
        message
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = test_router()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
