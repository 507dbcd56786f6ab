// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Service configuration from environment variables
//!
//! All settings have defaults that match the original deployment:
//! listen on all interfaces at port 8001, model files under
//! `./models/e5-small-v2-onnx/`.

use std::env;
use std::path::PathBuf;

/// Configuration for the embedding service
///
/// # Environment Variables
/// - `API_HOST`: Listen address (default: "0.0.0.0")
/// - `API_PORT`: Listen port (default: 8001)
/// - `MODELS_DIR`: Directory holding model files (default: "./models/e5-small-v2-onnx")
/// - `MODEL_PATH`: Path to ONNX model file (default: `<MODELS_DIR>/model.onnx`)
/// - `TOKENIZER_PATH`: Path to tokenizer JSON (default: `<MODELS_DIR>/tokenizer.json`)
/// - `EMBEDDING_MODEL_REPO`: HuggingFace repo with the ONNX export
///   (default: "Xenova/e5-small-v2")
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listen address for the HTTP server
    pub host: String,

    /// Listen port for the HTTP server
    pub port: u16,

    /// Directory where model files live (download target)
    pub models_dir: PathBuf,

    /// Path to the ONNX model file
    pub model_path: PathBuf,

    /// Path to the tokenizer JSON file
    pub tokenizer_path: PathBuf,

    /// HuggingFace Hub repo to fetch model files from when missing on disk
    pub model_repo: String,

    /// Embedding model name reported in logs
    pub model_name: String,
}

impl ServiceConfig {
    /// Builds the configuration from environment variables, applying defaults
    pub fn from_env() -> Self {
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8001);

        let models_dir = PathBuf::from(
            env::var("MODELS_DIR").unwrap_or_else(|_| "./models/e5-small-v2-onnx".to_string()),
        );

        let model_path = env::var("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| models_dir.join("model.onnx"));
        let tokenizer_path = env::var("TOKENIZER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| models_dir.join("tokenizer.json"));

        let model_repo =
            env::var("EMBEDDING_MODEL_REPO").unwrap_or_else(|_| "Xenova/e5-small-v2".to_string());

        Self {
            host,
            port,
            models_dir,
            model_path,
            tokenizer_path,
            model_repo,
            model_name: "e5-small-v2".to_string(),
        }
    }

    /// Returns the socket address string the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
