// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! One-time model file acquisition
//!
//! If the configured model or tokenizer file is missing on disk, pull
//! the ONNX export from the HuggingFace Hub into the models directory.
//! Once both files exist this is a no-op, so restarts never re-download.

use crate::config::ServiceConfig;
use anyhow::{Context, Result};
use hf_hub::api::sync::Api;
use std::path::Path;
use tracing::info;

/// Filename of the ONNX encoder inside the Hub repo
const HUB_MODEL_FILE: &str = "onnx/model.onnx";

/// Filename of the tokenizer inside the Hub repo
const HUB_TOKENIZER_FILE: &str = "tokenizer.json";

/// Ensures model and tokenizer files exist at the configured paths
///
/// Downloads from `config.model_repo` only for files not already on
/// disk. The hf-hub API is blocking, so the download runs on the
/// blocking thread pool.
pub async fn ensure_model_files(config: &ServiceConfig) -> Result<()> {
    if config.model_path.exists() && config.tokenizer_path.exists() {
        info!(
            "Model files already present in {}",
            config.models_dir.display()
        );
        return Ok(());
    }

    let repo = config.model_repo.clone();
    let models_dir = config.models_dir.clone();
    let model_path = config.model_path.clone();
    let tokenizer_path = config.tokenizer_path.clone();

    info!("Downloading model files from {}", repo);

    tokio::task::spawn_blocking(move || -> Result<()> {
        std::fs::create_dir_all(&models_dir).context(format!(
            "Failed to create models directory {}",
            models_dir.display()
        ))?;

        let api = Api::new().context("Failed to create HuggingFace Hub client")?;
        let hub_repo = api.model(repo.clone());

        if !model_path.exists() {
            let cached = hub_repo
                .get(HUB_MODEL_FILE)
                .context(format!("Failed to download {} from {}", HUB_MODEL_FILE, repo))?;
            place_file(&cached, &model_path)?;
            info!("Downloaded ONNX model to {}", model_path.display());
        }

        if !tokenizer_path.exists() {
            let cached = hub_repo.get(HUB_TOKENIZER_FILE).context(format!(
                "Failed to download {} from {}",
                HUB_TOKENIZER_FILE, repo
            ))?;
            place_file(&cached, &tokenizer_path)?;
            info!("Downloaded tokenizer to {}", tokenizer_path.display());
        }

        Ok(())
    })
    .await
    .context("Model download task panicked")?
}

/// Copies a file from the Hub cache into the models directory
fn place_file(cached: &Path, target: &Path) -> Result<()> {
    std::fs::copy(cached, target).context(format!(
        "Failed to copy {} to {}",
        cached.display(),
        target.display()
    ))?;
    Ok(())
}
