// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use fabstir_embed_node::{
    api::start_server,
    config::ServiceConfig,
    embeddings::{ensure_model_files, OnnxEmbeddingModel},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    println!("🚀 Starting Fabstir Embed Node...");
    println!("📦 BUILD VERSION: {}", fabstir_embed_node::version::VERSION);
    println!("📅 Build Date: {}", fabstir_embed_node::version::BUILD_DATE);
    println!();

    let config = ServiceConfig::from_env();

    // Model acquisition and one-time load; the model lives for the
    // process lifetime and is shared read-only across requests
    ensure_model_files(&config).await?;
    let model = OnnxEmbeddingModel::load(
        config.model_name.clone(),
        config.model_path.clone(),
        config.tokenizer_path.clone(),
    )
    .await?;

    start_server(&config, Arc::new(model)).await
}
