use std::sync::Arc;

use anyhow::Context;
use digimplant_model::openai::{OpenAIClient, OpenAIConfig};
use digimplant_server::{AppState, ServerConfig, run_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let openai = OpenAIConfig::from_env().context("OpenAI configuration is incomplete")?;
    let generator = Arc::new(OpenAIClient::new(openai)?);
    let state = AppState::from_config(&config, generator)?;

    run_server(config, state).await
}
