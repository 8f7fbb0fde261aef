//! Backchodi Battle MCP Server
//!
//! Serves the game over HTTP (`POST /mcp`, bearer token) or stdio. Content
//! comes from Grok when `XAI_API_KEY` is set, with canned lines and heuristic
//! scoring as the fallback.

mod config;

use anyhow::{Context, Result};
use backchodi_server::transport::{http, stdio};
use backchodi_server::{
    BattleEngine, BattleServer, EngineConfig, FallbackContent, ResilientContent, SessionStore,
};
use backchodi_xai::{XaiConfig, XaiContent, factory};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::{AppConfig, TransportKind};

fn build_content(config: &AppConfig) -> Result<ResilientContent> {
    let fallback = match config.seed {
        Some(seed) => {
            info!("Fallback content seeded with {}", seed);
            FallbackContent::seeded(seed)
        }
        None => FallbackContent::new(),
    };

    let xai = XaiConfig {
        api_key: String::new(),
        base_url: config.xai_base_url.clone(),
        model: config.xai_model.clone(),
        timeout: config.llm_timeout,
    };

    let mut content = ResilientContent::new(fallback)
        .with_timeout(config.llm_timeout)
        .with_factory(factory(xai.clone()));

    match &config.xai_api_key {
        Some(key) => {
            let grok = XaiContent::new(xai.with_api_key(key.as_str()))
                .context("Failed to build x.ai client")?;
            info!("Grok content enabled (model {})", grok.model());
            content = content.with_primary(Arc::new(grok));
        }
        None => warn!("XAI_API_KEY not set, serving fallback content only"),
    }

    Ok(content)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = AppConfig::from_env()?;
    info!(
        "Backchodi Battle MCP server starting ({:?}, {} rounds)",
        config.transport, config.max_rounds
    );

    let content = build_content(&config)?;
    let engine = BattleEngine::new(
        SessionStore::new(),
        Arc::new(content),
        EngineConfig::new(config.max_rounds),
    );
    let server = Arc::new(BattleServer::new(engine, config.my_number.clone()));

    match config.transport {
        TransportKind::Stdio => stdio::run(&server).await?,
        TransportKind::Http => {
            let token = config
                .auth_token
                .as_deref()
                .context("AUTH_TOKEN is required for the http transport")?;
            http::serve(server, config.bind, token).await?;
        }
    }

    info!("Server stopped");
    Ok(())
}
