//! Application configuration

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use backchodi_core::DEFAULT_MAX_ROUNDS;
use backchodi_xai::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// How MCP clients reach the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Http,
    Stdio,
}

impl FromStr for TransportKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(TransportKind::Http),
            "stdio" => Ok(TransportKind::Stdio),
            other => bail!("BACKCHODI_TRANSPORT must be \"http\" or \"stdio\", got {:?}", other),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token required on `POST /mcp`
    pub auth_token: Option<String>,
    /// Returned by the `validate` tool
    pub my_number: String,

    /// x.ai key; without it only fallback content is served
    pub xai_api_key: Option<String>,
    pub xai_base_url: String,
    pub xai_model: String,
    pub llm_timeout: Duration,

    pub transport: TransportKind,
    pub bind: SocketAddr,
    pub max_rounds: u32,
    /// Seed for fallback randomness
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let transport: TransportKind = get("BACKCHODI_TRANSPORT")
            .unwrap_or_else(|| "http".to_string())
            .parse()?;

        let auth_token = get("AUTH_TOKEN");
        if transport == TransportKind::Http && auth_token.is_none() {
            bail!("AUTH_TOKEN environment variable is required for the http transport");
        }

        let max_rounds: u32 = match get("BACKCHODI_MAX_ROUNDS") {
            Some(v) => v
                .parse()
                .context("BACKCHODI_MAX_ROUNDS must be a positive integer")?,
            None => DEFAULT_MAX_ROUNDS,
        };
        if max_rounds == 0 {
            bail!("BACKCHODI_MAX_ROUNDS must be at least 1");
        }

        Ok(Self {
            auth_token,
            my_number: get("MY_NUMBER").context("MY_NUMBER environment variable is required")?,

            xai_api_key: get("XAI_API_KEY"),
            xai_base_url: get("XAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            xai_model: get("XAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout: Duration::from_secs(
                get("LLM_TIMEOUT_SECS")
                    .unwrap_or_else(|| "20".to_string())
                    .parse()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),

            transport,
            bind: get("BACKCHODI_BIND")
                .unwrap_or_else(|| "0.0.0.0:8086".to_string())
                .parse()
                .context("BACKCHODI_BIND must be a socket address like 0.0.0.0:8086")?,
            max_rounds,
            seed: get("BACKCHODI_SEED")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("BACKCHODI_SEED must be an unsigned integer")?,
        })
    }
}
