//! # backchodi-xai
//!
//! Grok-backed [`ContentGenerator`](backchodi_server::ContentGenerator).
//!
//! Talks to the x.ai chat completions API. The server wraps this generator
//! in its resilient layer, so every error here ends up as a fallback reply
//! rather than a failed tool call.

mod client;
mod parse;
mod prompt;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MODEL, XaiConfig, XaiContent, factory};
pub use parse::parse_score_reply;

use backchodi_core::BattleError;
use thiserror::Error;

/// Errors from the x.ai client
#[derive(Debug, Error)]
pub enum XaiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Empty reply from model")]
    EmptyReply,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<XaiError> for BattleError {
    fn from(e: XaiError) -> Self {
        BattleError::Content(e.to_string())
    }
}
