//! x.ai chat completions client

use async_trait::async_trait;
use backchodi_core::{Result, ScoredResponse};
use backchodi_server::{ContentGenerator, PrimaryFactory};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::XaiError;
use crate::parse::parse_score_reply;
use crate::prompt::{self, Prompt};

pub const DEFAULT_BASE_URL: &str = "https://api.x.ai/v1";
pub const DEFAULT_MODEL: &str = "grok-3-beta";

const CREATIVE_TEMPERATURE: f32 = 0.9;
const JUDGE_TEMPERATURE: f32 = 0.3;

/// Connection settings for the x.ai API
#[derive(Debug, Clone)]
pub struct XaiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Per-request timeout on the HTTP client
    pub timeout: Duration,
}

impl XaiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }
}

/// Grok content generator
pub struct XaiContent {
    client: Client,
    base_url: String,
    config: XaiConfig,
}

impl XaiContent {
    pub fn new(config: XaiConfig) -> std::result::Result<Self, XaiError> {
        if config.api_key.trim().is_empty() {
            return Err(XaiError::Config("API key is empty".into()));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Run one chat completion and return the first choice's text
    async fn complete(
        &self,
        prompt: Prompt,
        temperature: f32,
    ) -> std::result::Result<String, XaiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.config.api_key.trim())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            return Err(XaiError::Api(format!("{}: {}", status, error_text)));
        }

        let completion: ChatResponse = response.json().await?;
        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(XaiError::EmptyReply)?;

        debug!("{} replied with {} chars", self.config.model, text.len());
        Ok(text)
    }
}

#[async_trait]
impl ContentGenerator for XaiContent {
    fn name(&self) -> &str {
        "grok"
    }

    async fn generate_challenge(&self, context: &str, target_name: &str) -> Result<String> {
        let prompt = prompt::challenge(context, target_name);
        Ok(self.complete(prompt, CREATIVE_TEMPERATURE).await?)
    }

    async fn score_response(
        &self,
        message: &str,
        ai_challenge: &str,
        context: &str,
    ) -> Result<ScoredResponse> {
        let prompt = prompt::score(message, ai_challenge, context);
        let reply = self.complete(prompt, JUDGE_TEMPERATURE).await?;
        Ok(parse_score_reply(&reply))
    }

    async fn generate_verdict(&self, average_score: f64, player_name: &str) -> Result<String> {
        let prompt = prompt::verdict(average_score, player_name);
        Ok(self.complete(prompt, CREATIVE_TEMPERATURE).await?)
    }

    async fn generate_winner_announcement(
        &self,
        first_name: &str,
        first_score: f64,
        second_name: &str,
        second_score: f64,
    ) -> Result<String> {
        let prompt =
            prompt::winner_announcement(first_name, first_score, second_name, second_score);
        Ok(self.complete(prompt, CREATIVE_TEMPERATURE).await?)
    }

    async fn generate_waiting_message(&self, context: &str) -> Result<String> {
        let prompt = prompt::waiting_message(context);
        Ok(self.complete(prompt, CREATIVE_TEMPERATURE).await?)
    }
}

/// Factory that builds a fresh [`XaiContent`] from `base` with a new key
pub fn factory(base: XaiConfig) -> PrimaryFactory {
    Arc::new(move |api_key: &str| -> Result<Arc<dyn ContentGenerator>> {
        let generator = XaiContent::new(base.clone().with_api_key(api_key))?;
        let generator: Arc<dyn ContentGenerator> = Arc::new(generator);
        Ok(generator)
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}
