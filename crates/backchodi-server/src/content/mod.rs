//! Content generator capability
//!
//! The engine never talks to a model directly. It goes through
//! [`ResilientContent`], which tries an optional primary generator and falls
//! back to [`FallbackContent`] whenever the primary fails or times out.

mod fallback;
mod resilient;
#[cfg(test)]
pub(crate) mod testing;

pub use fallback::FallbackContent;
pub use resilient::{PrimaryFactory, ResilientContent};

use async_trait::async_trait;
use backchodi_core::{Result, ScoredResponse};

/// Trait for anything that can write and judge battle content
///
/// Implement this trait to plug a model backend into the server. Every method
/// may fail; callers are expected to substitute a local fallback.
#[async_trait]
pub trait ContentGenerator: Send + Sync + 'static {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Write a challenge (roast) aimed at `target_name`
    async fn generate_challenge(&self, context: &str, target_name: &str) -> Result<String>;

    /// Judge a player's reply to `ai_challenge`
    async fn score_response(
        &self,
        message: &str,
        ai_challenge: &str,
        context: &str,
    ) -> Result<ScoredResponse>;

    /// Closing verdict for a solo game
    async fn generate_verdict(&self, average_score: f64, player_name: &str) -> Result<String>;

    /// Closing announcement for a duel
    async fn generate_winner_announcement(
        &self,
        first_name: &str,
        first_score: f64,
        second_name: &str,
        second_score: f64,
    ) -> Result<String>;

    /// Filler line while a duel waits on the next message
    async fn generate_waiting_message(&self, context: &str) -> Result<String>;
}
