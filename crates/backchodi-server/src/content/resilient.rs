//! Primary generator with timeout and fallback

use backchodi_core::{BattleError, Result, ScoredResponse};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::{ContentGenerator, FallbackContent};

/// Builds a primary generator from an API key
pub type PrimaryFactory =
    Arc<dyn Fn(&str) -> Result<Arc<dyn ContentGenerator>> + Send + Sync>;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Content source used by the engine
///
/// Every method returns a usable value: the primary generator is tried first
/// (bounded by `timeout`), and any error, timeout or empty reply is replaced
/// by [`FallbackContent`].
pub struct ResilientContent {
    primary: RwLock<Option<Arc<dyn ContentGenerator>>>,
    factory: Option<PrimaryFactory>,
    fallback: FallbackContent,
    timeout: Duration,
}

impl ResilientContent {
    /// Fallback-only content
    pub fn new(fallback: FallbackContent) -> Self {
        Self {
            primary: RwLock::new(None),
            factory: None,
            fallback,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the initial primary generator
    pub fn with_primary(mut self, primary: Arc<dyn ContentGenerator>) -> Self {
        self.primary = RwLock::new(Some(primary));
        self
    }

    /// Set the factory used by [`ResilientContent::configure`]
    pub fn with_factory(mut self, factory: PrimaryFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Bound each primary call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Currently installed primary, if any
    pub async fn primary(&self) -> Option<Arc<dyn ContentGenerator>> {
        self.primary.read().await.clone()
    }

    /// Build a primary from `api_key` and install it
    pub async fn configure(&self, api_key: &str) -> Result<Arc<dyn ContentGenerator>> {
        let factory = self
            .factory
            .as_ref()
            .ok_or_else(|| BattleError::Content("no content backend available".into()))?;
        let generator = factory(api_key)?;

        *self.primary.write().await = Some(generator.clone());
        info!("Installed content generator: {}", generator.name());
        Ok(generator)
    }

    async fn attempt<T>(
        &self,
        what: &str,
        generator: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => {
                debug!("{} served {}", generator, what);
                Some(value)
            }
            Ok(Err(e)) => {
                warn!("{} failed on {}, using fallback: {}", generator, what, e);
                None
            }
            Err(_) => {
                warn!(
                    "{} timed out on {} after {:?}, using fallback",
                    generator, what, self.timeout
                );
                None
            }
        }
    }

    pub async fn challenge(&self, context: &str, target_name: &str) -> String {
        if let Some(g) = self.primary().await {
            let call = g.generate_challenge(context, target_name);
            if let Some(text) = usable(self.attempt("challenge", g.name(), call).await) {
                return text;
            }
        }
        self.fallback.challenge()
    }

    pub async fn score(&self, message: &str, ai_challenge: &str, context: &str) -> ScoredResponse {
        if let Some(primary) = self.primary().await {
            let call = primary.score_response(message, ai_challenge, context);
            if let Some(scored) = self.attempt("score", primary.name(), call).await {
                return ScoredResponse::new(scored.score, scored.feedback);
            }
        }
        self.fallback.score(message)
    }

    pub async fn verdict(&self, average_score: f64, player_name: &str) -> String {
        if let Some(g) = self.primary().await {
            let call = g.generate_verdict(average_score, player_name);
            if let Some(text) = usable(self.attempt("verdict", g.name(), call).await) {
                return text;
            }
        }
        self.fallback.verdict(average_score)
    }

    pub async fn winner_announcement(
        &self,
        first_name: &str,
        first_score: f64,
        second_name: &str,
        second_score: f64,
    ) -> String {
        if let Some(g) = self.primary().await {
            let call =
                g.generate_winner_announcement(first_name, first_score, second_name, second_score);
            if let Some(text) = usable(self.attempt("winner announcement", g.name(), call).await) {
                return text;
            }
        }
        self.fallback
            .winner_announcement(first_name, first_score, second_name, second_score)
    }

    pub async fn waiting_message(&self, context: &str) -> String {
        if let Some(g) = self.primary().await {
            let call = g.generate_waiting_message(context);
            if let Some(text) = usable(self.attempt("waiting message", g.name(), call).await) {
                return text;
            }
        }
        self.fallback.waiting_message()
    }
}

/// Trimmed reply, or `None` when the model returned nothing
fn usable(reply: Option<String>) -> Option<String> {
    reply
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testing::{BrokenContent, ScriptedContent};

    #[tokio::test]
    async fn test_without_primary_uses_fallback() {
        let content = ResilientContent::new(FallbackContent::seeded(3));
        assert!(content.primary().await.is_none());

        let scored = content.score("arre yaar!", "", "").await;
        assert!((5.5..=7.5).contains(&scored.score));
        assert!(!content.challenge("Solo battle start", "Ravi").await.is_empty());
    }

    #[tokio::test]
    async fn test_primary_reply_is_used_and_clamped() {
        let scripted = Arc::new(ScriptedContent::with_scores(&[14.0]));
        let content = ResilientContent::new(FallbackContent::seeded(3)).with_primary(scripted.clone());

        assert_eq!(content.challenge("ctx", "Ravi").await, "challenge #1 for Ravi");
        let scored = content.score("msg", "challenge", "ctx").await;
        assert_eq!(scored.score, 10.0);
        assert_eq!(scripted.score_calls(), 1);
    }

    #[tokio::test]
    async fn test_failing_primary_falls_back() {
        let content = ResilientContent::new(FallbackContent::seeded(3))
            .with_primary(Arc::new(BrokenContent::failing()));

        let verdict = content.verdict(7.5, "Ravi").await;
        assert!(verdict.contains("ULTIMATE"));
        let announcement = content.winner_announcement("A", 5.0, "B", 5.0).await;
        assert_eq!(announcement, "🤝 **IT'S A TIE!**");
        let scored = content.score("", "", "").await;
        assert!((1.0..=10.0).contains(&scored.score));
    }

    #[tokio::test]
    async fn test_empty_reply_falls_back() {
        let content = ResilientContent::new(FallbackContent::seeded(3))
            .with_primary(Arc::new(BrokenContent::blank()));
        assert!(!content.waiting_message("duel battle waiting").await.is_empty());
    }

    #[tokio::test]
    async fn test_slow_primary_times_out() {
        let content = ResilientContent::new(FallbackContent::seeded(3))
            .with_primary(Arc::new(BrokenContent::slow(Duration::from_secs(5))))
            .with_timeout(Duration::from_millis(20));

        let started = std::time::Instant::now();
        let verdict = content.verdict(3.0, "Ravi").await;
        assert!(verdict.contains("BEGINNER"));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_configure_installs_primary() {
        let bare = ResilientContent::new(FallbackContent::seeded(3));
        assert!(bare.configure("key").await.is_err());

        let factory: PrimaryFactory = Arc::new(|key: &str| {
            let generator: Arc<dyn ContentGenerator> = Arc::new(ScriptedContent::named(key));
            Ok(generator)
        });
        let content = ResilientContent::new(FallbackContent::seeded(3)).with_factory(factory);
        content.configure("xai-test").await.unwrap();

        let primary = content.primary().await.unwrap();
        assert_eq!(primary.name(), "xai-test");
    }
}
