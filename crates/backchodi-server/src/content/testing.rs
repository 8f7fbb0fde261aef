//! Generator doubles for tests

use async_trait::async_trait;
use backchodi_core::{BattleError, Result, ScoredResponse};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::ContentGenerator;

/// One recorded `score_response` call
#[derive(Debug, Clone)]
pub struct ScoreCall {
    pub message: String,
    pub ai_challenge: String,
    pub context: String,
}

/// Deterministic generator: numbered challenges and scripted scores
pub struct ScriptedContent {
    name: String,
    scores: Vec<f64>,
    challenges: AtomicUsize,
    calls: Mutex<Vec<ScoreCall>>,
}

impl ScriptedContent {
    /// Scores are handed out in order; the last one repeats
    pub fn with_scores(scores: &[f64]) -> Self {
        Self {
            name: "scripted".into(),
            scores: scores.to_vec(),
            challenges: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.into(),
            ..Self::with_scores(&[5.0])
        }
    }

    pub fn score_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<ScoreCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for ScriptedContent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_challenge(&self, _context: &str, target_name: &str) -> Result<String> {
        let n = self.challenges.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("challenge #{} for {}", n, target_name))
    }

    async fn score_response(
        &self,
        message: &str,
        ai_challenge: &str,
        context: &str,
    ) -> Result<ScoredResponse> {
        let mut calls = self.calls.lock().unwrap();
        let score = self
            .scores
            .get(calls.len())
            .or(self.scores.last())
            .copied()
            .unwrap_or(5.0);
        calls.push(ScoreCall {
            message: message.into(),
            ai_challenge: ai_challenge.into(),
            context: context.into(),
        });
        Ok(ScoredResponse {
            score,
            feedback: format!("scored {:.1}", score),
        })
    }

    async fn generate_verdict(&self, average_score: f64, player_name: &str) -> Result<String> {
        Ok(format!("{} averaged {:.1}", player_name, average_score))
    }

    async fn generate_winner_announcement(
        &self,
        first_name: &str,
        first_score: f64,
        second_name: &str,
        second_score: f64,
    ) -> Result<String> {
        Ok(format!(
            "{} {:.1} vs {} {:.1}",
            first_name, first_score, second_name, second_score
        ))
    }

    async fn generate_waiting_message(&self, _context: &str) -> Result<String> {
        Ok("keep going".into())
    }
}

enum Fault {
    Fail,
    Blank,
    Slow(Duration),
}

/// Generator that misbehaves in a fixed way
pub struct BrokenContent {
    fault: Fault,
}

impl BrokenContent {
    pub fn failing() -> Self {
        Self { fault: Fault::Fail }
    }

    pub fn blank() -> Self {
        Self { fault: Fault::Blank }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            fault: Fault::Slow(delay),
        }
    }

    async fn reply(&self) -> Result<String> {
        match self.fault {
            Fault::Fail => Err(BattleError::Content("backend down".into())),
            Fault::Blank => Ok("   ".into()),
            Fault::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok("too late".into())
            }
        }
    }
}

#[async_trait]
impl ContentGenerator for BrokenContent {
    fn name(&self) -> &str {
        "broken"
    }

    async fn generate_challenge(&self, _context: &str, _target_name: &str) -> Result<String> {
        self.reply().await
    }

    async fn score_response(
        &self,
        _message: &str,
        _ai_challenge: &str,
        _context: &str,
    ) -> Result<ScoredResponse> {
        self.reply().await?;
        Err(BattleError::Content("unparseable score".into()))
    }

    async fn generate_verdict(&self, _average_score: f64, _player_name: &str) -> Result<String> {
        self.reply().await
    }

    async fn generate_winner_announcement(
        &self,
        _first_name: &str,
        _first_score: f64,
        _second_name: &str,
        _second_score: f64,
    ) -> Result<String> {
        self.reply().await
    }

    async fn generate_waiting_message(&self, _context: &str) -> Result<String> {
        self.reply().await
    }
}
