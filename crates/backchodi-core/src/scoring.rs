//! Score types and the heuristic scorer used when no model is available

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Lowest score a message can receive
pub const MIN_SCORE: f64 = 1.0;
/// Highest score a message can receive
pub const MAX_SCORE: f64 = 10.0;
/// Score given when nothing better is known
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Slang that earns a bonus, matched case-insensitively
pub const SLANG_WORDS: &[&str] = &["lagta", "dekh", "sun", "arre", "yaar", "bhai"];

/// Emphasis markers that earn a bonus
pub const EMPHASIS_MARKERS: &[&str] = &["!", "😂", "🔥", "💯"];

/// A score together with judge feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredResponse {
    /// Score in [`MIN_SCORE`, `MAX_SCORE`]
    pub score: f64,
    /// Short feedback line shown to the player
    pub feedback: String,
}

impl ScoredResponse {
    pub fn new(score: f64, feedback: impl Into<String>) -> Self {
        Self {
            score: clamp_score(score),
            feedback: feedback.into(),
        }
    }
}

/// Clamp a score into the valid range. NaN maps to the neutral score.
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        return NEUTRAL_SCORE;
    }
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Score before jitter: length, slang and emphasis bonuses on top of the
/// neutral base.
pub fn base_score(message: &str) -> f64 {
    let mut score = NEUTRAL_SCORE;

    let length = message.chars().count();
    if (20..=100).contains(&length) {
        score += 1.0;
    } else if length > 100 {
        score += 0.5;
    }

    let lowered = message.to_lowercase();
    if SLANG_WORDS.iter().any(|word| lowered.contains(word)) {
        score += 1.0;
    }

    if EMPHASIS_MARKERS.iter().any(|marker| message.contains(marker)) {
        score += 0.5;
    }

    score
}

/// Heuristic score: [`base_score`] plus uniform jitter in [-1, 1], clamped.
pub fn heuristic_score<R: Rng + ?Sized>(message: &str, rng: &mut R) -> f64 {
    let jitter: f64 = rng.gen_range(-1.0..=1.0);
    clamp_score(base_score(message) + jitter)
}

/// Mean of a list of scores, 0.0 for an empty list
pub fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}
