//! Canned content and heuristic scoring

use async_trait::async_trait;
use backchodi_core::{Result, ScoredResponse, heuristic_score};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::Mutex;

use super::ContentGenerator;

const STARTERS: &[&str] = &[
    "Arre yaar, tumhara fashion sense itna outdated hai ki museum mein display kar dete hain!",
    "Tumhari cooking skills dekh kar lagta hai khana bhi tumse door bhagta hai!",
    "Tumhara sense of humor itna dry hai ki Sahara desert bhi paani maang raha hai!",
    "Arre yaar, tumhara style dekh kar lagta hai fashion week se ban kar aaye ho!",
    "Tumhara confidence level dekh kar lagta hai mirror bhi jhooth bol raha hai!",
];

const FEEDBACK_HIGH: &[&str] = &[
    "Ekdum mast! Sach mein backchod ho tum! 👏",
    "Perfect! Ye backchodi ke liye Nobel prize milna chahiye! 🏆",
];

const FEEDBACK_MID: &[&str] = &[
    "Waah bhai, ekdum solid comeback! 🔥",
    "Good attempt, but thoda aur spice chahiye tha! 🌶️",
];

const FEEDBACK_LOW: &[&str] = &[
    "Thoda weak tha yaar, but effort ke liye marks milenge! 😅",
    "Arre yaar, ye kya tha? Bachpan wali jokes mat maro! 🤨",
];

const WAITING: &[&str] = &[
    "⏳ Waiting for the next move...",
    "🔥 Battle is heating up!",
    "🎮 Game in progress...",
    "💪 Bring your A-game!",
];

/// Generator that never fails: fixed lines plus the heuristic scorer
pub struct FallbackContent {
    rng: Mutex<StdRng>,
}

impl FallbackContent {
    /// Fallback seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Fallback with a fixed seed, for reproducible games
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    fn pick(&self, lines: &[&'static str]) -> String {
        self.with_rng(|rng| lines.choose(rng).copied().unwrap_or_default())
            .to_string()
    }

    pub fn challenge(&self) -> String {
        self.pick(STARTERS)
    }

    pub fn score(&self, message: &str) -> ScoredResponse {
        let score = self.with_rng(|rng| heuristic_score(message, rng));
        ScoredResponse::new(score, self.feedback(score))
    }

    /// Feedback line for a score: excellent from 8, good from 6
    pub fn feedback(&self, score: f64) -> String {
        if score >= 8.0 {
            self.pick(FEEDBACK_HIGH)
        } else if score >= 6.0 {
            self.pick(FEEDBACK_MID)
        } else {
            self.pick(FEEDBACK_LOW)
        }
    }

    pub fn verdict(&self, average_score: f64) -> String {
        if average_score >= 7.0 {
            "🏆 **ULTIMATE BACKCHOD!** You're a legend! 👑".to_string()
        } else if average_score >= 5.0 {
            "🔥 **DECENT BACKCHOD!** Not bad, keep practicing! 👍".to_string()
        } else {
            "😅 **BEGINNER BACKCHOD!** You need more practice! 💪".to_string()
        }
    }

    pub fn winner_announcement(
        &self,
        first_name: &str,
        first_score: f64,
        second_name: &str,
        second_score: f64,
    ) -> String {
        if first_score > second_score {
            format!("🏆 **{} WINS!**", first_name)
        } else if second_score > first_score {
            format!("🏆 **{} WINS!**", second_name)
        } else {
            "🤝 **IT'S A TIE!**".to_string()
        }
    }

    pub fn waiting_message(&self) -> String {
        self.pick(WAITING)
    }
}

impl Default for FallbackContent {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for FallbackContent {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn generate_challenge(&self, _context: &str, _target_name: &str) -> Result<String> {
        Ok(self.challenge())
    }

    async fn score_response(
        &self,
        message: &str,
        _ai_challenge: &str,
        _context: &str,
    ) -> Result<ScoredResponse> {
        Ok(self.score(message))
    }

    async fn generate_verdict(&self, average_score: f64, _player_name: &str) -> Result<String> {
        Ok(self.verdict(average_score))
    }

    async fn generate_winner_announcement(
        &self,
        first_name: &str,
        first_score: f64,
        second_name: &str,
        second_score: f64,
    ) -> Result<String> {
        Ok(self.winner_announcement(first_name, first_score, second_name, second_score))
    }

    async fn generate_waiting_message(&self, _context: &str) -> Result<String> {
        Ok(self.waiting_message())
    }
}
