//! Score reply parsing

use backchodi_core::{NEUTRAL_SCORE, ScoredResponse};
use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("invalid number regex"));

const DEFAULT_FEEDBACK: &str = "Good attempt! 👍";

/// Read a model's score reply
///
/// Expects `SCORE|FEEDBACK`. Failing that, the first number anywhere in the
/// reply is the score and the whole reply is the feedback. A reply with no
/// number scores 5.0. Scores are always clamped to [1, 10].
pub fn parse_score_reply(reply: &str) -> ScoredResponse {
    if let Some((score, feedback)) = reply.split_once('|') {
        if let Ok(score) = score.trim().parse::<f64>() {
            return ScoredResponse::new(score, feedback.trim());
        }
    }

    if let Some(score) = NUMBER
        .find(reply)
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        return ScoredResponse::new(score, reply);
    }

    ScoredResponse::new(NEUTRAL_SCORE, DEFAULT_FEEDBACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_format() {
        let scored = parse_score_reply("7.5|Ekdum mast! Good use of slang! 🔥");
        assert_eq!(scored.score, 7.5);
        assert_eq!(scored.feedback, "Ekdum mast! Good use of slang! 🔥");

        let spaced = parse_score_reply("  9 | Waah bhai |extra ");
        assert_eq!(spaced.score, 9.0);
        assert_eq!(spaced.feedback, "Waah bhai |extra");
    }

    #[test]
    fn test_pipe_scores_are_clamped() {
        assert_eq!(parse_score_reply("14|wow").score, 10.0);
        assert_eq!(parse_score_reply("0.2|meh").score, 1.0);
    }

    #[test]
    fn test_first_number_fallback() {
        let reply = "I'd give this 8.5 out of 10, solid comeback";
        let scored = parse_score_reply(reply);
        assert_eq!(scored.score, 8.5);
        assert_eq!(scored.feedback, reply);

        // Unparseable score before the pipe falls through to the number scan
        let scored = parse_score_reply("great|score 6");
        assert_eq!(scored.score, 6.0);
        assert_eq!(scored.feedback, "great|score 6");

        assert_eq!(parse_score_reply("Rating: 42").score, 10.0);
    }

    #[test]
    fn test_no_number() {
        let scored = parse_score_reply("Bahut badiya!");
        assert_eq!(scored.score, 5.0);
        assert_eq!(scored.feedback, "Good attempt! 👍");
    }
}
