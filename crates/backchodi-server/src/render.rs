//! Text replies for tool results

use backchodi_core::{GameState, ScoredResponse, SessionStatus};
use std::fmt::Write;

use crate::engine::{JoinOutcome, SendOutcome, StartOutcome};

pub fn start(outcome: &StartOutcome) -> String {
    match outcome {
        StartOutcome::Solo {
            session_id,
            round,
            max_rounds,
            challenge,
        } => format!(
            "🎮 **Backchodi Battle Started!**\n\
             **Mode:** Solo Battle\n\
             **Session ID:** {session_id}\n\
             **Round:** {round}/{max_rounds}\n\
             \n\
             🤖 **AI says:** {challenge}\n\
             \n\
             Now it's your turn! Reply with your best backchodi! 🔥"
        ),
        StartOutcome::Duel {
            session_id,
            creator,
        } => format!(
            "🎮 **Backchodi Battle Created!**\n\
             **Mode:** Duel Battle\n\
             **Session ID:** {session_id}\n\
             **Creator:** {creator}\n\
             \n\
             Waiting for opponent to join! Share this session ID: `{session_id}`\n\
             Opponent can join using the join_battle tool with this session ID."
        ),
    }
}

pub fn join(outcome: &JoinOutcome) -> String {
    format!(
        "🎮 **Battle Joined Successfully!**\n\
         **Players:** {} vs {}\n\
         **Round:** {}/{}\n\
         \n\
         🤖 **AI starts the topic:** {}\n\
         \n\
         Now both players can start their backchodi battle! 🔥🔥",
        outcome.first_player,
        outcome.second_player,
        outcome.round,
        outcome.max_rounds,
        outcome.challenge
    )
}

fn round_score(label: &str, round: u32, max_rounds: u32, scored: &ScoredResponse) -> String {
    format!(
        "🎯 **Round {}/{} {}:** {:.1}/10 - {}",
        round, max_rounds, label, scored.score, scored.feedback
    )
}

pub fn send(outcome: &SendOutcome) -> String {
    match outcome {
        SendOutcome::SoloRound {
            round,
            max_rounds,
            scored,
            total_score,
            next_round,
            challenge,
        } => format!(
            "{}\n\
             **Total Score:** {:.1}\n\
             **Next Round:** {}/{}\n\
             \n\
             🤖 **AI counter-attacks:** {}\n\
             \n\
             Your turn again! 🔥",
            round_score("Score", *round, *max_rounds, scored),
            total_score,
            next_round,
            max_rounds,
            challenge
        ),
        SendOutcome::SoloFinished {
            round,
            max_rounds,
            scored,
            total_score,
            average,
            verdict,
        } => format!(
            "{}\n\
             \n\
             🎮 **GAME FINISHED!**\n\
             **Total Score:** {:.1}/{}\n\
             **Average:** {:.1}/10\n\
             \n\
             {}\n\
             \n\
             Thanks for playing! Start a new game anytime! 🎉",
            round_score("Final Score", *round, *max_rounds, scored),
            total_score,
            u64::from(*max_rounds) * 10,
            average,
            verdict
        ),
        SendOutcome::DuelProgress {
            round,
            max_rounds,
            messages_this_round,
            waiting_for,
            status_message,
        } => format!(
            "✅ **Round {}/{} Message sent!**\n\
             **Messages this round:** {}/2\n\
             \n\
             {} Waiting for {}!",
            round,
            max_rounds,
            messages_this_round,
            status_message,
            waiting_for.as_deref().unwrap_or("next round")
        ),
        SendOutcome::DuelFinished {
            standings,
            announcement,
            ..
        } => {
            let mut text = String::from("🎮 **DUEL FINISHED!**\n**Final Scores:**");
            for (name, score) in standings {
                let _ = write!(text, "\n• {}: {:.1}/10", name, score);
            }
            let _ = write!(
                text,
                "\n\n{}\n\nEpic battle! 🔥🔥 Start a new game anytime! 🎉",
                announcement
            );
            text
        }
    }
}

pub fn status(status: &SessionStatus) -> String {
    let mut text = format!(
        "🎮 **Game Status**\n\
         **Session ID:** {}\n\
         **Mode:** {}\n\
         **State:** {}\n\
         **Round:** {}/{}\n\
         \n\
         **Players:**",
        status.session_id,
        status.mode.title(),
        status.state.title(),
        status.current_round,
        status.max_rounds
    );

    for (i, player) in status.players.iter().enumerate() {
        let _ = write!(text, "\n• Player {}: {}", i + 1, player.name);
        if let Some(score) = player.score {
            let _ = write!(text, " (Score: {:.1})", score);
        }
    }

    match status.state {
        GameState::Waiting => text.push_str("\n\n⏳ Waiting for opponent to join..."),
        GameState::Active => text.push_str("\n\n🔥 Battle in progress!"),
        GameState::Finished => {
            text.push_str("\n\n🏁 Game finished!");
            if let Some(winner) = &status.winner {
                let _ = write!(text, " Winner: {}", winner);
            }
        }
        GameState::Scoring => {}
    }
    text
}

pub fn active_games(games: &[SessionStatus]) -> String {
    if games.is_empty() {
        return "No active games found! Start a new battle with the start_backchodi_battle tool."
            .to_string();
    }

    let mut text = String::from("🎮 **Active Games:**\n\n");
    for game in games {
        let players: Vec<&str> = game.players.iter().map(|p| p.name.as_str()).collect();
        let _ = write!(
            text,
            "**{}**\n• Mode: {}\n• State: {}\n• Players: {}\n• Round: {}/{}\n\n",
            game.session_id,
            game.mode.title(),
            game.state.title(),
            players.join(", "),
            game.current_round,
            game.max_rounds
        );
    }
    text
}

pub fn connection_ok(challenge: &str, scored: &ScoredResponse) -> String {
    format!(
        "✅ **Grok Integration Working!**\n\
         \n\
         **Test Backchodi Generated:**\n\
         {}\n\
         \n\
         **Test Scoring:**\n\
         Score: {:.1}/10\n\
         Feedback: {}\n\
         \n\
         🔥 Ready for epic battles!",
        challenge, scored.score, scored.feedback
    )
}

pub fn connection_failed(error: &str) -> String {
    format!(
        "❌ Grok API Error: {}\n\nPlease check your XAI_API_KEY and internet connection.",
        error
    )
}

pub const NOT_CONFIGURED: &str =
    "❌ Grok client not initialized! Please set XAI_API_KEY environment variable.";

pub const INVALID_API_KEY: &str = "❌ Invalid API key provided!";

pub fn configured(report: &str, ok: bool) -> String {
    if ok {
        format!("✅ **Grok API Configured Successfully!**\n\n{}", report)
    } else {
        format!("❌ **Configuration Failed!**\n\n{}", report)
    }
}

pub fn configure_error(error: &str) -> String {
    format!("❌ **Error configuring Grok API:** {}", error)
}

pub fn rules(max_rounds: u32) -> String {
    format!(
        "🎮 **BACKCHODI BATTLE RULES**

**🎯 OBJECTIVE:** Show off your witty banter and roasting skills!

**🎮 GAME MODES:**

**1. SOLO MODE:**
• Battle against AI powered by Grok
• AI starts with a creative backchodi
• You respond with your counter
• AI scores your response (1-10) with detailed feedback
• {rounds} rounds total
• Goal: Average 7+ for \"Ultimate Backchod\" status

**2. DUEL MODE:**
• Battle against a friend
• AI provides the topic/starter
• Both players exchange backchodi
• AI judges each message after {rounds} rounds
• Highest average score wins

**🎯 SCORING CRITERIA (AI-Powered):**
• Creativity and originality (1-3 points)
• Humor and wit (1-3 points)
• Use of Hinglish/slang (1-2 points)
• Message flow and structure (1-2 points)

**📱 AVAILABLE TOOLS:**
• `configure_grok_api` - Setup Grok API
• `test_grok_connection` - Test AI integration
• `start_backchodi_battle` - Start game
• `join_battle` - Join duel
• `send_backchodi` - Send message
• `get_game_status` - Check status
• `list_active_games` - List active games

**🔥 PRO TIPS:**
• Use Hindi/English mix for authenticity
• Reference popular culture
• Keep it light and fun
• Timing matters - don't overthink!
• AI provides contextual, intelligent responses!

Ready to prove you're the ultimate backchod? 🏆",
        rounds = max_rounds
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use backchodi_core::{GameMode, PlayerStatus};

    fn duel_status(state: GameState, winner: Option<&str>) -> SessionStatus {
        let scored = state == GameState::Finished;
        SessionStatus {
            session_id: "u1_abcd1234".into(),
            mode: GameMode::Duel,
            state,
            current_round: 6,
            max_rounds: 5,
            players: vec![
                PlayerStatus {
                    name: "A".into(),
                    score: scored.then_some(7.5),
                },
                PlayerStatus {
                    name: "B".into(),
                    score: scored.then_some(6.0),
                },
            ],
            winner: winner.map(String::from),
        }
    }

    #[test]
    fn test_solo_start_text() {
        let text = start(&StartOutcome::Solo {
            session_id: "u1_abcd1234".into(),
            round: 1,
            max_rounds: 5,
            challenge: "roast".into(),
        });
        assert!(text.contains("**Session ID:** u1_abcd1234"));
        assert!(text.contains("**Round:** 1/5"));
        assert!(text.contains("🤖 **AI says:** roast"));
    }

    #[test]
    fn test_solo_finished_total_for_long_games() {
        let text = send(&SendOutcome::SoloFinished {
            round: 500_000_000,
            max_rounds: 500_000_000,
            scored: ScoredResponse::new(6.0, "nice"),
            total_score: 3_000_000_000.0,
            average: 6.0,
            verdict: "🔥 DECENT BACKCHOD!".into(),
        });
        assert!(text.contains("**Total Score:** 3000000000.0/5000000000"));
        assert!(text.contains("**Average:** 6.0/10"));
    }

    #[test]
    fn test_duel_progress_waiting_line() {
        let mut outcome = SendOutcome::DuelProgress {
            round: 1,
            max_rounds: 5,
            messages_this_round: 1,
            waiting_for: Some("B".into()),
            status_message: "🔥 Battle is heating up!".into(),
        };
        assert!(send(&outcome).ends_with("🔥 Battle is heating up! Waiting for B!"));

        if let SendOutcome::DuelProgress { waiting_for, .. } = &mut outcome {
            *waiting_for = None;
        }
        assert!(send(&outcome).ends_with("Waiting for next round!"));
    }

    #[test]
    fn test_solo_finished_text() {
        let text = send(&SendOutcome::SoloFinished {
            round: 5,
            max_rounds: 5,
            scored: ScoredResponse::new(6.0, "nice"),
            total_score: 31.5,
            average: 6.3,
            verdict: "verdict".into(),
        });
        assert!(text.starts_with("🎯 **Round 5/5 Final Score:** 6.0/10 - nice"));
        assert!(text.contains("**Total Score:** 31.5/50"));
        assert!(text.contains("**Average:** 6.3/10"));
    }

    #[test]
    fn test_status_scores_and_winner() {
        let finished = status(&duel_status(GameState::Finished, Some("A")));
        assert!(finished.contains("• Player 1: A (Score: 7.5)"));
        assert!(finished.contains("• Player 2: B (Score: 6.0)"));
        assert!(finished.ends_with("🏁 Game finished! Winner: A"));

        let tie = status(&duel_status(GameState::Finished, None));
        assert!(tie.ends_with("🏁 Game finished!"));

        let active = status(&duel_status(GameState::Active, None));
        assert!(active.contains("• Player 1: A\n"));
        assert!(!active.contains("Score:"));
        assert!(active.ends_with("🔥 Battle in progress!"));
        assert!(active.contains("**Mode:** Duel"));
    }

    #[test]
    fn test_active_games_listing() {
        assert!(active_games(&[]).starts_with("No active games found!"));

        let text = active_games(&[duel_status(GameState::Waiting, None)]);
        assert!(text.contains("**u1_abcd1234**"));
        assert!(text.contains("• Players: A, B"));
        assert!(text.contains("• State: Waiting"));
    }

    #[test]
    fn test_rules_use_round_count() {
        assert!(rules(3).contains("• 3 rounds total"));
    }
}
