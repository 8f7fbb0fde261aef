//! Game session model
//!
//! The engine in `backchodi-server` drives these types through their
//! lifecycle; everything here is synchronous state bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BattleError, Result};

/// Identifier of the calling user
pub type CallerId = String;

/// Unique identifier for a session
pub type SessionId = String;

/// Rounds per game unless configured otherwise
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Game mode
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Player against generated challenges
    Solo,
    /// Player against player on a generated topic
    Duel,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Solo => "solo",
            GameMode::Duel => "duel",
        }
    }

    /// Capitalized label for display
    pub fn title(&self) -> &'static str {
        match self {
            GameMode::Solo => "Solo",
            GameMode::Duel => "Duel",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameMode {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "solo" => Ok(GameMode::Solo),
            "duel" => Ok(GameMode::Duel),
            other => Err(BattleError::InvalidArgument(format!(
                "mode must be \"solo\" or \"duel\", got {other:?}"
            ))),
        }
    }
}

/// Session state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Duel lobby, one player registered
    Waiting,
    /// Gameplay in progress
    Active,
    /// Final evaluation in progress
    Scoring,
    /// Terminal; scores and winner fixed
    Finished,
}

impl GameState {
    /// Capitalized label for display
    pub fn title(&self) -> &'static str {
        match self {
            GameState::Waiting => "Waiting",
            GameState::Active => "Active",
            GameState::Scoring => "Scoring",
            GameState::Finished => "Finished",
        }
    }
}

/// Player slot within a session
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PlayerSlot {
    #[serde(rename = "player_1")]
    First,
    #[serde(rename = "player_2")]
    Second,
}

/// A registered player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerSlot,
    pub name: String,
    /// Running total in solo, average once a duel finishes
    pub score: f64,
    pub messages: Vec<String>,
}

impl Player {
    pub fn new(id: PlayerSlot, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0.0,
            messages: Vec::new(),
        }
    }
}

/// One battle instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub state: GameState,
    pub created_at: DateTime<Utc>,
    pub players: Vec<Player>,
    /// Generated challenges; index 0 is the opener
    pub ai_messages: Vec<String>,
    pub current_round: u32,
    pub max_rounds: u32,
    /// Duel winner; `None` on a finished duel means a tie
    pub winner: Option<String>,
}

impl GameSession {
    /// Build a session id of the form `{caller_id}_{8 hex chars}`
    pub fn generate_id(caller_id: &str) -> SessionId {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}_{}", caller_id, &suffix[..8])
    }

    /// Create a session with its first player registered.
    ///
    /// Solo sessions start `Active` in round 1; duels start `Waiting` in
    /// round 0.
    pub fn new(
        session_id: SessionId,
        mode: GameMode,
        player_name: impl Into<String>,
        max_rounds: u32,
    ) -> Self {
        let (state, current_round) = match mode {
            GameMode::Solo => (GameState::Active, 1),
            GameMode::Duel => (GameState::Waiting, 0),
        };

        Self {
            session_id,
            mode,
            state,
            created_at: Utc::now(),
            players: vec![Player::new(PlayerSlot::First, player_name)],
            ai_messages: Vec::new(),
            current_round,
            max_rounds,
            winner: None,
        }
    }

    /// Waiting or active sessions count against the one-per-caller limit
    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, GameState::Waiting | GameState::Active)
    }

    /// Whether the session takes new messages
    pub fn accepts_messages(&self) -> bool {
        matches!(self.state, GameState::Active | GameState::Scoring)
    }

    /// Register the second duel player and start the game
    pub fn join(&mut self, player_name: impl Into<String>) -> Result<()> {
        if self.mode != GameMode::Duel {
            return Err(BattleError::NotADuel);
        }
        if self.state != GameState::Waiting {
            return Err(BattleError::NotAcceptingPlayers);
        }
        if self.players.len() >= 2 {
            return Err(BattleError::BattleFull);
        }

        self.players
            .push(Player::new(PlayerSlot::Second, player_name));
        self.state = GameState::Active;
        self.current_round = 1;
        Ok(())
    }

    /// Index of the first player registered under `name`
    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }

    /// First player whose name differs from `name`
    pub fn opponent_of(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name != name)
    }

    /// Messages sent by all players so far
    pub fn total_messages(&self) -> usize {
        self.players.iter().map(|p| p.messages.len()).sum()
    }

    /// Challenge the player is currently answering
    pub fn live_challenge(&self) -> Option<&str> {
        self.ai_messages.last().map(String::as_str)
    }

    /// Opening challenge
    pub fn opening_challenge(&self) -> Option<&str> {
        self.ai_messages.first().map(String::as_str)
    }

    /// True once the round counter has passed the limit
    pub fn rounds_exhausted(&self) -> bool {
        self.current_round > self.max_rounds
    }

    /// Conclude a duel with per-player averages, in player order
    pub fn finish_duel(&mut self, averages: &[f64]) {
        for (player, avg) in self.players.iter_mut().zip(averages) {
            player.score = *avg;
        }

        self.winner = match (self.players.first(), self.players.get(1)) {
            (Some(a), Some(b)) if a.score > b.score => Some(a.name.clone()),
            (Some(a), Some(b)) if b.score > a.score => Some(b.name.clone()),
            _ => None,
        };
        self.state = GameState::Finished;
    }

    /// Read-only projection for status and list views
    pub fn status(&self) -> SessionStatus {
        let show_scores = self.mode == GameMode::Solo || self.state == GameState::Finished;
        SessionStatus {
            session_id: self.session_id.clone(),
            mode: self.mode,
            state: self.state,
            current_round: self.current_round,
            max_rounds: self.max_rounds,
            players: self
                .players
                .iter()
                .map(|p| PlayerStatus {
                    name: p.name.clone(),
                    score: show_scores.then_some(p.score),
                })
                .collect(),
            winner: self.winner.clone(),
        }
    }
}

/// Player entry in a [`SessionStatus`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Snapshot of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: SessionId,
    pub mode: GameMode,
    pub state: GameState,
    pub current_round: u32,
    pub max_rounds: u32,
    pub players: Vec<PlayerStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}
