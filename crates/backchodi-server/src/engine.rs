//! Game session engine
//!
//! Drives sessions through waiting → active → finished. Every mutating
//! operation holds the session's lock until it returns, including while the
//! content generator is working, so two requests against the same session
//! never interleave.

use backchodi_core::{
    BattleError, DEFAULT_MAX_ROUNDS, GameMode, GameSession, GameState, Result, ScoredResponse,
    SessionId, SessionStatus, average,
};
use std::sync::Arc;
use tracing::{debug, info};

use crate::content::ResilientContent;
use crate::store::{SessionHandle, SessionStore};

/// Engine settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Rounds per game, at least 1
    pub max_rounds: u32,
}

impl EngineConfig {
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

/// Result of starting a battle
#[derive(Debug, Clone)]
pub enum StartOutcome {
    /// Solo game is live with its opening challenge
    Solo {
        session_id: SessionId,
        round: u32,
        max_rounds: u32,
        challenge: String,
    },
    /// Duel lobby is open
    Duel {
        session_id: SessionId,
        creator: String,
    },
}

/// Result of joining a duel
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub session_id: SessionId,
    pub first_player: String,
    pub second_player: String,
    pub round: u32,
    pub max_rounds: u32,
    pub challenge: String,
}

/// Result of sending a message
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Solo round scored, next challenge issued
    SoloRound {
        round: u32,
        max_rounds: u32,
        scored: ScoredResponse,
        total_score: f64,
        next_round: u32,
        challenge: String,
    },
    /// Last solo round scored, game over
    SoloFinished {
        round: u32,
        max_rounds: u32,
        scored: ScoredResponse,
        total_score: f64,
        average: f64,
        verdict: String,
    },
    /// Duel message recorded
    DuelProgress {
        round: u32,
        max_rounds: u32,
        /// 1 or 2 messages in the current pair
        messages_this_round: usize,
        /// Opponent whose reply completes the pair
        waiting_for: Option<String>,
        status_message: String,
    },
    /// Duel judged
    DuelFinished {
        /// (name, average) in player order
        standings: Vec<(String, f64)>,
        winner: Option<String>,
        announcement: String,
    },
}

/// Owns the session store and the content source
pub struct BattleEngine {
    store: SessionStore,
    content: Arc<ResilientContent>,
    config: EngineConfig,
}

impl BattleEngine {
    pub fn new(store: SessionStore, content: Arc<ResilientContent>, config: EngineConfig) -> Self {
        Self {
            store,
            content,
            config,
        }
    }

    pub fn content(&self) -> &Arc<ResilientContent> {
        &self.content
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    async fn session(&self, caller_id: &str, session_id: &str) -> Result<SessionHandle> {
        self.store
            .get(caller_id, session_id)
            .await?
            .ok_or(BattleError::SessionNotFound)
    }

    /// Start a solo game or open a duel lobby
    ///
    /// A caller may only have one waiting or active session at a time.
    pub async fn start_battle(
        &self,
        caller_id: &str,
        mode: GameMode,
        player_name: &str,
    ) -> Result<StartOutcome> {
        let bucket = self.store.get_or_create_bucket(caller_id).await?;

        // Check and insert under the bucket lock, then lock the new session
        // before anyone else can see it
        let mut session = {
            let mut bucket = bucket.lock().await;
            if let Some(existing) = bucket.in_flight().await {
                debug!("Caller {} already in session {}", caller_id, existing);
                return Err(BattleError::SessionInFlight(existing));
            }

            let session_id = GameSession::generate_id(caller_id);
            let session =
                GameSession::new(session_id, mode, player_name, self.config.max_rounds);
            bucket.insert(session).lock_owned().await
        };

        info!(
            "Started {} session {} for {}",
            mode, session.session_id, player_name
        );

        match mode {
            GameMode::Solo => {
                let challenge = self.content.challenge("Solo battle start", player_name).await;
                session.ai_messages.push(challenge.clone());

                Ok(StartOutcome::Solo {
                    session_id: session.session_id.clone(),
                    round: session.current_round,
                    max_rounds: session.max_rounds,
                    challenge,
                })
            }
            GameMode::Duel => Ok(StartOutcome::Duel {
                session_id: session.session_id.clone(),
                creator: player_name.to_string(),
            }),
        }
    }

    /// Join a waiting duel as the second player
    pub async fn join_battle(
        &self,
        caller_id: &str,
        session_id: &str,
        player_name: &str,
    ) -> Result<JoinOutcome> {
        let handle = self.session(caller_id, session_id).await?;
        let mut session = handle.lock().await;

        session.join(player_name)?;
        let first_player = session.players[0].name.clone();
        info!(
            "{} joined duel {} against {}",
            player_name, session.session_id, first_player
        );

        let target = format!("{} vs {}", first_player, player_name);
        let challenge = self.content.challenge("Duel battle topic", &target).await;
        session.ai_messages.push(challenge.clone());

        Ok(JoinOutcome {
            session_id: session.session_id.clone(),
            first_player,
            second_player: player_name.to_string(),
            round: session.current_round,
            max_rounds: session.max_rounds,
            challenge,
        })
    }

    /// Record a player's message and advance the game
    pub async fn send_message(
        &self,
        caller_id: &str,
        session_id: &str,
        player_name: &str,
        message: &str,
    ) -> Result<SendOutcome> {
        let handle = self.session(caller_id, session_id).await?;
        let mut session = handle.lock().await;

        if !session.accepts_messages() {
            return Err(BattleError::NotActive);
        }
        let index = session
            .player_index(player_name)
            .ok_or(BattleError::PlayerNotFound)?;

        session.players[index].messages.push(message.to_string());

        let mode = session.mode;
        match mode {
            GameMode::Solo => self.solo_turn(&mut session, index, message).await,
            GameMode::Duel => self.duel_turn(&mut session, player_name).await,
        }
    }

    async fn solo_turn(
        &self,
        session: &mut GameSession,
        index: usize,
        message: &str,
    ) -> Result<SendOutcome> {
        let round = session.current_round;
        let max_rounds = session.max_rounds;
        let challenge = session.live_challenge().unwrap_or_default().to_string();

        let scored = self
            .content
            .score(message, &challenge, &format!("Solo battle round {}", round))
            .await;

        let player = &mut session.players[index];
        player.score += scored.score;
        let total_score = player.score;
        let name = player.name.clone();

        session.current_round += 1;

        if !session.rounds_exhausted() {
            let context = format!("Counter-attack round {}", session.current_round);
            let next = self.content.challenge(&context, &name).await;
            session.ai_messages.push(next.clone());

            return Ok(SendOutcome::SoloRound {
                round,
                max_rounds,
                scored,
                total_score,
                next_round: session.current_round,
                challenge: next,
            });
        }

        session.state = GameState::Finished;
        let average = total_score / f64::from(max_rounds);
        info!(
            "Solo session {} finished: {} averaged {:.1}",
            session.session_id, name, average
        );
        let verdict = self.content.verdict(average, &name).await;

        Ok(SendOutcome::SoloFinished {
            round,
            max_rounds,
            scored,
            total_score,
            average,
            verdict,
        })
    }

    async fn duel_turn(&self, session: &mut GameSession, player_name: &str) -> Result<SendOutcome> {
        let total = session.total_messages();
        let pair_complete = total % 2 == 0;

        // Turn order is not enforced; a pair is any two messages
        if pair_complete {
            session.current_round += 1;
            if session.rounds_exhausted() {
                return self.finish_duel(session).await;
            }
        }

        let waiting_for = if pair_complete {
            None
        } else {
            session.opponent_of(player_name).map(|p| p.name.clone())
        };
        let status_message = self.content.waiting_message("duel battle waiting").await;

        Ok(SendOutcome::DuelProgress {
            round: session.current_round,
            max_rounds: session.max_rounds,
            messages_this_round: if pair_complete { 2 } else { 1 },
            waiting_for,
            status_message,
        })
    }

    /// Score every duel message against the opener and pick the winner
    async fn finish_duel(&self, session: &mut GameSession) -> Result<SendOutcome> {
        let opening = session.opening_challenge().unwrap_or_default().to_string();

        let mut averages = Vec::with_capacity(session.players.len());
        for player in &session.players {
            let context = format!("Duel evaluation - {}", player.name);
            let mut scores = Vec::with_capacity(player.messages.len());
            for message in &player.messages {
                scores.push(self.content.score(message, &opening, &context).await.score);
            }
            averages.push(average(&scores));
        }

        session.finish_duel(&averages);

        let [first, second] = session.players.as_slice() else {
            return Err(BattleError::Internal(format!(
                "duel {} finished with {} players",
                session.session_id,
                session.players.len()
            )));
        };
        info!(
            "Duel {} finished: {} {:.1} vs {} {:.1}",
            session.session_id, first.name, first.score, second.name, second.score
        );

        let announcement = self
            .content
            .winner_announcement(&first.name, first.score, &second.name, second.score)
            .await;

        Ok(SendOutcome::DuelFinished {
            standings: session
                .players
                .iter()
                .map(|p| (p.name.clone(), p.score))
                .collect(),
            winner: session.winner.clone(),
            announcement,
        })
    }

    /// Read-only view of one session
    pub async fn status(&self, caller_id: &str, session_id: &str) -> Result<SessionStatus> {
        let handle = self.session(caller_id, session_id).await?;
        let session = handle.lock().await;
        Ok(session.status())
    }

    /// The caller's waiting and active sessions
    pub async fn list_active(&self, caller_id: &str) -> Result<Vec<SessionStatus>> {
        self.store.list(caller_id, GameSession::is_in_flight).await
    }

    /// Fail fast on an empty caller id
    pub async fn check_caller(&self, caller_id: &str) -> Result<()> {
        self.store.get_or_create_bucket(caller_id).await.map(|_| ())
    }
}
