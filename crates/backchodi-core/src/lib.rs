//! # backchodi-core
//!
//! Core types for Backchodi Battle.
//!
//! This crate provides the types shared by the server and content generators:
//! - Session, player and status model
//! - Heuristic scoring used when no model is reachable
//! - Error taxonomy and JSON-RPC error codes

pub mod error;
pub mod scoring;
pub mod session;

pub use error::{BattleError, Result, error_codes};
pub use scoring::{
    MAX_SCORE, MIN_SCORE, NEUTRAL_SCORE, ScoredResponse, average, clamp_score, heuristic_score,
};
pub use session::{
    CallerId, DEFAULT_MAX_ROUNDS, GameMode, GameSession, GameState, Player, PlayerSlot,
    PlayerStatus, SessionId, SessionStatus,
};
