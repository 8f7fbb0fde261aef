//! Error types for Backchodi Battle

use thiserror::Error;

/// Result type for Backchodi Battle operations
pub type Result<T> = std::result::Result<T, BattleError>;

/// Backchodi Battle error types
///
/// Game-logic failures (see [`BattleError::is_in_band`]) are reported back to
/// the caller as ordinary text results. Everything else becomes a JSON-RPC
/// error response.
#[derive(Debug, Error)]
pub enum BattleError {
    /// Malformed or missing argument
    #[error("{0}")]
    InvalidArgument(String),

    /// Caller already has a waiting or active session
    #[error("Game already in progress! Session ID: {0}")]
    SessionInFlight(String),

    /// Session id unknown to the caller
    #[error("Invalid session ID! Game not found.")]
    SessionNotFound,

    /// Join attempted on a solo session
    #[error("This is not a duel battle!")]
    NotADuel,

    /// Join attempted on a session that left the lobby
    #[error("Game is not accepting new players!")]
    NotAcceptingPlayers,

    /// Both duel slots are taken
    #[error("Battle is already full!")]
    BattleFull,

    /// Message sent to a session that is not in play
    #[error("Game is not active!")]
    NotActive,

    /// Sender is not registered in the session
    #[error("Player not found in this game!")]
    PlayerNotFound,

    /// Tool name not in the catalogue
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Content generator failure
    #[error("Content generation failed: {0}")]
    Content(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Transport (stdio/HTTP) error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Unexpected internal failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BattleError {
    /// Whether this failure is part of normal gameplay and should be shown to
    /// the player as a text result rather than raised as a protocol error.
    pub fn is_in_band(&self) -> bool {
        matches!(
            self,
            BattleError::SessionInFlight(_)
                | BattleError::SessionNotFound
                | BattleError::NotADuel
                | BattleError::NotAcceptingPlayers
                | BattleError::BattleFull
                | BattleError::NotActive
                | BattleError::PlayerNotFound
        )
    }

    /// JSON-RPC error code for protocol-level failures
    pub fn rpc_code(&self) -> i32 {
        match self {
            BattleError::InvalidArgument(_) | BattleError::Serialization(_) => {
                error_codes::INVALID_PARAMS
            }
            BattleError::UnknownTool(_) => error_codes::METHOD_NOT_FOUND,
            _ => error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<serde_json::Error> for BattleError {
    fn from(err: serde_json::Error) -> Self {
        BattleError::Serialization(err.to_string())
    }
}

/// JSON-RPC error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}
