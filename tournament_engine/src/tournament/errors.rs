//! Tournament error types.

use thiserror::Error;

use super::models::TournamentState;

/// Broad classification of a [`TournamentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input (bad winner, too few participants, bad config)
    Validation,
    /// Operation attempted in the wrong lifecycle state
    InvalidState,
    /// Referenced match, participant or tournament does not exist
    NotFound,
    /// File system or JSON failure while saving or loading
    Persistence,
}

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Too few active participants to start or pair a round
    #[error("need at least {needed} active participants, have {current}")]
    InsufficientParticipants { needed: usize, current: usize },

    /// Participant name already registered
    #[error("participant already registered: {0}")]
    DuplicateParticipant(String),

    /// Reported winner is neither player of the match
    #[error("winner {winner} is not a participant in this match ({player_a} vs {player_b})")]
    WinnerNotInMatch {
        winner: String,
        player_a: String,
        player_b: String,
    },

    /// Draw reported in a knockout round
    #[error("draws are not allowed in knockout round {round}")]
    DrawNotAllowed { round: u32 },

    /// Invalid configuration value
    #[error("invalid tournament configuration: {0}")]
    InvalidConfig(String),

    /// Operation not allowed in the current lifecycle state
    #[error("tournament not in correct state: expected {expected}, got {actual}")]
    InvalidState {
        expected: TournamentState,
        actual: TournamentState,
    },

    /// Result already recorded for this match
    #[error("match already completed: round {round}, match {match_num}")]
    MatchAlreadyCompleted { round: u32, match_num: usize },

    /// No match with this round and number
    #[error("match not found: round {round}, match {match_num}")]
    MatchNotFound { round: u32, match_num: usize },

    /// Participant not found
    #[error("participant not found: {0}")]
    ParticipantNotFound(String),

    /// Tournament not found in memory or storage
    #[error("tournament {0} not found")]
    TournamentNotFound(String),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error (bad document or index)
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TournamentError {
    /// Map the error onto the coarse taxonomy callers surface to users.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::InsufficientParticipants { .. }
            | TournamentError::DuplicateParticipant(_)
            | TournamentError::WinnerNotInMatch { .. }
            | TournamentError::DrawNotAllowed { .. }
            | TournamentError::InvalidConfig(_) => ErrorKind::Validation,
            TournamentError::InvalidState { .. } | TournamentError::MatchAlreadyCompleted { .. } => {
                ErrorKind::InvalidState
            }
            TournamentError::MatchNotFound { .. }
            | TournamentError::ParticipantNotFound(_)
            | TournamentError::TournamentNotFound(_) => ErrorKind::NotFound,
            TournamentError::Io(_) | TournamentError::Serialization(_) => ErrorKind::Persistence,
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
