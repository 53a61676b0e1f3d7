use thiserror::Error;

use crate::models::{MatchId, PlayerId};

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Player {0} is not part of this match")]
    PlayerNotInMatch(PlayerId),

    #[error("Player {0} is already part of this match")]
    PlayerAlreadyInMatch(PlayerId),

    #[error("Player {0} is on the field and must be subbed out first")]
    PlayerOnField(PlayerId),

    #[error("Player {0} is on the bench; positions apply on the field only")]
    PlayerNotOnField(PlayerId),

    #[error("Match has ended and can no longer be changed")]
    MatchEnded,

    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("Match {0} is still in progress")]
    MatchInProgress(MatchId),

    #[error("Match {0} is already in progress")]
    ActiveMatchExists(MatchId),

    #[error("Invalid clock state: {0}")]
    InvalidClockState(String),

    #[error("Invalid roster: {0}")]
    InvalidRoster(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MatchError {
    /// Rejections a caller can fix by changing its request, as opposed to
    /// corrupted or unreadable state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            MatchError::PlayerNotInMatch(_)
                | MatchError::PlayerAlreadyInMatch(_)
                | MatchError::PlayerOnField(_)
                | MatchError::PlayerNotOnField(_)
                | MatchError::MatchEnded
                | MatchError::MatchNotFound(_)
                | MatchError::MatchInProgress(_)
                | MatchError::ActiveMatchExists(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
