use thiserror::Error;

/// Result type for scoring and conversion operations
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Input validation failures. Every variant is caller-correctable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    #[error("Invalid odds input: {0}")]
    InvalidOddsInput(String),

    #[error("Invalid scoring config: {0}")]
    InvalidScoringConfig(String),

    #[error("Missing finish position for {0}")]
    MissingFinishPosition(String),

    #[error("Invalid lineup: {0}")]
    InvalidLineup(String),

    #[error("Lineup for team {team_id} in tournament {tournament_id} is locked")]
    LineupLocked { team_id: u32, tournament_id: u32 },

    #[error("Invalid bet {id}: {reason}")]
    InvalidBet { id: u32, reason: String },
}
