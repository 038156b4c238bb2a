use thiserror::Error;

pub type Result<T> = std::result::Result<T, TournamentError>;

/// Everything the tournament core can refuse to do.
///
/// All variants except [`TournamentError::Storage`] describe a request the
/// caller can correct; `Storage` wraps persistence failures.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Not enough players. Have: {have}, need: {need}")]
    NotEnoughPlayers { have: usize, need: usize },

    #[error("Too many players. Have: {have}, max: {max}")]
    TooManyPlayers { have: usize, max: usize },

    #[error("Match not found: {0}")]
    MatchNotFound(i32),

    #[error("Match id: {match_id}, has result: {result}, tried to set: {attempted}")]
    MatchAlreadyHasResult {
        match_id: i32,
        result: f64,
        attempted: f64,
    },

    #[error("Match has no result: {0}")]
    MatchHasNotResult(String),

    #[error("Tournament not found: {0}")]
    TournamentNotFound(i32),

    #[error("Player not found: {0}")]
    PlayerNotFound(i32),

    #[error("User not found: {0}")]
    UserNotFound(i32),

    #[error("User {user_id} is already registered in tournament {tournament_id}")]
    AlreadyRegistered { user_id: i32, tournament_id: i32 },

    #[error("Illegal state: {0}")]
    IllegalState(String),

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl TournamentError {
    /// True when the failure is caused by the request rather than the storage.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TournamentError::Storage(_))
    }
}

impl From<rusqlite::Error> for TournamentError {
    fn from(err: rusqlite::Error) -> Self {
        TournamentError::Storage(anyhow::Error::new(err).context("SQLite operation failed"))
    }
}
