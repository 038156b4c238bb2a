use crate::domain::{MatchOutcome, Standings};
use crate::errors::Result;

/// Both sides of a single game together with its outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Encounter {
    pub white: Standings,
    pub black: Standings,
    pub result: Option<MatchOutcome>,
}

impl Encounter {
    pub fn new(white: Standings, black: Standings, result: Option<MatchOutcome>) -> Self {
        Self {
            white,
            black,
            result,
        }
    }
}

pub trait RatingCalculator: Send + Sync {
    /// Updates ratings and win/loss/draw counters of both sides.
    ///
    /// Fails with `MatchHasNotResult` when the encounter is still undecided.
    fn calculate(&self, encounter: Encounter) -> Result<Encounter>;
}
