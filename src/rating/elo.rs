use super::types::{Encounter, RatingCalculator};
use crate::config::settings::RatingSettings;
use crate::domain::{MatchOutcome, Standings};
use crate::errors::{Result, TournamentError};

/// Classic Elo update with a K-factor tiered by experience and strength
pub struct EloCalculator {
    settings: RatingSettings,
}

impl EloCalculator {
    pub fn new(settings: RatingSettings) -> Self {
        Self { settings }
    }

    pub fn expected_score(&self, rating: f64, opponent_rating: f64) -> f64 {
        1.0 / (1.0 + 10_f64.powf((opponent_rating - rating) / self.settings.elo_scale))
    }

    pub fn k_factor(&self, standings: &Standings) -> f64 {
        if standings.matches <= self.settings.provisional_games {
            self.settings.provisional_k
        } else if standings.rating < self.settings.master_threshold {
            self.settings.standard_k
        } else {
            self.settings.master_k
        }
    }

    fn count_game(white: &mut Standings, black: &mut Standings, outcome: MatchOutcome) {
        white.matches += 1;
        black.matches += 1;

        match outcome {
            MatchOutcome::WhiteWin => {
                white.wins += 1;
                black.losses += 1;
            }
            MatchOutcome::Draw => {
                white.draws += 1;
                black.draws += 1;
            }
            MatchOutcome::BlackWin => {
                white.losses += 1;
                black.wins += 1;
            }
        }
    }
}

impl Default for EloCalculator {
    fn default() -> Self {
        Self::new(RatingSettings::default())
    }
}

impl RatingCalculator for EloCalculator {
    fn calculate(&self, mut encounter: Encounter) -> Result<Encounter> {
        let outcome = encounter
            .result
            .ok_or_else(|| TournamentError::MatchHasNotResult("EloCalculator::calculate".into()))?;

        let white_rating = encounter.white.rating;
        let black_rating = encounter.black.rating;
        let expected_white = self.expected_score(white_rating, black_rating);
        let expected_black = self.expected_score(black_rating, white_rating);

        // K depends on the state before this game is counted
        let white_k = self.k_factor(&encounter.white);
        let black_k = self.k_factor(&encounter.black);

        Self::count_game(&mut encounter.white, &mut encounter.black, outcome);

        encounter.white.rating = white_rating + white_k * (outcome.white_points() - expected_white);
        encounter.black.rating = black_rating + black_k * (outcome.black_points() - expected_black);

        Ok(encounter)
    }
}
