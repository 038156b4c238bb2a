use serde::Serialize;

use super::models::Color;

/// Mutable per-tournament state of a player.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standings {
    pub rating: f64,
    pub score: f64,
    /// Whites minus blacks
    pub color_balance: i32,
    pub matches: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub had_bye: bool,
}

impl Standings {
    /// Standings of a freshly registered player, carrying lifetime counters over
    pub fn seeded(rating: f64, matches: i32, wins: i32, losses: i32, draws: i32) -> Self {
        Self {
            rating,
            matches,
            wins,
            losses,
            draws,
            ..Self::default()
        }
    }

    pub fn take_color(&mut self, color: Color) {
        match color {
            Color::White => self.color_balance += 1,
            Color::Black => self.color_balance -= 1,
        }
    }

    pub fn grant_bye(&mut self) {
        self.score += 1.0;
        self.had_bye = true;
    }

    pub fn revert(&mut self, delta: &StandingsDelta) {
        self.rating -= delta.rating;
        self.score -= delta.score;
        self.color_balance -= delta.color_balance;
        self.matches -= delta.matches;
        self.wins -= delta.wins;
        self.losses -= delta.losses;
        self.draws -= delta.draws;
        if delta.had_bye_changed {
            self.had_bye = false;
        }
    }
}

/// Signed difference between two [`Standings`] snapshots of one player.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsDelta {
    pub rating: f64,
    pub score: f64,
    pub color_balance: i32,
    pub matches: i32,
    pub wins: i32,
    pub losses: i32,
    pub draws: i32,
    pub had_bye_changed: bool,
}

impl StandingsDelta {
    pub fn between(before: &Standings, after: &Standings) -> Self {
        Self {
            rating: after.rating - before.rating,
            score: after.score - before.score,
            color_balance: after.color_balance - before.color_balance,
            matches: after.matches - before.matches,
            wins: after.wins - before.wins,
            losses: after.losses - before.losses,
            draws: after.draws - before.draws,
            had_bye_changed: after.had_bye != before.had_bye,
        }
    }
}
