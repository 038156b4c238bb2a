use std::cmp::Ordering;

use log::{debug, warn};

use super::colors::{assign_colors, compatible};
use super::{Entrant, OpponentIndex, Pairing, RoundPlan};
use crate::config::settings::PairingSettings;
use crate::errors::{Result, TournamentError};

/// Result of the backtracking search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Complete(Vec<Pairing>),
    Infeasible,
}

/// Round 1: strongest half against weakest half, top half playing white.
///
/// With an odd roster the lowest rated player gets the bye.
pub fn plan_first_round(entrants: &[Entrant]) -> Result<RoundPlan> {
    ensure_enough(entrants)?;

    let mut seeded: Vec<&Entrant> = entrants.iter().collect();
    seeded.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then(a.player_id.cmp(&b.player_id))
    });

    let bye = if seeded.len() % 2 != 0 {
        seeded.pop().map(|e| e.player_id)
    } else {
        None
    };

    let half = seeded.len() / 2;
    let (top, bottom) = seeded.split_at(half);
    let pairings = top
        .iter()
        .zip(bottom)
        .map(|(white, black)| Pairing::new(white.player_id, black.player_id))
        .collect();

    Ok(RoundPlan { pairings, bye })
}

/// Rounds after the first: bye from the bottom of the ranking, then a
/// backtracking search for a perfect matching without rematches or color
/// violations.
pub fn plan_round(
    entrants: &[Entrant],
    opponents: &OpponentIndex,
    settings: &PairingSettings,
) -> Result<RoundPlan> {
    ensure_enough(entrants)?;

    let mut ranked = rank(entrants);
    let bye = if ranked.len() % 2 != 0 {
        let index = select_bye(&ranked);
        Some(ranked.remove(index).player_id)
    } else {
        None
    };

    let mut budget = SearchBudget::new(settings.max_search_steps);
    match search(&ranked, opponents, &mut budget) {
        SearchOutcome::Complete(pairings) => {
            debug!("Swiss search finished after {} steps", budget.used());
            Ok(RoundPlan { pairings, bye })
        }
        SearchOutcome::Infeasible => {
            warn!(
                "No valid Swiss pairing for {} players (exhausted: {})",
                ranked.len(),
                budget.is_spent()
            );
            Err(TournamentError::NotEnoughPlayers {
                have: ranked.len(),
                need: ranked.len(),
            })
        }
    }
}

/// Score desc, rating desc, id asc
pub fn rank(entrants: &[Entrant]) -> Vec<&Entrant> {
    let mut ranked: Vec<&Entrant> = entrants.iter().collect();
    ranked.sort_by(|a, b| ranking_order(a, b));
    ranked
}

fn ranking_order(a: &Entrant, b: &Entrant) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(b.rating.total_cmp(&a.rating))
        .then(a.player_id.cmp(&b.player_id))
}

/// Index of the bye candidate in a ranked list.
///
/// Walks up from the bottom to the first player without a bye. When everyone
/// already had one, the lowest ranked player gets a second.
pub fn select_bye(ranked: &[&Entrant]) -> usize {
    let last = ranked.len().saturating_sub(1);
    ranked
        .iter()
        .rposition(|e| !e.had_bye)
        .unwrap_or_else(|| {
            debug!("Every candidate already had a bye, falling back to the last ranked");
            last
        })
}

/// Pairs the first player with each compatible candidate in order and
/// recurses on the rest, undoing the choice when the rest cannot be paired.
pub fn search(
    remaining: &[&Entrant],
    opponents: &OpponentIndex,
    budget: &mut SearchBudget,
) -> SearchOutcome {
    let Some((current, candidates)) = remaining.split_first() else {
        return SearchOutcome::Complete(Vec::new());
    };

    for (index, candidate) in candidates.iter().enumerate() {
        if !budget.step() {
            return SearchOutcome::Infeasible;
        }
        if opponents.have_met(current.player_id, candidate.player_id)
            || !compatible(current, candidate)
        {
            continue;
        }

        let mut rest: Vec<&Entrant> = candidates.to_vec();
        rest.remove(index);

        if let SearchOutcome::Complete(mut pairings) = search(&rest, opponents, budget) {
            pairings.insert(0, assign_colors(current, candidate));
            return SearchOutcome::Complete(pairings);
        }
        if budget.is_spent() {
            break;
        }
    }

    SearchOutcome::Infeasible
}

fn ensure_enough(entrants: &[Entrant]) -> Result<()> {
    if entrants.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            have: entrants.len(),
            need: 2,
        });
    }
    Ok(())
}

/// Caps the number of candidate checks a single search may perform
#[derive(Debug)]
pub struct SearchBudget {
    limit: u64,
    used: u64,
}

impl SearchBudget {
    pub fn new(limit: u64) -> Self {
        Self { limit, used: 0 }
    }

    fn step(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    pub fn used(&self) -> u64 {
        self.used
    }

    pub fn is_spent(&self) -> bool {
        self.used >= self.limit
    }
}
