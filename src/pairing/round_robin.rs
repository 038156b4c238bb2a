use log::debug;

use super::{Entrant, Pairing, RoundPlan};
use crate::errors::{Result, TournamentError};

/// Pairs one round of a round robin with the circle method.
///
/// Players are ordered by id; an odd roster gets an empty slot whose partner
/// sits the round out and is awarded a bye unless they already had one.
pub fn plan_round(entrants: &[Entrant], round: i32) -> Result<RoundPlan> {
    if entrants.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers {
            have: entrants.len(),
            need: 2,
        });
    }
    if round < 1 {
        return Err(TournamentError::IllegalArgument(format!(
            "Round numbers start at 1, got {round}"
        )));
    }

    let rotation = rotated_slots(entrants, round);
    let slots = rotation.len();
    let mut plan = RoundPlan::default();

    for i in 0..slots / 2 {
        match (rotation[i], rotation[slots - 1 - i]) {
            (Some(first), Some(second)) => plan.pairings.push(assign_colors(first, second)),
            (Some(idle), None) | (None, Some(idle)) => {
                if idle.had_bye {
                    debug!("Player {} sits out round {} without a bye", idle.player_id, round);
                } else {
                    plan.bye = Some(idle.player_id);
                }
            }
            (None, None) => {}
        }
    }

    Ok(plan)
}

fn rotated_slots(entrants: &[Entrant], round: i32) -> Vec<Option<&Entrant>> {
    let mut rotation: Vec<Option<&Entrant>> = entrants.iter().map(Some).collect();
    rotation.sort_by_key(|slot| slot.map(|e| e.player_id));
    if rotation.len() % 2 != 0 {
        rotation.push(None);
    }

    let rotations = rotation.len() - 1;
    let shift = (round - 1) as usize % rotations;
    for _ in 0..shift {
        // slot 0 stays, the last slot moves to position 1
        rotation[1..].rotate_right(1);
    }
    rotation
}

fn assign_colors(first: &Entrant, second: &Entrant) -> Pairing {
    if first.color_balance > second.color_balance {
        Pairing::new(second.player_id, first.player_id)
    } else {
        Pairing::new(first.player_id, second.player_id)
    }
}
