//! Pure pairing engines.
//!
//! Both engines work on an immutable snapshot of the roster ([`Entrant`]s) and
//! return a [`RoundPlan`]; persisting the plan is the caller's job.

pub mod colors;
pub mod round_robin;
pub mod swiss;

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::domain::Color;

pub type PlayerId = i32;

/// Pairing-relevant snapshot of one player
#[derive(Debug, Clone, PartialEq)]
pub struct Entrant {
    pub player_id: PlayerId,
    pub score: f64,
    pub rating: f64,
    pub color_balance: i32,
    pub had_bye: bool,
    /// Colors of played games, oldest first
    pub color_history: Vec<Color>,
}

impl Entrant {
    pub fn new(player_id: PlayerId, score: f64, rating: f64) -> Self {
        Self {
            player_id,
            score,
            rating,
            color_balance: 0,
            had_bye: false,
            color_history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub white: PlayerId,
    pub black: PlayerId,
}

impl Pairing {
    pub fn new(white: PlayerId, black: PlayerId) -> Self {
        Self { white, black }
    }
}

/// Everything one round generation decided
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPlan {
    pub pairings: Vec<Pairing>,
    /// Player awarded a free point this round
    pub bye: Option<PlayerId>,
}

/// Who has already met whom, built once per round generation.
#[derive(Debug, Clone, Default)]
pub struct OpponentIndex {
    opponents: HashMap<PlayerId, HashSet<PlayerId>>,
}

impl OpponentIndex {
    pub fn from_games<I>(games: I) -> Self
    where
        I: IntoIterator<Item = (PlayerId, PlayerId)>,
    {
        let mut opponents: HashMap<PlayerId, HashSet<PlayerId>> = HashMap::new();
        for (white, black) in games {
            opponents.entry(white).or_default().insert(black);
            opponents.entry(black).or_default().insert(white);
        }
        Self { opponents }
    }

    pub fn have_met(&self, a: PlayerId, b: PlayerId) -> bool {
        self.opponents
            .get(&a)
            .is_some_and(|faced| faced.contains(&b))
    }
}
