use serde::Serialize;

use super::models::{Stage, SystemType};
use super::standings::Standings;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub player_id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub standings: Standings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub match_id: i32,
    pub tournament_id: i32,
    pub round_number: i32,
    pub white_player: PlayerView,
    pub black_player: PlayerView,
    pub result: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRow {
    pub rank: usize,
    pub player_id: i32,
    pub full_name: String,
    pub score: f64,
    pub second_score: f64,
    pub rating: f64,
    pub wins: i32,
    pub draws: i32,
    pub losses: i32,
    pub had_bye: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentView {
    pub tournament_id: i32,
    pub name: String,
    pub system_type: SystemType,
    pub stage: Stage,
    pub current_round: i32,
    pub amount_of_rounds: i32,
    pub players_registered: usize,
    pub min_players: i32,
    pub max_players: i32,
}
