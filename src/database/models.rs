use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::domain::{Stage, StandingsDelta, Standings, SystemType};

#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub rating: f64,
    pub amount_of_matches: i32,
    pub amount_of_wins: i32,
    pub amount_of_losses: i32,
    pub amount_of_draws: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Tournament {
    pub id: i32,
    pub name: String,
    pub system_type: SystemType,
    pub stage: Stage,
    pub current_round: i32,
    pub amount_of_rounds: i32,
    pub min_players: i32,
    pub max_players: i32,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewTournament {
    pub name: String,
    pub system_type: SystemType,
    pub min_players: i32,
    pub max_players: i32,
    pub amount_of_rounds: i32,
}

/// Registration-stage edit of a tournament; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct TournamentUpdate {
    pub name: Option<String>,
    pub min_players: Option<i32>,
    pub max_players: Option<i32>,
    pub amount_of_rounds: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i32,
    pub tournament_id: i32,
    pub user_id: i32,
    pub standings: Standings,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i32,
    pub tournament_id: i32,
    pub round_number: i32,
    pub white_player_id: i32,
    pub black_player_id: i32,
    pub result: Option<f64>,
    pub created_at: Option<NaiveDateTime>,
}

/// One ledger row: the signed change applied to a player at some round
#[derive(Debug, Clone)]
pub struct PlayerHistory {
    pub id: i32,
    pub tournament_id: i32,
    pub player_id: i32,
    pub round_of_changes: i32,
    pub time: NaiveDateTime,
    pub delta: StandingsDelta,
    pub generated_with_round: bool,
}

#[derive(Debug, Clone)]
pub struct NewPlayerHistory {
    pub tournament_id: i32,
    pub player_id: i32,
    pub round_of_changes: i32,
    pub delta: StandingsDelta,
    pub generated_with_round: bool,
}

impl ToSql for Stage {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Stage {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for SystemType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SystemType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
