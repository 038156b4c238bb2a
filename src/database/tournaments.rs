use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{NewTournament, Tournament};
use crate::domain::Stage;

const TOURNAMENT_COLUMNS: &str = "id, name, system_type, stage, current_round, amount_of_rounds, min_players, max_players, created_at";

pub fn insert_tournament(conn: &Connection, tournament: &NewTournament) -> Result<Tournament> {
    let sql = format!(
        "INSERT INTO tournaments (name, system_type, stage, current_round, amount_of_rounds, min_players, max_players) VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6) RETURNING {TOURNAMENT_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament.name,
            tournament.system_type,
            Stage::Registration,
            tournament.amount_of_rounds,
            tournament.min_players,
            tournament.max_players
        ],
        parse_tournament_row,
    )
    .context("Failed to insert new tournament")
}

fn parse_tournament_row(row: &rusqlite::Row) -> rusqlite::Result<Tournament> {
    Ok(Tournament {
        id: row.get(0)?,
        name: row.get(1)?,
        system_type: row.get(2)?,
        stage: row.get(3)?,
        current_round: row.get(4)?,
        amount_of_rounds: row.get(5)?,
        min_players: row.get(6)?,
        max_players: row.get(7)?,
        created_at: row.get(8)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i32) -> Result<Option<Tournament>> {
    let sql = format!("SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_tournament_row)
        .optional()
        .context("Failed to query tournament by id")
}

pub fn list_running(conn: &Connection) -> Result<Vec<Tournament>> {
    let sql = format!(
        "SELECT {TOURNAMENT_COLUMNS} FROM tournaments WHERE stage != ?1 ORDER BY created_at DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![Stage::Finished], parse_tournament_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_settings(conn: &Connection, tournament: &Tournament) -> Result<()> {
    let sql = "UPDATE tournaments SET name = ?1, amount_of_rounds = ?2, min_players = ?3, max_players = ?4 WHERE id = ?5";

    conn.execute(
        sql,
        params![
            tournament.name,
            tournament.amount_of_rounds,
            tournament.min_players,
            tournament.max_players,
            tournament.id
        ],
    )
    .context("Failed to update tournament settings")
    .map(|_| ())
}

pub fn update_progress(
    conn: &Connection,
    id: i32,
    stage: Stage,
    current_round: i32,
) -> Result<()> {
    let sql = "UPDATE tournaments SET stage = ?1, current_round = ?2 WHERE id = ?3";

    conn.execute(sql, params![stage, current_round, id])
        .context("Failed to update tournament progress")
        .map(|_| ())
}

pub fn delete_by_id(conn: &Connection, id: i32) -> Result<()> {
    conn.execute("DELETE FROM tournaments WHERE id = ?1", params![id])
        .context("Failed to delete tournament")
        .map(|_| ())
}
