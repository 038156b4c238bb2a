use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Match;
use crate::domain::Color;

const MATCH_COLUMNS: &str = "id, tournament_id, round_number, white_player_id, black_player_id, result, created_at";

pub fn insert_match(
    conn: &Connection,
    tournament_id: i32,
    round_number: i32,
    white_player_id: i32,
    black_player_id: i32,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (tournament_id, round_number, white_player_id, black_player_id) VALUES (?1, ?2, ?3, ?4) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![tournament_id, round_number, white_player_id, black_player_id],
        parse_match_row,
    )
    .context("Failed to insert new match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        round_number: row.get(2)?,
        white_player_id: row.get(3)?,
        black_player_id: row.get(4)?,
        result: row.get(5)?,
        created_at: row.get(6)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i32) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

pub fn list_by_tournament(conn: &Connection, tournament_id: i32) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = ?1 ORDER BY round_number, id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn list_by_round(
    conn: &Connection,
    tournament_id: i32,
    round_number: i32,
) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE tournament_id = ?1 AND round_number = ?2 ORDER BY id"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id, round_number], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn set_result(conn: &Connection, id: i32, result: f64) -> Result<()> {
    conn.execute("UPDATE matches SET result = ?1 WHERE id = ?2", params![result, id])
        .context("Failed to store match result")
        .map(|_| ())
}

pub fn clear_results_for_round(
    conn: &Connection,
    tournament_id: i32,
    round_number: i32,
) -> Result<usize> {
    conn.execute(
        "UPDATE matches SET result = NULL WHERE tournament_id = ?1 AND round_number = ?2",
        params![tournament_id, round_number],
    )
    .context("Failed to clear round results")
}

pub fn delete_by_round(
    conn: &Connection,
    tournament_id: i32,
    round_number: i32,
) -> Result<usize> {
    conn.execute(
        "DELETE FROM matches WHERE tournament_id = ?1 AND round_number = ?2",
        params![tournament_id, round_number],
    )
    .context("Failed to delete round matches")
}

pub fn delete_by_tournament(conn: &Connection, tournament_id: i32) -> Result<usize> {
    conn.execute("DELETE FROM matches WHERE tournament_id = ?1", params![tournament_id])
        .context("Failed to delete tournament matches")
}

/// Every game a user played, across all tournaments, newest first.
pub fn list_by_user(conn: &Connection, user_id: i32) -> Result<Vec<Match>> {
    let sql = "SELECT m.id, m.tournament_id, m.round_number, m.white_player_id, m.black_player_id, m.result, m.created_at \
         FROM matches m \
         JOIN players w ON w.id = m.white_player_id \
         JOIN players b ON b.id = m.black_player_id \
         WHERE w.user_id = ?1 OR b.user_id = ?1 \
         ORDER BY m.created_at DESC, m.id DESC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![user_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn count_by_player(conn: &Connection, player_id: i32) -> Result<i64> {
    let sql = "SELECT COUNT(*) FROM matches WHERE white_player_id = ?1 OR black_player_id = ?1";

    conn.query_row(sql, params![player_id], |row| row.get(0))
        .context("Failed to count player matches")
}

/// Colours a player had, oldest round first.
pub fn color_history(conn: &Connection, player_id: i32) -> Result<Vec<Color>> {
    let sql = "SELECT white_player_id = ?1 FROM matches \
         WHERE white_player_id = ?1 OR black_player_id = ?1 \
         ORDER BY round_number, id";

    let mut stmt = conn.prepare(sql)?;
    let colors = stmt
        .query_map(params![player_id], |row| {
            let was_white: bool = row.get(0)?;
            Ok(if was_white { Color::White } else { Color::Black })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(colors)
}
