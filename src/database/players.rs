use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Player;
use crate::domain::Standings;

const PLAYER_COLUMNS: &str = "id, tournament_id, user_id, rating, score, color_balance, amount_of_matches, amount_of_wins, amount_of_losses, amount_of_draws, had_bye, created_at";

pub fn insert_player(
    conn: &Connection,
    tournament_id: i32,
    user_id: i32,
    standings: &Standings,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (tournament_id, user_id, rating, score, color_balance, amount_of_matches, amount_of_wins, amount_of_losses, amount_of_draws, had_bye) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            tournament_id,
            user_id,
            standings.rating,
            standings.score,
            standings.color_balance,
            standings.matches,
            standings.wins,
            standings.losses,
            standings.draws,
            standings.had_bye
        ],
        parse_player_row,
    )
    .context("Failed to insert new player")
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        user_id: row.get(2)?,
        standings: Standings {
            rating: row.get(3)?,
            score: row.get(4)?,
            color_balance: row.get(5)?,
            matches: row.get(6)?,
            wins: row.get(7)?,
            losses: row.get(8)?,
            draws: row.get(9)?,
            had_bye: row.get(10)?,
        },
        created_at: row.get(11)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i32) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

pub fn list_by_tournament(conn: &Connection, tournament_id: i32) -> Result<Vec<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE tournament_id = ?1 ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id], parse_player_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn exists_for_user(conn: &Connection, tournament_id: i32, user_id: i32) -> Result<bool> {
    let sql = "SELECT EXISTS(SELECT 1 FROM players WHERE tournament_id = ?1 AND user_id = ?2)";

    conn.query_row(sql, params![tournament_id, user_id], |row| row.get(0))
        .context("Failed to check player registration")
}

pub fn update_standings(conn: &Connection, id: i32, standings: &Standings) -> Result<()> {
    let sql = "UPDATE players SET rating = ?1, score = ?2, color_balance = ?3, amount_of_matches = ?4, amount_of_wins = ?5, amount_of_losses = ?6, amount_of_draws = ?7, had_bye = ?8 WHERE id = ?9";

    conn.execute(
        sql,
        params![
            standings.rating,
            standings.score,
            standings.color_balance,
            standings.matches,
            standings.wins,
            standings.losses,
            standings.draws,
            standings.had_bye,
            id
        ],
    )
    .context("Failed to update player standings")
    .map(|_| ())
}

pub fn delete_by_id(conn: &Connection, id: i32) -> Result<()> {
    conn.execute("DELETE FROM players WHERE id = ?1", params![id])
        .context("Failed to delete player")
        .map(|_| ())
}

pub fn delete_by_tournament(conn: &Connection, tournament_id: i32) -> Result<usize> {
    conn.execute("DELETE FROM players WHERE tournament_id = ?1", params![tournament_id])
        .context("Failed to delete tournament players")
}
