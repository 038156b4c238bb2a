use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::User;

const USER_COLUMNS: &str = "id, full_name, rating, amount_of_matches, amount_of_wins, amount_of_losses, amount_of_draws, created_at";

pub fn insert_user(conn: &Connection, full_name: &str, rating: f64) -> Result<User> {
    let sql = format!(
        "INSERT INTO users (full_name, rating) VALUES (?1, ?2) RETURNING {USER_COLUMNS}"
    );

    conn.query_row(&sql, params![full_name, rating], parse_user_row)
        .context("Failed to insert user")
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        full_name: row.get(1)?,
        rating: row.get(2)?,
        amount_of_matches: row.get(3)?,
        amount_of_wins: row.get(4)?,
        amount_of_losses: row.get(5)?,
        amount_of_draws: row.get(6)?,
        created_at: row.get(7)?,
    })
}

pub fn find_by_id(conn: &Connection, id: i32) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_user_row)
        .optional()
        .context("Failed to query user by id")
}

/// Copies rating and lifetime counters of every player of a tournament back
/// to the owning user profile. Returns the number of profiles updated.
pub fn sync_from_players(conn: &Connection, tournament_id: i32) -> Result<usize> {
    let sql = "
        UPDATE users
        SET rating = p.rating,
            amount_of_matches = p.amount_of_matches,
            amount_of_wins = p.amount_of_wins,
            amount_of_losses = p.amount_of_losses,
            amount_of_draws = p.amount_of_draws
        FROM (SELECT * FROM players WHERE tournament_id = ?1) AS p
        WHERE users.id = p.user_id
    ";

    conn.execute(sql, params![tournament_id])
        .context("Failed to sync user ratings from players")
}
