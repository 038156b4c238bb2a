use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};

use super::models::{NewPlayerHistory, PlayerHistory};
use crate::domain::StandingsDelta;

const HISTORY_COLUMNS: &str = "id, tournament_id, player_id, round_of_changes, time, rating_changes, score_changes, color_balance_changes, amount_of_matches_changes, amount_of_wins_changes, amount_of_losses_changes, amount_of_draws_changes, had_bye_changes, generated_with_round";

pub fn insert_entry(conn: &Connection, entry: &NewPlayerHistory) -> Result<PlayerHistory> {
    let sql = format!(
        "INSERT INTO player_histories (tournament_id, player_id, round_of_changes, time, rating_changes, score_changes, color_balance_changes, amount_of_matches_changes, amount_of_wins_changes, amount_of_losses_changes, amount_of_draws_changes, had_bye_changes, generated_with_round) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) RETURNING {HISTORY_COLUMNS}"
    );
    let delta = &entry.delta;

    conn.query_row(
        &sql,
        params![
            entry.tournament_id,
            entry.player_id,
            entry.round_of_changes,
            Utc::now().naive_utc(),
            delta.rating,
            delta.score,
            delta.color_balance,
            delta.matches,
            delta.wins,
            delta.losses,
            delta.draws,
            delta.had_bye_changed,
            entry.generated_with_round
        ],
        parse_history_row,
    )
    .context("Failed to insert player history entry")
}

fn parse_history_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerHistory> {
    Ok(PlayerHistory {
        id: row.get(0)?,
        tournament_id: row.get(1)?,
        player_id: row.get(2)?,
        round_of_changes: row.get(3)?,
        time: row.get(4)?,
        delta: StandingsDelta {
            rating: row.get(5)?,
            score: row.get(6)?,
            color_balance: row.get(7)?,
            matches: row.get(8)?,
            wins: row.get(9)?,
            losses: row.get(10)?,
            draws: row.get(11)?,
            had_bye_changed: row.get(12)?,
        },
        generated_with_round: row.get(13)?,
    })
}

/// Entries undone when rolling back `round`: everything recorded for it,
/// plus result entries of the round before. Newest first.
pub fn list_for_rollback(
    conn: &Connection,
    tournament_id: i32,
    round: i32,
) -> Result<Vec<PlayerHistory>> {
    let sql = format!(
        "SELECT {HISTORY_COLUMNS} FROM player_histories
         WHERE tournament_id = ?1
           AND (round_of_changes = ?2 OR (round_of_changes = ?2 - 1 AND generated_with_round = 0))
         ORDER BY id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![tournament_id, round], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_for_rollback(conn: &Connection, tournament_id: i32, round: i32) -> Result<usize> {
    let sql = "DELETE FROM player_histories
               WHERE tournament_id = ?1
                 AND (round_of_changes = ?2 OR (round_of_changes = ?2 - 1 AND generated_with_round = 0))";

    conn.execute(sql, params![tournament_id, round])
        .context("Failed to delete rolled back history entries")
}

pub fn list_by_player(conn: &Connection, player_id: i32) -> Result<Vec<PlayerHistory>> {
    let sql = format!("SELECT {HISTORY_COLUMNS} FROM player_histories WHERE player_id = ?1 ORDER BY id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn delete_by_tournament(conn: &Connection, tournament_id: i32) -> Result<usize> {
    conn.execute(
        "DELETE FROM player_histories WHERE tournament_id = ?1",
        params![tournament_id],
    )
    .context("Failed to delete tournament history")
}
