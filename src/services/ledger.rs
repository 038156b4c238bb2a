//! Player history ledger.
//!
//! Every change to a player's standings is stored as a signed delta so a round
//! can be undone exactly. Entries written while generating round `N` carry
//! `round_of_changes = N` and `generated_with_round = true`; entries written
//! for a result carry the match's round and `generated_with_round = false`.

use std::collections::HashMap;

use log::{debug, info};
use rusqlite::Connection;

use crate::database::{self, NewPlayerHistory, Player, PlayerHistory};
use crate::domain::{Standings, StandingsDelta};
use crate::errors::{Result, TournamentError};

/// Stores `after - before` for one player.
pub fn record_delta(
    conn: &Connection,
    player: &Player,
    before: &Standings,
    round: i32,
    generated_with_round: bool,
) -> Result<PlayerHistory> {
    let entry = NewPlayerHistory {
        tournament_id: player.tournament_id,
        player_id: player.id,
        round_of_changes: round,
        delta: StandingsDelta::between(before, &player.standings),
        generated_with_round,
    };

    let stored = database::histories::insert_entry(conn, &entry)?;
    debug!(
        "Ledger entry {} for player {} at round {} (generated: {})",
        stored.id, player.id, round, generated_with_round
    );
    Ok(stored)
}

/// Reverts every entry belonging to `round`: all entries recorded for it plus
/// the result entries of the round before. Entries are undone newest first
/// and then deleted, so running it twice is a no-op.
///
/// Returns the number of entries reverted.
pub fn rollback_round(conn: &Connection, tournament_id: i32, round: i32) -> Result<usize> {
    let entries = database::histories::list_for_rollback(conn, tournament_id, round)?;
    if entries.is_empty() {
        debug!("Nothing to roll back for tournament {} round {}", tournament_id, round);
        return Ok(0);
    }

    let mut touched: HashMap<i32, Player> = HashMap::new();
    for entry in &entries {
        if !touched.contains_key(&entry.player_id) {
            let player = database::players::find_by_id(conn, entry.player_id)?
                .ok_or(TournamentError::PlayerNotFound(entry.player_id))?;
            touched.insert(entry.player_id, player);
        }
        if let Some(player) = touched.get_mut(&entry.player_id) {
            player.standings.revert(&entry.delta);
        }
    }

    for player in touched.values() {
        database::players::update_standings(conn, player.id, &player.standings)?;
    }
    let deleted = database::histories::delete_for_rollback(conn, tournament_id, round)?;

    info!(
        "Rolled back {} ledger entries of tournament {} round {} ({} players)",
        deleted,
        tournament_id,
        round,
        touched.len()
    );
    Ok(entries.len())
}
