use std::sync::Arc;

use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};

use super::ledger;
use super::locks::TournamentLocks;
use crate::config::settings::AppConfig;
use crate::database::{self, DbPool, Match, Player};
use crate::domain::{Color, MatchOutcome, MatchView, PlayerView, Stage};
use crate::errors::{Result, TournamentError};
use crate::pairing::Pairing;
use crate::rating::{EloCalculator, Encounter, RatingCalculator};

/// Applies match results to player standings.
pub struct MatchService {
    pool: DbPool,
    locks: Arc<TournamentLocks>,
    calculator: Box<dyn RatingCalculator>,
}

impl MatchService {
    pub fn new(config: AppConfig, pool: DbPool, locks: Arc<TournamentLocks>) -> Self {
        Self::with_calculator(pool, locks, Box::new(EloCalculator::new(config.rating)))
    }

    pub fn with_calculator(
        pool: DbPool,
        locks: Arc<TournamentLocks>,
        calculator: Box<dyn RatingCalculator>,
    ) -> Self {
        Self {
            pool,
            locks,
            calculator,
        }
    }

    /// Stores the result of an unresolved match, updates both players'
    /// rating, score and counters and records the changes in the ledger.
    pub fn set_match_result(&self, match_id: i32, result: f64) -> Result<MatchView> {
        let tournament_id = {
            let conn = database::get_connection(&self.pool)?;
            database::matches::find_by_id(&conn, match_id)?
                .ok_or(TournamentError::MatchNotFound(match_id))?
                .tournament_id
        };

        self.locks
            .with_lock(tournament_id, || self.apply_result(match_id, result))
    }

    /// Applies each result in order. Stops at the first failure; results
    /// stored before it stay stored.
    pub fn set_results(&self, results: &[(i32, f64)]) -> Result<Vec<MatchView>> {
        let mut views = Vec::with_capacity(results.len());
        for &(match_id, result) in results {
            match self.set_match_result(match_id, result) {
                Ok(view) => views.push(view),
                Err(err) => {
                    warn!(
                        "Batch stopped at match {} after {} stored results: {}",
                        match_id,
                        views.len(),
                        err
                    );
                    return Err(err);
                }
            }
        }
        Ok(views)
    }

    pub fn find_match(&self, match_id: i32) -> Result<MatchView> {
        let conn = database::get_connection(&self.pool)?;
        let game = database::matches::find_by_id(&conn, match_id)?
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        match_view(&conn, &game)
    }

    /// A user's games across every tournament, newest first.
    pub fn matches_for_user(&self, user_id: i32) -> Result<Vec<MatchView>> {
        let conn = database::get_connection(&self.pool)?;
        database::users::find_by_id(&conn, user_id)?
            .ok_or(TournamentError::UserNotFound(user_id))?;

        database::matches::list_by_user(&conn, user_id)?
            .iter()
            .map(|game| match_view(&conn, game))
            .collect()
    }

    fn apply_result(&self, match_id: i32, result: f64) -> Result<MatchView> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut game = database::matches::find_by_id(&tx, match_id)?
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        if let Some(existing) = game.result {
            return Err(TournamentError::MatchAlreadyHasResult {
                match_id,
                result: existing,
                attempted: result,
            });
        }
        let outcome = MatchOutcome::try_from(result)?;

        let tournament = database::tournaments::find_by_id(&tx, game.tournament_id)?
            .ok_or(TournamentError::TournamentNotFound(game.tournament_id))?;
        if tournament.stage == Stage::Finished {
            return Err(TournamentError::IllegalState(format!(
                "Tournament {} is finished, results are closed",
                tournament.id
            )));
        }

        let mut white = load_player(&tx, game.white_player_id)?;
        let mut black = load_player(&tx, game.black_player_id)?;
        let white_before = white.standings.clone();
        let black_before = black.standings.clone();

        let rated = self.calculator.calculate(Encounter::new(
            white.standings.clone(),
            black.standings.clone(),
            Some(outcome),
        ))?;
        white.standings = rated.white;
        black.standings = rated.black;
        white.standings.score += outcome.white_points();
        black.standings.score += outcome.black_points();

        database::matches::set_result(&tx, game.id, result)?;
        game.result = Some(result);
        for (player, before) in [(&white, &white_before), (&black, &black_before)] {
            database::players::update_standings(&tx, player.id, &player.standings)?;
            ledger::record_delta(&tx, player, before, game.round_number, false)?;
        }

        let view = match_view(&tx, &game)?;
        tx.commit()?;

        info!(
            "Match {} (round {}) result {}: white {:.1} -> {:.1}, black {:.1} -> {:.1}",
            game.id,
            game.round_number,
            result,
            white_before.rating,
            white.standings.rating,
            black_before.rating,
            black.standings.rating
        );
        Ok(view)
    }
}

/// Persists a pairing as an unresolved match of `round` and books the colours
/// on both players as round-generation ledger entries.
pub(crate) fn create_match(
    conn: &Connection,
    tournament_id: i32,
    round: i32,
    pairing: &Pairing,
) -> Result<Match> {
    for (player_id, color) in [
        (pairing.white, Color::White),
        (pairing.black, Color::Black),
    ] {
        let mut player = load_player(conn, player_id)?;
        let before = player.standings.clone();
        player.standings.take_color(color);
        database::players::update_standings(conn, player.id, &player.standings)?;
        ledger::record_delta(conn, &player, &before, round, true)?;
    }

    let game = database::matches::insert_match(
        conn,
        tournament_id,
        round,
        pairing.white,
        pairing.black,
    )?;
    Ok(game)
}

pub(crate) fn load_player(conn: &Connection, player_id: i32) -> Result<Player> {
    database::players::find_by_id(conn, player_id)?
        .ok_or(TournamentError::PlayerNotFound(player_id))
}

pub(crate) fn player_view(conn: &Connection, player: &Player) -> Result<PlayerView> {
    let user = database::users::find_by_id(conn, player.user_id)?
        .ok_or(TournamentError::UserNotFound(player.user_id))?;

    Ok(PlayerView {
        player_id: player.id,
        user_id: player.user_id,
        full_name: user.full_name,
        standings: player.standings.clone(),
    })
}

pub(crate) fn match_view(conn: &Connection, game: &Match) -> Result<MatchView> {
    let white = load_player(conn, game.white_player_id)?;
    let black = load_player(conn, game.black_player_id)?;

    Ok(MatchView {
        match_id: game.id,
        tournament_id: game.tournament_id,
        round_number: game.round_number,
        white_player: player_view(conn, &white)?,
        black_player: player_view(conn, &black)?,
        result: game.result,
    })
}
