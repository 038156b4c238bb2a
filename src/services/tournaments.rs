use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use rusqlite::{Connection, TransactionBehavior};

use super::ledger;
use super::locks::TournamentLocks;
use super::matches::{create_match, load_player, match_view, player_view};
use crate::config::settings::AppConfig;
use crate::database::{self, DbPool, NewTournament, Player, Tournament, TournamentUpdate};
use crate::domain::{
    Color, MatchView, PlayerView, Stage, Standings, StandingsRow, SystemType, TournamentView,
};
use crate::errors::{Result, TournamentError};
use crate::pairing::{round_robin, swiss, Entrant, OpponentIndex, RoundPlan};

/// Tournament lifecycle: registration, round generation, rollback and
/// deletion.
pub struct TournamentService {
    config: AppConfig,
    pool: DbPool,
    locks: Arc<TournamentLocks>,
}

impl TournamentService {
    pub fn new(config: AppConfig, pool: DbPool, locks: Arc<TournamentLocks>) -> Self {
        Self {
            config,
            pool,
            locks,
        }
    }

    pub fn create_tournament(&self, tournament: &NewTournament) -> Result<TournamentView> {
        validate_settings(
            &tournament.name,
            tournament.min_players,
            tournament.max_players,
            tournament.amount_of_rounds,
        )?;

        let conn = database::get_connection(&self.pool)?;
        let created = database::tournaments::insert_tournament(&conn, tournament)?;
        info!(
            "Created {} tournament {} '{}' ({} rounds)",
            created.system_type, created.id, created.name, created.amount_of_rounds
        );
        tournament_view(&conn, &created)
    }

    /// Edits name, round count and player bounds while registration is
    /// still open.
    pub fn update_tournament(
        &self,
        tournament_id: i32,
        update: &TournamentUpdate,
    ) -> Result<TournamentView> {
        self.locks.with_lock(tournament_id, || -> Result<TournamentView> {
            let mut conn = database::get_connection(&self.pool)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let mut tournament = load_tournament(&tx, tournament_id)?;
            if tournament.stage != Stage::Registration {
                return Err(TournamentError::IllegalState(format!(
                    "Tournament {} is {}, its settings are fixed",
                    tournament_id, tournament.stage
                )));
            }

            if let Some(name) = &update.name {
                tournament.name = name.trim().to_string();
            }
            if let Some(min_players) = update.min_players {
                tournament.min_players = min_players;
            }
            if let Some(max_players) = update.max_players {
                tournament.max_players = max_players;
            }
            if let Some(rounds) = update.amount_of_rounds {
                tournament.amount_of_rounds = rounds;
            }
            validate_settings(
                &tournament.name,
                tournament.min_players,
                tournament.max_players,
                tournament.amount_of_rounds,
            )?;

            let registered = database::players::list_by_tournament(&tx, tournament_id)?.len();
            if registered > tournament.max_players as usize {
                return Err(TournamentError::TooManyPlayers {
                    have: registered,
                    max: tournament.max_players as usize,
                });
            }

            database::tournaments::update_settings(&tx, &tournament)?;
            let view = tournament_view(&tx, &tournament)?;
            tx.commit()?;

            info!(
                "Updated tournament {} '{}': {} rounds, {}..={} players",
                tournament.id,
                tournament.name,
                tournament.amount_of_rounds,
                tournament.min_players,
                tournament.max_players
            );
            Ok(view)
        })
    }

    /// Adds a user to the roster, seeding rating and lifetime counters from
    /// the profile.
    pub fn register_player(&self, tournament_id: i32, user_id: i32) -> Result<PlayerView> {
        self.locks.with_lock(tournament_id, || -> Result<PlayerView> {
            let mut conn = database::get_connection(&self.pool)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let tournament = load_tournament(&tx, tournament_id)?;
            if tournament.stage != Stage::Registration {
                return Err(TournamentError::IllegalState(format!(
                    "Tournament {} is {}, registration is closed",
                    tournament_id, tournament.stage
                )));
            }
            let user = database::users::find_by_id(&tx, user_id)?
                .ok_or(TournamentError::UserNotFound(user_id))?;
            if database::players::exists_for_user(&tx, tournament_id, user_id)? {
                return Err(TournamentError::AlreadyRegistered {
                    user_id,
                    tournament_id,
                });
            }
            let registered = database::players::list_by_tournament(&tx, tournament_id)?.len();
            if registered >= tournament.max_players as usize {
                return Err(TournamentError::TooManyPlayers {
                    have: registered + 1,
                    max: tournament.max_players as usize,
                });
            }

            let standings = Standings::seeded(
                user.rating,
                user.amount_of_matches,
                user.amount_of_wins,
                user.amount_of_losses,
                user.amount_of_draws,
            );
            let player = database::players::insert_player(&tx, tournament_id, user_id, &standings)?;
            let view = player_view(&tx, &player)?;
            tx.commit()?;

            info!(
                "Registered user {} as player {} in tournament {}",
                user_id, player.id, tournament_id
            );
            Ok(view)
        })
    }

    /// Removes a player who has not taken part in any round yet.
    pub fn remove_player(&self, player_id: i32) -> Result<()> {
        let tournament_id = {
            let conn = database::get_connection(&self.pool)?;
            load_player(&conn, player_id)?.tournament_id
        };

        self.locks.with_lock(tournament_id, || -> Result<()> {
            let mut conn = database::get_connection(&self.pool)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let player = load_player(&tx, player_id)?;
            let played = database::matches::count_by_player(&tx, player.id)?;
            let booked = database::histories::list_by_player(&tx, player.id)?.len();
            if played > 0 || booked > 0 {
                return Err(TournamentError::IllegalState(format!(
                    "Player {} already took part in round play ({} matches)",
                    player_id, played
                )));
            }

            database::players::delete_by_id(&tx, player.id)?;
            tx.commit()?;

            info!("Removed player {} from tournament {}", player_id, tournament_id);
            Ok(())
        })
    }

    /// Generates the next round and returns its number.
    ///
    /// Once every round has been played the tournament is finished instead,
    /// user profiles take over the final ratings and the current round number
    /// is returned unchanged.
    pub fn generate_next_round(&self, tournament_id: i32) -> Result<i32> {
        self.locks.with_lock(tournament_id, || -> Result<i32> {
            let mut conn = database::get_connection(&self.pool)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let tournament = load_tournament(&tx, tournament_id)?;
            if tournament.stage == Stage::Finished {
                return Err(TournamentError::IllegalState(format!(
                    "Tournament {} is already finished",
                    tournament_id
                )));
            }
            if tournament.current_round >= tournament.amount_of_rounds {
                finish(&tx, &tournament)?;
                tx.commit()?;
                return Ok(tournament.current_round);
            }

            let players = database::players::list_by_tournament(&tx, tournament_id)?;
            check_roster_bounds(&tournament, players.len())?;

            let round = tournament.current_round + 1;
            let plan = self.plan_round(&tx, &tournament, &players, round)?;

            if let Some(bye) = plan.bye {
                grant_bye(&tx, bye, round)?;
            }
            for pairing in &plan.pairings {
                create_match(&tx, tournament_id, round, pairing)?;
            }
            database::tournaments::update_progress(&tx, tournament_id, Stage::Playing, round)?;
            tx.commit()?;

            info!(
                "Tournament {} round {}: {} pairings, bye: {}",
                tournament_id,
                round,
                plan.pairings.len(),
                plan.bye
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
            Ok(round)
        })
    }

    fn plan_round(
        &self,
        conn: &Connection,
        tournament: &Tournament,
        players: &[Player],
        round: i32,
    ) -> Result<RoundPlan> {
        let entrants = players
            .iter()
            .map(|player| entrant(conn, player))
            .collect::<Result<Vec<_>>>()?;

        match tournament.system_type {
            SystemType::RoundRobin => round_robin::plan_round(&entrants, round),
            SystemType::Swiss if round == 1 => swiss::plan_first_round(&entrants),
            SystemType::Swiss => {
                let games = database::matches::list_by_tournament(conn, tournament.id)?;
                let opponents = OpponentIndex::from_games(
                    games.iter().map(|game| (game.white_player_id, game.black_player_id)),
                );
                swiss::plan_round(&entrants, &opponents, &self.config.pairing)
            }
        }
    }

    /// Undoes the most recent round and returns the new current round.
    ///
    /// The round's matches are deleted, results of the round before are
    /// cleared and every ledger entry involved is reverted.
    pub fn rollback_round(&self, tournament_id: i32) -> Result<i32> {
        self.locks.with_lock(tournament_id, || -> Result<i32> {
            let mut conn = database::get_connection(&self.pool)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let tournament = load_tournament(&tx, tournament_id)?;
            if tournament.stage == Stage::Finished {
                return Err(TournamentError::IllegalState(format!(
                    "Tournament {} is finished and cannot be rolled back",
                    tournament_id
                )));
            }
            if tournament.current_round == 0 {
                return Err(TournamentError::IllegalState(format!(
                    "Tournament {} has no round to roll back",
                    tournament_id
                )));
            }

            let round = tournament.current_round;
            let reverted = ledger::rollback_round(&tx, tournament_id, round)?;
            let deleted = database::matches::delete_by_round(&tx, tournament_id, round)?;
            if round > 1 {
                database::matches::clear_results_for_round(&tx, tournament_id, round - 1)?;
            }

            let previous = round - 1;
            let stage = if previous == 0 {
                Stage::Registration
            } else {
                Stage::Playing
            };
            database::tournaments::update_progress(&tx, tournament_id, stage, previous)?;
            tx.commit()?;

            info!(
                "Tournament {} rolled back to round {} ({} ledger entries, {} matches)",
                tournament_id, previous, reverted, deleted
            );
            Ok(previous)
        })
    }

    /// Deletes a tournament with its roster, matches and ledger. A finished
    /// tournament is rolled back round by round first and the restored
    /// ratings are written back to the user profiles.
    pub fn delete_tournament(&self, tournament_id: i32) -> Result<()> {
        self.locks.with_lock(tournament_id, || -> Result<()> {
            let mut conn = database::get_connection(&self.pool)?;
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let tournament = load_tournament(&tx, tournament_id)?;
            if tournament.stage == Stage::Finished {
                for round in (1..=tournament.current_round).rev() {
                    ledger::rollback_round(&tx, tournament_id, round)?;
                }
                let synced = database::users::sync_from_players(&tx, tournament_id)?;
                info!("Restored {} user profiles from tournament {}", synced, tournament_id);
            }

            database::histories::delete_by_tournament(&tx, tournament_id)?;
            database::matches::delete_by_tournament(&tx, tournament_id)?;
            let players = database::players::delete_by_tournament(&tx, tournament_id)?;
            database::tournaments::delete_by_id(&tx, tournament_id)?;
            tx.commit()?;

            info!("Deleted tournament {} with {} players", tournament_id, players);
            Ok(())
        })
    }

    pub fn tournament(&self, tournament_id: i32) -> Result<TournamentView> {
        let conn = database::get_connection(&self.pool)?;
        let tournament = load_tournament(&conn, tournament_id)?;
        tournament_view(&conn, &tournament)
    }

    pub fn list_running(&self) -> Result<Vec<TournamentView>> {
        let conn = database::get_connection(&self.pool)?;
        database::tournaments::list_running(&conn)?
            .iter()
            .map(|tournament| tournament_view(&conn, tournament))
            .collect()
    }

    pub fn matches_for_round(&self, tournament_id: i32, round: i32) -> Result<Vec<MatchView>> {
        let conn = database::get_connection(&self.pool)?;
        load_tournament(&conn, tournament_id)?;

        database::matches::list_by_round(&conn, tournament_id, round)?
            .iter()
            .map(|game| match_view(&conn, game))
            .collect()
    }

    pub fn players(&self, tournament_id: i32) -> Result<Vec<PlayerView>> {
        let conn = database::get_connection(&self.pool)?;
        load_tournament(&conn, tournament_id)?;

        database::players::list_by_tournament(&conn, tournament_id)?
            .iter()
            .map(|player| player_view(&conn, player))
            .collect()
    }

    pub fn color_history(&self, player_id: i32) -> Result<Vec<Color>> {
        let conn = database::get_connection(&self.pool)?;
        load_player(&conn, player_id)?;
        Ok(database::matches::color_history(&conn, player_id)?)
    }

    /// Ranks the roster by score, then by the summed current score of every
    /// opponent met, then by rating.
    pub fn standings(&self, tournament_id: i32) -> Result<Vec<StandingsRow>> {
        let conn = database::get_connection(&self.pool)?;
        load_tournament(&conn, tournament_id)?;

        let players = database::players::list_by_tournament(&conn, tournament_id)?;
        let games = database::matches::list_by_tournament(&conn, tournament_id)?;

        let scores: HashMap<i32, f64> = players
            .iter()
            .map(|player| (player.id, player.standings.score))
            .collect();
        let mut second_scores: HashMap<i32, f64> = HashMap::new();
        for game in &games {
            let white_score = scores.get(&game.white_player_id).copied().unwrap_or_default();
            let black_score = scores.get(&game.black_player_id).copied().unwrap_or_default();
            *second_scores.entry(game.white_player_id).or_default() += black_score;
            *second_scores.entry(game.black_player_id).or_default() += white_score;
        }

        let mut rows = players
            .iter()
            .map(|player| -> Result<StandingsRow> {
                let user = database::users::find_by_id(&conn, player.user_id)?
                    .ok_or(TournamentError::UserNotFound(player.user_id))?;
                Ok(StandingsRow {
                    rank: 0,
                    player_id: player.id,
                    full_name: user.full_name,
                    score: player.standings.score,
                    second_score: second_scores.get(&player.id).copied().unwrap_or_default(),
                    rating: player.standings.rating,
                    wins: player.standings.wins,
                    draws: player.standings.draws,
                    losses: player.standings.losses,
                    had_bye: player.standings.had_bye,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        rows.sort_by(standings_order);
        for (index, row) in rows.iter_mut().enumerate() {
            row.rank = index + 1;
        }
        Ok(rows)
    }
}

fn standings_order(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then(b.second_score.total_cmp(&a.second_score))
        .then(b.rating.total_cmp(&a.rating))
        .then(a.player_id.cmp(&b.player_id))
}

fn validate_settings(name: &str, min_players: i32, max_players: i32, rounds: i32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TournamentError::IllegalArgument(
            "Tournament name must not be empty".into(),
        ));
    }
    if min_players < 2 || min_players > max_players {
        return Err(TournamentError::IllegalArgument(format!(
            "Player bounds must satisfy 2 <= min <= max, got min {} and max {}",
            min_players, max_players
        )));
    }
    if rounds < 1 {
        return Err(TournamentError::IllegalArgument(format!(
            "A tournament needs at least one round, got {}",
            rounds
        )));
    }
    Ok(())
}

fn load_tournament(conn: &Connection, tournament_id: i32) -> Result<Tournament> {
    database::tournaments::find_by_id(conn, tournament_id)?
        .ok_or(TournamentError::TournamentNotFound(tournament_id))
}

fn tournament_view(conn: &Connection, tournament: &Tournament) -> Result<TournamentView> {
    let players = database::players::list_by_tournament(conn, tournament.id)?;

    Ok(TournamentView {
        tournament_id: tournament.id,
        name: tournament.name.clone(),
        system_type: tournament.system_type,
        stage: tournament.stage,
        current_round: tournament.current_round,
        amount_of_rounds: tournament.amount_of_rounds,
        players_registered: players.len(),
        min_players: tournament.min_players,
        max_players: tournament.max_players,
    })
}

fn check_roster_bounds(tournament: &Tournament, registered: usize) -> Result<()> {
    if registered < tournament.min_players as usize {
        return Err(TournamentError::NotEnoughPlayers {
            have: registered,
            need: tournament.min_players as usize,
        });
    }
    if registered > tournament.max_players as usize {
        return Err(TournamentError::TooManyPlayers {
            have: registered,
            max: tournament.max_players as usize,
        });
    }
    Ok(())
}

fn entrant(conn: &Connection, player: &Player) -> Result<Entrant> {
    Ok(Entrant {
        player_id: player.id,
        score: player.standings.score,
        rating: player.standings.rating,
        color_balance: player.standings.color_balance,
        had_bye: player.standings.had_bye,
        color_history: database::matches::color_history(conn, player.id)?,
    })
}

fn grant_bye(conn: &Connection, player_id: i32, round: i32) -> Result<()> {
    let mut player = load_player(conn, player_id)?;
    let before = player.standings.clone();
    player.standings.grant_bye();
    database::players::update_standings(conn, player.id, &player.standings)?;
    ledger::record_delta(conn, &player, &before, round, true)?;

    debug!("Player {} receives the bye of round {}", player_id, round);
    Ok(())
}

fn finish(conn: &Connection, tournament: &Tournament) -> Result<()> {
    database::tournaments::update_progress(
        conn,
        tournament.id,
        Stage::Finished,
        tournament.current_round,
    )?;
    let synced = database::users::sync_from_players(conn, tournament.id)?;

    info!(
        "Tournament {} finished after round {}, synced {} user profiles",
        tournament.id, tournament.current_round, synced
    );
    Ok(())
}
