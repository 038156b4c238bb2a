pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod output;
pub mod pairing;
pub mod rating;
pub mod services;

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use log::info;

use crate::cli::{Cli, SystemArg};
use crate::config::settings::AppConfig;
use crate::database::{DbPool, NewTournament, TournamentUpdate};
use crate::errors::TournamentError;
use crate::services::Services;

pub fn interpret() -> Cli {
    Cli::parse()
}

/// Opens the configured database, creating missing tables.
pub fn open_pool(config: &AppConfig) -> Result<DbPool> {
    let pool = database::create_pool(&config.database.path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::initialize_schema(&conn)
        .with_context(|| format!("Failed to prepare database {}", config.database.path))?;
    Ok(pool)
}

fn open_services(config: AppConfig) -> Result<Services> {
    let pool = open_pool(&config)?;
    Ok(Services::new(config, pool))
}

pub fn handle_init(config: AppConfig, reset: bool) -> Result<()> {
    let pool = open_pool(&config)?;
    if reset {
        let conn = database::get_connection(&pool)?;
        database::setup::reset_database(&conn)?;
    }
    info!("Database ready at {}", config.database.path);
    Ok(())
}

pub fn handle_add_user(config: AppConfig, full_name: &str, rating: f64) -> Result<()> {
    if full_name.trim().is_empty() || !rating.is_finite() {
        return Err(TournamentError::IllegalArgument(format!(
            "A user needs a name and a finite rating, got '{full_name}' and {rating}"
        ))
        .into());
    }

    let pool = open_pool(&config)?;
    let conn = database::get_connection(&pool)?;
    let user = database::users::insert_user(&conn, full_name.trim(), rating)?;
    println!("user #{} {} ({:.1})", user.id, user.full_name, user.rating);
    Ok(())
}

pub fn handle_create(
    config: AppConfig,
    name: &str,
    system: SystemArg,
    rounds: i32,
    min_players: i32,
    max_players: i32,
) -> Result<()> {
    let services = open_services(config)?;
    let view = services.tournaments.create_tournament(&NewTournament {
        name: name.to_string(),
        system_type: system.into(),
        min_players,
        max_players,
        amount_of_rounds: rounds,
    })?;
    println!("{}", output::tournament_line(&view));
    Ok(())
}

pub fn handle_update(
    config: AppConfig,
    tournament_id: i32,
    name: Option<String>,
    rounds: Option<i32>,
    min_players: Option<i32>,
    max_players: Option<i32>,
) -> Result<()> {
    let services = open_services(config)?;
    let view = services.tournaments.update_tournament(
        tournament_id,
        &TournamentUpdate {
            name,
            min_players,
            max_players,
            amount_of_rounds: rounds,
        },
    )?;
    println!("{}", output::tournament_line(&view));
    Ok(())
}

pub fn handle_register(config: AppConfig, tournament_id: i32, user_id: i32) -> Result<()> {
    let services = open_services(config)?;
    let view = services.tournaments.register_player(tournament_id, user_id)?;
    println!("{}", output::player_line(&view));
    Ok(())
}

pub fn handle_unregister(config: AppConfig, player_id: i32) -> Result<()> {
    let services = open_services(config)?;
    services.tournaments.remove_player(player_id)?;
    println!("player #{player_id} removed");
    Ok(())
}

pub fn handle_next_round(config: AppConfig, tournament_id: i32) -> Result<()> {
    let services = open_services(config)?;
    let round = services.tournaments.generate_next_round(tournament_id)?;
    let view = services.tournaments.tournament(tournament_id)?;

    println!("{}", output::tournament_line(&view));
    if view.stage != domain::Stage::Finished {
        let matches = services.tournaments.matches_for_round(tournament_id, round)?;
        println!("{}", output::pairings_table(round, &matches));
    }
    Ok(())
}

pub fn handle_result(config: AppConfig, match_id: i32, result: f64) -> Result<()> {
    let services = open_services(config)?;
    let view = services.matches.set_match_result(match_id, result)?;
    println!("{}", output::match_line(&view));
    Ok(())
}

pub fn handle_results(config: AppConfig, results: &[(i32, f64)]) -> Result<()> {
    let services = open_services(config)?;
    let views = services.matches.set_results(results)?;
    for view in &views {
        println!("{}", output::match_line(view));
    }
    Ok(())
}

pub fn handle_rollback(config: AppConfig, tournament_id: i32) -> Result<()> {
    let services = open_services(config)?;
    let round = services.tournaments.rollback_round(tournament_id)?;
    println!("tournament #{tournament_id} is back at round {round}");
    Ok(())
}

pub fn handle_delete(config: AppConfig, tournament_id: i32) -> Result<()> {
    let services = open_services(config)?;
    services.tournaments.delete_tournament(tournament_id)?;
    println!("tournament #{tournament_id} deleted");
    Ok(())
}

pub fn handle_standings(config: AppConfig, tournament_id: i32, json: bool) -> Result<()> {
    let services = open_services(config)?;
    let rows = services.tournaments.standings(tournament_id)?;
    if json {
        println!("{}", output::to_json(&rows)?);
    } else {
        println!("{}", output::standings_table(&rows));
    }
    Ok(())
}

pub fn handle_pairings(
    config: AppConfig,
    tournament_id: i32,
    round: Option<i32>,
    json: bool,
) -> Result<()> {
    let services = open_services(config)?;
    let round = match round {
        Some(round) => round,
        None => services.tournaments.tournament(tournament_id)?.current_round,
    };
    let matches = services.tournaments.matches_for_round(tournament_id, round)?;
    if json {
        println!("{}", output::to_json(&matches)?);
    } else {
        println!("{}", output::pairings_table(round, &matches));
    }
    Ok(())
}

pub fn handle_history(config: AppConfig, user_id: i32, json: bool) -> Result<()> {
    let services = open_services(config)?;
    let matches = services.matches.matches_for_user(user_id)?;
    if json {
        println!("{}", output::to_json(&matches)?);
    } else {
        for view in &matches {
            println!("{}", output::match_line(view));
        }
    }
    Ok(())
}

pub fn handle_list(config: AppConfig, json: bool) -> Result<()> {
    let services = open_services(config)?;
    let tournaments = services.tournaments.list_running()?;
    if json {
        println!("{}", output::to_json(&tournaments)?);
    } else {
        for view in &tournaments {
            println!("{}", output::tournament_line(view));
        }
    }
    Ok(())
}

pub fn handle_completions(shell: Shell) -> Result<()> {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, &mut io::stdout());
    Ok(())
}
