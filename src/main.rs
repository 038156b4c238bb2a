use anyhow::{Error, Result};

use tournament_engine::cli::{Cli, Command};
use tournament_engine::config::settings::AppConfig;
use tournament_engine::errors::TournamentError;
use tournament_engine::{
    handle_add_user, handle_completions, handle_create, handle_delete, handle_history, handle_init,
    handle_list, handle_next_round, handle_pairings, handle_register, handle_result,
    handle_results, handle_rollback, handle_standings, handle_unregister, handle_update,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code(&e));
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

/// 2 for requests the engine refused, 1 for everything else
fn exit_code(error: &Error) -> i32 {
    match error.downcast_ref::<TournamentError>() {
        Some(err) if err.is_recoverable() => 2,
        _ => 1,
    }
}

fn parse_and_execute() -> Result<()> {
    let cli = interpret();
    execute_command(cli)
}

fn execute_command(cli: Cli) -> Result<()> {
    let config = AppConfig::new().with_database_path(cli.database);

    match cli.command {
        Command::Init { reset } => handle_init(config, reset),
        Command::AddUser { full_name, rating } => handle_add_user(config, &full_name, rating),
        Command::Create {
            name,
            system,
            rounds,
            min_players,
            max_players,
        } => handle_create(config, &name, system, rounds, min_players, max_players),
        Command::Update {
            tournament_id,
            name,
            rounds,
            min_players,
            max_players,
        } => handle_update(config, tournament_id, name, rounds, min_players, max_players),
        Command::Register {
            tournament_id,
            user_id,
        } => handle_register(config, tournament_id, user_id),
        Command::Unregister { player_id } => handle_unregister(config, player_id),
        Command::NextRound { tournament_id } => handle_next_round(config, tournament_id),
        Command::Result { match_id, result } => handle_result(config, match_id, result),
        Command::Results { results } => handle_results(config, &results),
        Command::Rollback { tournament_id } => handle_rollback(config, tournament_id),
        Command::Delete { tournament_id } => handle_delete(config, tournament_id),
        Command::Standings {
            tournament_id,
            json,
        } => handle_standings(config, tournament_id, json),
        Command::Pairings {
            tournament_id,
            round,
            json,
        } => handle_pairings(config, tournament_id, round, json),
        Command::History { user_id, json } => handle_history(config, user_id, json),
        Command::List { json } => handle_list(config, json),
        Command::Completions { shell } => handle_completions(shell),
    }
}
