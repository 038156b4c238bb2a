use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::domain::SystemType;

#[derive(Parser, Debug)]
#[command(author, version, about = "Swiss and round robin tournament engine")]
pub struct Cli {
    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    pub database: Option<String>,

    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "kebab-case")]
pub enum Command {
    /// Create the database tables
    Init {
        /// Drop all existing data first
        #[arg(long)]
        reset: bool,
    },
    /// Add a user profile that can be registered in tournaments
    AddUser {
        full_name: String,
        #[arg(short, long, default_value_t = 1500.0)]
        rating: f64,
    },
    /// Create a tournament in the registration stage
    Create {
        name: String,
        #[arg(short, long, value_enum, default_value_t = SystemArg::Swiss)]
        system: SystemArg,
        /// Number of rounds to play
        #[arg(short, long)]
        rounds: i32,
        #[arg(long, default_value_t = 2)]
        min_players: i32,
        #[arg(long, default_value_t = 64)]
        max_players: i32,
    },
    /// Change a tournament's settings while registration is open
    Update {
        tournament_id: i32,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        rounds: Option<i32>,
        #[arg(long)]
        min_players: Option<i32>,
        #[arg(long)]
        max_players: Option<i32>,
    },
    /// Register a user in a tournament
    Register { tournament_id: i32, user_id: i32 },
    /// Remove a player who has not played yet
    Unregister { player_id: i32 },
    /// Pair the next round, or finish the tournament after the last one
    NextRound { tournament_id: i32 },
    /// Set the result of a match: 1 (white wins), 0.5 (draw) or 0 (black wins)
    Result { match_id: i32, result: f64 },
    /// Set several results at once, given as MATCH_ID=RESULT
    Results {
        #[arg(value_parser = parse_result_pair, required = true)]
        results: Vec<(i32, f64)>,
    },
    /// Undo the most recent round
    Rollback { tournament_id: i32 },
    /// Delete a tournament, restoring user ratings if it was finished
    Delete { tournament_id: i32 },
    /// Show the ranking of a tournament
    Standings {
        tournament_id: i32,
        #[arg(long)]
        json: bool,
    },
    /// Show the matches of a round (the current one by default)
    Pairings {
        tournament_id: i32,
        #[arg(short, long)]
        round: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Show every game a user played, newest first
    History {
        user_id: i32,
        #[arg(long)]
        json: bool,
    },
    /// List tournaments that are not finished
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemArg {
    Swiss,
    RoundRobin,
}

impl From<SystemArg> for SystemType {
    fn from(arg: SystemArg) -> Self {
        match arg {
            SystemArg::Swiss => SystemType::Swiss,
            SystemArg::RoundRobin => SystemType::RoundRobin,
        }
    }
}

fn parse_result_pair(raw: &str) -> Result<(i32, f64), String> {
    let (id, result) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected MATCH_ID=RESULT, got '{raw}'"))?;
    let id = id
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("invalid match id '{id}': {e}"))?;
    let result = result
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid result '{result}': {e}"))?;
    Ok((id, result))
}
