use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use crate::domain::{MatchView, PlayerView, Stage, StandingsRow, TournamentView};

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

pub fn result_label(result: Option<f64>) -> &'static str {
    match result {
        Some(r) if r == 1.0 => "1-0",
        Some(r) if r == 0.5 => "½-½",
        Some(_) => "0-1",
        None => "*",
    }
}

pub fn tournament_line(view: &TournamentView) -> String {
    let stage = match view.stage {
        Stage::Registration => view.stage.as_str().yellow(),
        Stage::Playing => view.stage.as_str().green(),
        Stage::Finished => view.stage.as_str().dimmed(),
    };

    format!(
        "#{:<4} {:<30} {:<12} {:<13} round {}/{}  players {} ({}-{})",
        view.tournament_id,
        view.name,
        view.system_type.as_str(),
        stage,
        view.current_round,
        view.amount_of_rounds,
        view.players_registered,
        view.min_players,
        view.max_players
    )
}

pub fn player_line(view: &PlayerView) -> String {
    format!(
        "player #{} {} (user {}), rating {:.1}",
        view.player_id,
        view.full_name.bold(),
        view.user_id,
        view.standings.rating
    )
}

pub fn match_line(view: &MatchView) -> String {
    format!(
        "#{:<5} {:<28} {:>5}  {:<28}",
        view.match_id,
        format!("{} ({:.0})", view.white_player.full_name, view.white_player.standings.rating),
        result_label(view.result),
        format!("{} ({:.0})", view.black_player.full_name, view.black_player.standings.rating),
    )
}

pub fn pairings_table(round: i32, matches: &[MatchView]) -> String {
    let mut lines = vec![format!("Round {round}").bold().to_string()];
    if matches.is_empty() {
        lines.push("  no matches".dimmed().to_string());
    }
    lines.extend(matches.iter().map(match_line));
    lines.join("\n")
}

pub fn standings_table(rows: &[StandingsRow]) -> String {
    let header = format!(
        "{:>4}  {:<28} {:>6} {:>7} {:>8} {:>3} {:>3} {:>3}",
        "#", "Player", "Score", "Second", "Rating", "W", "D", "L"
    );
    let mut lines = vec![header.bold().to_string()];

    for row in rows {
        let name = if row.had_bye {
            format!("{} (bye)", row.full_name)
        } else {
            row.full_name.clone()
        };
        lines.push(format!(
            "{:>4}  {:<28} {:>6.1} {:>7.1} {:>8.1} {:>3} {:>3} {:>3}",
            row.rank, name, row.score, row.second_score, row.rating, row.wins, row.draws, row.losses
        ));
    }
    lines.join("\n")
}
