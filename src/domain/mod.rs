pub mod models;
pub mod standings;
pub mod views;

pub use models::{Color, MatchOutcome, Stage, SystemType};
pub use standings::{Standings, StandingsDelta};
pub use views::{MatchView, PlayerView, StandingsRow, TournamentView};
