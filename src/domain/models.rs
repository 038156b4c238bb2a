use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TournamentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Registration,
    Playing,
    Finished,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Registration => "REGISTRATION",
            Stage::Playing => "PLAYING",
            Stage::Finished => "FINISHED",
        }
    }
}

impl FromStr for Stage {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTRATION" => Ok(Stage::Registration),
            "PLAYING" => Ok(Stage::Playing),
            "FINISHED" => Ok(Stage::Finished),
            other => Err(TournamentError::IllegalArgument(format!(
                "Unknown tournament stage: {other}"
            ))),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemType {
    Swiss,
    RoundRobin,
}

impl SystemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemType::Swiss => "SWISS",
            SystemType::RoundRobin => "ROUND_ROBIN",
        }
    }
}

impl FromStr for SystemType {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SWISS" => Ok(SystemType::Swiss),
            "ROUND_ROBIN" => Ok(SystemType::RoundRobin),
            other => Err(TournamentError::IllegalArgument(format!(
                "Unknown system type: {other}"
            ))),
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// A decided game, stored as 1.0 / 0.5 / 0.0 from white's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    BlackWin,
    Draw,
    WhiteWin,
}

impl MatchOutcome {
    pub fn white_points(self) -> f64 {
        match self {
            MatchOutcome::WhiteWin => 1.0,
            MatchOutcome::Draw => 0.5,
            MatchOutcome::BlackWin => 0.0,
        }
    }

    pub fn black_points(self) -> f64 {
        1.0 - self.white_points()
    }
}

impl TryFrom<f64> for MatchOutcome {
    type Error = TournamentError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if value == 1.0 {
            Ok(MatchOutcome::WhiteWin)
        } else if value == 0.5 {
            Ok(MatchOutcome::Draw)
        } else if value == 0.0 {
            Ok(MatchOutcome::BlackWin)
        } else {
            Err(TournamentError::IllegalArgument(format!(
                "Not a valid match result: {value}"
            )))
        }
    }
}
