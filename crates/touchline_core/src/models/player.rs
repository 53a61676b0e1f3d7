use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::PlayerId;

/// Player identity as handed over by the roster collaborator.
///
/// The match never mutates this; it only snapshots name and jersey number
/// into a [`RosterEntry`](super::RosterEntry) when the player joins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRef {
    pub id: PlayerId,
    pub name: String,
    pub jersey_number: u32,
}

impl PlayerRef {
    pub fn new(name: impl Into<String>, jersey_number: u32) -> Self {
        Self { id: PlayerId::new(), name: name.into(), jersey_number }
    }

    pub fn with_id(id: PlayerId, name: impl Into<String>, jersey_number: u32) -> Self {
        Self { id, name: name.into(), jersey_number }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl Position {
    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Position::Goalkeeper)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "goalkeeper",
            Position::Defender => "defender",
            Position::Midfielder => "midfielder",
            Position::Forward => "forward",
        }
    }

    /// Short label for compact roster rows.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Position::Goalkeeper => "GK",
            Position::Defender => "DF",
            Position::Midfielder => "MF",
            Position::Forward => "FW",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "goalkeeper" | "gk" | "keeper" => Ok(Position::Goalkeeper),
            "defender" | "df" => Ok(Position::Defender),
            "midfielder" | "mf" => Ok(Position::Midfielder),
            "forward" | "fw" => Ok(Position::Forward),
            other => Err(format!("Unknown position: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
    #[default]
    Soccer,
    Basketball,
}

impl SportType {
    /// What the playing area is called, for "on the field" style labels.
    pub fn surface_name(&self) -> &'static str {
        match self {
            SportType::Soccer => "Field",
            SportType::Basketball => "Court",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SportType::Soccer => "soccer",
            SportType::Basketball => "basketball",
        }
    }
}

impl fmt::Display for SportType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
