use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use super::player::{PlayerRef, Position};

/// Per-match state of one player.
///
/// Name and jersey number are frozen when the player joins the match so that
/// later edits in the roster store never rewrite past matches. Stint markers
/// are match-relative seconds, never wall-clock instants:
/// - `last_sub_in_match_seconds` is set only while on the field,
/// - `last_sub_out_match_seconds` is set only while on the bench.
///
/// Before kickoff the markers carry no time and may be unset; kickoff stamps
/// every entry at match second 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub(crate) player_id: PlayerId,
    pub(crate) snapshot_name: String,
    pub(crate) snapshot_jersey_number: u32,
    /// Seconds from completed stints only
    pub(crate) total_seconds_played: f64,
    pub(crate) is_on_field: bool,
    pub(crate) last_sub_in_match_seconds: Option<f64>,
    pub(crate) last_sub_out_match_seconds: Option<f64>,
    pub(crate) current_position: Option<Position>,
}

impl RosterEntry {
    /// Fresh bench entry for a player joining before kickoff.
    pub fn new(player: &PlayerRef) -> Self {
        Self {
            player_id: player.id,
            snapshot_name: player.name.clone(),
            snapshot_jersey_number: player.jersey_number,
            total_seconds_played: 0.0,
            is_on_field: false,
            last_sub_in_match_seconds: None,
            last_sub_out_match_seconds: None,
            current_position: None,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn name(&self) -> &str {
        &self.snapshot_name
    }

    pub fn jersey_number(&self) -> u32 {
        self.snapshot_jersey_number
    }

    pub fn total_seconds_played(&self) -> f64 {
        self.total_seconds_played
    }

    pub fn is_on_field(&self) -> bool {
        self.is_on_field
    }

    pub fn last_sub_in_match_seconds(&self) -> Option<f64> {
        self.last_sub_in_match_seconds
    }

    pub fn last_sub_out_match_seconds(&self) -> Option<f64> {
        self.last_sub_out_match_seconds
    }

    pub fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    /// True once the player has been on the field at any point after kickoff.
    pub fn has_played(&self) -> bool {
        self.is_on_field || self.total_seconds_played > 0.0
    }

    /// Structural checks for entries restored from storage.
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        if !self.total_seconds_played.is_finite() || self.total_seconds_played < 0.0 {
            return Err(format!(
                "#{} {}: total_seconds_played must be finite and >= 0, got {}",
                self.snapshot_jersey_number, self.snapshot_name, self.total_seconds_played
            ));
        }
        if self.is_on_field && self.last_sub_out_match_seconds.is_some() {
            return Err(format!(
                "#{} {}: on the field but has a bench marker",
                self.snapshot_jersey_number, self.snapshot_name
            ));
        }
        if !self.is_on_field && self.last_sub_in_match_seconds.is_some() {
            return Err(format!(
                "#{} {}: on the bench but has an open field stint",
                self.snapshot_jersey_number, self.snapshot_name
            ));
        }
        if !self.is_on_field && self.current_position.is_some() {
            return Err(format!(
                "#{} {}: on the bench but holds a position",
                self.snapshot_jersey_number, self.snapshot_name
            ));
        }
        Ok(())
    }
}
