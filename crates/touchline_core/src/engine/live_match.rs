//! Live Match
//!
//! [`Match`] owns the clock, the roster and the event log for one game and is
//! the only way to change any of them. Clock transitions cascade into the
//! roster here: kickoff opens every stint at match second 0 and the final
//! whistle folds every open field stint into its player's total.
//!
//! Substitution, event and aggregation operations live next to their engines
//! (`substitutions.rs`, `event_log.rs`, `aggregation.rs`) as further
//! `impl Match` blocks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use super::clock::MatchClock;
use super::event_log::EventLog;
use crate::error::{MatchError, Result};
use crate::models::{MatchId, PlayerId, PlayerRef, RosterEntry, SportType};

/// Upper bound on roster size accepted from storage.
pub const MAX_ROSTER_SIZE: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Match {
    pub(crate) id: MatchId,
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) sport: SportType,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) clock: MatchClock,
    /// Insertion order; display order is derived at read time
    pub(crate) roster: Vec<RosterEntry>,
    #[serde(default)]
    pub(crate) events: EventLog,
}

impl Match {
    /// New match with every player on the bench. A blank name falls back to
    /// one derived from `created_at`.
    pub fn new(name: &str, players: &[PlayerRef], sport: SportType, created_at: DateTime<Utc>) -> Self {
        let name = match name.trim() {
            "" => default_match_name(created_at),
            trimmed => trimmed.to_string(),
        };

        let mut seen = HashSet::new();
        let mut roster = Vec::with_capacity(players.len());
        for player in players {
            if seen.insert(player.id) {
                roster.push(RosterEntry::new(player));
            } else {
                warn!("Duplicate player {} in initial roster ignored", player.id);
            }
        }

        info!("Created match '{}' ({}) with {} players", name, sport, roster.len());
        Self {
            id: MatchId::new(),
            name,
            sport,
            created_at,
            clock: MatchClock::new(),
            roster,
            events: EventLog::new(),
        }
    }

    pub fn id(&self) -> MatchId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sport(&self) -> SportType {
        self.sport
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn clock(&self) -> &MatchClock {
        &self.clock
    }

    /// Roster in insertion order.
    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.roster.iter().any(|e| e.player_id == player_id)
    }

    pub fn entry(&self, player_id: PlayerId) -> Result<&RosterEntry> {
        self.roster
            .iter()
            .find(|e| e.player_id == player_id)
            .ok_or(MatchError::PlayerNotInMatch(player_id))
    }

    pub(crate) fn entry_mut(&mut self, player_id: PlayerId) -> Result<&mut RosterEntry> {
        self.roster
            .iter_mut()
            .find(|e| e.player_id == player_id)
            .ok_or(MatchError::PlayerNotInMatch(player_id))
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Kickoff. Opens a field stint at 0 for players already on and a bench
    /// stint at 0 for everyone else.
    pub fn start_play(&mut self, now: DateTime<Utc>) {
        if self.clock.start_play(now) {
            self.roster.iter_mut().for_each(RosterEntry::open_stint_at_kickoff);
        }
    }

    pub fn pause(&mut self, now: DateTime<Utc>) {
        self.clock.pause(now);
    }

    pub fn resume(&mut self, now: DateTime<Utc>) {
        self.clock.resume(now);
    }

    pub fn start_halftime(&mut self, now: DateTime<Utc>) {
        self.clock.start_halftime(now);
    }

    pub fn end_halftime(&mut self, now: DateTime<Utc>) {
        self.clock.end_halftime(now);
    }

    /// Final whistle. Every on-field player is benched at the effective end
    /// second with their last stint folded into the total.
    pub fn end(&mut self, now: DateTime<Utc>) {
        if !self.clock.end(now) {
            return;
        }
        let final_seconds = self.clock.final_elapsed_seconds().unwrap_or(0.0);
        let mut folded = 0;
        for entry in self.roster.iter_mut().filter(|e| e.is_on_field) {
            entry.close_stint(final_seconds);
            folded += 1;
        }
        info!(
            "Match '{}' final: {}-{}, {:.1}s played, {} stints closed",
            self.name,
            self.events.goals_for(),
            self.events.goals_against(),
            final_seconds,
            folded
        );
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        self.clock.elapsed_seconds(now)
    }

    pub fn final_elapsed_seconds(&self) -> Option<f64> {
        self.clock.final_elapsed_seconds()
    }

    /// What the scoreboard shows: the fixed final time once ended, otherwise
    /// the running elapsed time.
    pub fn display_seconds(&self, now: DateTime<Utc>) -> f64 {
        self.final_elapsed_seconds().unwrap_or_else(|| self.elapsed_seconds(now))
    }

    pub fn has_started_play(&self) -> bool {
        self.clock.has_started_play()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn is_ended(&self) -> bool {
        self.clock.is_ended()
    }

    // =========================================================================
    // Roster views
    // =========================================================================

    /// Jersey number ascending; equal numbers keep insertion order.
    pub fn roster_in_display_order(&self) -> Vec<&RosterEntry> {
        let mut entries: Vec<&RosterEntry> = self.roster.iter().collect();
        entries.sort_by_key(|e| e.snapshot_jersey_number);
        entries
    }

    pub fn on_field(&self) -> Vec<&RosterEntry> {
        self.roster_in_display_order().into_iter().filter(|e| e.is_on_field).collect()
    }

    pub fn bench(&self) -> Vec<&RosterEntry> {
        self.roster_in_display_order().into_iter().filter(|e| !e.is_on_field).collect()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Structural checks for a match restored from storage. The clock itself
    /// is already validated while deserializing.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(MatchError::InvalidRoster(format!("match {}: {}", self.id, msg)));

        if self.roster.len() > MAX_ROSTER_SIZE {
            return invalid(format!("roster too large ({} > {})", self.roster.len(), MAX_ROSTER_SIZE));
        }

        let mut seen = HashSet::new();
        for entry in &self.roster {
            if !seen.insert(entry.player_id) {
                return invalid(format!("player {} listed twice", entry.player_id));
            }
            if let Err(msg) = entry.check_invariants() {
                return invalid(msg);
            }
            if self.clock.is_ended() && entry.is_on_field {
                return invalid(format!("#{} still on the field after the end", entry.snapshot_jersey_number));
            }
            if self.clock.has_started_play()
                && entry.is_on_field
                && entry.last_sub_in_match_seconds.is_none()
            {
                return invalid(format!("#{} on the field without an open stint", entry.snapshot_jersey_number));
            }
        }

        if let Some(event) = self.events.iter().find(|e| !e.match_seconds.is_finite() || e.match_seconds < 0.0) {
            return invalid(format!("event at invalid match second {}", event.match_seconds));
        }
        Ok(())
    }
}

fn default_match_name(created_at: DateTime<Utc>) -> String {
    format!("Match {}", created_at.format("%b %-d, %Y %H:%M"))
}
