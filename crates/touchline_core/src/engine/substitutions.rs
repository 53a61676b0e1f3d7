//! Player Substitution Logic
//!
//! Stint bookkeeping for roster entries, always in match-relative seconds
//! taken from [`MatchClock::match_seconds_at`]. Wall-clock deltas would count
//! paused time as played; match seconds never do.
//!
//! ## Roster changes
//! - sub_in / sub_out: toggle one player, no-op when already in that state
//! - substitute: swap a field player for a bench player at one instant
//! - add_player / remove_player: mid-match roster edits

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::clock::MatchClock;
use super::live_match::Match;
use crate::error::{MatchError, Result};
use crate::models::{PlayerId, PlayerRef, RosterEntry};

impl RosterEntry {
    /// Entry for a player joining after kickoff: benched from the current
    /// match second, with no earlier bench time.
    pub(crate) fn joining(player: &PlayerRef, clock: &MatchClock, now: DateTime<Utc>) -> Self {
        let mut entry = RosterEntry::new(player);
        if clock.has_started_play() {
            entry.last_sub_out_match_seconds = Some(clock.match_seconds_at(now));
        }
        entry
    }

    pub(crate) fn sub_in(&mut self, clock: &MatchClock, now: DateTime<Utc>) -> bool {
        if self.is_on_field {
            return false;
        }
        self.is_on_field = true;
        self.last_sub_out_match_seconds = None;
        // Pre-kickoff lineup changes open no stint; kickoff opens it at 0.
        self.last_sub_in_match_seconds =
            clock.has_started_play().then(|| clock.match_seconds_at(now));
        true
    }

    pub(crate) fn sub_out(&mut self, clock: &MatchClock, now: DateTime<Utc>) -> bool {
        if !self.is_on_field {
            return false;
        }
        self.close_stint(clock.match_seconds_at(now));
        true
    }

    /// Marks match second 0 as the start of the current stint, on the field
    /// or on the bench.
    pub(crate) fn open_stint_at_kickoff(&mut self) {
        if self.is_on_field {
            self.last_sub_in_match_seconds = Some(0.0);
            self.last_sub_out_match_seconds = None;
        } else {
            self.last_sub_in_match_seconds = None;
            self.last_sub_out_match_seconds = Some(0.0);
        }
    }

    /// Folds the open field stint into the total and benches the player at
    /// `match_seconds`.
    pub(crate) fn close_stint(&mut self, match_seconds: f64) {
        if let Some(last_in) = self.last_sub_in_match_seconds {
            self.total_seconds_played += (match_seconds - last_in).max(0.0);
        }
        self.is_on_field = false;
        self.last_sub_in_match_seconds = None;
        self.last_sub_out_match_seconds = Some(match_seconds);
        self.current_position = None;
    }

    /// Completed stints plus the open one, if on the field.
    pub fn seconds_played(&self, clock: &MatchClock, now: DateTime<Utc>) -> f64 {
        (self.total_seconds_played + self.current_stint_seconds(clock, now)).max(0.0)
    }

    /// Length of the open field stint; 0 on the bench.
    pub fn current_stint_seconds(&self, clock: &MatchClock, now: DateTime<Utc>) -> f64 {
        match (self.is_on_field, self.last_sub_in_match_seconds) {
            (true, Some(last_in)) => (clock.match_seconds_at(now) - last_in).max(0.0),
            _ => 0.0,
        }
    }

    /// Length of the open bench stint; 0 on the field.
    pub fn bench_seconds(&self, clock: &MatchClock, now: DateTime<Utc>) -> f64 {
        match (self.is_on_field, self.last_sub_out_match_seconds) {
            (false, Some(last_out)) => (clock.match_seconds_at(now) - last_out).max(0.0),
            _ => 0.0,
        }
    }
}

fn find_entry_mut(roster: &mut [RosterEntry], player_id: PlayerId) -> Result<&mut RosterEntry> {
    roster
        .iter_mut()
        .find(|e| e.player_id == player_id)
        .ok_or(MatchError::PlayerNotInMatch(player_id))
}

impl Match {
    pub fn sub_in(&mut self, player_id: PlayerId, now: DateTime<Utc>) -> Result<()> {
        let entry = find_entry_mut(&mut self.roster, player_id)?;
        if self.clock.is_ended() {
            debug!("sub_in of {} ignored: match ended", entry.snapshot_name);
            return Ok(());
        }
        if entry.sub_in(&self.clock, now) {
            debug!(
                "#{} {} on at {:?}s",
                entry.snapshot_jersey_number, entry.snapshot_name, entry.last_sub_in_match_seconds
            );
        }
        Ok(())
    }

    pub fn sub_out(&mut self, player_id: PlayerId, now: DateTime<Utc>) -> Result<()> {
        let entry = find_entry_mut(&mut self.roster, player_id)?;
        if self.clock.is_ended() {
            debug!("sub_out of {} ignored: match ended", entry.snapshot_name);
            return Ok(());
        }
        if entry.sub_out(&self.clock, now) {
            debug!(
                "#{} {} off at {:?}s, total {:.1}s",
                entry.snapshot_jersey_number,
                entry.snapshot_name,
                entry.last_sub_out_match_seconds,
                entry.total_seconds_played
            );
        }
        Ok(())
    }

    /// Takes `player_out` off and puts `player_in` on at the same instant.
    /// Both ids are checked before anything changes.
    pub fn substitute(
        &mut self,
        player_out: PlayerId,
        player_in: PlayerId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.entry(player_out)?;
        self.entry(player_in)?;
        self.sub_out(player_out, now)?;
        self.sub_in(player_in, now)
    }

    /// Adds a player mid-match. Players joining after kickoff start on the
    /// bench at the current match second.
    pub fn add_player(&mut self, player: &PlayerRef, now: DateTime<Utc>) -> Result<()> {
        if self.clock.is_ended() {
            warn!("add_player #{} {} rejected: match ended", player.jersey_number, player.name);
            return Err(MatchError::MatchEnded);
        }
        if self.contains(player.id) {
            return Err(MatchError::PlayerAlreadyInMatch(player.id));
        }
        let entry = RosterEntry::joining(player, &self.clock, now);
        info!(
            "#{} {} joined the match at {:?}s",
            entry.snapshot_jersey_number, entry.snapshot_name, entry.last_sub_out_match_seconds
        );
        self.roster.push(entry);
        Ok(())
    }

    /// Removes a benched player. Players on the field must be subbed out
    /// first so their open stint is not dropped.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<RosterEntry> {
        if self.clock.is_ended() {
            warn!("remove_player {} rejected: match ended", player_id);
            return Err(MatchError::MatchEnded);
        }
        let index = self
            .roster
            .iter()
            .position(|e| e.player_id == player_id)
            .ok_or(MatchError::PlayerNotInMatch(player_id))?;
        if self.roster[index].is_on_field {
            warn!("remove_player {} rejected: still on the field", player_id);
            return Err(MatchError::PlayerOnField(player_id));
        }
        let entry = self.roster.remove(index);
        info!("#{} {} left the match", entry.snapshot_jersey_number, entry.snapshot_name);
        Ok(entry)
    }

    pub fn seconds_played(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<f64> {
        Ok(self.entry(player_id)?.seconds_played(&self.clock, now))
    }

    pub fn current_stint_seconds(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<f64> {
        Ok(self.entry(player_id)?.current_stint_seconds(&self.clock, now))
    }

    pub fn bench_seconds(&self, player_id: PlayerId, now: DateTime<Utc>) -> Result<f64> {
        Ok(self.entry(player_id)?.bench_seconds(&self.clock, now))
    }
}
