//! Event Log
//!
//! Append-ordered goals and position changes, stamped in match seconds.
//! Entries never change once logged; the only removal is undoing the most
//! recent opponent goal after a mis-tap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::live_match::Match;
use crate::error::{MatchError, Result};
use crate::models::{EventType, MatchEvent, PlayerId, Position};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<MatchEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: MatchEvent) {
        self.events.push(event);
    }

    /// Removes the most recent event of `event_type`. Other events keep their
    /// order and timestamps.
    pub(crate) fn remove_last_of(&mut self, event_type: EventType) -> Option<MatchEvent> {
        let index = self.events.iter().rposition(|e| e.event_type == event_type)?;
        Some(self.events.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count_of(&self, event_type: EventType) -> usize {
        self.events.iter().filter(|e| e.event_type == event_type).count()
    }

    pub fn goals_for(&self) -> usize {
        self.count_of(EventType::Goal)
    }

    pub fn goals_against(&self) -> usize {
        self.count_of(EventType::OpponentGoal)
    }

    pub fn goals_by_player(&self, player_id: PlayerId) -> usize {
        self.events
            .iter()
            .filter(|e| e.event_type == EventType::Goal && e.player_id == Some(player_id))
            .count()
    }

    /// Position history for one player, oldest first.
    pub fn position_changes_for(&self, player_id: PlayerId) -> Vec<&MatchEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type.is_position_change() && e.player_id == Some(player_id))
            .collect()
    }
}

impl Match {
    /// Logs a goal for `player_id`. Ignored before kickoff and after the end.
    pub fn add_goal(&mut self, player_id: PlayerId, now: DateTime<Utc>) -> Result<()> {
        self.entry(player_id)?;
        if !self.accepts_score_events() {
            debug!("add_goal ignored in phase {}", self.clock.phase().name());
            return Ok(());
        }
        let match_seconds = self.clock.match_seconds_at(now);
        self.events.push(MatchEvent::goal(player_id, match_seconds));
        debug!("Goal by {} at {:.1}s ({}-{})", player_id, match_seconds, self.goals_for(), self.goals_against());
        Ok(())
    }

    pub fn add_opponent_goal(&mut self, now: DateTime<Utc>) {
        if !self.accepts_score_events() {
            debug!("add_opponent_goal ignored in phase {}", self.clock.phase().name());
            return;
        }
        let match_seconds = self.clock.match_seconds_at(now);
        self.events.push(MatchEvent::opponent_goal(match_seconds));
        debug!("Opponent goal at {:.1}s ({}-{})", match_seconds, self.goals_for(), self.goals_against());
    }

    /// Undoes the latest opponent goal; no-op when there is none.
    pub fn remove_last_opponent_goal(&mut self) -> Option<MatchEvent> {
        if self.clock.is_ended() {
            debug!("remove_last_opponent_goal ignored: match ended");
            return None;
        }
        let removed = self.events.remove_last_of(EventType::OpponentGoal);
        if let Some(event) = &removed {
            debug!("Removed opponent goal logged at {:.1}s", event.match_seconds);
        }
        removed
    }

    /// Logs the change from the player's current position and then commits
    /// the new one. The log is the only record of the previous position.
    /// Benched players carry no position and are rejected.
    pub fn change_position(
        &mut self,
        player_id: PlayerId,
        position: Position,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let match_seconds = self.clock.match_seconds_at(now);
        let ended = self.clock.is_ended();
        let entry = self.entry_mut(player_id)?;
        if ended {
            debug!("change_position of {} ignored: match ended", entry.snapshot_name);
            return Ok(());
        }
        if !entry.is_on_field {
            warn!("change_position refused: #{} {} is on the bench", entry.snapshot_jersey_number, entry.snapshot_name);
            return Err(MatchError::PlayerNotOnField(player_id));
        }
        let event = MatchEvent::position_change(player_id, entry.current_position, position, match_seconds);
        entry.current_position = Some(position);
        debug!("#{} {} moved to {} at {:.1}s", entry.snapshot_jersey_number, entry.snapshot_name, position, match_seconds);
        self.events.push(event);
        Ok(())
    }

    pub fn goals_for(&self) -> usize {
        self.events.goals_for()
    }

    pub fn goals_against(&self) -> usize {
        self.events.goals_against()
    }

    pub fn goals_by_player(&self, player_id: PlayerId) -> usize {
        self.events.goals_by_player(player_id)
    }

    fn accepts_score_events(&self) -> bool {
        self.clock.has_started_play() && !self.clock.is_ended()
    }
}
