//! Match Commands
//!
//! Every user action on a match as plain data, so a recorded sequence of
//! `(instant, action)` pairs can drive a [`Match`] deterministically.
//!
//! ```json
//! {"at": "2026-01-01T10:02:00Z", "type": "substitute", "player_out": "…", "player_in": "…"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::live_match::Match;
use crate::error::Result;
use crate::models::{PlayerId, PlayerRef, Position};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchCommand {
    StartPlay,
    Pause,
    Resume,
    StartHalftime,
    EndHalftime,
    End,
    SubIn { player_id: PlayerId },
    SubOut { player_id: PlayerId },
    Substitute { player_out: PlayerId, player_in: PlayerId },
    Goal { player_id: PlayerId },
    OpponentGoal,
    RemoveLastOpponentGoal,
    ChangePosition { player_id: PlayerId, position: Position },
    AddPlayer { player: PlayerRef },
    RemovePlayer { player_id: PlayerId },
}

impl MatchCommand {
    pub fn name(&self) -> &'static str {
        match self {
            MatchCommand::StartPlay => "start_play",
            MatchCommand::Pause => "pause",
            MatchCommand::Resume => "resume",
            MatchCommand::StartHalftime => "start_halftime",
            MatchCommand::EndHalftime => "end_halftime",
            MatchCommand::End => "end",
            MatchCommand::SubIn { .. } => "sub_in",
            MatchCommand::SubOut { .. } => "sub_out",
            MatchCommand::Substitute { .. } => "substitute",
            MatchCommand::Goal { .. } => "goal",
            MatchCommand::OpponentGoal => "opponent_goal",
            MatchCommand::RemoveLastOpponentGoal => "remove_last_opponent_goal",
            MatchCommand::ChangePosition { .. } => "change_position",
            MatchCommand::AddPlayer { .. } => "add_player",
            MatchCommand::RemovePlayer { .. } => "remove_player",
        }
    }
}

/// A command stamped with the instant it was issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedCommand {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub command: MatchCommand,
}

impl TimedCommand {
    pub fn new(at: DateTime<Utc>, command: MatchCommand) -> Self {
        Self { at, command }
    }
}

impl Match {
    /// Runs one command at `now`. Errors leave the match unchanged.
    pub fn apply(&mut self, command: &MatchCommand, now: DateTime<Utc>) -> Result<()> {
        trace!("apply {} at {}", command.name(), now);
        match command {
            MatchCommand::StartPlay => self.start_play(now),
            MatchCommand::Pause => self.pause(now),
            MatchCommand::Resume => self.resume(now),
            MatchCommand::StartHalftime => self.start_halftime(now),
            MatchCommand::EndHalftime => self.end_halftime(now),
            MatchCommand::End => self.end(now),
            MatchCommand::SubIn { player_id } => self.sub_in(*player_id, now)?,
            MatchCommand::SubOut { player_id } => self.sub_out(*player_id, now)?,
            MatchCommand::Substitute { player_out, player_in } => {
                self.substitute(*player_out, *player_in, now)?
            }
            MatchCommand::Goal { player_id } => self.add_goal(*player_id, now)?,
            MatchCommand::OpponentGoal => self.add_opponent_goal(now),
            MatchCommand::RemoveLastOpponentGoal => {
                self.remove_last_opponent_goal();
            }
            MatchCommand::ChangePosition { player_id, position } => {
                self.change_position(*player_id, *position, now)?
            }
            MatchCommand::AddPlayer { player } => self.add_player(player, now)?,
            MatchCommand::RemovePlayer { player_id } => {
                self.remove_player(*player_id)?;
            }
        }
        Ok(())
    }

    /// Applies commands in order, stopping at the first error.
    pub fn apply_all<'a>(&mut self, commands: impl IntoIterator<Item = &'a TimedCommand>) -> Result<()> {
        for timed in commands {
            self.apply(&timed.command, timed.at)?;
        }
        Ok(())
    }
}
