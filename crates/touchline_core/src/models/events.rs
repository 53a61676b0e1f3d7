use serde::{Deserialize, Serialize};

use super::ids::PlayerId;
use super::player::Position;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Match-relative seconds at which the event was logged.
    pub match_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_position: Option<Position>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_position: Option<Position>,
}

impl MatchEvent {
    pub fn goal(player_id: PlayerId, match_seconds: f64) -> Self {
        Self {
            event_type: EventType::Goal,
            match_seconds,
            player_id: Some(player_id),
            from_position: None,
            to_position: None,
        }
    }

    pub fn opponent_goal(match_seconds: f64) -> Self {
        Self {
            event_type: EventType::OpponentGoal,
            match_seconds,
            player_id: None,
            from_position: None,
            to_position: None,
        }
    }

    /// Position change for `player_id`. Changes into or out of goal are
    /// logged as [`EventType::KeeperChange`].
    pub fn position_change(
        player_id: PlayerId,
        from_position: Option<Position>,
        to_position: Position,
        match_seconds: f64,
    ) -> Self {
        let involves_keeper =
            to_position.is_goalkeeper() || from_position.is_some_and(|p| p.is_goalkeeper());
        Self {
            event_type: if involves_keeper {
                EventType::KeeperChange
            } else {
                EventType::PositionChange
            },
            match_seconds,
            player_id: Some(player_id),
            from_position,
            to_position: Some(to_position),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    /// Goal scored by a roster player
    Goal,
    /// Goal conceded
    OpponentGoal,
    PositionChange,
    /// Position change into or out of goal
    KeeperChange,
}

impl EventType {
    pub fn is_position_change(&self) -> bool {
        matches!(self, EventType::PositionChange | EventType::KeeperChange)
    }
}
