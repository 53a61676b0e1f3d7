use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::engine::{Match, SubSuggestion, SuggestionConfig, TimedCommand};
use crate::error::{MatchError, Result};
use crate::models::{MatchEvent, MatchId, PlayerId, PlayerRef, Position, SportType};
use crate::time_format::format_clock;

// ============================================
// Read model
// ============================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub match_id: MatchId,
    pub name: String,
    pub sport: SportType,
    /// "Field" or "Court"
    pub surface_name: String,
    pub read_at: DateTime<Utc>,
    pub clock: ClockView,
    pub goals_for: usize,
    pub goals_against: usize,
    /// Jersey order
    pub roster: Vec<RosterRow>,
    pub suggestions: Vec<SubSuggestion>,
    pub events: Vec<MatchEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockView {
    pub phase: String,
    pub seconds: f64,
    pub display: String,
    pub is_halftime: bool,
    pub has_had_halftime: bool,
    pub is_ended: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub player_id: PlayerId,
    pub name: String,
    pub jersey_number: u32,
    pub on_field: bool,
    pub position: Option<Position>,
    pub seconds_played: f64,
    pub stint_seconds: f64,
    pub bench_seconds: f64,
    pub goals: usize,
}

/// End-of-match report: score, clock and everyone's time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub name: String,
    pub sport: SportType,
    pub clock: String,
    pub goals_for: usize,
    pub goals_against: usize,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub jersey_number: u32,
    pub name: String,
    pub seconds_played: f64,
    pub time: String,
    pub goals: usize,
}

pub fn snapshot(m: &Match, now: DateTime<Utc>) -> MatchSnapshot {
    snapshot_with(m, now, &SuggestionConfig::default())
}

pub fn snapshot_with(m: &Match, now: DateTime<Utc>, config: &SuggestionConfig) -> MatchSnapshot {
    let clock = m.clock();
    let seconds = m.display_seconds(now);

    let roster = m
        .roster_in_display_order()
        .into_iter()
        .map(|e| RosterRow {
            player_id: e.player_id(),
            name: e.name().to_string(),
            jersey_number: e.jersey_number(),
            on_field: e.is_on_field(),
            position: e.current_position(),
            seconds_played: e.seconds_played(clock, now),
            stint_seconds: e.current_stint_seconds(clock, now),
            bench_seconds: e.bench_seconds(clock, now),
            goals: m.goals_by_player(e.player_id()),
        })
        .collect();

    MatchSnapshot {
        match_id: m.id(),
        name: m.name().to_string(),
        sport: m.sport(),
        surface_name: m.sport().surface_name().to_string(),
        read_at: now,
        clock: ClockView {
            phase: clock.phase().name().to_string(),
            seconds,
            display: format_clock(seconds),
            is_halftime: clock.is_halftime(),
            has_had_halftime: clock.has_had_halftime(),
            is_ended: clock.is_ended(),
        },
        goals_for: m.goals_for(),
        goals_against: m.goals_against(),
        roster,
        suggestions: m.suggested_subs_with(now, config),
        events: m.events().as_slice().to_vec(),
    }
}

pub fn snapshot_json(m: &Match, now: DateTime<Utc>) -> Result<String> {
    Ok(serde_json::to_string(&snapshot(m, now))?)
}

pub fn summary(m: &Match, now: DateTime<Utc>) -> MatchSummary {
    let players = m
        .roster_in_display_order()
        .into_iter()
        .map(|e| {
            let seconds_played = e.seconds_played(m.clock(), now);
            PlayerSummary {
                jersey_number: e.jersey_number(),
                name: e.name().to_string(),
                seconds_played,
                time: format_clock(seconds_played),
                goals: m.goals_by_player(e.player_id()),
            }
        })
        .collect();

    MatchSummary {
        name: m.name().to_string(),
        sport: m.sport(),
        clock: format_clock(m.display_seconds(now)),
        goals_for: m.goals_for(),
        goals_against: m.goals_against(),
        players,
    }
}

// ============================================
// Script replay
// ============================================

/// A recorded match: the starting roster and every action with its instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScript {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sport: SportType,
    pub created_at: DateTime<Utc>,
    pub players: Vec<PlayerRef>,
    #[serde(default)]
    pub commands: Vec<TimedCommand>,
    /// Instant of the returned snapshot. Defaults to the last command.
    #[serde(default)]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub suggestions: Option<SuggestionConfig>,
}

impl MatchScript {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn read_at(&self) -> DateTime<Utc> {
        self.read_at
            .or_else(|| self.commands.last().map(|c| c.at))
            .unwrap_or(self.created_at)
    }

    /// Builds the match and applies every command in order. Commands must not
    /// go back in time.
    pub fn replay(&self) -> Result<Match> {
        if let Some(config) = &self.suggestions {
            config.validate().map_err(MatchError::Config)?;
        }
        let mut m = Match::new(&self.name, &self.players, self.sport, self.created_at);
        let mut last = self.created_at;
        for (index, timed) in self.commands.iter().enumerate() {
            if timed.at < last {
                return Err(MatchError::InvalidClockState(format!(
                    "command {} ({}) at {} is earlier than {}",
                    index,
                    timed.command.name(),
                    timed.at,
                    last
                )));
            }
            last = timed.at;
            m.apply(&timed.command, timed.at)?;
        }
        debug!("Replayed {} commands for '{}'", self.commands.len(), m.name());
        Ok(m)
    }

    pub fn snapshot(&self, m: &Match) -> MatchSnapshot {
        self.snapshot_or(m, &SuggestionConfig::default())
    }

    /// Snapshot ranked with the script's own `suggestions`, or `fallback`
    /// when the script has none.
    pub fn snapshot_or(&self, m: &Match, fallback: &SuggestionConfig) -> MatchSnapshot {
        let config = self.suggestions.as_ref().unwrap_or(fallback);
        snapshot_with(m, self.read_at(), config)
    }
}

/// Replays a JSON [`MatchScript`] and returns the JSON snapshot at its
/// `read_at` instant.
pub fn replay_script_json(script_json: &str) -> Result<String> {
    let script = MatchScript::from_json(script_json)?;
    let m = script.replay()?;
    info!("Script '{}' replayed: {} events", m.name(), m.events().len());
    Ok(serde_json::to_string(&script.snapshot(&m))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::at;
    use crate::engine::MatchCommand;

    fn final_whistle_script() -> MatchScript {
        let ana = PlayerRef::new("Ana", 4);
        let ben = PlayerRef::new("Ben", 9);
        let commands = vec![
            TimedCommand::new(at(-5), MatchCommand::SubIn { player_id: ana.id }),
            TimedCommand::new(at(0), MatchCommand::StartPlay),
            TimedCommand::new(at(50), MatchCommand::Goal { player_id: ana.id }),
            TimedCommand::new(at(120), MatchCommand::Substitute { player_out: ana.id, player_in: ben.id }),
            TimedCommand::new(at(200), MatchCommand::OpponentGoal),
            TimedCommand::new(at(300), MatchCommand::End),
        ];
        MatchScript {
            name: "Final".to_string(),
            sport: SportType::Soccer,
            created_at: at(-60),
            players: vec![ben, ana],
            commands,
            read_at: None,
            suggestions: None,
        }
    }

    #[test]
    fn test_summary_snapshot() {
        let script = final_whistle_script();
        let m = script.replay().unwrap();
        let json = serde_json::to_string_pretty(&summary(&m, at(900))).unwrap();

        insta::assert_snapshot!(json, @r###"
        {
          "name": "Final",
          "sport": "soccer",
          "clock": "05:00",
          "goals_for": 1,
          "goals_against": 1,
          "players": [
            {
              "jersey_number": 4,
              "name": "Ana",
              "seconds_played": 120.0,
              "time": "02:00",
              "goals": 1
            },
            {
              "jersey_number": 9,
              "name": "Ben",
              "seconds_played": 180.0,
              "time": "03:00",
              "goals": 0
            }
          ]
        }
        "###);
    }

    #[test]
    fn test_snapshot_while_running() {
        let mut script = final_whistle_script();
        script.commands.truncate(4); // stop after the substitution at 120s
        let m = script.replay().unwrap();
        let snap = snapshot(&m, at(150));

        assert_eq!(snap.clock.phase, "in_play");
        assert_eq!(snap.clock.display, "02:30");
        assert_eq!(snap.surface_name, "Field");
        assert_eq!((snap.goals_for, snap.goals_against), (1, 0));

        let ana = &snap.roster[0];
        assert_eq!((ana.jersey_number, ana.on_field), (4, false));
        assert!((ana.seconds_played - 120.0).abs() < 0.001);
        assert!((ana.bench_seconds - 30.0).abs() < 0.001);
        let ben = &snap.roster[1];
        assert!(ben.on_field);
        assert!((ben.stint_seconds - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_replay_script_json_defaults_read_at_to_last_command() {
        let script = final_whistle_script();
        let json = serde_json::to_string(&script).unwrap();

        let response: MatchSnapshot = serde_json::from_str(&replay_script_json(&json).unwrap()).unwrap();
        assert_eq!(response.read_at, at(300));
        assert!(response.clock.is_ended);
        assert_eq!(response.clock.display, "05:00");
        assert_eq!(response.events.len(), 2);
        assert!(response.roster.iter().all(|r| !r.on_field));
    }

    #[test]
    fn test_replay_rejects_commands_out_of_order() {
        let mut script = final_whistle_script();
        script.commands.swap(1, 2);
        assert!(matches!(script.replay(), Err(MatchError::InvalidClockState(_))));
    }

    #[test]
    fn test_replay_surfaces_rejections() {
        let mut script = final_whistle_script();
        script
            .commands
            .push(TimedCommand::new(at(400), MatchCommand::RemovePlayer { player_id: PlayerId::new() }));
        assert!(replay_script_json(&serde_json::to_string(&script).unwrap()).is_err());
        assert!(replay_script_json("{").is_err());
    }

    #[test]
    fn test_script_suggestion_config_is_used() {
        let mut script = final_whistle_script();
        script.commands.truncate(4);
        script.read_at = Some(at(600));
        script.suggestions = Some(SuggestionConfig { underplayed_threshold_seconds: 0.0, max_suggestions: 1 });
        let m = script.replay().unwrap();

        // Ana 120s, Ben 480s, average 300
        let snap = script.snapshot(&m);
        assert_eq!(snap.suggestions.len(), 1);
        assert_eq!(snap.suggestions[0].name, "Ana");
        assert!((snap.suggestions[0].deficit_seconds - 180.0).abs() < 0.001);
    }

    #[test]
    fn test_fallback_config_applies_only_without_script_config() {
        let mut script = final_whistle_script();
        script.commands.truncate(4);
        script.read_at = Some(at(600));
        let m = script.replay().unwrap();
        let wide = SuggestionConfig { underplayed_threshold_seconds: 200.0, ..Default::default() };

        assert_eq!(script.snapshot(&m).suggestions.len(), 1);
        assert!(script.snapshot_or(&m, &wide).suggestions.is_empty());

        script.suggestions = Some(SuggestionConfig::default());
        assert_eq!(script.snapshot_or(&m, &wide).suggestions.len(), 1);
    }
}
