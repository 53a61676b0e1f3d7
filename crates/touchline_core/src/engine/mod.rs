pub mod aggregation; // Average playing time and sub suggestions
pub mod clock; // Match clock state machine
pub mod command; // Serializable user actions for scripted drivers
pub mod config;
pub mod event_log;
pub mod live_match; // Match aggregate root
pub mod substitutions;

pub use aggregation::{is_underplayed, SubSuggestion};
pub use clock::{ClockPhase, ClockRecord, MatchClock, PauseReason};
pub use command::{MatchCommand, TimedCommand};
pub use config::{EngineConfig, SuggestionConfig};
pub use event_log::EventLog;
pub use live_match::Match;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::models::PlayerRef;

    /// 2026-01-01T00:00:00Z
    pub(crate) const KICKOFF_EPOCH: i64 = 1_767_225_600;

    /// Instant `secs` seconds after a fixed reference point.
    pub(crate) fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(KICKOFF_EPOCH + secs, 0).unwrap()
    }

    pub(crate) fn squad(size: u32) -> Vec<PlayerRef> {
        (1..=size).map(|n| PlayerRef::new(format!("Player {}", n), n)).collect()
    }
}
