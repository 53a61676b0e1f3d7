//! # touchline_core - Deterministic Match Time Accounting
//!
//! Tracks a live match: a clock that pauses and resumes, a roster moving
//! between field and bench with per-player playing time, and an event log.
//!
//! ## Features
//! - Every time-dependent call takes `now`; nothing reads the system clock
//! - Paused time never counts as played, for the match or for any player
//! - Substitution suggestions ranked by playing-time deficit
//! - Compressed, checksummed match archives
//! - JSON API for replaying recorded matches

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;
pub mod state;
pub mod time_format;

// Re-export main API functions
pub use api::{replay_script_json, snapshot, snapshot_json, summary, MatchScript, MatchSnapshot};
pub use error::{MatchError, Result};

// Re-export the match engine
pub use engine::{
    ClockPhase, EngineConfig, EventLog, Match, MatchClock, MatchCommand, PauseReason, SubSuggestion,
    SuggestionConfig, TimedCommand,
};

// Re-export models
pub use models::{EventType, MatchEvent, MatchId, PlayerId, PlayerRef, Position, RosterEntry, SportType};

// Re-export save system
pub use save::{MatchArchive, SaveError, SaveManager};

// Re-export state management
pub use state::{MatchHistory, MatchListing};

pub use time_format::format_clock;
