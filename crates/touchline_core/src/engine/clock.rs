//! Match Clock
//!
//! Converts caller-supplied wall-clock instants into match-relative seconds.
//!
//! ## Phases
//! `NotStarted → InPlay ⇄ Paused(ordinary | halftime) → Ended`
//!
//! Every method that depends on time takes `now` explicitly. The clock never
//! reads the system time, so any sequence of calls is reproducible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::MatchError;

/// Signed seconds from `from` to `to`, at millisecond resolution.
pub(crate) fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1_000.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PauseReason {
    Ordinary,
    Halftime,
}

/// Where the match timeline currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockPhase {
    NotStarted,
    InPlay {
        play_started_at: DateTime<Utc>,
    },
    Paused {
        play_started_at: DateTime<Utc>,
        paused_at: DateTime<Utc>,
        reason: PauseReason,
    },
    /// Terminal. `ended_at` is the effective end instant: the pause instant
    /// when the match was ended while paused.
    Ended {
        play_started_at: Option<DateTime<Utc>>,
        ended_at: DateTime<Utc>,
    },
}

impl ClockPhase {
    pub fn name(&self) -> &'static str {
        match self {
            ClockPhase::NotStarted => "not_started",
            ClockPhase::InPlay { .. } => "in_play",
            ClockPhase::Paused { reason: PauseReason::Ordinary, .. } => "paused",
            ClockPhase::Paused { reason: PauseReason::Halftime, .. } => "halftime",
            ClockPhase::Ended { .. } => "ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ClockRecord", into = "ClockRecord")]
pub struct MatchClock {
    phase: ClockPhase,
    /// Sum of completed pause durations
    total_paused_seconds: f64,
    has_had_halftime: bool,
}

impl Default for MatchClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchClock {
    pub fn new() -> Self {
        Self { phase: ClockPhase::NotStarted, total_paused_seconds: 0.0, has_had_halftime: false }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn total_paused_seconds(&self) -> f64 {
        self.total_paused_seconds
    }

    pub fn has_had_halftime(&self) -> bool {
        self.has_had_halftime
    }

    pub fn has_started_play(&self) -> bool {
        self.play_started_at().is_some()
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase, ClockPhase::Paused { .. })
    }

    pub fn is_halftime(&self) -> bool {
        matches!(self.phase, ClockPhase::Paused { reason: PauseReason::Halftime, .. })
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, ClockPhase::Ended { .. })
    }

    pub fn play_started_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            ClockPhase::NotStarted => None,
            ClockPhase::InPlay { play_started_at } | ClockPhase::Paused { play_started_at, .. } => {
                Some(play_started_at)
            }
            ClockPhase::Ended { play_started_at, .. } => play_started_at,
        }
    }

    pub fn paused_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            ClockPhase::Paused { paused_at, .. } => Some(paused_at),
            _ => None,
        }
    }

    pub fn pause_reason(&self) -> Option<PauseReason> {
        match self.phase {
            ClockPhase::Paused { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            ClockPhase::Ended { ended_at, .. } => Some(ended_at),
            _ => None,
        }
    }

    /// Match-relative seconds at `now`: wall time since kickoff minus every
    /// pause, including the one in progress. Zero before kickoff, frozen while
    /// paused and after the end, never negative.
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = match self.phase {
            ClockPhase::NotStarted => 0.0,
            ClockPhase::InPlay { play_started_at } => {
                seconds_between(play_started_at, now) - self.total_paused_seconds
            }
            ClockPhase::Paused { play_started_at, paused_at, .. } => {
                seconds_between(play_started_at, now)
                    - self.total_paused_seconds
                    - seconds_between(paused_at, now)
            }
            ClockPhase::Ended { play_started_at: None, .. } => 0.0,
            ClockPhase::Ended { play_started_at: Some(play_started_at), ended_at } => {
                seconds_between(play_started_at, ended_at) - self.total_paused_seconds
            }
        };
        elapsed.max(0.0)
    }

    /// The instant the match timeline is actually at: the pause instant while
    /// paused, the effective end once ended, otherwise `now`.
    pub fn effective_instant(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self.phase {
            ClockPhase::Paused { paused_at, .. } => paused_at,
            ClockPhase::Ended { ended_at, .. } => ended_at,
            _ => now,
        }
    }

    /// Match seconds used to timestamp roster changes and events requested at
    /// `now`. Requests during a pause land on the pause boundary.
    pub fn match_seconds_at(&self, now: DateTime<Utc>) -> f64 {
        self.elapsed_seconds(self.effective_instant(now))
    }

    /// Final match length, fixed once the match has ended.
    pub fn final_elapsed_seconds(&self) -> Option<f64> {
        match self.phase {
            ClockPhase::Ended { ended_at, .. } => Some(self.elapsed_seconds(ended_at)),
            _ => None,
        }
    }

    // =========================================================================
    // Transitions (return true when the phase actually changed)
    // =========================================================================

    pub fn start_play(&mut self, now: DateTime<Utc>) -> bool {
        if !matches!(self.phase, ClockPhase::NotStarted) {
            debug!("start_play ignored in phase {}", self.phase.name());
            return false;
        }
        self.phase = ClockPhase::InPlay { play_started_at: now };
        self.total_paused_seconds = 0.0;
        info!("Play started at {}", now);
        true
    }

    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        self.enter_pause(now, PauseReason::Ordinary)
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> bool {
        let ClockPhase::Paused { play_started_at, paused_at, reason } = self.phase else {
            debug!("resume ignored in phase {}", self.phase.name());
            return false;
        };
        let paused_for = seconds_between(paused_at, now).max(0.0);
        // A resume stamped before its pause shifts the kickoff anchor back by
        // the gap, so the reading at `now` stays at the frozen value.
        let play_started_at =
            if now < paused_at { play_started_at - (paused_at - now) } else { play_started_at };
        self.total_paused_seconds += paused_for;
        self.phase = ClockPhase::InPlay { play_started_at };
        info!("Play resumed after {:.1}s {:?} pause", paused_for, reason);
        true
    }

    /// Halftime is once per match. During an ordinary pause the pause is
    /// re-tagged as halftime and keeps its original pause instant.
    pub fn start_halftime(&mut self, now: DateTime<Utc>) -> bool {
        if self.has_had_halftime {
            debug!("start_halftime ignored: halftime already taken");
            return false;
        }
        match self.phase {
            ClockPhase::InPlay { .. } => {
                self.enter_pause(now, PauseReason::Halftime);
            }
            ClockPhase::Paused { play_started_at, paused_at, .. } => {
                self.phase =
                    ClockPhase::Paused { play_started_at, paused_at, reason: PauseReason::Halftime };
                info!("Ongoing pause converted to halftime");
            }
            ClockPhase::NotStarted | ClockPhase::Ended { .. } => {
                debug!("start_halftime ignored in phase {}", self.phase.name());
                return false;
            }
        }
        self.has_had_halftime = true;
        true
    }

    pub fn end_halftime(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_halftime() {
            debug!("end_halftime ignored in phase {}", self.phase.name());
            return false;
        }
        self.resume(now)
    }

    /// Ends the match. Ending during a pause ends it at the pause instant so
    /// the paused time is never counted as played.
    pub fn end(&mut self, now: DateTime<Utc>) -> bool {
        let ended_at = self.effective_instant(now);
        let play_started_at = match self.phase {
            ClockPhase::Ended { .. } => {
                debug!("end ignored: match already ended");
                return false;
            }
            ClockPhase::NotStarted => None,
            ClockPhase::InPlay { play_started_at } | ClockPhase::Paused { play_started_at, .. } => {
                Some(play_started_at)
            }
        };
        self.phase = ClockPhase::Ended { play_started_at, ended_at };
        info!("Match ended at {} after {:.1}s of play", ended_at, self.elapsed_seconds(ended_at));
        true
    }

    fn enter_pause(&mut self, now: DateTime<Utc>, reason: PauseReason) -> bool {
        let ClockPhase::InPlay { play_started_at } = self.phase else {
            debug!("pause ignored in phase {}", self.phase.name());
            return false;
        };
        self.phase = ClockPhase::Paused { play_started_at, paused_at: now, reason };
        info!("Play paused ({:?}) at {}", reason, now);
        true
    }
}

// ============================================
// Flat persisted form
// ============================================

/// Storage shape of [`MatchClock`]: one optional field per timeline marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockRecord {
    pub play_started_at: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_paused_seconds: f64,
    #[serde(default)]
    pub pause_reason: Option<PauseReason>,
    #[serde(default)]
    pub has_had_halftime: bool,
    pub ended_at: Option<DateTime<Utc>>,
}

impl From<MatchClock> for ClockRecord {
    fn from(clock: MatchClock) -> Self {
        Self {
            play_started_at: clock.play_started_at(),
            paused_at: clock.paused_at(),
            total_paused_seconds: clock.total_paused_seconds,
            pause_reason: clock.pause_reason(),
            has_had_halftime: clock.has_had_halftime,
            ended_at: clock.ended_at(),
        }
    }
}

impl TryFrom<ClockRecord> for MatchClock {
    type Error = MatchError;

    fn try_from(record: ClockRecord) -> Result<Self, Self::Error> {
        let invalid = |msg: &str| Err(MatchError::InvalidClockState(msg.to_string()));

        if !record.total_paused_seconds.is_finite() || record.total_paused_seconds < 0.0 {
            return invalid("total_paused_seconds must be finite and >= 0");
        }
        if record.pause_reason.is_some() && record.paused_at.is_none() {
            return invalid("pause_reason set without paused_at");
        }
        if record.pause_reason == Some(PauseReason::Halftime) && !record.has_had_halftime {
            return invalid("halftime pause without has_had_halftime");
        }

        let phase = match (record.play_started_at, record.paused_at, record.ended_at) {
            (_, Some(_), Some(_)) => return invalid("ended match cannot be paused"),
            (Some(started), _, Some(ended)) if ended < started => {
                return invalid("ended_at precedes play_started_at")
            }
            (play_started_at, None, Some(ended_at)) => ClockPhase::Ended { play_started_at, ended_at },
            (None, Some(_), None) => return invalid("paused_at set before play started"),
            (None, None, None) => ClockPhase::NotStarted,
            (Some(play_started_at), None, None) => ClockPhase::InPlay { play_started_at },
            (Some(play_started_at), Some(paused_at), None) => ClockPhase::Paused {
                play_started_at,
                paused_at,
                reason: record.pause_reason.unwrap_or(PauseReason::Ordinary),
            },
        };

        Ok(Self {
            phase,
            total_paused_seconds: record.total_paused_seconds,
            has_had_halftime: record.has_had_halftime,
        })
    }
}
