//! Match History
//!
//! The set of matches a caller keeps. At most one match is open (not ended)
//! at a time; a new one can only be set up once the open one has ended.
//! `MatchHistory` converts to and from [`MatchArchive`] for persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::engine::Match;
use crate::error::{MatchError, Result};
use crate::models::{MatchId, PlayerRef, SportType};
use crate::save::{MatchArchive, SaveError, ARCHIVE_VERSION};

/// One row of the match list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchListing {
    pub id: MatchId,
    pub name: String,
    pub sport: SportType,
    pub created_at: DateTime<Utc>,
    pub is_ended: bool,
    pub goals_for: usize,
    pub goals_against: usize,
    pub final_elapsed_seconds: Option<f64>,
}

impl From<&Match> for MatchListing {
    fn from(m: &Match) -> Self {
        Self {
            id: m.id(),
            name: m.name().to_string(),
            sport: m.sport(),
            created_at: m.created_at(),
            is_ended: m.is_ended(),
            goals_for: m.goals_for(),
            goals_against: m.goals_against(),
            final_elapsed_seconds: m.final_elapsed_seconds(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchHistory {
    matches: Vec<Match>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Sets up a new match. Refused while another match is still open.
    pub fn create_match(
        &mut self,
        name: &str,
        players: &[PlayerRef],
        sport: SportType,
        now: DateTime<Utc>,
    ) -> Result<MatchId> {
        if let Some(active) = self.active_match() {
            warn!("create_match refused: '{}' is still open", active.name());
            return Err(MatchError::ActiveMatchExists(active.id()));
        }
        let m = Match::new(name, players, sport, now);
        let id = m.id();
        self.matches.push(m);
        Ok(id)
    }

    /// Adds a match built elsewhere, e.g. replayed from a script. The
    /// one-open-match rule still applies.
    pub fn insert(&mut self, m: Match) -> Result<()> {
        if !m.is_ended() {
            if let Some(active) = self.active_match() {
                warn!("insert refused: '{}' is still open", active.name());
                return Err(MatchError::ActiveMatchExists(active.id()));
            }
        }
        if self.matches.iter().any(|existing| existing.id() == m.id()) {
            return Err(MatchError::InvalidRoster(format!("match {} already kept", m.id())));
        }
        m.validate()?;
        self.matches.push(m);
        Ok(())
    }

    /// The match that has not ended yet, if any.
    pub fn active_match(&self) -> Option<&Match> {
        self.matches.iter().find(|m| !m.is_ended())
    }

    pub fn active_match_mut(&mut self) -> Option<&mut Match> {
        self.matches.iter_mut().find(|m| !m.is_ended())
    }

    /// Ends the open match, if any, and returns its id.
    pub fn end_active(&mut self, now: DateTime<Utc>) -> Option<MatchId> {
        let active = self.active_match_mut()?;
        active.end(now);
        Some(active.id())
    }

    pub fn get(&self, id: MatchId) -> Result<&Match> {
        self.matches.iter().find(|m| m.id() == id).ok_or(MatchError::MatchNotFound(id))
    }

    pub fn get_mut(&mut self, id: MatchId) -> Result<&mut Match> {
        self.matches.iter_mut().find(|m| m.id() == id).ok_or(MatchError::MatchNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter()
    }

    /// Newest first by creation time.
    pub fn list(&self) -> Vec<MatchListing> {
        let mut listings: Vec<MatchListing> = self.matches.iter().map(MatchListing::from).collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings
    }

    /// Drops an ended match together with its roster and events. Open
    /// matches are never deleted.
    pub fn delete(&mut self, id: MatchId) -> Result<Match> {
        let index = self
            .matches
            .iter()
            .position(|m| m.id() == id)
            .ok_or(MatchError::MatchNotFound(id))?;
        if !self.matches[index].is_ended() {
            warn!("delete refused: match {} is still in progress", id);
            return Err(MatchError::MatchInProgress(id));
        }
        let removed = self.matches.remove(index);
        info!("Deleted match '{}' ({} events)", removed.name(), removed.events().len());
        Ok(removed)
    }

    /// Convert to the persisted form
    pub fn to_archive(&self, saved_at: DateTime<Utc>) -> MatchArchive {
        MatchArchive { version: ARCHIVE_VERSION, saved_at, matches: self.matches.clone() }
    }

    /// Restore from the persisted form, rejecting archives that break the
    /// history invariants.
    pub fn from_archive(archive: MatchArchive) -> std::result::Result<Self, SaveError> {
        archive.validate()?;
        Ok(Self { matches: archive.matches })
    }
}
