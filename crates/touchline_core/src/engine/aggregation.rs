//! Playing-time aggregation and substitution suggestions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::SuggestionConfig;
use super::live_match::Match;
use crate::models::{PlayerId, RosterEntry};

/// A player trailing the roster average, with how far behind they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubSuggestion {
    pub player_id: PlayerId,
    pub name: String,
    pub jersey_number: u32,
    pub seconds_played: f64,
    pub deficit_seconds: f64,
}

/// A player must trail the average by more than `threshold` to count.
pub fn is_underplayed(seconds_played: f64, average: f64, threshold: f64) -> bool {
    seconds_played + threshold < average
}

impl Match {
    /// Mean played time over entries that are on the field or have played
    /// before. Players who never got on are left out so they do not drag the
    /// average down early on.
    pub fn average_seconds_played(&self, now: DateTime<Utc>) -> f64 {
        let (total, count) = self
            .roster
            .iter()
            .filter(|e| e.has_played())
            .fold((0.0, 0usize), |(total, count), e| {
                (total + e.seconds_played(&self.clock, now), count + 1)
            });
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    pub fn is_underplayed(
        &self,
        entry: &RosterEntry,
        now: DateTime<Utc>,
        average: f64,
        threshold: f64,
    ) -> bool {
        is_underplayed(entry.seconds_played(&self.clock, now), average, threshold)
    }

    /// Most underplayed players first, at most three, 60s threshold.
    pub fn suggested_subs(&self, now: DateTime<Utc>) -> Vec<SubSuggestion> {
        self.suggested_subs_with(now, &SuggestionConfig::default())
    }

    /// Ranked by deficit, largest first. Equal deficits keep jersey order.
    pub fn suggested_subs_with(
        &self,
        now: DateTime<Utc>,
        config: &SuggestionConfig,
    ) -> Vec<SubSuggestion> {
        let average = self.average_seconds_played(now);
        let mut suggestions: Vec<SubSuggestion> = self
            .roster_in_display_order()
            .into_iter()
            .filter(|e| self.is_underplayed(e, now, average, config.underplayed_threshold_seconds))
            .map(|e| {
                let seconds_played = e.seconds_played(&self.clock, now);
                SubSuggestion {
                    player_id: e.player_id,
                    name: e.snapshot_name.clone(),
                    jersey_number: e.snapshot_jersey_number,
                    seconds_played,
                    deficit_seconds: average - seconds_played,
                }
            })
            .collect();

        // Vec::sort_by is stable, so ties stay in display order.
        suggestions.sort_by(|a, b| b.deficit_seconds.total_cmp(&a.deficit_seconds));
        suggestions.truncate(config.max_suggestions);
        suggestions
    }
}
