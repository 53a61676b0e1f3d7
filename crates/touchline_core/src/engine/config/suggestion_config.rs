//! Substitution Suggestion Configuration
//!
//! | Preset | Threshold | Use |
//! |--------|-----------|-----|
//! | default | 60s | Typical youth match |
//! | strict | 30s | Short games, flag small gaps |
//! | relaxed | 120s | Long games, only big gaps |

use serde::{Deserialize, Serialize};
use std::env;

pub(crate) const PROFILE_ENV: &str = "TOUCHLINE_SUGGESTION_PROFILE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// How far below the average a player must be before being suggested (default: 60)
    pub underplayed_threshold_seconds: f64,
    /// Cap on suggestions returned (default: 3)
    pub max_suggestions: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self { underplayed_threshold_seconds: 60.0, max_suggestions: 3 }
    }
}

impl SuggestionConfig {
    pub fn strict() -> Self {
        Self { underplayed_threshold_seconds: 30.0, ..Self::default() }
    }

    pub fn relaxed() -> Self {
        Self { underplayed_threshold_seconds: 120.0, ..Self::default() }
    }

    pub fn from_profile(profile: &str) -> Option<Self> {
        match profile.trim().to_lowercase().as_str() {
            "strict" => Some(Self::strict()),
            "relaxed" => Some(Self::relaxed()),
            "default" | "" => Some(Self::default()),
            _ => None,
        }
    }

    /// Preset named by `TOUCHLINE_SUGGESTION_PROFILE`, else the default.
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var(PROFILE_ENV).unwrap_or_default()).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.underplayed_threshold_seconds.is_finite() || self.underplayed_threshold_seconds < 0.0 {
            return Err(format!(
                "underplayed_threshold_seconds must be finite and >= 0, got {}",
                self.underplayed_threshold_seconds
            ));
        }
        if self.max_suggestions == 0 {
            return Err("max_suggestions must be at least 1".to_string());
        }
        Ok(())
    }
}
