//! # Engine Configuration
//!
//! Tunables for the read-side engines. Clock and substitution arithmetic
//! have no knobs; only the "who needs a sub" ranking does.
//!
//! ## Usage
//! ```rust
//! use touchline_core::engine::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! let strict = EngineConfig::strict();
//! assert!(strict.suggestions.underplayed_threshold_seconds < config.suggestions.underplayed_threshold_seconds);
//! ```
//!
//! ## Environment Variables
//! - `TOUCHLINE_CONFIG_PATH`: JSON or YAML file (`.yaml` / `.yml`) to load
//! - `TOUCHLINE_SUGGESTION_PROFILE`: preset when no file is given (strict, relaxed, default)

mod suggestion_config;

pub use suggestion_config::SuggestionConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};
use tracing::info;

use crate::error::{MatchError, Result};

pub(crate) const CONFIG_PATH_ENV: &str = "TOUCHLINE_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub suggestions: SuggestionConfig,
}

impl EngineConfig {
    pub fn strict() -> Self {
        Self { suggestions: SuggestionConfig::strict() }
    }

    pub fn relaxed() -> Self {
        Self { suggestions: SuggestionConfig::relaxed() }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| MatchError::Config(format!("Failed to parse YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, choosing the parser by extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MatchError::Config(format!("Failed to read config file '{}': {e}", path.display()))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// File named by `TOUCHLINE_CONFIG_PATH` if set, otherwise the preset named
    /// by `TOUCHLINE_SUGGESTION_PROFILE`, otherwise defaults.
    pub fn from_env() -> Result<Self> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self { suggestions: SuggestionConfig::from_env_or_default() });
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self { suggestions: SuggestionConfig::from_env_or_default() });
        }

        let config = Self::from_path(Path::new(path))
            .map_err(|e| MatchError::Config(format!("{CONFIG_PATH_ENV}='{path}': {e}")))?;
        info!("Loaded engine config from {}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.suggestions.validate().map_err(MatchError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert!((cfg.suggestions.underplayed_threshold_seconds - 60.0).abs() < 0.001);
        assert_eq!(cfg.suggestions.max_suggestions, 3);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg = EngineConfig::from_json(r#"{"suggestions": {"max_suggestions": 5}}"#).unwrap();
        assert_eq!(cfg.suggestions.max_suggestions, 5);
        assert!((cfg.suggestions.underplayed_threshold_seconds - 60.0).abs() < 0.001);

        let empty = EngineConfig::from_json("{}").unwrap();
        assert_eq!(empty, EngineConfig::default());
    }

    #[test]
    fn test_yaml_config() {
        let yaml = "suggestions:\n  underplayed_threshold_seconds: 90\n";
        let cfg = EngineConfig::from_yaml(yaml).unwrap();
        assert!((cfg.suggestions.underplayed_threshold_seconds - 90.0).abs() < 0.001);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let err = EngineConfig::from_json(r#"{"suggestions": {"max_suggestions": 0}}"#).unwrap_err();
        assert!(matches!(err, MatchError::Config(_)));
        assert!(EngineConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_from_path_picks_parser_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("touchline.yml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "suggestions:\n  max_suggestions: 2").unwrap();

        let cfg = EngineConfig::from_path(&path).unwrap();
        assert_eq!(cfg.suggestions.max_suggestions, 2);
        assert!(EngineConfig::from_path(&dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_from_env_reads_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("touchline.yaml");
        fs::write(&path, "suggestions:\n  underplayed_threshold_seconds: 45\n").unwrap();

        env::set_var(CONFIG_PATH_ENV, &path);
        let loaded = EngineConfig::from_env();
        env::set_var(CONFIG_PATH_ENV, dir.path().join("missing.yaml"));
        let missing = EngineConfig::from_env();
        env::remove_var(CONFIG_PATH_ENV);

        let cfg = loaded.unwrap();
        assert!((cfg.suggestions.underplayed_threshold_seconds - 45.0).abs() < 0.001);
        assert!(matches!(missing, Err(MatchError::Config(_))));
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::relaxed();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
