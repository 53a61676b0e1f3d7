//! TouchLine CLI library
//!
//! Script replay and archive maintenance behind the `touchline` binary.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use uuid::Uuid;

use touchline_core::api::{MatchScript, MatchSnapshot};
use touchline_core::{format_clock, EngineConfig, MatchHistory, MatchId, MatchListing, SaveManager};

/// Result of replaying one script.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    pub snapshot: MatchSnapshot,
    /// Number of matches in the archive after saving, if one was given
    pub archived: Option<usize>,
}

/// Replays the script at `script_path`. Scripts without a `suggestions`
/// block are ranked with the config from `TOUCHLINE_CONFIG_PATH` or
/// `TOUCHLINE_SUGGESTION_PROFILE`. With `archive`, the resulting match is
/// added to that archive; `saved_at` stamps the write.
pub fn replay(script_path: &Path, archive: Option<&Path>, saved_at: DateTime<Utc>) -> Result<ReplayOutcome> {
    let config = EngineConfig::from_env().context("Failed to load engine config")?;
    replay_with_config(script_path, archive, saved_at, &config)
}

pub fn replay_with_config(
    script_path: &Path,
    archive: Option<&Path>,
    saved_at: DateTime<Utc>,
    config: &EngineConfig,
) -> Result<ReplayOutcome> {
    let content = fs::read_to_string(script_path)
        .with_context(|| format!("Failed to read script: {}", script_path.display()))?;
    let script = MatchScript::from_json(&content).context("Failed to parse match script")?;
    let m = script.replay().context("Failed to replay match script")?;
    let snapshot = script.snapshot_or(&m, &config.suggestions);

    let archived = match archive {
        Some(path) => {
            let manager = SaveManager::with_file(path);
            let mut history = manager
                .load_or_default()
                .with_context(|| format!("Failed to load archive: {}", path.display()))?;
            history.insert(m).context("Failed to add match to archive")?;
            manager
                .save(&history, saved_at)
                .with_context(|| format!("Failed to write archive: {}", path.display()))?;
            Some(history.len())
        }
        None => None,
    };

    Ok(ReplayOutcome { snapshot, archived })
}

/// Match list of an archive, newest first.
pub fn list_history(archive: &Path) -> Result<Vec<MatchListing>> {
    let history = load_history(archive)?;
    Ok(history.list())
}

/// Deletes an ended match from the archive and writes it back.
pub fn delete_match(archive: &Path, match_id: &str, saved_at: DateTime<Utc>) -> Result<MatchListing> {
    let id = MatchId::from(
        Uuid::parse_str(match_id.trim()).with_context(|| format!("Invalid match id: {match_id}"))?,
    );
    let mut history = load_history(archive)?;
    let removed = history.delete(id)?;
    SaveManager::with_file(archive)
        .save(&history, saved_at)
        .with_context(|| format!("Failed to write archive: {}", archive.display()))?;
    Ok(MatchListing::from(&removed))
}

fn load_history(archive: &Path) -> Result<MatchHistory> {
    SaveManager::with_file(archive)
        .load()
        .with_context(|| format!("Failed to load archive: {}", archive.display()))
}

/// Plain-text report of a snapshot.
pub fn render_report(snapshot: &MatchSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", snapshot.name, snapshot.sport);
    let _ = writeln!(
        out,
        "Clock {} [{}]  Score {}-{}",
        snapshot.clock.display, snapshot.clock.phase, snapshot.goals_for, snapshot.goals_against
    );
    let _ = writeln!(out);

    for row in &snapshot.roster {
        let status = if row.on_field { snapshot.surface_name.as_str() } else { "Bench" };
        let position = row.position.map(|p| p.abbreviation()).unwrap_or("-");
        let _ = writeln!(
            out,
            "#{:<3} {:<20} {:<6} {:<3} played {}  goals {}",
            row.jersey_number,
            row.name,
            status,
            position,
            format_clock(row.seconds_played),
            row.goals
        );
    }

    if !snapshot.suggestions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Suggested subs:");
        for s in &snapshot.suggestions {
            let _ = writeln!(
                out,
                "  #{} {} ({} behind)",
                s.jersey_number,
                s.name,
                format_clock(s.deficit_seconds)
            );
        }
    }
    out
}

pub fn render_listing(listing: &MatchListing) -> String {
    let clock = listing.final_elapsed_seconds.map(format_clock).unwrap_or_else(|| "open".to_string());
    format!(
        "{}  {}  {:<24} {}-{}  {}",
        listing.id,
        listing.created_at.format("%Y-%m-%d %H:%M"),
        listing.name,
        listing.goals_for,
        listing.goals_against,
        clock
    )
}
