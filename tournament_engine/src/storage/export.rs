//! Read-only exports for downstream consumers.
//!
//! The frontend list is shared with tournaments imported from other sources.
//! Entries written here carry `"custom": true`; everything else already in the
//! file is kept untouched when merging.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::{
    cmp::Reverse,
    fs, io,
    path::{Path, PathBuf},
};

use super::file::TournamentRecord;
use crate::tournament::{Format, MatchStatus, Tournament, TournamentResult};

/// Winner label used by the frontend for unfinished tournaments
pub const ONGOING: &str = "Ongoing";

/// Quick facts about a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: String,
    pub name: String,
    pub format: Format,
    pub date: String,
    pub started: bool,
    pub completed: bool,
    pub num_participants: usize,
    pub num_rounds: u32,
    pub current_round: u32,
    pub winner: Option<String>,
    pub num_matches: usize,
}

impl From<&Tournament> for TournamentSummary {
    fn from(tournament: &Tournament) -> Self {
        Self {
            id: tournament.id().to_string(),
            name: tournament.name().to_string(),
            format: tournament.format(),
            date: tournament.date().to_string(),
            started: tournament.is_started(),
            completed: tournament.is_completed(),
            num_participants: tournament.participants().len(),
            num_rounds: tournament.num_rounds(),
            current_round: tournament.current_round(),
            winner: tournament.winner().map(str::to_string),
            num_matches: tournament.all_matches().len(),
        }
    }
}

/// One row of the frontend tournament list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendEntry {
    pub id: String,
    pub name: String,
    pub date: String,
    /// Format label, e.g. "Single Elimination"
    pub format: String,
    pub players: usize,
    /// Champion, or [`ONGOING`]
    pub winner: String,
    pub challonge: Option<Value>,
    pub parameter: Option<Value>,
    pub custom: bool,
}

impl From<&Tournament> for FrontendEntry {
    fn from(tournament: &Tournament) -> Self {
        Self {
            id: tournament.id().to_string(),
            name: tournament.name().to_string(),
            date: tournament.date().to_string(),
            format: tournament.format().label(),
            players: tournament.participants().len(),
            winner: tournament.winner().unwrap_or(ONGOING).to_string(),
            challonge: None,
            parameter: None,
            custom: true,
        }
    }
}

/// Computed totals appended to a detail export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailsSummary {
    pub total_matches: usize,
    pub completed_matches: usize,
    /// Highest round with a completed match
    pub rounds_completed: u32,
    pub participants_active: usize,
}

impl From<&Tournament> for DetailsSummary {
    fn from(tournament: &Tournament) -> Self {
        let completed = || {
            tournament
                .all_matches()
                .iter()
                .filter(|m| m.status == MatchStatus::Completed)
        };
        Self {
            total_matches: tournament.all_matches().len(),
            completed_matches: completed().count(),
            rounds_completed: completed().map(|m| m.round).max().unwrap_or(0),
            participants_active: tournament.active_count(),
        }
    }
}

/// Full tournament document plus its [`DetailsSummary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentDetails {
    #[serde(flatten)]
    pub record: TournamentRecord,
    pub summary: DetailsSummary,
}

impl From<&Tournament> for TournamentDetails {
    fn from(tournament: &Tournament) -> Self {
        Self {
            record: tournament.to_record(),
            summary: DetailsSummary::from(tournament),
        }
    }
}

/// Entries of an existing frontend file that were not written by this engine
pub fn foreign_entries(existing: &Value) -> Vec<Value> {
    existing
        .get("tournaments")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter(|e| e.get("custom").and_then(Value::as_bool) != Some(true))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// Combine foreign entries with ours, newest date first
pub fn merge_entries(foreign: Vec<Value>, ours: &[FrontendEntry]) -> TournamentResult<Value> {
    let mut all = foreign;
    for entry in ours {
        all.push(serde_json::to_value(entry)?);
    }
    all.sort_by_key(|e| {
        Reverse(
            e.get("date")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )
    });
    Ok(json!({ "tournaments": all }))
}

/// Write the frontend list to `path`. Returns (ours, kept foreign) entry counts.
pub fn write_frontend_list(
    path: &Path,
    ours: &[FrontendEntry],
    merge_existing: bool,
) -> TournamentResult<(usize, usize)> {
    let foreign = if merge_existing {
        match fs::read_to_string(path) {
            Ok(json) => foreign_entries(&serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        }
    } else {
        Vec::new()
    };
    let kept = foreign.len();

    let document = merge_entries(foreign, ours)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(&document)?)?;

    info!(
        "Exported {} tournaments (merged with {} existing) to {}",
        ours.len(),
        kept,
        path.display()
    );
    Ok((ours.len(), kept))
}

/// Write `<dir>/<id>.json` with the full document and summary
pub fn write_details(dir: &Path, tournament: &Tournament) -> TournamentResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.json", tournament.id()));
    let details = TournamentDetails::from(tournament);
    fs::write(&path, serde_json::to_string_pretty(&details)?)?;

    if details.summary.participants_active < tournament.participants().len() {
        warn!(
            "{}: exported with {} withdrawn participants",
            tournament.id(),
            tournament.participants().len() - details.summary.participants_active
        );
    }
    info!("Exported tournament details to {}", path.display());
    Ok(path)
}
