//! Tournament documents: one pretty-printed JSON file per tournament.
//!
//! The persisted `standings` array is a snapshot for readers of the file. Loading
//! ignores it and replays the matches instead, so a hand-edited or stale snapshot
//! never leaks back into the engine.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path};

use crate::pairing::PairingHistory;
use crate::standings::StandingsTable;
use crate::tournament::{
    Format, Match, Metadata, Participant, StandingRow, TieBreaker, Tournament, TournamentError,
    TournamentResult,
};

fn default_true() -> bool {
    true
}

/// On-disk form of a [`Tournament`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub tournament_id: String,
    pub name: String,
    pub format: Format,
    #[serde(default)]
    pub date: String,
    pub num_rounds: u32,
    #[serde(default)]
    pub current_round: u32,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub standings: Vec<StandingRow>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "TieBreaker::defaults")]
    pub tie_breakers: Vec<TieBreaker>,
    #[serde(default)]
    pub top_cut: Option<usize>,
    #[serde(default = "default_true")]
    pub allow_byes: bool,
    /// Files without this key keep their stored round count
    #[serde(default = "default_true")]
    pub rounds_fixed: bool,
}

impl TournamentRecord {
    pub fn from_json(json: &str) -> TournamentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> TournamentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Tournament {
    /// Full document, standings snapshot included
    pub fn to_record(&self) -> TournamentRecord {
        TournamentRecord {
            tournament_id: self.id.clone(),
            name: self.name.clone(),
            format: self.format,
            date: self.date.clone(),
            num_rounds: self.num_rounds,
            current_round: self.current_round,
            started: self.started,
            completed: self.completed,
            participants: self.participants.clone(),
            matches: self.matches.clone(),
            standings: self.standings(),
            metadata: self.metadata.clone(),
            tie_breakers: self.tie_breakers.clone(),
            top_cut: self.top_cut,
            allow_byes: self.allow_byes,
            rounds_fixed: self.rounds_fixed,
        }
    }

    /// Rebuild a tournament from its document.
    ///
    /// Participants and matches are taken verbatim; standings and pairing history
    /// are recomputed from the matches.
    pub fn from_record(record: TournamentRecord) -> TournamentResult<Self> {
        if record.tournament_id.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "tournament document has no id".to_string(),
            ));
        }

        let mut names = HashSet::new();
        for participant in &record.participants {
            if !names.insert(participant.name.as_str()) {
                return Err(TournamentError::DuplicateParticipant(
                    participant.name.clone(),
                ));
            }
        }
        for m in &record.matches {
            let players = std::iter::once(m.player_a.as_str()).chain(m.player_b.as_deref());
            for player in players {
                if !names.contains(player) {
                    return Err(TournamentError::ParticipantNotFound(player.to_string()));
                }
            }
        }

        let tie_breakers = if record.tie_breakers.is_empty() {
            warn!(
                "{}: no tie-breakers stored, using defaults",
                record.tournament_id
            );
            TieBreaker::defaults()
        } else {
            record.tie_breakers
        };

        let standings = StandingsTable::replay(
            &record.participants,
            &record.matches,
            record.current_round,
            record.completed,
            &tie_breakers,
        );
        let history = PairingHistory::from_matches(&record.matches);

        debug!(
            "{}: restored {} participants and {} matches",
            record.tournament_id,
            record.participants.len(),
            record.matches.len()
        );

        Ok(Self {
            id: record.tournament_id,
            name: record.name,
            format: record.format,
            date: record.date,
            num_rounds: record.num_rounds,
            rounds_fixed: record.rounds_fixed,
            current_round: record.current_round,
            started: record.started,
            completed: record.completed,
            tie_breakers,
            top_cut: record.top_cut,
            allow_byes: record.allow_byes,
            metadata: record.metadata,
            participants: record.participants,
            matches: record.matches,
            standings,
            history,
        })
    }

    pub fn to_json(&self) -> TournamentResult<String> {
        self.to_record().to_json()
    }

    pub fn from_json(json: &str) -> TournamentResult<Self> {
        Self::from_record(TournamentRecord::from_json(json)?)
    }

    /// Write the whole document to `path`, replacing any previous content
    pub fn save(&self, path: impl AsRef<Path>) -> TournamentResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!("{}: saved to {}", self.id, path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> TournamentResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
