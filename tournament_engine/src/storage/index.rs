//! Index file listing every stored tournament.
//!
//! The index is always read whole, changed in memory and rewritten whole.

use log::info;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};

use crate::tournament::{Format, Tournament, TournamentResult};

/// Summary line of one tournament in the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub id: String,
    pub name: String,
    pub format: Format,
    pub date: String,
    pub started: bool,
    pub completed: bool,
    pub num_participants: usize,
    pub num_rounds: u32,
}

impl From<&Tournament> for IndexEntry {
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
        }
    }
}

/// `{"tournaments": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentIndex {
    #[serde(default)]
    pub tournaments: Vec<IndexEntry>,
}

impl TournamentIndex {
    /// Read the index at `path`; a missing file is an empty index
    pub fn load(path: &Path) -> TournamentResult<Self> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> TournamentResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(
            "Wrote tournament index with {} entries to {}",
            self.tournaments.len(),
            path.display()
        );
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&IndexEntry> {
        self.tournaments.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Replace the entry with the same id, or append a new one
    pub fn upsert(&mut self, entry: IndexEntry) {
        match self.tournaments.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => *existing = entry,
            None => self.tournaments.push(entry),
        }
    }

    /// Drop the entry for `id`, returning whether one existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tournaments.len();
        self.tournaments.retain(|e| e.id != id);
        self.tournaments.len() != before
    }

    pub fn len(&self) -> usize {
        self.tournaments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
    }
}
