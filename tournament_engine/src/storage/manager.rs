//! Tournament manager: keeps tournaments in memory, persists them under the
//! storage directory and maintains the index file.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use super::config::StorageConfig;
use super::export::{self, FrontendEntry, TournamentSummary};
use super::index::{IndexEntry, TournamentIndex};
use crate::tournament::{
    Format, MatchReport, Metadata, Tournament, TournamentConfig, TournamentError,
    TournamentResult,
};

/// Filter for [`TournamentManager::list_tournaments`]; `None` fields match anything
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TournamentFilter {
    pub format: Option<Format>,
    pub started: Option<bool>,
    pub completed: Option<bool>,
}

impl TournamentFilter {
    pub fn format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn started(mut self, started: bool) -> Self {
        self.started = Some(started);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn matches(&self, entry: &IndexEntry) -> bool {
        self.format.is_none_or(|f| entry.format == f)
            && self.started.is_none_or(|s| entry.started == s)
            && self.completed.is_none_or(|c| entry.completed == c)
    }
}

/// A finished event from another system, replayed through the normal reporting path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyImport {
    pub name: String,
    pub date: String,
    pub format: Format,
    /// Participant names in seed order
    pub participants: Vec<String>,
    pub matches: Vec<MatchReport>,
    /// Champion according to the source, checked against the replayed result
    #[serde(default)]
    pub winner: Option<String>,
}

/// A legacy result the engine refused
#[derive(Debug)]
pub struct RejectedMatch {
    pub report: MatchReport,
    pub error: TournamentError,
}

/// Result of [`TournamentManager::import_legacy_tournament`]
#[derive(Debug)]
pub struct ImportOutcome {
    pub tournament_id: String,
    pub imported: usize,
    pub rejected: Vec<RejectedMatch>,
}

impl ImportOutcome {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Tournament manager
#[derive(Debug)]
pub struct TournamentManager {
    config: StorageConfig,
    tournaments: HashMap<String, Tournament>,
    index: TournamentIndex,
}

impl TournamentManager {
    /// Create a manager over `config`, creating the storage directory and reading
    /// the index if one exists
    pub fn new(config: StorageConfig) -> TournamentResult<Self> {
        fs::create_dir_all(&config.storage_dir)?;
        let index = TournamentIndex::load(&config.index_path())?;
        info!(
            "Tournament storage at {} ({} indexed)",
            config.storage_dir.display(),
            index.len()
        );
        Ok(Self {
            config,
            tournaments: HashMap::new(),
            index,
        })
    }

    /// Create a manager configured from the environment
    pub fn from_env() -> TournamentResult<Self> {
        Self::new(StorageConfig::from_env())
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub fn index(&self) -> &TournamentIndex {
        &self.index
    }

    /// Tournament already held in memory
    pub fn get(&self, id: &str) -> Option<&Tournament> {
        self.tournaments.get(id)
    }

    /// Create, register and persist a new tournament
    pub fn create_tournament<I, S>(
        &mut self,
        config: TournamentConfig,
        participants: I,
    ) -> TournamentResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tournament = Tournament::with_participants(config, participants)?;
        let id = tournament.id().to_string();

        // Check for an id clash
        if self.tournaments.contains_key(&id) || self.index.contains(&id) {
            return Err(TournamentError::InvalidConfig(format!(
                "tournament id already in use: {id}"
            )));
        }

        self.tournaments.insert(id.clone(), tournament);
        if let Err(e) = self.save_tournament(&id) {
            self.tournaments.remove(&id);
            self.index.remove(&id);
            warn!("Could not store new tournament {id}: {e}");
            return Err(e);
        }
        Ok(id)
    }

    /// Tournament by id, read from disk on first access
    pub fn load_tournament(&mut self, id: &str) -> TournamentResult<&Tournament> {
        if !self.tournaments.contains_key(id) {
            let path = self.document_path(id)?;
            if !path.exists() {
                return Err(TournamentError::TournamentNotFound(id.to_string()));
            }
            let tournament = Tournament::load(&path)?;
            self.tournaments.insert(id.to_string(), tournament);
        }
        self.tournaments
            .get(id)
            .ok_or_else(|| TournamentError::TournamentNotFound(id.to_string()))
    }

    fn document_path(&self, id: &str) -> TournamentResult<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(TournamentError::TournamentNotFound(id.to_string()));
        }
        Ok(self.config.tournament_path(id))
    }

    /// Write an in-memory tournament to disk and refresh its index entry
    pub fn save_tournament(&mut self, id: &str) -> TournamentResult<()> {
        let path = self.document_path(id)?;
        let tournament = self
            .tournaments
            .get(id)
            .ok_or_else(|| TournamentError::TournamentNotFound(id.to_string()))?;

        fs::create_dir_all(&self.config.storage_dir)?;
        tournament.save(path)?;

        self.index.upsert(IndexEntry::from(tournament));
        self.index.save(&self.config.index_path())
    }

    /// Save every tournament held in memory
    pub fn save_all(&mut self) -> TournamentResult<()> {
        let ids: Vec<String> = self.tournaments.keys().cloned().collect();
        for id in ids {
            self.save_tournament(&id)?;
        }
        Ok(())
    }

    /// Apply `f` to a tournament and persist it. When `f` fails the tournament is
    /// left exactly as it was and nothing is written.
    pub fn update<T, F>(&mut self, id: &str, f: F) -> TournamentResult<T>
    where
        F: FnOnce(&mut Tournament) -> TournamentResult<T>,
    {
        self.load_tournament(id)?;
        let tournament = self
            .tournaments
            .get_mut(id)
            .ok_or_else(|| TournamentError::TournamentNotFound(id.to_string()))?;

        let backup = tournament.clone();
        match f(&mut *tournament) {
            Ok(value) => {
                self.save_tournament(id)?;
                Ok(value)
            }
            Err(e) => {
                *tournament = backup;
                Err(e)
            }
        }
    }

    pub fn start_tournament(&mut self, id: &str) -> TournamentResult<()> {
        self.update(id, Tournament::start)
    }

    pub fn report_match(
        &mut self,
        id: &str,
        round: u32,
        match_num: usize,
        winner: &str,
        score_a: u32,
        score_b: u32,
    ) -> TournamentResult<()> {
        self.update(id, |t| t.report_match(round, match_num, winner, score_a, score_b))
    }

    /// Indexed tournaments matching `filter`, newest first
    pub fn list_tournaments(&self, filter: &TournamentFilter) -> Vec<&IndexEntry> {
        let mut entries: Vec<&IndexEntry> = self
            .index
            .tournaments
            .iter()
            .filter(|e| filter.matches(e))
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    /// Started but not completed
    pub fn active_tournaments(&self) -> Vec<&IndexEntry> {
        self.list_tournaments(&TournamentFilter::default().started(true).completed(false))
    }

    pub fn completed_tournaments(&self) -> Vec<&IndexEntry> {
        self.list_tournaments(&TournamentFilter::default().completed(true))
    }

    pub fn summary(&mut self, id: &str) -> TournamentResult<TournamentSummary> {
        self.load_tournament(id).map(TournamentSummary::from)
    }

    /// Write the frontend tournament list. Tournaments that fail to load are
    /// skipped with a warning. Returns (exported, kept foreign) counts.
    pub fn export_for_frontend(
        &mut self,
        path: &Path,
        merge_existing: bool,
    ) -> TournamentResult<(usize, usize)> {
        let ids: Vec<String> = self.index.tournaments.iter().map(|e| e.id.clone()).collect();

        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            match self.load_tournament(&id) {
                Ok(tournament) => entries.push(FrontendEntry::from(tournament)),
                Err(e) => warn!("Skipping tournament {id} in frontend export: {e}"),
            }
        }

        export::write_frontend_list(path, &entries, merge_existing)
    }

    /// Write the frontend list to the configured export file
    pub fn export_default(&mut self) -> TournamentResult<(usize, usize)> {
        let path = self.config.export_file.clone();
        self.export_for_frontend(&path, true)
    }

    pub fn export_tournament_details(&mut self, id: &str, dir: &Path) -> TournamentResult<PathBuf> {
        let tournament = self.load_tournament(id)?;
        export::write_details(dir, tournament)
    }

    /// Forget a tournament: memory, index entry and document. Returns whether it
    /// existed anywhere.
    pub fn delete_tournament(&mut self, id: &str) -> TournamentResult<bool> {
        let path = self.document_path(id)?;
        let in_memory = self.tournaments.remove(id).is_some();
        let indexed = self.index.remove(id);
        if indexed {
            self.index.save(&self.config.index_path())?;
        }

        let on_disk = path.exists();
        if on_disk {
            fs::remove_file(&path)?;
        }

        if in_memory || indexed || on_disk {
            info!("Deleted tournament {id}");
        }
        Ok(in_memory || indexed || on_disk)
    }

    /// Create a tournament from another system's results and replay them.
    ///
    /// Every result goes through [`Tournament::submit`]; the ones it rejects are
    /// listed in the outcome. A tournament that cannot even start is deleted again.
    pub fn import_legacy_tournament(
        &mut self,
        import: LegacyImport,
    ) -> TournamentResult<ImportOutcome> {
        let LegacyImport {
            name,
            date,
            format,
            participants,
            matches,
            winner,
        } = import;

        let config = TournamentConfig::new(name, format).with_date(date);
        let id = self.create_tournament(config, participants)?;

        let mut imported = 0;
        let mut rejected = Vec::new();
        let result = self.update(&id, |tournament| {
            tournament
                .metadata_mut()
                .insert("imported".to_string(), true.into());
            tournament.start()?;

            for report in matches {
                match tournament.submit(report.clone()) {
                    Ok(()) => imported += 1,
                    Err(error) => {
                        warn!(
                            "Rejected imported result for round {}, match {}: {error}",
                            report.round, report.match_num
                        );
                        rejected.push(RejectedMatch { report, error });
                    }
                }
            }

            if let Some(expected) = winner.as_deref()
                && tournament.winner() != Some(expected)
            {
                warn!(
                    "{}: source winner {expected} differs from replayed winner {}",
                    tournament.id(),
                    tournament.winner().unwrap_or("none")
                );
            }
            Ok(())
        });
        if let Err(e) = result {
            self.delete_tournament(&id)?;
            return Err(e);
        }

        info!(
            "Imported tournament {id}: {imported} results, {} rejected",
            rejected.len()
        );
        Ok(ImportOutcome {
            tournament_id: id,
            imported,
            rejected,
        })
    }

    /// Metadata stored on a tournament
    pub fn metadata(&mut self, id: &str) -> TournamentResult<&Metadata> {
        self.load_tournament(id).map(Tournament::metadata)
    }
}
