//! Storage configuration.
//!
//! Locates tournament files, the index and the frontend exports on disk.

use std::env;
use std::path::PathBuf;

/// Name of the index file inside the storage directory
pub const INDEX_FILE_NAME: &str = "tournaments_index.json";

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding one `<id>.json` document per tournament plus the index
    pub storage_dir: PathBuf,

    /// Flat tournament list consumed by the frontend
    pub export_file: PathBuf,

    /// Directory receiving per-tournament detail exports
    pub details_dir: PathBuf,
}

impl StorageConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `TOURNAMENT_STORAGE_DIR`: tournament documents (default: `data/tournaments`)
    /// - `TOURNAMENT_EXPORT_FILE`: frontend list (default: `docs/data/tournaments.json`)
    /// - `TOURNAMENT_DETAILS_DIR`: detail exports (default: `docs/data/tournaments`)
    pub fn from_env() -> Self {
        let defaults = Self::development();
        Self {
            storage_dir: env::var("TOURNAMENT_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            export_file: env::var("TOURNAMENT_EXPORT_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_file),
            details_dir: env::var("TOURNAMENT_DETAILS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.details_dir),
        }
    }

    /// Default layout relative to the working directory
    pub fn development() -> Self {
        Self {
            storage_dir: PathBuf::from("data/tournaments"),
            export_file: PathBuf::from("docs/data/tournaments.json"),
            details_dir: PathBuf::from("docs/data/tournaments"),
        }
    }

    /// Everything under one root directory, handy for tests and sandboxes
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            storage_dir: root.join("tournaments"),
            export_file: root.join("export").join("tournaments.json"),
            details_dir: root.join("export").join("tournaments"),
        }
    }

    pub fn index_path(&self) -> PathBuf {
        self.storage_dir.join(INDEX_FILE_NAME)
    }

    /// Path of the document for `tournament_id`
    pub fn tournament_path(&self, tournament_id: &str) -> PathBuf {
        self.storage_dir.join(format!("{tournament_id}.json"))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::development()
    }
}
