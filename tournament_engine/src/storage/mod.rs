//! Persistence: tournament documents, the index file, the manager and exports.

pub mod config;
pub mod export;
pub mod file;
pub mod index;
pub mod manager;

pub use config::{INDEX_FILE_NAME, StorageConfig};
pub use export::{DetailsSummary, FrontendEntry, ONGOING, TournamentDetails, TournamentSummary};
pub use file::TournamentRecord;
pub use index::{IndexEntry, TournamentIndex};
pub use manager::{ImportOutcome, LegacyImport, RejectedMatch, TournamentFilter, TournamentManager};
