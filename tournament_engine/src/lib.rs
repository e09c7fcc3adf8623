//! # Tournament Engine
//!
//! Runs competitions among named participants: pairs each round according to the
//! chosen format, records results, keeps standings with tie-breakers and
//! persists full tournament state as JSON.
//!
//! ## Formats
//!
//! - **Swiss**: seeded fold in round one, then score groups without rematches
//! - **Single / double elimination**: seeded bracket, winners advance
//!   (double elimination adds a simplified losers bracket)
//! - **Round robin**: circle method, every pair meets exactly once
//! - **Hybrid**: Swiss rounds followed by a single or double elimination top cut
//!
//! ## Core Modules
//!
//! - [`tournament`]: the [`Tournament`] aggregate, configuration, models and errors
//! - [`pairing`]: one [`PairingStrategy`] per format, dispatched through [`Pairer`]
//! - [`standings`]: standings updates, tie-breakers and ranking
//! - [`storage`]: JSON documents, the index file, [`TournamentManager`] and exports
//!
//! ## Example
//!
//! ```
//! use tournament_engine::{Tournament, TournamentConfig};
//!
//! let mut tournament =
//!     Tournament::with_participants(TournamentConfig::swiss("Club night"), ["Ann", "Bo", "Cy"])?;
//! tournament.start()?;
//!
//! // Three players: one of them starts with a bye
//! assert_eq!(tournament.matches(Some(1)).len(), 2);
//! assert_eq!(tournament.pending_matches().len(), 1);
//! # Ok::<(), tournament_engine::TournamentError>(())
//! ```

/// Pairing strategies for every tournament format.
pub mod pairing;
pub use pairing::{Pairer, PairingHistory, PairingStrategy, RoundContext, RoundPlan};

/// Standings bookkeeping, tie-breakers and ranking.
pub mod standings;
pub use standings::StandingsTable;

/// Persistence and the multi-tournament manager.
pub mod storage;
pub use storage::{StorageConfig, TournamentFilter, TournamentManager};

/// Tournament aggregate, configuration, data model and errors.
pub mod tournament;
pub use tournament::{
    ErrorKind, Format, Match, MatchReport, MatchStatus, Participant, Standing, StandingRow,
    TieBreaker, Tournament, TournamentConfig, TournamentError, TournamentResult,
    TournamentState,
};
