//! Tournament module: the aggregate, its configuration and data model.
//!
//! This module provides:
//! - Tournament creation and configuration for every supported format
//! - Participant registration, seeding and withdrawal
//! - Match reporting (wins, draws, byes) with validation
//! - Automatic round progression and completion
//!
//! ## Example
//!
//! ```
//! use tournament_engine::tournament::{Tournament, TournamentConfig};
//!
//! let config = TournamentConfig::swiss("Friday Night").with_rounds(2);
//! let mut tournament = Tournament::with_participants(config, ["Ann", "Bo", "Cy", "Di"])?;
//! tournament.start()?;
//!
//! for round in 1..=2 {
//!     let pairings: Vec<_> = tournament.matches(Some(round)).into_iter().cloned().collect();
//!     for m in pairings {
//!         tournament.report_match(round, m.match_num, &m.player_a, 2, 1)?;
//!     }
//! }
//! assert!(tournament.is_completed());
//! # Ok::<(), tournament_engine::tournament::TournamentError>(())
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod models;

pub use config::{DEFAULT_TOP_CUT, TournamentConfig};
pub use engine::{MIN_PARTICIPANTS, Tournament, generate_id};
pub use errors::{ErrorKind, TournamentError, TournamentResult};
pub use models::{
    Bracket, DRAW_POINTS, Format, Match, MatchReport, MatchStatus, Metadata, Participant,
    Standing, StandingRow, TieBreaker, TournamentState, WIN_POINTS,
};
