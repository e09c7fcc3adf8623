//! Standings: incremental result bookkeeping, tie-breakers and ranking.
//!
//! Standings are a pure function of the participants and their decided matches.
//! [`StandingsTable::replay`] rebuilds them from scratch, which is how loaded
//! tournaments recover from a stale or corrupted standings snapshot.

pub mod table;
pub mod tiebreak;

pub use table::StandingsTable;
pub use tiebreak::{assign_ranks, buchholz, compute_tiebreakers, finalize_round, opponent_win_pct};
