//! Pairing engine: one strategy per tournament format.
//!
//! Every strategy implements [`PairingStrategy`]; [`Pairer`] wraps them in a single
//! enum using `enum_dispatch`, so the tournament calls `pair_round` without caring
//! which format it runs. Strategies read the tournament through a [`RoundContext`]
//! and record every pair they fix in the tournament's [`PairingHistory`].

pub mod hybrid;
pub mod knockout;
pub mod round_robin;
pub mod swiss;

use enum_dispatch::enum_dispatch;
use std::collections::HashMap;

use crate::standings::StandingsTable;
use crate::tournament::config::DEFAULT_TOP_CUT;
use crate::tournament::models::{Bracket, Format, Match, Participant};

pub use hybrid::HybridPairing;
pub use knockout::{DoubleElimination, SingleElimination};
pub use round_robin::RoundRobin;
pub use swiss::SwissPairing;

/// Round count used for Swiss when the field size is unknown
pub const DEFAULT_SWISS_ROUNDS: u32 = 5;

/// Upper bound on auto-computed Swiss rounds
pub const MAX_SWISS_ROUNDS: u32 = 7;

/// Round count used for knockouts when the field size is unknown
pub const DEFAULT_KNOCKOUT_ROUNDS: u32 = 3;

/// How often each unordered pair of participants has met
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingHistory {
    counts: HashMap<(String, String), u32>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl PairingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the history from every non-bye match, decided or not
    pub fn from_matches(matches: &[Match]) -> Self {
        let mut history = Self::new();
        for m in matches {
            if let Some(b) = &m.player_b {
                history.record(&m.player_a, b);
            }
        }
        history
    }

    pub fn record(&mut self, a: &str, b: &str) {
        *self.counts.entry(pair_key(a, b)).or_insert(0) += 1;
    }

    pub fn count(&self, a: &str, b: &str) -> u32 {
        self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
    }

    pub fn has_played(&self, a: &str, b: &str) -> bool {
        self.count(a, b) > 0
    }

    /// Number of distinct pairs that have met
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(String, String), &u32)> {
        self.counts.iter()
    }
}

/// Read-only view of a tournament handed to the pairing strategies
#[derive(Debug, Clone, Copy)]
pub struct RoundContext<'a> {
    pub tournament_id: &'a str,
    /// Round being paired
    pub round: u32,
    /// All participants in registration order
    pub participants: &'a [Participant],
    pub standings: &'a StandingsTable,
    /// Every match created so far
    pub matches: &'a [Match],
}

impl<'a> RoundContext<'a> {
    pub fn is_active(&self, name: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.name == name && p.active)
    }

    fn seed_of(&self, name: &str) -> u32 {
        self.participants
            .iter()
            .find(|p| p.name == name)
            .map_or(u32::MAX, |p| p.seed)
    }

    /// Active participants ordered by seed; equal seeds keep registration order
    pub fn active_by_seed(&self) -> Vec<&'a str> {
        let mut active: Vec<&Participant> = self.participants.iter().filter(|p| p.active).collect();
        active.sort_by_key(|p| p.seed);
        active.into_iter().map(|p| p.name.as_str()).collect()
    }

    pub fn round_matches(&self, round: u32) -> impl Iterator<Item = &'a Match> {
        self.matches.iter().filter(move |m| m.round == round)
    }

    /// Number of byes `name` has received so far
    pub fn bye_count(&self, name: &str) -> usize {
        self.matches
            .iter()
            .filter(|m| m.is_bye() && m.player_a == name)
            .count()
    }

    /// Active participants ordered by points, then rank, then seed
    pub fn active_by_standing(&self) -> Vec<&'a str> {
        let mut players = self.active_by_seed();
        players.sort_by(|a, b| {
            self.standings
                .points(b)
                .total_cmp(&self.standings.points(a))
                .then_with(|| rank_key(self.standings.rank(a)).cmp(&rank_key(self.standings.rank(b))))
                .then_with(|| self.seed_of(a).cmp(&self.seed_of(b)))
        });
        players
    }
}

// Unranked participants sort after ranked ones
fn rank_key(rank: usize) -> usize {
    if rank == 0 { usize::MAX } else { rank }
}

/// Produces the matches of one round
#[enum_dispatch]
pub trait PairingStrategy {
    /// Create the matches of `ctx.round`, recording every new pair in `history`.
    ///
    /// Byes come back already resolved (status `bye`, winner = player A); the caller
    /// applies their standings effect.
    fn pair_round(&self, ctx: &RoundContext<'_>, history: &mut PairingHistory) -> Vec<Match>;
}

/// Pairing strategy selected by tournament format
#[enum_dispatch(PairingStrategy)]
#[derive(Debug, Clone)]
pub enum Pairer {
    Swiss(SwissPairing),
    SingleElimination(SingleElimination),
    DoubleElimination(DoubleElimination),
    RoundRobin(RoundRobin),
    Hybrid(HybridPairing),
}

impl Pairer {
    /// Strategy for `format` following the given round plan
    pub fn for_format(format: Format, plan: RoundPlan) -> Self {
        match format {
            Format::Swiss => SwissPairing.into(),
            Format::SingleElimination => SingleElimination.into(),
            Format::DoubleElimination => DoubleElimination.into(),
            Format::RoundRobin => RoundRobin.into(),
            Format::HybridSwissSe | Format::HybridSwissDe => HybridPairing {
                swiss_rounds: plan.swiss_rounds,
                top_cut: plan.top_cut,
                double_elimination: format == Format::HybridSwissDe,
            }
            .into(),
        }
    }
}

/// Round counts of a tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPlan {
    /// Total planned rounds
    pub num_rounds: u32,
    /// Rounds paired Swiss style (all of them for Swiss, none for knockouts)
    pub swiss_rounds: u32,
    /// Players entering the knockout phase of hybrid formats (0 otherwise)
    pub top_cut: usize,
}

impl RoundPlan {
    /// Derive the plan for `participants` active players. A `fixed_rounds` value wins
    /// over the computed count; for hybrids it covers both phases.
    pub fn new(
        format: Format,
        participants: usize,
        fixed_rounds: Option<u32>,
        top_cut: Option<usize>,
    ) -> Self {
        match format {
            Format::Swiss => {
                let rounds = fixed_rounds.unwrap_or_else(|| swiss_rounds(participants));
                Self {
                    num_rounds: rounds,
                    swiss_rounds: rounds,
                    top_cut: 0,
                }
            }
            Format::SingleElimination | Format::DoubleElimination => Self {
                num_rounds: fixed_rounds.unwrap_or_else(|| knockout_rounds(participants)),
                swiss_rounds: 0,
                top_cut: 0,
            },
            Format::RoundRobin => Self {
                num_rounds: fixed_rounds.unwrap_or_else(|| round_robin_rounds(participants)),
                swiss_rounds: 0,
                top_cut: 0,
            },
            Format::HybridSwissSe | Format::HybridSwissDe => {
                let cut = top_cut_size(top_cut, participants);
                let cut_rounds = cut.trailing_zeros();
                let swiss = match fixed_rounds {
                    Some(total) => total.saturating_sub(cut_rounds).max(1),
                    None => swiss_rounds(participants),
                };
                Self {
                    num_rounds: swiss + cut_rounds,
                    swiss_rounds: swiss,
                    top_cut: cut,
                }
            }
        }
    }
}

fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// ceil(log2(n)) capped at [`MAX_SWISS_ROUNDS`]
pub fn swiss_rounds(participants: usize) -> u32 {
    if participants == 0 {
        DEFAULT_SWISS_ROUNDS
    } else {
        ceil_log2(participants).clamp(1, MAX_SWISS_ROUNDS)
    }
}

/// ceil(log2(n))
pub fn knockout_rounds(participants: usize) -> u32 {
    if participants == 0 {
        DEFAULT_KNOCKOUT_ROUNDS
    } else {
        ceil_log2(participants).max(1)
    }
}

/// n - 1 for even fields; odd fields need one extra round for the rotating bye
pub fn round_robin_rounds(participants: usize) -> u32 {
    let n = u32::try_from(participants).unwrap_or(u32::MAX);
    match n {
        0..=2 => 1,
        n if n % 2 == 0 => n - 1,
        n => n,
    }
}

/// Largest power of two not above the requested cut or the field size, at least 2
pub fn top_cut_size(requested: Option<usize>, participants: usize) -> usize {
    let wanted = requested.unwrap_or(DEFAULT_TOP_CUT).min(participants).max(2);
    1 << (usize::BITS - 1 - wanted.leading_zeros())
}

/// Build the next match of a round: a bye when `b` is `None`
pub(crate) fn make_match(
    ctx: &RoundContext<'_>,
    history: &mut PairingHistory,
    match_num: usize,
    a: &str,
    b: Option<&str>,
    bracket: Bracket,
) -> Match {
    match b {
        Some(b) => {
            history.record(a, b);
            Match::pending(
                ctx.tournament_id,
                ctx.round,
                match_num,
                a.to_string(),
                b.to_string(),
                bracket,
            )
        }
        None => Match::bye(ctx.tournament_id, ctx.round, match_num, a.to_string(), bracket),
    }
}

/// Pair adjacent players (0 v 1, 2 v 3, ...); an odd player out gets a bye.
/// Match numbers start at `first_num`.
pub(crate) fn pair_sequential(
    ctx: &RoundContext<'_>,
    history: &mut PairingHistory,
    players: &[&str],
    bracket: Bracket,
    first_num: usize,
) -> Vec<Match> {
    players
        .chunks(2)
        .enumerate()
        .map(|(i, chunk)| {
            make_match(
                ctx,
                history,
                first_num + i,
                chunk[0],
                chunk.get(1).copied(),
                bracket,
            )
        })
        .collect()
}
