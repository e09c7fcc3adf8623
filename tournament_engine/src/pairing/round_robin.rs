//! Round robin scheduling using the circle method.
//!
//! The roster is fixed in round one: the active participants in seed order. An odd
//! roster gets a phantom seat, and whoever faces it sits out with a bye. Seat 0
//! stays put while the others rotate one step per round, so every pair meets
//! exactly once over the full schedule.

use log::debug;

use super::{PairingHistory, PairingStrategy, RoundContext, make_match};
use crate::tournament::models::{Bracket, Match, Participant};

/// Round robin strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobin;

impl PairingStrategy for RoundRobin {
    fn pair_round(&self, ctx: &RoundContext<'_>, history: &mut PairingHistory) -> Vec<Match> {
        let roster = roster(ctx);
        let pairs = circle_pairs(&roster, ctx.round);

        let mut games = Vec::new();
        let mut byes = Vec::new();
        for (a, b) in pairs {
            let a = a.filter(|p| ctx.is_active(p));
            let b = b.filter(|p| ctx.is_active(p));
            match (a, b) {
                (Some(a), Some(b)) => games.push((a, b)),
                (Some(p), None) | (None, Some(p)) => byes.push(p),
                (None, None) => {}
            }
        }

        let mut matches: Vec<Match> = games
            .iter()
            .enumerate()
            .map(|(i, &(a, b))| make_match(ctx, history, i, a, Some(b), Bracket::Main))
            .collect();
        for p in byes {
            matches.push(make_match(ctx, history, matches.len(), p, None, Bracket::Main));
        }

        debug!(
            "round {}: {} round robin matches from a roster of {}",
            ctx.round,
            matches.len(),
            roster.len()
        );
        matches
    }
}

/// Participants scheduled for the whole event, in seed order
fn roster<'a>(ctx: &RoundContext<'a>) -> Vec<&'a str> {
    if ctx.round == 1 {
        return ctx.active_by_seed();
    }

    let mut entrants: Vec<&'a Participant> = ctx
        .participants
        .iter()
        .filter(|p| ctx.round_matches(1).any(|m| m.involves(&p.name)))
        .collect();
    entrants.sort_by_key(|p| p.seed);
    entrants.into_iter().map(|p| p.name.as_str()).collect()
}

/// Pairs of the given 1-based round. `None` is the phantom seat of odd rosters.
pub(crate) fn circle_pairs<'a>(
    roster: &[&'a str],
    round: u32,
) -> Vec<(Option<&'a str>, Option<&'a str>)> {
    let mut seats: Vec<Option<&'a str>> = roster.iter().copied().map(Some).collect();
    if seats.len() % 2 == 1 {
        seats.push(None);
    }
    let n = seats.len();
    if n < 2 {
        return Vec::new();
    }

    let turns = (round.saturating_sub(1) as usize) % (n - 1);
    seats[1..].rotate_right(turns);

    (0..n / 2).map(|i| (seats[i], seats[n - 1 - i])).collect()
}
