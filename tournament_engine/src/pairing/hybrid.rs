//! Swiss phase followed by a knockout top cut.

use log::info;

use super::knockout::{advance, bracket_order};
use super::{PairingHistory, PairingStrategy, RoundContext, SwissPairing, pair_sequential};
use crate::tournament::models::{Bracket, Match};

/// Hybrid strategy: `swiss_rounds` Swiss rounds, then the top `top_cut` players
/// play single or double elimination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HybridPairing {
    pub swiss_rounds: u32,
    /// Power of two, at least 2
    pub top_cut: usize,
    pub double_elimination: bool,
}

impl HybridPairing {
    /// Whether `round` belongs to the knockout phase
    pub fn in_cut(&self, round: u32) -> bool {
        round > self.swiss_rounds
    }
}

impl PairingStrategy for HybridPairing {
    fn pair_round(&self, ctx: &RoundContext<'_>, history: &mut PairingHistory) -> Vec<Match> {
        if !self.in_cut(ctx.round) {
            return SwissPairing.pair_round(ctx, history);
        }

        if ctx.round == self.swiss_rounds + 1 {
            let qualified: Vec<&str> = ctx
                .active_by_standing()
                .into_iter()
                .take(self.top_cut)
                .collect();
            info!(
                "round {}: top {} cut begins ({})",
                ctx.round,
                qualified.len(),
                qualified.join(", ")
            );
            let seeded = bracket_order(&qualified);
            pair_sequential(ctx, history, &seeded, Bracket::Main, 0)
        } else {
            advance(ctx, history, self.double_elimination)
        }
    }
}
