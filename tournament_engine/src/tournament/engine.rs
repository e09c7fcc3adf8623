//! The tournament aggregate and its round-progression state machine.

use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use rand::{Rng, seq::SliceRandom};
use uuid::Uuid;

use super::config::{DEFAULT_TOP_CUT, TournamentConfig};
use super::errors::{TournamentError, TournamentResult};
use super::models::{
    Bracket, Format, Match, MatchReport, MatchStatus, Metadata, Participant, Standing, StandingRow,
    TieBreaker, TournamentState,
};
use crate::pairing::{Pairer, PairingHistory, PairingStrategy, RoundContext, RoundPlan};
use crate::standings::{StandingsTable, finalize_round};

/// Minimum number of active participants needed to start
pub const MIN_PARTICIPANTS: usize = 2;

/// Generate a tournament id: `tournament_<timestamp>_<8 hex>`
pub fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "tournament_{}_{}",
        Utc::now().format("%Y%m%d%H%M%S"),
        &suffix[..8]
    )
}

/// A single competition: participants, matches, standings and pairing history.
///
/// Rounds advance on their own: once every match of the current round is decided
/// the round is finalized (tie-breakers and ranks recomputed) and either the next
/// round is paired or the tournament completes.
#[derive(Debug, Clone)]
pub struct Tournament {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) format: Format,
    pub(crate) date: String,
    pub(crate) num_rounds: u32,
    /// Whether `num_rounds` was configured rather than derived
    pub(crate) rounds_fixed: bool,
    pub(crate) current_round: u32,
    pub(crate) started: bool,
    pub(crate) completed: bool,
    pub(crate) tie_breakers: Vec<TieBreaker>,
    pub(crate) top_cut: Option<usize>,
    pub(crate) allow_byes: bool,
    pub(crate) metadata: Metadata,
    pub(crate) participants: Vec<Participant>,
    pub(crate) matches: Vec<Match>,
    pub(crate) standings: StandingsTable,
    pub(crate) history: PairingHistory,
}

impl Tournament {
    /// Create an empty tournament
    pub fn new(config: TournamentConfig) -> TournamentResult<Self> {
        config.validate()?;

        let mut tournament = Self {
            id: config.tournament_id.unwrap_or_else(generate_id),
            name: config.name,
            format: config.format,
            date: config
                .date
                .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            num_rounds: config.num_rounds.unwrap_or(0),
            rounds_fixed: config.num_rounds.is_some(),
            current_round: 0,
            started: false,
            completed: false,
            tie_breakers: config.tie_breakers,
            top_cut: config.top_cut,
            allow_byes: config.allow_byes,
            metadata: Metadata::new(),
            participants: Vec::new(),
            matches: Vec::new(),
            standings: StandingsTable::new(),
            history: PairingHistory::new(),
        };
        tournament.refresh_round_count();

        info!(
            "Created {} tournament '{}' ({})",
            tournament.format, tournament.name, tournament.id
        );
        Ok(tournament)
    }

    /// Create a tournament and register `names` with seeds 1, 2, ...
    pub fn with_participants<I, S>(config: TournamentConfig, names: I) -> TournamentResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tournament = Self::new(config)?;
        for (i, name) in names.into_iter().enumerate() {
            let seed = u32::try_from(i + 1).unwrap_or(u32::MAX);
            tournament.add_participant(name, seed, Metadata::new())?;
        }
        Ok(tournament)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn num_rounds(&self) -> u32 {
        self.num_rounds
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn tie_breakers(&self) -> &[TieBreaker] {
        &self.tie_breakers
    }

    pub fn top_cut(&self) -> Option<usize> {
        self.top_cut
    }

    pub fn allow_byes(&self) -> bool {
        self.allow_byes
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Participants in registration order
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.name == name)
    }

    pub fn active_count(&self) -> usize {
        self.participants.iter().filter(|p| p.active).count()
    }

    pub fn history(&self) -> &PairingHistory {
        &self.history
    }

    pub fn standings_table(&self) -> &StandingsTable {
        &self.standings
    }

    /// Lifecycle state derived from the started/completed flags
    pub fn state(&self) -> TournamentState {
        match (self.started, self.completed) {
            (_, true) => TournamentState::Completed,
            (true, false) => TournamentState::Running,
            (false, false) => TournamentState::Created,
        }
    }

    fn expect_state(&self, expected: TournamentState) -> TournamentResult<()> {
        let actual = self.state();
        if actual != expected {
            return Err(TournamentError::InvalidState { expected, actual });
        }
        Ok(())
    }

    /// Register a participant. A seed of 0 assigns the next free position.
    pub fn add_participant(
        &mut self,
        name: impl Into<String>,
        seed: u32,
        metadata: Metadata,
    ) -> TournamentResult<()> {
        self.expect_state(TournamentState::Created)?;

        let name = name.into();
        if name.trim().is_empty() {
            return Err(TournamentError::InvalidConfig(
                "participant name must not be empty".to_string(),
            ));
        }
        if self.participant(&name).is_some() {
            return Err(TournamentError::DuplicateParticipant(name));
        }

        let seed = if seed == 0 {
            u32::try_from(self.participants.len() + 1).unwrap_or(u32::MAX)
        } else {
            seed
        };

        debug!("{}: registered {} (seed {})", self.id, name, seed);
        self.standings.insert(&name);
        self.participants
            .push(Participant::new(name, seed).with_metadata(metadata));
        self.refresh_round_count();
        Ok(())
    }

    /// Withdraw a participant. They keep their standing but are never paired again.
    pub fn remove_participant(&mut self, name: &str) -> TournamentResult<()> {
        let participant = self
            .participants
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| TournamentError::ParticipantNotFound(name.to_string()))?;
        participant.active = false;

        info!("{}: {} withdrew", self.id, name);
        self.refresh_round_count();
        Ok(())
    }

    /// Shuffle seeds 1..=N across the registered participants
    pub fn randomize_seeding<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TournamentResult<()> {
        self.expect_state(TournamentState::Created)?;

        let mut seeds: Vec<u32> = (1..=self.participants.len())
            .map(|s| u32::try_from(s).unwrap_or(u32::MAX))
            .collect();
        seeds.shuffle(rng);
        for (participant, seed) in self.participants.iter_mut().zip(seeds) {
            participant.seed = seed;
        }
        Ok(())
    }

    /// Round counts for the tournament as it stands
    pub fn plan(&self) -> RoundPlan {
        if !self.started {
            return RoundPlan::new(
                self.format,
                self.active_count(),
                self.rounds_fixed.then_some(self.num_rounds),
                self.top_cut,
            );
        }

        let top_cut = if self.format.is_hybrid() {
            self.top_cut.unwrap_or(DEFAULT_TOP_CUT)
        } else {
            0
        };
        let swiss_rounds = match self.format {
            Format::Swiss => self.num_rounds,
            Format::HybridSwissSe | Format::HybridSwissDe => self
                .num_rounds
                .saturating_sub(top_cut.trailing_zeros()),
            _ => 0,
        };
        RoundPlan {
            num_rounds: self.num_rounds,
            swiss_rounds,
            top_cut,
        }
    }

    fn refresh_round_count(&mut self) {
        if !self.started && !self.rounds_fixed {
            self.num_rounds = self.plan().num_rounds;
        }
    }

    /// Start the tournament and pair round 1
    pub fn start(&mut self) -> TournamentResult<()> {
        self.expect_state(TournamentState::Created)?;

        let active = self.active_count();
        if active < MIN_PARTICIPANTS {
            return Err(TournamentError::InsufficientParticipants {
                needed: MIN_PARTICIPANTS,
                current: active,
            });
        }
        if !self.allow_byes {
            let needs_bye = if self.format.is_knockout() {
                !active.is_power_of_two()
            } else {
                active % 2 == 1
            };
            if needs_bye {
                return Err(TournamentError::InvalidConfig(format!(
                    "{active} participants would require byes in a {} tournament",
                    self.format
                )));
            }
        }

        // Freeze the round plan
        let plan = self.plan();
        self.num_rounds = plan.num_rounds;
        if self.format.is_hybrid() {
            self.top_cut = Some(plan.top_cut);
        }

        self.started = true;
        self.current_round = 1;
        info!(
            "Started tournament '{}' with {} participants over {} rounds",
            self.name, active, self.num_rounds
        );

        self.pair_round(1);
        self.advance();
        Ok(())
    }

    fn pair_round(&mut self, round: u32) {
        let pairer = Pairer::for_format(self.format, self.plan());
        let ctx = RoundContext {
            tournament_id: &self.id,
            round,
            participants: &self.participants,
            standings: &self.standings,
            matches: &self.matches,
        };
        let new_matches = pairer.pair_round(&ctx, &mut self.history);

        // Byes are already resolved
        for m in &new_matches {
            self.standings.apply(m);
        }
        info!(
            "{}: round {} paired with {} matches",
            self.id,
            round,
            new_matches.len()
        );
        self.matches.extend(new_matches);
    }

    /// Finalize every complete round, pairing the next one or completing the
    /// tournament. Rounds made only of byes finalize straight away.
    fn advance(&mut self) {
        while self.started && !self.completed && self.is_round_complete(self.current_round) {
            let round = self.current_round;
            finalize_round(&mut self.standings, &self.matches, round, &self.tie_breakers);

            if round >= self.num_rounds {
                self.completed = true;
                info!(
                    "Tournament '{}' completed, winner: {}",
                    self.name,
                    self.winner().unwrap_or("none")
                );
            } else {
                self.current_round += 1;
                self.pair_round(self.current_round);
            }
        }
    }

    /// Whether every match of `round` is completed or a bye
    pub fn is_round_complete(&self, round: u32) -> bool {
        self.matches
            .iter()
            .filter(|m| m.round == round)
            .all(|m| m.status.is_terminal())
    }

    fn match_index(&self, round: u32, match_num: usize) -> TournamentResult<usize> {
        self.matches
            .iter()
            .position(|m| m.round == round && m.match_num == match_num)
            .ok_or(TournamentError::MatchNotFound { round, match_num })
    }

    fn is_knockout_round(&self, round: u32) -> bool {
        match self.format {
            Format::SingleElimination | Format::DoubleElimination => true,
            Format::HybridSwissSe | Format::HybridSwissDe => round > self.plan().swiss_rounds,
            Format::Swiss | Format::RoundRobin => false,
        }
    }

    /// Mark a pending match as in progress
    pub fn begin_match(&mut self, round: u32, match_num: usize) -> TournamentResult<()> {
        self.expect_state(TournamentState::Running)?;

        let idx = self.match_index(round, match_num)?;
        let m = &mut self.matches[idx];
        if m.status.is_terminal() {
            return Err(TournamentError::MatchAlreadyCompleted { round, match_num });
        }
        m.status = MatchStatus::InProgress;
        Ok(())
    }

    /// Report a decided match
    pub fn report_match(
        &mut self,
        round: u32,
        match_num: usize,
        winner: &str,
        score_a: u32,
        score_b: u32,
    ) -> TournamentResult<()> {
        self.submit(MatchReport::win(round, match_num, winner, score_a, score_b))
    }

    /// Report a drawn match (both sides get half a point)
    pub fn report_draw(
        &mut self,
        round: u32,
        match_num: usize,
        score_a: u32,
        score_b: u32,
    ) -> TournamentResult<()> {
        self.submit(MatchReport::draw(round, match_num, score_a, score_b))
    }

    /// Record a match result, then finalize the round if it was the last one open
    pub fn submit(&mut self, report: MatchReport) -> TournamentResult<()> {
        self.expect_state(TournamentState::Running)?;

        let MatchReport {
            round,
            match_num,
            winner,
            score_a,
            score_b,
            metadata,
        } = report;
        let idx = self.match_index(round, match_num)?;

        // Validate against the match
        {
            let m = &self.matches[idx];
            if m.status.is_terminal() {
                return Err(TournamentError::MatchAlreadyCompleted { round, match_num });
            }
            match winner.as_deref() {
                Some(w) if !m.involves(w) => {
                    return Err(TournamentError::WinnerNotInMatch {
                        winner: w.to_string(),
                        player_a: m.player_a.clone(),
                        player_b: m.player_b.clone().unwrap_or_default(),
                    });
                }
                Some(_) => {}
                None if self.is_knockout_round(round) => {
                    return Err(TournamentError::DrawNotAllowed { round });
                }
                None => {}
            }
        }

        let m = &mut self.matches[idx];
        m.winner = winner;
        m.score_a = score_a;
        m.score_b = score_b;
        m.status = MatchStatus::Completed;
        m.metadata.extend(metadata);

        debug!(
            "{}: {} {}-{} {} ({})",
            m.match_id,
            m.player_a,
            score_a,
            score_b,
            m.player_b.as_deref().unwrap_or("-"),
            m.winner.as_deref().unwrap_or("draw")
        );
        self.standings.apply(&self.matches[idx]);

        if round == self.current_round {
            self.advance();
        }
        Ok(())
    }

    /// Sorted standings snapshot
    pub fn standings(&self) -> Vec<StandingRow> {
        self.standings.snapshot(&self.tie_breakers)
    }

    pub fn standing(&self, name: &str) -> Option<&Standing> {
        self.standings.get(name)
    }

    /// Matches of one round, or all of them
    pub fn matches(&self, round: Option<u32>) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| round.is_none_or(|r| m.round == r))
            .collect()
    }

    pub fn all_matches(&self) -> &[Match] {
        &self.matches
    }

    /// Matches still waiting for a result
    pub fn pending_matches(&self) -> Vec<&Match> {
        self.matches
            .iter()
            .filter(|m| !m.status.is_terminal())
            .collect()
    }

    /// Champion of a completed tournament: the winner of the final main bracket
    /// match for knockout phases, rank 1 otherwise.
    pub fn winner(&self) -> Option<&str> {
        if !self.completed {
            return None;
        }

        if self.format.is_knockout() || self.format.is_hybrid() {
            let mut finals = self
                .matches
                .iter()
                .filter(|m| m.round == self.current_round && m.bracket == Bracket::Main);
            if let (Some(last), None) = (finals.next(), finals.next())
                && let Some(winner) = last.winner.as_deref()
            {
                return Some(winner);
            }
        }

        self.standings
            .sorted(&self.tie_breakers)
            .first()
            .map(|s| s.player.as_str())
    }
}
