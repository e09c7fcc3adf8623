//! Tournament data models: participants, matches, standings and the enums
//! describing formats and lifecycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use super::errors::TournamentError;

/// Free-form key/value metadata attached to tournaments, participants and matches.
pub type Metadata = Map<String, Value>;

/// Points awarded for a match win (byes included)
pub const WIN_POINTS: f64 = 1.0;

/// Points awarded to each side of a draw
pub const DRAW_POINTS: f64 = 0.5;

/// Tournament format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Swiss,
    SingleElimination,
    DoubleElimination,
    RoundRobin,
    /// Swiss phase followed by a single elimination top cut
    HybridSwissSe,
    /// Swiss phase followed by a double elimination top cut
    HybridSwissDe,
}

impl Format {
    /// Wire name, as written to tournament files
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Swiss => "swiss",
            Format::SingleElimination => "single_elimination",
            Format::DoubleElimination => "double_elimination",
            Format::RoundRobin => "round_robin",
            Format::HybridSwissSe => "hybrid_swiss_se",
            Format::HybridSwissDe => "hybrid_swiss_de",
        }
    }

    /// Human readable label used by the frontend export ("Single Elimination")
    pub fn label(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Pure knockout formats (every round is an elimination round)
    pub fn is_knockout(&self) -> bool {
        matches!(self, Format::SingleElimination | Format::DoubleElimination)
    }

    pub fn is_hybrid(&self) -> bool {
        matches!(self, Format::HybridSwissSe | Format::HybridSwissDe)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Format {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swiss" => Ok(Format::Swiss),
            "single_elimination" => Ok(Format::SingleElimination),
            "double_elimination" => Ok(Format::DoubleElimination),
            "round_robin" => Ok(Format::RoundRobin),
            "hybrid_swiss_se" => Ok(Format::HybridSwissSe),
            "hybrid_swiss_de" => Ok(Format::HybridSwissDe),
            other => Err(TournamentError::InvalidConfig(format!(
                "unknown tournament format: {other}"
            ))),
        }
    }
}

/// Lifecycle state of a tournament, derived from its started/completed flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentState {
    /// Accepting participants
    Created,
    /// Rounds are being played
    Running,
    /// Final round finalized, no further mutation accepted
    Completed,
}

impl fmt::Display for TournamentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentState::Created => write!(f, "created"),
            TournamentState::Running => write!(f, "running"),
            TournamentState::Completed => write!(f, "completed"),
        }
    }
}

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    /// Auto-resolved in favour of player A at creation time
    Bye,
}

impl MatchStatus {
    /// Completed and bye matches are final
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Bye)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::InProgress => write!(f, "in_progress"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Bye => write!(f, "bye"),
        }
    }
}

/// Bracket a match belongs to. Only double elimination uses `Losers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bracket {
    #[default]
    Main,
    Losers,
}

/// Tie-breaker methods applied after points when ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    /// Sum of opponents' points
    Buchholz,
    /// Opponents' combined match win percentage
    OpponentWinPct,
    /// Own game (score) win percentage
    GameWinPct,
    /// Wins against opponents currently on equal points
    HeadToHead,
}

impl TieBreaker {
    /// Standard Swiss tie-breakers
    pub fn defaults() -> Vec<TieBreaker> {
        vec![TieBreaker::Buchholz, TieBreaker::OpponentWinPct]
    }
}

/// Tournament participant, identified by display name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Unique display name
    pub name: String,
    /// Seed used for round one ordering and tie-breaking
    #[serde(default)]
    pub seed: u32,
    /// Inactive participants are no longer paired
    #[serde(default = "default_active")]
    pub active: bool,
    /// Any extra keys stored alongside the participant
    #[serde(flatten)]
    pub metadata: Metadata,
}

fn default_active() -> bool {
    true
}

impl Participant {
    pub fn new(name: impl Into<String>, seed: u32) -> Self {
        Self {
            name: name.into(),
            seed,
            active: true,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

impl PartialEq for Participant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Participant {}

impl Hash for Participant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Build the tournament-scoped id of a match
pub fn match_id(tournament_id: &str, round: u32, match_num: usize) -> String {
    format!("{tournament_id}_R{round}_M{match_num}")
}

/// A single match in a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: String,
    pub round: u32,
    /// Sequence index within the round
    pub match_num: usize,
    pub player_a: String,
    /// `None` marks a bye
    pub player_b: Option<String>,
    #[serde(default)]
    pub score_a: u32,
    #[serde(default)]
    pub score_b: u32,
    /// `None` until reported, and for draws
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub bracket: Bracket,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

impl Match {
    /// Create a match awaiting a result
    pub fn pending(
        tournament_id: &str,
        round: u32,
        match_num: usize,
        player_a: String,
        player_b: String,
        bracket: Bracket,
    ) -> Self {
        Self {
            match_id: match_id(tournament_id, round, match_num),
            round,
            match_num,
            player_a,
            player_b: Some(player_b),
            score_a: 0,
            score_b: 0,
            winner: None,
            status: MatchStatus::Pending,
            bracket,
            metadata: Metadata::new(),
        }
    }

    /// Create a bye, already resolved in favour of `player`
    pub fn bye(
        tournament_id: &str,
        round: u32,
        match_num: usize,
        player: String,
        bracket: Bracket,
    ) -> Self {
        Self {
            match_id: match_id(tournament_id, round, match_num),
            round,
            match_num,
            winner: Some(player.clone()),
            player_a: player,
            player_b: None,
            score_a: 0,
            score_b: 0,
            status: MatchStatus::Bye,
            bracket,
            metadata: Metadata::new(),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_b.is_none() || self.status == MatchStatus::Bye
    }

    /// Completed matches without a winner are draws
    pub fn is_draw(&self) -> bool {
        self.status == MatchStatus::Completed && self.winner.is_none() && !self.is_bye()
    }

    /// The losing player of a decided, non-bye match
    pub fn loser(&self) -> Option<&str> {
        let winner = self.winner.as_deref()?;
        let player_b = self.player_b.as_deref()?;
        if winner == self.player_a {
            Some(player_b)
        } else {
            Some(self.player_a.as_str())
        }
    }

    pub fn involves(&self, name: &str) -> bool {
        self.player_a == name || self.player_b.as_deref() == Some(name)
    }
}

/// A result submitted for a match. Draws carry no winner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub round: u32,
    pub match_num: usize,
    #[serde(default)]
    pub winner: Option<String>,
    #[serde(default)]
    pub score_a: u32,
    #[serde(default)]
    pub score_b: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

impl MatchReport {
    pub fn win(
        round: u32,
        match_num: usize,
        winner: impl Into<String>,
        score_a: u32,
        score_b: u32,
    ) -> Self {
        Self {
            round,
            match_num,
            winner: Some(winner.into()),
            score_a,
            score_b,
            metadata: Metadata::new(),
        }
    }

    pub fn draw(round: u32, match_num: usize, score_a: u32, score_b: u32) -> Self {
        Self {
            round,
            match_num,
            winner: None,
            score_a,
            score_b,
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Running standing of one participant
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Standing {
    pub player: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Win = 1.0, draw = 0.5, loss = 0.0
    pub points: f64,
    pub game_wins: u32,
    pub game_losses: u32,
    /// Sum of opponents' points, recomputed once per round
    pub buchholz: f64,
    pub opponent_win_pct: f64,
    /// Wins against opponents on equal points, recomputed with the other tie-breakers
    pub head_to_head: f64,
    /// 1-based, assigned when a round is finalized (0 before the first one)
    pub rank: usize,
    /// Distinct opponents faced so far, in the order first met
    pub opponents: Vec<String>,
}

impl Standing {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            ..Default::default()
        }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn game_differential(&self) -> i64 {
        i64::from(self.game_wins) - i64::from(self.game_losses)
    }

    pub fn game_win_pct(&self) -> f64 {
        let total = self.game_wins + self.game_losses;
        if total == 0 {
            0.0
        } else {
            f64::from(self.game_wins) / f64::from(total)
        }
    }

    /// Flat, serialisable view of this standing. Buchholz is rounded to two
    /// decimals and opponent win percentage to three.
    pub fn row(&self) -> StandingRow {
        StandingRow {
            rank: self.rank,
            player: self.player.clone(),
            wins: self.wins,
            losses: self.losses,
            draws: self.draws,
            points: self.points,
            game_wins: self.game_wins,
            game_losses: self.game_losses,
            buchholz: round_to(self.buchholz, 2),
            opponent_win_pct: round_to(self.opponent_win_pct, 3),
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Standing snapshot as written to tournament files and exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: usize,
    pub player: String,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points: f64,
    pub game_wins: u32,
    pub game_losses: u32,
    pub buchholz: f64,
    pub opponent_win_pct: f64,
}
