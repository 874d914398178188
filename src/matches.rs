use log::debug;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

use crate::team::Team;
use crate::traits::RandomSource;

/// Score every group stage team starts from.
pub const BASE_SCORE: i32 = 70;

/// Width of the random part of a group stage score.
pub const SCORE_SPREAD: f64 = 100.0;

/// Maximum score advantage given by the ranking gap.
pub const MAX_RANKING_BIAS: f64 = 30.0;

/// Score advantage per ranking position.
pub const RANKING_BIAS_FACTOR: f64 = 1.5;

/// Lowest group stage score.
pub const MIN_SCORE: i32 = 50;

/// Highest group stage score (before a tie is resolved).
pub const MAX_SCORE: i32 = 150;

/// Lowest knockout stage score.
pub const KNOCKOUT_MIN_SCORE: i32 = 70;

/// Highest knockout stage score.
pub const KNOCKOUT_MAX_SCORE: i32 = 120;

/// The result of a played match. A match never ends in a draw.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub team_a: &'a Team,
    pub team_b: &'a Team,
    pub score_a: i32,
    pub score_b: i32,
    pub winner: &'a Team,
    pub loser: &'a Team,

    #[serde(skip)]
    _phantom: PhantomData<()>,
}

impl<'a> MatchResult<'a> {
    /// Creates a match result. Returns [`None`] if the scores are equal.
    pub fn new(team_a: &'a Team, team_b: &'a Team, score_a: i32, score_b: i32) -> Option<Self> {
        let (winner, loser) = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => (team_a, team_b),
            std::cmp::Ordering::Less => (team_b, team_a),
            std::cmp::Ordering::Equal => return None,
        };

        Some(MatchResult {
            team_a,
            team_b,
            score_a,
            score_b,
            winner,
            loser,
            _phantom: PhantomData,
        })
    }
}

impl Display for MatchResult<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {} ({}:{})",
            self.team_a, self.team_b, self.score_a, self.score_b
        )
    }
}

/// Generates the score of a group stage match, biased toward the better ranked team.
///
/// The returned scores are never equal: a tie is resolved by a coin flip giving one
/// more point to one of the teams.
pub fn generate_score(team_a: &Team, team_b: &Team, rng: &mut impl RandomSource) -> (i32, i32) {
    let bias = ranking_bias(team_a.ranking, team_b.ranking);

    let mut score_a = draw_group_score(bias, rng);
    let mut score_b = draw_group_score(-bias, rng);

    if score_a == score_b {
        if rng.next_float() < 0.5 {
            score_a += 1;
        } else {
            score_b += 1;
        }
    }

    (score_a, score_b)
}

/// Plays a group stage match.
pub fn simulate_match<'a>(
    team_a: &'a Team,
    team_b: &'a Team,
    rng: &mut impl RandomSource,
) -> MatchResult<'a> {
    let (score_a, score_b) = generate_score(team_a, team_b, rng);
    let result = MatchResult::new(team_a, team_b, score_a, score_b)
        .unwrap_or_else(|| unreachable!("generate_score never returns a tie"));
    debug!("group match {result}");
    result
}

/// Plays a knockout match. Rankings are ignored, tied draws are rejected and drawn again.
pub fn simulate_knockout_match<'a>(
    team_a: &'a Team,
    team_b: &'a Team,
    rng: &mut impl RandomSource,
) -> MatchResult<'a> {
    loop {
        let score_a = rng.next_int(KNOCKOUT_MIN_SCORE, KNOCKOUT_MAX_SCORE);
        let score_b = rng.next_int(KNOCKOUT_MIN_SCORE, KNOCKOUT_MAX_SCORE);

        if let Some(result) = MatchResult::new(team_a, team_b, score_a, score_b) {
            debug!("knockout match {result}");
            return result;
        }
        debug!("knockout match {team_a} - {team_b} drawn {score_a}:{score_b}, drawing again");
    }
}

/// Score advantage of the first team (negative if the second team is stronger).
fn ranking_bias(ranking_a: u32, ranking_b: u32) -> f64 {
    let bias = (ranking_a.abs_diff(ranking_b) as f64 * RANKING_BIAS_FACTOR).min(MAX_RANKING_BIAS);
    if ranking_a < ranking_b {
        bias
    } else {
        -bias
    }
}

#[inline]
fn draw_group_score(bias: f64, rng: &mut impl RandomSource) -> i32 {
    let score = BASE_SCORE + (rng.next_float() * SCORE_SPREAD + bias).floor() as i32;
    score.clamp(MIN_SCORE, MAX_SCORE)
}
