use log::info;
use serde::Serialize;
use std::fmt::{Display, Formatter};

use crate::matches::{simulate_knockout_match, MatchResult};
use crate::play_offs::{BracketPairing, QUARTER_FINALS};
use crate::team::Team;
use crate::traits::RandomSource;

/// Number of semi-finals.
pub const SEMI_FINALS: usize = QUARTER_FINALS / 2;

/// A round of the knockout stage, in playing order.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KnockoutRound {
    QuarterFinals,
    SemiFinals,
    ThirdPlace,
    Final,
}

impl KnockoutRound {
    pub const ALL: [KnockoutRound; 4] = [
        KnockoutRound::QuarterFinals,
        KnockoutRound::SemiFinals,
        KnockoutRound::ThirdPlace,
        KnockoutRound::Final,
    ];
}

impl Display for KnockoutRound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            KnockoutRound::QuarterFinals => "Quarter-Finals",
            KnockoutRound::SemiFinals => "Semi-Finals",
            KnockoutRound::ThirdPlace => "Third-Place Match",
            KnockoutRound::Final => "Final",
        };
        f.write_str(name)
    }
}

/// The medalists of the tournament.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Medals<'a> {
    pub gold: &'a Team,
    pub silver: &'a Team,
    pub bronze: &'a Team,
}

/// The results of the knockout stage.
#[derive(Serialize, Clone, Debug)]
pub struct TournamentOutcome<'a> {
    pub quarter_finals: [MatchResult<'a>; QUARTER_FINALS],
    pub semi_finals: [MatchResult<'a>; SEMI_FINALS],
    pub third_place: MatchResult<'a>,
    pub final_match: MatchResult<'a>,
    pub medals: Medals<'a>,
}

impl<'a> TournamentOutcome<'a> {
    /// The matches of a round, in bracket order.
    pub fn round(&self, round: KnockoutRound) -> &[MatchResult<'a>] {
        match round {
            KnockoutRound::QuarterFinals => &self.quarter_finals,
            KnockoutRound::SemiFinals => &self.semi_finals,
            KnockoutRound::ThirdPlace => std::slice::from_ref(&self.third_place),
            KnockoutRound::Final => std::slice::from_ref(&self.final_match),
        }
    }
}

/// Plays the knockout stage.
///
/// The winners of the first two quarter-finals meet in the first semi-final, the winners of the
/// other two in the second one. The semi-final losers play the third place match, then the
/// winners play the final.
pub fn play_knockout_stage<'a>(
    bracket: &BracketPairing<'a>,
    rng: &mut impl RandomSource,
) -> TournamentOutcome<'a> {
    info!("playing the {}", KnockoutRound::QuarterFinals);
    let quarter_finals = bracket
        .quarter_finals
        .map(|(team1, team2)| simulate_knockout_match(team1.team, team2.team, rng));

    info!("playing the {}", KnockoutRound::SemiFinals);
    let [qf1, qf2, qf3, qf4] = &quarter_finals;
    let semi_finals = [
        simulate_knockout_match(qf1.winner, qf2.winner, rng),
        simulate_knockout_match(qf3.winner, qf4.winner, rng),
    ];

    let [sf1, sf2] = &semi_finals;
    info!("playing the {}", KnockoutRound::ThirdPlace);
    let third_place = simulate_knockout_match(sf1.loser, sf2.loser, rng);
    info!("playing the {}", KnockoutRound::Final);
    let final_match = simulate_knockout_match(sf1.winner, sf2.winner, rng);

    let medals = Medals {
        gold: final_match.winner,
        silver: final_match.loser,
        bronze: third_place.winner,
    };
    info!(
        "gold: {}, silver: {}, bronze: {}",
        medals.gold, medals.silver, medals.bronze
    );

    TournamentOutcome {
        quarter_finals,
        semi_finals,
        third_place,
        final_match,
        medals,
    }
}
