use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::groups::GroupResult;
use crate::qualification::ADVANCING_TEAMS;
use crate::standings::StandingsEntry;
use crate::traits::RandomSource;

/// Number of teams in a seeding pot.
pub const POT_SIZE: usize = 2;

/// Number of quarter-finals.
pub const QUARTER_FINALS: usize = ADVANCING_TEAMS / 2;

/// Name of a seeding pot.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PotName {
    /// Teams ranked 1st and 2nd.
    D,
    /// Teams ranked 3rd and 4th.
    E,
    /// Teams ranked 5th and 6th.
    F,
    /// Teams ranked 7th and 8th.
    G,
}

impl PotName {
    pub const ALL: [PotName; 4] = [PotName::D, PotName::E, PotName::F, PotName::G];
}

impl Display for PotName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PotName::D => "D",
            PotName::E => "E",
            PotName::F => "F",
            PotName::G => "G",
        };
        f.write_str(name)
    }
}

/// A seeding pot.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pot<'a> {
    pub name: PotName,
    pub teams: [StandingsEntry<'a>; POT_SIZE],
}

/// How opponents are drawn between two pots.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PairingStrategy {
    /// Every team draws its opponent in pot order, and the draw fails as soon as a team has no
    /// valid opponent left.
    #[default]
    FailFast,
    /// Like [`PairingStrategy::FailFast`], but a dead end undoes the previous draws and tries the
    /// other opponents. Fails only if no valid pairing exists at all.
    Backtracking,
}

/// A quarter-final: a team of the stronger pot against a team of the weaker pot.
pub type QuarterFinal<'a> = (StandingsEntry<'a>, StandingsEntry<'a>);

/// The knockout bracket.
#[derive(Serialize, Clone, Debug)]
pub struct BracketPairing<'a> {
    /// The seeding pots, in [`PotName::ALL`] order.
    pub pots: [Pot<'a>; 4],

    /// The quarter-finals: the D-G pairs first, then the E-F pairs.
    pub quarter_finals: [QuarterFinal<'a>; QUARTER_FINALS],
}

impl<'a> BracketPairing<'a> {
    #[inline]
    pub fn pot(&self, name: PotName) -> &Pot<'a> {
        &self.pots[name as usize]
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PairingError {
    /// The knockout stage needs exactly [`ADVANCING_TEAMS`] teams.
    #[error("wrong number of teams for the knockout stage ({0} needed, but {1} were provided)")]
    WrongTeamCount(usize, usize),
    /// An advancing team didn't play in any group.
    #[error("team {0} didn't play in any group")]
    UnknownTeam(String),
    /// Every opponent left for a team played in its group.
    #[error("no valid opponent left in pot {1} for team {0}")]
    NoValidOpponent(String, PotName),
    /// Two pots can't be paired without a rematch of a group match.
    #[error("pots {0} and {1} can't be paired without a group stage rematch")]
    NoValidPairing(PotName, PotName),
    /// An error occurred while building the bracket.
    #[error("an error occurred while building the bracket: {0}")]
    InternalError(&'static str),
}

/// Divides the advancing teams in pots and draws the quarter-finals.
///
/// Pot D is paired with pot G and pot E with pot F. Two teams of the same group never meet.
pub fn build_bracket<'a>(
    advancing: &[StandingsEntry<'a>],
    groups: &IndexMap<&'a str, GroupResult<'a>>,
    strategy: PairingStrategy,
    rng: &mut impl RandomSource,
) -> Result<BracketPairing<'a>, PairingError> {
    if advancing.len() != ADVANCING_TEAMS {
        return Err(PairingError::WrongTeamCount(
            ADVANCING_TEAMS,
            advancing.len(),
        ));
    }

    let pots = PotName::ALL.map(|name| {
        let first = name as usize * POT_SIZE;
        Pot {
            name,
            teams: [advancing[first], advancing[first + 1]],
        }
    });

    let [pot_d, pot_e, pot_f, pot_g] = &pots;
    let mut quarter_finals = Vec::with_capacity(QUARTER_FINALS);
    for (first, second) in [(pot_d, pot_g), (pot_e, pot_f)] {
        quarter_finals.extend(pair_pots(first, second, groups, strategy, rng)?);
    }

    let quarter_finals = quarter_finals
        .try_into()
        .map_err(|_| PairingError::InternalError("wrong number of quarter-finals"))?;

    Ok(BracketPairing {
        pots,
        quarter_finals,
    })
}

fn pair_pots<'a>(
    first: &Pot<'a>,
    second: &Pot<'a>,
    groups: &IndexMap<&'a str, GroupResult<'a>>,
    strategy: PairingStrategy,
    rng: &mut impl RandomSource,
) -> Result<Vec<QuarterFinal<'a>>, PairingError> {
    let first_groups = pot_groups(first, groups)?;
    let second_groups = pot_groups(second, groups)?;

    let opponents = match strategy {
        PairingStrategy::FailFast => draw_fail_fast(&first_groups, &second_groups, rng)
            .map_err(|i| {
                PairingError::NoValidOpponent(first.teams[i].team.iso_code.clone(), second.name)
            })?,
        PairingStrategy::Backtracking => {
            let mut used = [false; POT_SIZE];
            let mut picks = Vec::with_capacity(POT_SIZE);
            if !draw_backtracking(&first_groups, &second_groups, &mut used, &mut picks, rng) {
                return Err(PairingError::NoValidPairing(first.name, second.name));
            }
            picks
        }
    };

    Ok(first
        .teams
        .iter()
        .zip(opponents)
        .map(|(&team, opponent)| {
            let opponent = second.teams[opponent];
            debug!("pot {} draw: {} vs {}", first.name, team.team, opponent.team);
            (team, opponent)
        })
        .collect())
}

/// The group of origin of every team of the pot.
fn pot_groups<'a>(
    pot: &Pot,
    groups: &IndexMap<&'a str, GroupResult>,
) -> Result<Vec<&'a str>, PairingError> {
    pot.teams
        .iter()
        .map(|entry| {
            groups
                .iter()
                .find(|(_, group)| group.contains(entry.team))
                .map(|(&name, _)| name)
                .ok_or_else(|| PairingError::UnknownTeam(entry.team.iso_code.clone()))
        })
        .collect()
}

/// Indexes of the opponents not drawn yet which didn't play in `group`.
#[inline]
fn eligible_opponents(group: &str, opponent_groups: &[&str], used: &[bool]) -> Vec<usize> {
    opponent_groups
        .iter()
        .enumerate()
        .filter(|&(i, &opponent_group)| !used[i] && opponent_group != group)
        .map(|(i, _)| i)
        .collect()
}

/// Removes a random candidate from the list and returns it.
#[inline]
fn draw(candidates: &mut Vec<usize>, rng: &mut impl RandomSource) -> usize {
    let index = rng.next_int(0, candidates.len() as i32 - 1) as usize;
    candidates.remove(index)
}

/// Returns the opponent index drawn by every team, or the index of the first team left without
/// a valid opponent.
fn draw_fail_fast(
    groups: &[&str],
    opponent_groups: &[&str],
    rng: &mut impl RandomSource,
) -> Result<Vec<usize>, usize> {
    let mut used = vec![false; opponent_groups.len()];
    groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let mut candidates = eligible_opponents(group, opponent_groups, &used);
            if candidates.is_empty() {
                return Err(i);
            }
            let opponent = draw(&mut candidates, rng);
            used[opponent] = true;
            Ok(opponent)
        })
        .collect()
}

/// Depth-first search over the draws. The first path explored makes the same draws as
/// [`draw_fail_fast`].
fn draw_backtracking(
    groups: &[&str],
    opponent_groups: &[&str],
    used: &mut [bool],
    picks: &mut Vec<usize>,
    rng: &mut impl RandomSource,
) -> bool {
    let Some(group) = groups.get(picks.len()) else {
        return true;
    };

    let mut candidates = eligible_opponents(group, opponent_groups, used);
    while !candidates.is_empty() {
        let opponent = draw(&mut candidates, rng);
        used[opponent] = true;
        picks.push(opponent);

        if draw_backtracking(groups, opponent_groups, used, picks, rng) {
            return true;
        }

        debug!("dead end in the draw, backtracking");
        picks.pop();
        used[opponent] = false;
    }

    false
}
