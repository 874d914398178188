use indexmap::IndexMap;
use itertools::Itertools;
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::groups::GroupResult;
use crate::standings::{compare_entries, StandingsEntry};

/// Number of teams of every group entering the qualification ladder.
pub const LADDER_PLACES: usize = 3;

/// Number of teams advancing to the knockout stage.
pub const ADVANCING_TEAMS: usize = 8;

/// Minimum number of groups needed to fill the knockout stage and eliminate one team.
pub const MIN_GROUPS: usize = (ADVANCING_TEAMS + 1).div_ceil(LADDER_PLACES);

/// The teams advancing to the knockout stage.
#[derive(Serialize, Clone, Debug)]
pub struct QualificationOutcome<'a> {
    /// The advancing teams, best first. The order defines the seeding pots.
    pub advancing: Vec<StandingsEntry<'a>>,

    /// The best team of the ladder which didn't advance.
    pub eliminated: StandingsEntry<'a>,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QualificationError {
    /// Not enough groups to select the advancing teams (see [`MIN_GROUPS`]).
    #[error("not enough groups to select the advancing teams ({0} needed, but {1} were provided)")]
    NotEnoughGroups(usize, usize),
    /// A group has fewer teams than the places entering the ladder.
    #[error("group {0} has only {1} teams")]
    GroupTooSmall(String, usize),
}

/// Selects the teams advancing to the knockout stage.
///
/// The group winners are ranked against each other, then the runners-up, then the third placed
/// teams. The ladder made by the three rankings, in this order, gives the advancing teams; the
/// first team left out is the eliminated one.
pub fn select_qualifiers<'a>(
    groups: &IndexMap<&'a str, GroupResult<'a>>,
) -> Result<QualificationOutcome<'a>, QualificationError> {
    if groups.len() < MIN_GROUPS {
        return Err(QualificationError::NotEnoughGroups(MIN_GROUPS, groups.len()));
    }

    let mut ladder = Vec::with_capacity(LADDER_PLACES * groups.len());
    for place in 0..LADDER_PLACES {
        let finishers = groups
            .iter()
            .map(|(&name, group)| {
                group
                    .standings
                    .get(place)
                    .copied()
                    .ok_or_else(|| {
                        QualificationError::GroupTooSmall(name.to_owned(), group.standings.len())
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ladder.extend(finishers.into_iter().sorted_by(compare_entries));
    }

    let mut ladder = ladder.into_iter();
    let advancing: Vec<_> = ladder.by_ref().take(ADVANCING_TEAMS).collect();
    let Some(eliminated) = ladder.next() else {
        unreachable!("the ladder has at least {} teams", MIN_GROUPS * LADDER_PLACES)
    };

    info!(
        "{} teams advance, {} is eliminated",
        advancing.len(),
        eliminated.team
    );

    Ok(QualificationOutcome {
        advancing,
        eliminated,
    })
}
