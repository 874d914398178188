use indexmap::IndexMap;
use log::{debug, info};
use serde::Serialize;
use std::marker::PhantomData;
use thiserror::Error;

use crate::matches::{simulate_match, MatchResult};
use crate::standings::{rank_entries, StandingsEntry};
use crate::team::{Team, TournamentConfig};
use crate::traits::RandomSource;

/// Number of teams per group.
pub const GROUP_SIZE: usize = 4;

/// A scheduled group match which has not been played yet.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupFixture<'a> {
    /// Index of the round of this fixture (starting from 0).
    pub round: usize,
    pub team_a: &'a Team,
    pub team_b: &'a Team,

    #[serde(skip)]
    _phantom: PhantomData<()>,
}

/// A round-robin schedule of a group.
#[derive(Serialize, Clone, Debug)]
pub struct Schedule<'a> {
    /// The teams of the group, in their original order.
    pub roster: Vec<&'a Team>,

    /// The fixtures of the group, divided in rounds.
    pub rounds: Vec<Vec<GroupFixture<'a>>>,
}

/// A played group.
#[derive(Serialize, Clone, Debug)]
pub struct GroupResult<'a> {
    /// The standings of the group, the best team first.
    pub standings: Vec<StandingsEntry<'a>>,

    /// The results of the group matches, divided in rounds.
    pub rounds: Vec<Vec<MatchResult<'a>>>,
}

impl GroupResult<'_> {
    /// Returns whether the team played in this group.
    #[inline]
    pub fn contains(&self, team: &Team) -> bool {
        self.standings
            .iter()
            .any(|entry| entry.team.iso_code == team.iso_code)
    }
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScheduleError {
    /// A round-robin needs an even number of teams, at least 2.
    #[error("cannot schedule a round-robin for {0} teams (an even number, at least 2, is needed)")]
    InvalidTeamCount(usize),
    /// An error occurred while simulating a group.
    #[error("an error occurred while simulating a group: {0}")]
    InternalError(&'static str),
}

/// Generates a round-robin schedule using the circle method.
///
/// The first team stays fixed while the others rotate by one position every round. Every team
/// plays every other team exactly once and never twice in the same round.
pub fn schedule_round_robin(teams: &[Team]) -> Result<Schedule<'_>, ScheduleError> {
    let size = teams.len();
    if size < 2 || size % 2 != 0 {
        return Err(ScheduleError::InvalidTeamCount(size));
    }

    let roster: Vec<&Team> = teams.iter().collect();
    let mut rotation = roster.clone();
    let rounds: Vec<Vec<_>> = (0..size - 1)
        .map(|round| {
            let fixtures: Vec<_> = (0..size / 2)
                .map(|i| GroupFixture {
                    round,
                    team_a: rotation[i],
                    team_b: rotation[size - 1 - i],
                    _phantom: PhantomData,
                })
                .collect();
            rotation[1..].rotate_right(1);
            fixtures
        })
        .collect();

    Ok(Schedule { roster, rounds })
}

/// Plays every fixture of a schedule, in order, and ranks the teams.
pub fn simulate_group<'a>(
    schedule: &Schedule<'a>,
    rng: &mut impl RandomSource,
) -> Result<GroupResult<'a>, ScheduleError> {
    let mut standings: Vec<_> = schedule
        .roster
        .iter()
        .map(|&team| StandingsEntry::new(team))
        .collect();

    let mut rounds = Vec::with_capacity(schedule.rounds.len());
    for fixtures in &schedule.rounds {
        let mut results = Vec::with_capacity(fixtures.len());
        for fixture in fixtures {
            let result = simulate_match(fixture.team_a, fixture.team_b, rng);

            entry_of(&mut standings, fixture.team_a)?.record(result.score_a, result.score_b);
            entry_of(&mut standings, fixture.team_b)?.record(result.score_b, result.score_a);

            results.push(result);
        }
        rounds.push(results);
    }

    for entry in &mut standings {
        entry.award_points();
    }
    rank_entries(&mut standings);

    Ok(GroupResult { standings, rounds })
}

/// Schedules and plays every group of the tournament, in configuration order.
///
/// All the groups are scheduled before any match is played, so an invalid group
/// fails the stage without consuming randomness.
pub fn simulate_group_stage<'a>(
    config: &'a TournamentConfig,
    rng: &mut impl RandomSource,
) -> Result<IndexMap<&'a str, GroupResult<'a>>, ScheduleError> {
    let schedules = config
        .groups
        .iter()
        .map(|(name, teams)| Ok((name.as_str(), schedule_round_robin(teams)?)))
        .collect::<Result<Vec<_>, ScheduleError>>()?;

    info!("simulating {} groups", schedules.len());

    schedules
        .into_iter()
        .map(|(name, schedule)| {
            let result = simulate_group(&schedule, rng)?;
            debug!(
                "group {name} won by {}",
                result.standings.first().map_or("nobody", |e| e.team.name.as_str())
            );
            Ok((name, result))
        })
        .collect()
}

#[inline]
fn entry_of<'e, 'a>(
    standings: &'e mut [StandingsEntry<'a>],
    team: &Team,
) -> Result<&'e mut StandingsEntry<'a>, ScheduleError> {
    standings
        .iter_mut()
        .find(|entry| entry.team.iso_code == team.iso_code)
        .ok_or(ScheduleError::InternalError("fixture team is not in the roster"))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gen_seed;
    use crate::test_utils::{config, rng, team};
    use itertools::Itertools;
    use std::collections::HashSet;

    fn teams(size: usize) -> Vec<Team> {
        (0..size).map(|i| team(&format!("T{i}"), i as u32 + 1)).collect()
    }

    fn pair_key(t1: &Team, t2: &Team) -> (String, String) {
        if t1.iso_code < t2.iso_code {
            (t1.iso_code.clone(), t2.iso_code.clone())
        } else {
            (t2.iso_code.clone(), t1.iso_code.clone())
        }
    }

    #[test]
    fn test_four_teams_schedule() {
        let teams = teams(GROUP_SIZE);
        let schedule = schedule_round_robin(&teams).unwrap();

        assert_eq!(schedule.rounds.len(), 3);
        assert!(schedule.rounds.iter().all(|round| round.len() == 2));

        let played: Vec<_> = schedule
            .rounds
            .iter()
            .flatten()
            .map(|f| pair_key(f.team_a, f.team_b))
            .collect();
        let expected: HashSet<_> = teams
            .iter()
            .tuple_combinations()
            .map(|(t1, t2)| pair_key(t1, t2))
            .collect();
        assert_eq!(played.len(), 6);
        assert_eq!(played.iter().cloned().collect::<HashSet<_>>(), expected);

        // The roster is never rotated
        let roster: Vec<_> = schedule.roster.iter().map(|t| t.iso_code.as_str()).collect();
        assert_eq!(roster, ["T0", "T1", "T2", "T3"]);

        // Circle method: the first team meets the last team of the rotation
        let first_round: Vec<_> = schedule.rounds[0]
            .iter()
            .map(|f| (f.team_a.iso_code.as_str(), f.team_b.iso_code.as_str()))
            .collect();
        assert_eq!(first_round, [("T0", "T3"), ("T1", "T2")]);
    }

    #[test]
    fn test_large_schedules() {
        for size in (2..=20).step_by(2) {
            let teams = teams(size);
            let schedule = schedule_round_robin(&teams).unwrap();
            assert_eq!(schedule.rounds.len(), size - 1);

            let mut pairs = HashSet::new();
            for (i, round) in schedule.rounds.iter().enumerate() {
                assert_eq!(round.len(), size / 2);
                let mut in_round = HashSet::new();
                for fixture in round {
                    assert_eq!(fixture.round, i);
                    assert_ne!(fixture.team_a, fixture.team_b);
                    assert!(in_round.insert(&fixture.team_a.iso_code));
                    assert!(in_round.insert(&fixture.team_b.iso_code));
                    assert!(pairs.insert(pair_key(fixture.team_a, fixture.team_b)));
                }
            }
            assert_eq!(pairs.len(), size * (size - 1) / 2);
        }
    }

    #[test]
    fn test_invalid_schedules() {
        for size in [0, 1, 3, 5] {
            assert!(matches!(
                schedule_round_robin(&teams(size)),
                Err(ScheduleError::InvalidTeamCount(s)) if s == size
            ));
        }
    }

    #[test]
    fn test_group_standings() {
        let teams = teams(GROUP_SIZE);
        let schedule = schedule_round_robin(&teams).unwrap();

        for _ in 0..50 {
            let group = simulate_group(&schedule, &mut rng(gen_seed())).unwrap();

            assert_eq!(group.standings.len(), GROUP_SIZE);
            assert_eq!(group.rounds.len(), GROUP_SIZE - 1);
            for entry in &group.standings {
                assert_eq!(entry.matches_played(), GROUP_SIZE as u32 - 1);
                assert_eq!(entry.points, entry.wins * 2);
                assert_eq!(entry.point_difference, entry.points_scored - entry.points_allowed);
                assert!(group.contains(entry.team));
            }

            let total_wins: u32 = group.standings.iter().map(|e| e.wins).sum();
            assert_eq!(total_wins, 6);

            for pair in group.standings.windows(2) {
                assert!(crate::standings::compare_entries(&pair[0], &pair[1]).is_le());
            }
        }
    }

    #[test]
    fn test_group_stage() {
        let config = config(9);
        let results = simulate_group_stage(&config, &mut rng(gen_seed())).unwrap();

        assert_eq!(results.len(), 9);
        assert_eq!(results.keys().next(), Some(&"A"));
        for (name, group) in &results {
            assert!(group
                .standings
                .iter()
                .all(|e| e.team.iso_code.starts_with(name)));
        }
    }

    #[test]
    fn test_group_stage_rejects_odd_groups() {
        let mut config = config(3);
        config.groups["C"].pop();
        assert!(matches!(
            simulate_group_stage(&config, &mut rng(gen_seed())),
            Err(ScheduleError::InvalidTeamCount(3))
        ));
    }

    #[test]
    fn test_reproducibility() {
        let config = config(3);

        // Execute a bunch of times to test against different seeds
        for _ in 0..20 {
            let seed = gen_seed();
            let expected = simulate_group_stage(&config, &mut rng(seed)).unwrap();
            let scores = |results: &IndexMap<&str, GroupResult>| {
                results
                    .values()
                    .flat_map(|g| g.rounds.iter().flatten())
                    .map(|m| (m.score_a, m.score_b))
                    .collect::<Vec<_>>()
            };

            for _ in 0..10 {
                let again = simulate_group_stage(&config, &mut rng(seed)).unwrap();
                assert_eq!(scores(&again), scores(&expected));
            }
        }
    }

    #[test]
    fn test_group_winners_record() {
        let config = config(9);
        let mut rng = rng(gen_seed());

        let (mut wins, mut losses) = (0, 0);
        for _ in 0..100 {
            let results = simulate_group_stage(&config, &mut rng).unwrap();
            for group in results.values() {
                let winner = &group.standings[0];
                wins += winner.wins;
                losses += winner.losses;
            }
        }
        assert!(wins >= losses, "group winners: {wins} wins, {losses} losses");
    }
}
