use indexmap::IndexMap;
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::final_positions::{play_knockout_stage, TournamentOutcome};
use crate::groups::{simulate_group_stage, GroupResult, ScheduleError};
use crate::play_offs::{build_bracket, BracketPairing, PairingError, PairingStrategy};
use crate::qualification::{select_qualifiers, QualificationError, QualificationOutcome};
use crate::team::{ConfigError, TournamentConfig};
use crate::traits::RandomSource;
use crate::{RandGen, Seeder};

/// Everything produced by a simulation run.
#[derive(Serialize, Debug)]
pub struct TournamentReport<'a> {
    /// The played groups, in configuration order.
    pub groups: IndexMap<&'a str, GroupResult<'a>>,
    pub qualification: QualificationOutcome<'a>,
    pub bracket: BracketPairing<'a>,
    pub outcome: TournamentOutcome<'a>,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TournamentError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Qualification(#[from] QualificationError),
    #[error(transparent)]
    Pairing(#[from] PairingError),
}

#[derive(Debug)]
/// Simulation builder.
pub struct Simulation<'a> {
    config: &'a TournamentConfig,
    pairing_strategy: PairingStrategy,
}

impl<'a> Simulation<'a> {
    #[inline]
    /// Creates a new `Simulation` of the provided tournament.
    pub fn new(config: &'a TournamentConfig) -> Self {
        Self {
            config,
            pairing_strategy: PairingStrategy::default(),
        }
    }

    #[inline]
    /// Sets how the quarter-finals are drawn.
    pub fn pairing_strategy(mut self, pairing_strategy: PairingStrategy) -> Self {
        self.pairing_strategy = pairing_strategy;
        self
    }

    #[inline]
    /// Runs the simulation. The same seed always produces the same report.
    pub fn evaluate(self, mut seeder: Seeder) -> Result<TournamentReport<'a>, TournamentError> {
        let mut rng: RandGen = seeder.make_rng();
        simulate_tournament(self.config, self.pairing_strategy, &mut rng)
    }
}

/// Runs a whole tournament: group stage, qualification, draw and knockout stage.
///
/// The configuration is validated first, so an invalid configuration fails without
/// producing any result. Randomness is consumed in a fixed order: group matches in schedule
/// order, then the draw, then the knockout matches in bracket order.
pub fn simulate_tournament<'a>(
    config: &'a TournamentConfig,
    pairing_strategy: PairingStrategy,
    rng: &mut impl RandomSource,
) -> Result<TournamentReport<'a>, TournamentError> {
    config.validate()?;
    info!(
        "simulating a tournament of {} teams in {} groups",
        config.team_count(),
        config.groups.len()
    );

    let groups = simulate_group_stage(config, rng)?;
    let qualification = select_qualifiers(&groups)?;

    info!("drawing the quarter-finals ({pairing_strategy:?})");
    let bracket = build_bracket(&qualification.advancing, &groups, pairing_strategy, rng)?;
    let outcome = play_knockout_stage(&bracket, rng);

    Ok(TournamentReport {
        groups,
        qualification,
        bracket,
        outcome,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::config;
    use crate::{gen_seed, gen_seeder};

    #[test]
    fn test_tournament() {
        let config = config(9);
        for _ in 0..50 {
            let report = Simulation::new(&config)
                .pairing_strategy(PairingStrategy::Backtracking)
                .evaluate(gen_seeder())
                .unwrap();

            assert_eq!(report.groups.len(), 9);
            assert_eq!(report.qualification.advancing.len(), 8);
            assert!(!report
                .qualification
                .advancing
                .contains(&report.qualification.eliminated));

            let advancing: Vec<_> = report.qualification.advancing.iter().map(|e| e.team).collect();
            let medals = report.outcome.medals;
            for medalist in [medals.gold, medals.silver, medals.bronze] {
                assert!(advancing.contains(&medalist));
            }
        }
    }

    #[test]
    fn test_invalid_config() {
        let mut config = config(3);
        config.groups["A"].pop();

        assert!(matches!(
            Simulation::new(&config).evaluate(gen_seeder()),
            Err(TournamentError::Config(ConfigError::WrongGroupSize(..)))
        ));

        assert!(matches!(
            Simulation::new(&crate::test_utils::config(2)).evaluate(gen_seeder()),
            Err(TournamentError::Config(ConfigError::NotEnoughGroups(3, 2)))
        ));
    }

    #[test]
    fn test_reproducibility() {
        let config = config(9);

        // Execute a bunch of times to test against different seeds
        for _ in 0..20 {
            let seed = gen_seed();
            let expected = Simulation::new(&config)
                .evaluate(Seeder::from(seed))
                .map(|report| serde_json::to_string(&report).unwrap())
                .map_err(|err| err.to_string());

            for _ in 0..10 {
                let report = Simulation::new(&config)
                    .evaluate(Seeder::from(seed))
                    .map(|report| serde_json::to_string(&report).unwrap())
                    .map_err(|err| err.to_string());
                assert_eq!(report, expected);
            }
        }
    }

    #[test]
    fn test_string_seeds() {
        let config = config(3);
        let run = |seed: &str| {
            Simulation::new(&config)
                .pairing_strategy(PairingStrategy::Backtracking)
                .evaluate(Seeder::from(seed))
                .map(|report| serde_json::to_string(&report).unwrap())
                .unwrap()
        };

        assert_eq!(run("olympics"), run("olympics"));
    }
}
