use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

use crate::groups::GROUP_SIZE;
use crate::qualification::MIN_GROUPS;

/// A national team taking part in the tournament.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Team {
    /// ISO code of the team. Must be unique across the whole tournament.
    #[serde(rename(deserialize = "ISOCode"), alias = "iso_code")]
    pub iso_code: String,

    /// Name displayed in the results.
    #[serde(rename(deserialize = "Team"), alias = "name")]
    pub name: String,

    /// World ranking of the team. Lower is stronger.
    #[serde(rename(deserialize = "FIBARanking"), alias = "ranking")]
    pub ranking: u32,
}

impl Team {
    #[inline]
    pub fn new(iso_code: impl Into<String>, name: impl Into<String>, ranking: u32) -> Self {
        Team {
            iso_code: iso_code.into(),
            name: name.into(),
            ranking,
        }
    }
}

impl Display for Team {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// The teams of every group, in group order.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct TournamentConfig {
    pub groups: IndexMap<String, Vec<Team>>,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    /// Not enough groups to fill the knockout stage (see [`MIN_GROUPS`]).
    #[error("not enough groups ({0} needed, but {1} were provided)")]
    NotEnoughGroups(usize, usize),
    /// A group doesn't have exactly [`GROUP_SIZE`] teams.
    #[error("group {0} must have {1} teams, but {2} were provided")]
    WrongGroupSize(String, usize, usize),
    /// Two teams share the same ISO code.
    #[error("team {0} appears more than once")]
    DuplicateTeam(String),
    /// The configuration couldn't be parsed.
    #[error("invalid tournament configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TournamentConfig {
    #[inline]
    pub fn new(groups: IndexMap<String, Vec<Team>>) -> Self {
        TournamentConfig { groups }
    }

    /// Parses a configuration from JSON. The result is not validated.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the group count, the group sizes and the uniqueness of the teams.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.len() < MIN_GROUPS {
            return Err(ConfigError::NotEnoughGroups(MIN_GROUPS, self.groups.len()));
        }

        if let Some((name, teams)) = self
            .groups
            .iter()
            .find(|(_, teams)| teams.len() != GROUP_SIZE)
        {
            return Err(ConfigError::WrongGroupSize(
                name.clone(),
                GROUP_SIZE,
                teams.len(),
            ));
        }

        if let Some(iso_code) = self
            .groups
            .values()
            .flatten()
            .map(|team| team.iso_code.as_str())
            .duplicates()
            .next()
        {
            return Err(ConfigError::DuplicateTeam(iso_code.to_owned()));
        }

        Ok(())
    }

    /// Number of teams in the tournament.
    #[inline]
    pub fn team_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
