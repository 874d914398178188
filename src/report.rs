//! Text rendering of a simulation run.

use indexmap::IndexMap;
use itertools::Itertools;
use std::fmt::{Display, Formatter, Result};

use crate::final_positions::{KnockoutRound, TournamentOutcome};
use crate::groups::GroupResult;
use crate::play_offs::{BracketPairing, PotName, POT_SIZE};
use crate::qualification::QualificationOutcome;
use crate::tournament::TournamentReport;

impl Display for TournamentReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write_group_rounds(f, &self.groups)?;
        write_group_standings(f, &self.groups)?;
        write!(f, "{}", self.qualification)?;
        writeln!(f)?;
        write!(f, "{}", self.bracket)?;
        writeln!(f)?;
        write!(f, "{}", self.outcome)
    }
}

/// Group matches, round by round.
fn write_group_rounds(f: &mut Formatter<'_>, groups: &IndexMap<&str, GroupResult>) -> Result {
    let rounds = groups.values().map(|g| g.rounds.len()).max().unwrap_or(0);
    for round in 0..rounds {
        writeln!(f, "Group Stage - Round {}:", round + 1)?;
        for (name, group) in groups {
            if let Some(matches) = group.rounds.get(round) {
                writeln!(f, "  Group {name}: {}", matches.iter().join(" "))?;
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

/// Final group tables: wins / losses / points / scored / allowed / difference.
fn write_group_standings(f: &mut Formatter<'_>, groups: &IndexMap<&str, GroupResult>) -> Result {
    for (name, group) in groups {
        writeln!(f, "Group {name}:")?;
        for (i, entry) in group.standings.iter().enumerate() {
            writeln!(f, "  {}. {entry}", i + 1)?;
        }
        writeln!(f)?;
    }
    Ok(())
}

impl Display for QualificationOutcome<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Teams advancing to the knockout stage:")?;
        for (i, entry) in self.advancing.iter().enumerate() {
            writeln!(
                f,
                "{}. {} (Points: {}, Point Difference: {}, Points Scored: {})",
                i + 1,
                entry.team,
                entry.points,
                entry.point_difference,
                entry.points_scored
            )?;
        }

        let entry = &self.eliminated;
        writeln!(f)?;
        writeln!(f, "Team that did not advance:")?;
        writeln!(
            f,
            "{} (Points: {}, Point Difference: {}, Points Scored: {})",
            entry.team, entry.points, entry.point_difference, entry.points_scored
        )
    }
}

impl Display for BracketPairing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for pot in &self.pots {
            let first = pot.name as usize * POT_SIZE + 1;
            writeln!(
                f,
                "Pot {} (teams ranked {} and {}):",
                pot.name,
                first,
                first + 1
            )?;
            for entry in &pot.teams {
                writeln!(f, "  {}", entry.team)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Quarter-Final Draw:")?;
        for (i, (team1, team2)) in self.quarter_finals.iter().enumerate() {
            let pots = if i < 2 {
                (PotName::D, PotName::G)
            } else {
                (PotName::E, PotName::F)
            };
            writeln!(
                f,
                "  Match {}: {} vs {} (pots {}-{})",
                i + 1,
                team1.team,
                team2.team,
                pots.0,
                pots.1
            )?;
        }
        Ok(())
    }
}

impl Display for TournamentOutcome<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for round in KnockoutRound::ALL {
            writeln!(f, "{round}:")?;
            let matches = self.round(round);
            if let [duel] = matches {
                writeln!(f, "  {duel}")?;
            } else {
                for (i, duel) in matches.iter().enumerate() {
                    writeln!(f, "  Match {}: {duel}", i + 1)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "Medals:")?;
        writeln!(f, "  Gold: {}", self.medals.gold)?;
        writeln!(f, "  Silver: {}", self.medals.silver)?;
        writeln!(f, "  Bronze: {}", self.medals.bronze)
    }
}
