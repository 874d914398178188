use serde::Serialize;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

use crate::team::Team;

/// Points awarded for a win. A loss is worth nothing.
pub const POINTS_PER_WIN: u32 = 2;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
/// Statistics of a team in the group stage.
pub struct StandingsEntry<'a> {
    pub team: &'a Team,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub points_scored: i32,
    pub points_allowed: i32,
    pub point_difference: i32,
}

impl<'a> StandingsEntry<'a> {
    #[inline]
    pub fn new(team: &'a Team) -> Self {
        StandingsEntry {
            team,
            wins: 0,
            losses: 0,
            points: 0,
            points_scored: 0,
            points_allowed: 0,
            point_difference: 0,
        }
    }

    /// Records a played match. Points are not updated until [`StandingsEntry::award_points`] is called.
    pub fn record(&mut self, scored: i32, allowed: i32) {
        if scored > allowed {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.points_scored += scored;
        self.points_allowed += allowed;
        self.point_difference = self.points_scored - self.points_allowed;
    }

    #[inline]
    pub fn award_points(&mut self) {
        self.points = self.wins * POINTS_PER_WIN;
    }

    #[inline]
    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }
}

impl Display for StandingsEntry<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} / {} / {} / {} / {} / {:+}",
            self.team,
            self.wins,
            self.losses,
            self.points,
            self.points_scored,
            self.points_allowed,
            self.point_difference,
        )
    }
}

/// Compares two entries, the better one first.
///
/// Entries are compared by points, then point difference, then points scored.
/// Entries equal on all three keys compare as equal.
#[inline]
pub fn compare_entries(entry1: &StandingsEntry, entry2: &StandingsEntry) -> Ordering {
    entry1
        .points
        .cmp(&entry2.points)
        .then(entry1.point_difference.cmp(&entry2.point_difference))
        .then(entry1.points_scored.cmp(&entry2.points_scored))
        .reverse()
}

/// Ranks the entries, the best one first. Equal entries keep their relative order.
#[inline]
pub fn rank_entries(entries: &mut [StandingsEntry]) {
    entries.sort_by(compare_entries);
}
