//! Per-kind population counts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{Entity, Kind};

/// Population of each kind at one tick.
///
/// ```
/// use rps_core::census::Census;
/// use rps_core::entity::Kind;
///
/// let census = Census { rock: 3, paper: 0, scissors: 0 };
/// assert_eq!(census.total(), 3);
/// assert_eq!(census.survivor(), Some(Kind::Rock));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Census {
    /// Rock count
    pub rock: usize,
    /// Paper count
    pub paper: usize,
    /// Scissors count
    pub scissors: usize,
}

impl Census {
    /// Counts the kinds of `entities`.
    pub fn tally<'a, I>(entities: I) -> Self
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let mut census = Self::default();
        for entity in entities {
            census.increment(entity.kind());
        }
        census
    }

    /// Adds one to `kind`.
    pub fn increment(&mut self, kind: Kind) {
        *self.get_mut(kind) += 1;
    }

    /// Count for `kind`.
    #[must_use]
    pub const fn get(&self, kind: Kind) -> usize {
        match kind {
            Kind::Rock => self.rock,
            Kind::Paper => self.paper,
            Kind::Scissors => self.scissors,
        }
    }

    fn get_mut(&mut self, kind: Kind) -> &mut usize {
        match kind {
            Kind::Rock => &mut self.rock,
            Kind::Paper => &mut self.paper,
            Kind::Scissors => &mut self.scissors,
        }
    }

    /// Sum over all kinds.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.rock + self.paper + self.scissors
    }

    /// The surviving kind when the other two counts are both zero.
    ///
    /// Checked in the order Scissors, Paper, Rock, so an empty census reports
    /// Scissors.
    #[must_use]
    pub const fn survivor(&self) -> Option<Kind> {
        if self.rock == 0 && self.paper == 0 {
            Some(Kind::Scissors)
        } else if self.rock == 0 && self.scissors == 0 {
            Some(Kind::Paper)
        } else if self.paper == 0 && self.scissors == 0 {
            Some(Kind::Rock)
        } else {
            None
        }
    }
}

impl fmt::Display for Census {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rock={} paper={} scissors={}",
            self.rock, self.paper, self.scissors
        )
    }
}
