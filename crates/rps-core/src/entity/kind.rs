//! The three entity kinds and the dominance cycle between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of an entity.
///
/// Dominance is cyclic: Rock beats Scissors, Scissors beats Paper, Paper beats
/// Rock. It is a table lookup, not dispatch, so conversion only ever changes a
/// field on the entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Beats Scissors.
    Rock,
    /// Beats Rock.
    Paper,
    /// Beats Paper.
    Scissors,
}

impl Kind {
    /// All kinds in spawn order.
    pub const ALL: [Kind; 3] = [Kind::Rock, Kind::Paper, Kind::Scissors];

    /// The kind this one converts on contact.
    #[must_use]
    pub const fn prey(self) -> Kind {
        match self {
            Self::Rock => Self::Scissors,
            Self::Scissors => Self::Paper,
            Self::Paper => Self::Rock,
        }
    }

    /// True if `self` strictly dominates `other`.
    ///
    /// ```
    /// use rps_core::entity::Kind;
    ///
    /// assert!(Kind::Rock.beats(Kind::Scissors));
    /// assert!(!Kind::Scissors.beats(Kind::Rock));
    /// assert!(!Kind::Paper.beats(Kind::Paper));
    /// ```
    #[must_use]
    pub const fn beats(self, other: Kind) -> bool {
        self.prey() as u8 == other as u8
    }

    /// Dense index (0 = Rock, 1 = Paper, 2 = Scissors).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`Kind::index`].
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Kind> {
        match index {
            0 => Some(Self::Rock),
            1 => Some(Self::Paper),
            2 => Some(Self::Scissors),
            _ => None,
        }
    }

    /// Capitalized display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rock => "Rock",
            Self::Paper => "Paper",
            Self::Scissors => "Scissors",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
