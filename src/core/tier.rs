//! Discrete fit tiers and tier tallies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete fit tier derived from the normalized fit index.
///
/// Declaration order gives the total order `A > B > C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    C,
    B,
    A,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::A, Tier::B, Tier::C];

    /// Classify an index against the two cuts.
    ///
    /// Buckets are right-closed: `(a_cut, inf) -> A`, `(b_cut, a_cut] -> B`,
    /// `(-inf, b_cut] -> C`. An index exactly on a cut falls in the lower tier.
    pub fn from_index(index: f64, a_cut: f64, b_cut: f64) -> Tier {
        if index > a_cut {
            Tier::A
        } else if index > b_cut {
            Tier::B
        } else {
            Tier::C
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-tier family counts. Families without a tier are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub a: usize,
    pub b: usize,
    pub c: usize,
}

impl TierCounts {
    pub fn tally<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = Option<Tier>>,
    {
        tiers.into_iter().flatten().fold(Self::default(), |mut acc, tier| {
            match tier {
                Tier::A => acc.a += 1,
                Tier::B => acc.b += 1,
                Tier::C => acc.c += 1,
            }
            acc
        })
    }

    pub fn get(&self, tier: Tier) -> usize {
        match tier {
            Tier::A => self.a,
            Tier::B => self.b,
            Tier::C => self.c,
        }
    }

    pub fn total(&self) -> usize {
        self.a + self.b + self.c
    }
}
