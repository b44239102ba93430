//! Observation and action spaces.

pub mod space;

use std::fmt;

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

pub use space::Space;

/// A discrete space of integers in [0, n).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discrete {
    n: u32,
}

impl Discrete {
    pub fn new(n: u32) -> Self {
        assert!(n > 0, "Discrete space requires n > 0");
        Self { n }
    }

    pub fn n(&self) -> u32 { self.n }
}

impl Space for Discrete {
    type Element = u32;

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::Element {
        if self.n == 1 { return 0; }
        let dist = Uniform::from(0..self.n);
        dist.sample(rng)
    }

    fn contains(&self, elem: &Self::Element) -> bool { *elem < self.n }
}

impl fmt::Display for Discrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Discrete({})", self.n)
    }
}

/// A space as declared by an environment, with only as much structure as
/// introspection needs. Continuous spaces carry their bounds but no cardinality.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnySpace {
    Discrete(Discrete),
    Box {
        shape: Vec<u32>,
        low: Vec<f64>,
        high: Vec<f64>,
    },
}

impl AnySpace {
    pub fn discrete(n: u32) -> Self { AnySpace::Discrete(Discrete::new(n)) }

    /// Number of elements when the space is finite, `None` otherwise.
    pub fn n(&self) -> Option<u32> {
        match self {
            AnySpace::Discrete(d) => Some(d.n()),
            AnySpace::Box { .. } => None,
        }
    }

    pub fn as_discrete(&self) -> Option<&Discrete> {
        match self {
            AnySpace::Discrete(d) => Some(d),
            AnySpace::Box { .. } => None,
        }
    }
}

impl From<Discrete> for AnySpace {
    fn from(d: Discrete) -> Self { AnySpace::Discrete(d) }
}

impl fmt::Display for AnySpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnySpace::Discrete(d) => d.fmt(f),
            AnySpace::Box { shape, low, high } => {
                write!(f, "Box({low:?}, {high:?}, {shape:?})")
            }
        }
    }
}
