//! Decision-making agents driven by the rollout runner.

use crate::core::{GymError, Result};
use crate::spaces::{AnySpace, Discrete, Space};
use crate::utils::rng::{RngStream, rng_from_seed};

/// Anything that maps a Taxi state id to an action id.
///
/// Learning, exploration schedules and any other internal state are the
/// agent's own business; the runner only asks for the next action.
pub trait Agent {
    fn select_action(&mut self, state: u32) -> u32;
}

impl<F> Agent for F
where
    F: FnMut(u32) -> u32,
{
    fn select_action(&mut self, state: u32) -> u32 { self(state) }
}

/// Picks uniformly from a discrete action space, ignoring the state.
pub struct RandomAgent {
    actions: Discrete,
    rng: RngStream,
}

impl RandomAgent {
    pub fn new(num_actions: u32, seed: Option<u64>) -> Self {
        Self { actions: Discrete::new(num_actions), rng: rng_from_seed(seed) }
    }

    /// Build from an environment's declared action space, which must be discrete.
    pub fn for_space(space: &AnySpace, seed: Option<u64>) -> Result<Self> {
        match space.as_discrete() {
            Some(d) if d.n() > 0 => Ok(Self::new(d.n(), seed)),
            _ => Err(GymError::NotSupported(format!(
                "random agent needs a discrete action space, got {space}"
            ))),
        }
    }

    pub fn num_actions(&self) -> u32 { self.actions.n() }
}

impl Agent for RandomAgent {
    fn select_action(&mut self, _state: u32) -> u32 { self.actions.sample(&mut self.rng) }
}
