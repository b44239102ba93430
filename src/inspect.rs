//! Environment introspection: space cardinalities and reward bounds.

use std::fmt;
use std::io::{self, Write};

use crate::core::{Introspect, Result};
use crate::spaces::AnySpace;

/// Reward bounds of Taxi-v3: -10 for an illegal pickup/drop-off, +20 for a delivery.
///
/// Only valid as a fallback for the Taxi family; other environments should pass
/// their own bounds to [`inspect`].
pub const TAXI_REWARD_RANGE: (f64, f64) = (-10.0, 20.0);

/// Summary of an environment's declared spaces and reward bounds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnvironmentDescriptor {
    pub observation_space: AnySpace,
    pub action_space: AnySpace,
    pub num_observations: Option<u32>,
    pub num_actions: Option<u32>,
    pub reward_range: (f64, f64),
    /// True when the environment declared no reward range and the fallback was used.
    pub reward_range_defaulted: bool,
}

impl EnvironmentDescriptor {
    /// `(num_observations, num_actions)`, for sizing tables keyed by state and action.
    pub fn cardinalities(&self) -> (Option<u32>, Option<u32>) {
        (self.num_observations, self.num_actions)
    }
}

struct Count(Option<u32>);

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(n) => write!(f, "{n}"),
            None => f.write_str("unknown"),
        }
    }
}

impl fmt::Display for EnvironmentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Observation space: {}", self.observation_space)?;
        writeln!(f, "Number of observations: {}", Count(self.num_observations))?;
        writeln!(f, "Action space: {}", self.action_space)?;
        writeln!(f, "Number of actions: {}", Count(self.num_actions))?;
        let (lo, hi) = self.reward_range;
        write!(f, "Reward range: ({lo}, {hi})")?;
        if self.reward_range_defaulted {
            f.write_str(" (default)")?;
        }
        Ok(())
    }
}

/// Follow a wrapper down to the environment it decorates.
pub fn resolve_base(env: &dyn Introspect) -> &dyn Introspect {
    env.unwrapped().unwrap_or(env)
}

/// Describe an environment, substituting `fallback_reward_range` when it declares no reward range.
pub fn inspect(env: &dyn Introspect, fallback_reward_range: (f64, f64)) -> EnvironmentDescriptor {
    let base = resolve_base(env);
    let observation_space = base.observation_space();
    let action_space = base.action_space();
    let (reward_range, reward_range_defaulted) = match base.reward_range() {
        Some(range) => (range, false),
        None => (fallback_reward_range, true),
    };
    EnvironmentDescriptor {
        num_observations: observation_space.n(),
        num_actions: action_space.n(),
        observation_space,
        action_space,
        reward_range,
        reward_range_defaulted,
    }
}

/// Describe a Taxi environment and write the summary to `out`.
pub fn describe_environment_to<W: Write>(env: &dyn Introspect, out: &mut W) -> Result<EnvironmentDescriptor> {
    let descriptor = inspect(env, TAXI_REWARD_RANGE);
    writeln!(out, "{descriptor}")?;
    tracing::debug!(
        num_observations = ?descriptor.num_observations,
        num_actions = ?descriptor.num_actions,
        defaulted = descriptor.reward_range_defaulted,
        "inspected environment"
    );
    Ok(descriptor)
}

/// Describe a Taxi environment and print the summary to stdout.
pub fn describe_environment(env: &dyn Introspect) -> Result<EnvironmentDescriptor> {
    describe_environment_to(env, &mut io::stdout().lock())
}
