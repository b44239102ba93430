// Wrappers: decorate an Env while keeping the base environment reachable.
//
// Provided wrappers:
// - TimeLimit
// - ClipReward
//
// Both forward `Introspect::unwrapped` to the innermost environment, so the
// inspector sees the base spaces rather than a wrapper's view.

use crate::core::{Env, Info, Introspect, RenderFrame, Result, Step};
use crate::spaces::AnySpace;

/// The innermost environment beneath `inner`, or `inner` itself when it is not a wrapper.
fn innermost<E: Introspect>(inner: &E) -> &dyn Introspect {
    match inner.unwrapped() {
        Some(base) => base,
        None => inner,
    }
}

/// A wrapper that enforces a maximum number of steps per episode, marking truncation when exceeded.
pub struct TimeLimit<E: Env> {
    inner: E,
    max_steps: u32,
    steps: u32,
}

impl<E: Env> TimeLimit<E> {
    pub fn new(inner: E, max_steps: u32) -> Self {
        Self { inner, max_steps, steps: 0 }
    }

    pub fn max_steps(&self) -> u32 { self.max_steps }
    pub fn elapsed_steps(&self) -> u32 { self.steps }

    pub fn inner(&self) -> &E { &self.inner }
}

impl<E: Env> Env for TimeLimit<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> {
        self.steps = 0;
        self.inner.reset(seed)
    }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        self.steps += 1;
        if !s.terminated && !s.truncated && self.steps >= self.max_steps {
            s.truncated = true;
        }
        Ok(s)
    }

    fn render(&self) -> Result<Option<RenderFrame>> { self.inner.render() }
    fn close(&mut self) -> Result<()> { self.inner.close() }
}

impl<E: Env + Introspect> Introspect for TimeLimit<E> {
    fn observation_space(&self) -> AnySpace { self.inner.observation_space() }
    fn action_space(&self) -> AnySpace { self.inner.action_space() }
    fn reward_range(&self) -> Option<(f64, f64)> { self.inner.reward_range() }
    fn unwrapped(&self) -> Option<&dyn Introspect> { Some(innermost(&self.inner)) }
}

/// ClipReward clamps rewards into [min, max] and reports that range as its own.
pub struct ClipReward<E: Env> {
    inner: E,
    min: f64,
    max: f64,
}

impl<E: Env> ClipReward<E> {
    pub fn new(inner: E, min: f64, max: f64) -> Self {
        assert!(min <= max, "ClipReward requires min <= max");
        Self { inner, min, max }
    }
}

impl<E: Env> Env for ClipReward<E> {
    type Obs = E::Obs;
    type Act = E::Act;

    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)> { self.inner.reset(seed) }

    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>> {
        let mut s = self.inner.step(action)?;
        s.reward = s.reward.clamp(self.min, self.max);
        Ok(s)
    }

    fn render(&self) -> Result<Option<RenderFrame>> { self.inner.render() }
    fn close(&mut self) -> Result<()> { self.inner.close() }
}

impl<E: Env + Introspect> Introspect for ClipReward<E> {
    fn observation_space(&self) -> AnySpace { self.inner.observation_space() }
    fn action_space(&self) -> AnySpace { self.inner.action_space() }
    fn reward_range(&self) -> Option<(f64, f64)> { Some((self.min, self.max)) }
    fn unwrapped(&self) -> Option<&dyn Introspect> { Some(innermost(&self.inner)) }
}
