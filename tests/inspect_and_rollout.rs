use std::cell::Cell;
use std::io;

use taxi_gymnasium::{
    describe_environment_to, inspect, AnySpace, Env, GymError, Info, Introspect, Pacing, RenderFrame,
    Result, Runner, Step, TimeLimit, TAXI_REWARD_RANGE,
};

/// A bare environment with fixed spaces and an optional reward range.
struct Base {
    obs: u32,
    act: u32,
    reward: Option<(f64, f64)>,
}

impl Introspect for Base {
    fn observation_space(&self) -> AnySpace { AnySpace::discrete(self.obs) }
    fn action_space(&self) -> AnySpace { AnySpace::discrete(self.act) }
    fn reward_range(&self) -> Option<(f64, f64)> { self.reward }
}

/// A decorator that advertises different spaces from the environment it wraps.
struct Disguise {
    base: Base,
}

impl Introspect for Disguise {
    fn observation_space(&self) -> AnySpace { AnySpace::discrete(7) }
    fn action_space(&self) -> AnySpace { AnySpace::discrete(2) }
    fn reward_range(&self) -> Option<(f64, f64)> { Some((0.0, 0.0)) }
    fn unwrapped(&self) -> Option<&dyn Introspect> { Some(&self.base) }
}

#[test]
fn missing_reward_range_falls_back_to_taxi_bounds() {
    let env = Base { obs: 500, act: 6, reward: None };
    let d = describe_environment_to(&env, &mut io::sink()).unwrap();
    assert_eq!(d.reward_range, (-10.0, 20.0));
    assert!(d.reward_range_defaulted);
}

#[test]
fn declared_reward_range_passes_through() {
    let env = Base { obs: 500, act: 6, reward: Some((-5.0, 5.0)) };
    let d = describe_environment_to(&env, &mut io::sink()).unwrap();
    assert_eq!(d.reward_range, (-5.0, 5.0));
    assert!(!d.reward_range_defaulted);
}

#[test]
fn wrapper_is_resolved_to_base() {
    let env = Disguise { base: Base { obs: 500, act: 6, reward: None } };
    let d = describe_environment_to(&env, &mut io::sink()).unwrap();
    assert_eq!(d.cardinalities(), (Some(500), Some(6)));
    assert_eq!(d.reward_range, TAXI_REWARD_RANGE);
}

#[test]
fn fallback_is_caller_supplied_for_other_families() {
    let env = Base { obs: 16, act: 4, reward: None };
    let d = inspect(&env, (0.0, 1.0));
    assert_eq!(d.reward_range, (0.0, 1.0));
}

/// Reports done on the `done_after`-th step and counts every call.
struct Stub {
    done_after: usize,
    steps: usize,
    resets: usize,
    renders: Cell<usize>,
}

impl Stub {
    fn new(done_after: usize) -> Self {
        Self { done_after, steps: 0, resets: 0, renders: Cell::new(0) }
    }
}

impl Env for Stub {
    type Obs = u32;
    type Act = u32;

    fn reset(&mut self, _seed: Option<u64>) -> Result<(u32, Info)> {
        self.resets += 1;
        Ok((0, Info::new()))
    }

    fn step(&mut self, _action: u32) -> Result<Step<u32>> {
        self.steps += 1;
        let done = self.steps % self.done_after == 0;
        Ok(Step::new(self.steps as u32, -1.0, done, false, Info::new()))
    }

    fn render(&self) -> Result<Option<RenderFrame>> {
        self.renders.set(self.renders.get() + 1);
        Ok(None)
    }
}

#[test]
fn episode_ends_when_env_reports_done() {
    let mut env = Stub::new(3);
    Runner::with_output(Pacing::none(), io::sink())
        .run(&mut env, &mut |_s: u32| -> u32 { 4 }, 1)
        .unwrap();
    assert_eq!(env.steps, 3);
    assert_eq!(env.resets, 1);
    // one render after reset, then one before each step
    assert_eq!(env.renders.get(), 4);
}

#[test]
fn each_episode_starts_with_a_reset() {
    let mut env = Stub::new(2);
    Runner::with_output(Pacing::none(), io::sink())
        .run(&mut env, &mut |_s: u32| -> u32 { 0 }, 3)
        .unwrap();
    assert_eq!(env.resets, 3);
    assert_eq!(env.steps, 6);
}

#[test]
fn truncation_also_ends_the_episode() {
    let mut env = TimeLimit::new(Stub::new(1000), 5);
    Runner::with_output(Pacing::none(), io::sink())
        .run(&mut env, &mut |_s: u32| -> u32 { 0 }, 1)
        .unwrap();
    assert_eq!(env.inner().steps, 5);
}

#[test]
fn zero_episodes_touch_nothing() {
    let mut env = Stub::new(1);
    Runner::with_output(Pacing::none(), io::sink())
        .run(&mut env, &mut |_s: u32| -> u32 { 0 }, 0)
        .unwrap();
    assert_eq!((env.resets, env.steps), (0, 0));
}

struct FailingReset;

impl Env for FailingReset {
    type Obs = u32;
    type Act = u32;

    fn reset(&mut self, _seed: Option<u64>) -> Result<(u32, Info)> {
        Err(GymError::NotReady("server unavailable".into()))
    }

    fn step(&mut self, _action: u32) -> Result<Step<u32>> {
        unreachable!("step after failed reset")
    }
}

#[test]
fn reset_failure_propagates() {
    let err = Runner::with_output(Pacing::none(), io::sink())
        .run(&mut FailingReset, &mut |_s: u32| -> u32 { 0 }, 2)
        .unwrap_err();
    assert!(matches!(err, GymError::NotReady(_)));
}
