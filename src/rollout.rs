//! Scripted rollouts for watching an agent drive Taxi.
//!
//! Each episode runs `reset -> (render -> select -> step)* -> done`. Nothing is
//! accumulated: the runner only narrates and paces what the environment shows.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::Duration;

use crate::agent::Agent;
use crate::core::{Env, RenderFrame, Result};
use crate::taxi::describe_state;
use crate::utils::rng::SeedSequence;

/// Delays that make a rendered rollout legible to a human watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pacing {
    /// Pause between rendering a state and stepping it.
    pub step_delay: Duration,
    /// Pause after an episode finishes, before the next reset.
    pub episode_delay: Duration,
}

impl Pacing {
    pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(100);
    pub const DEFAULT_EPISODE_DELAY: Duration = Duration::from_secs(1);

    pub fn new(step_delay: Duration, episode_delay: Duration) -> Self {
        Self { step_delay, episode_delay }
    }

    /// No pauses at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP_DELAY, Self::DEFAULT_EPISODE_DELAY)
    }
}

/// Which of the two pacing delays a pause stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseKind {
    /// Taken after rendering a state, before stepping it.
    Step,
    /// Taken after an episode ends.
    Episode,
}

fn sleep_for(_kind: PauseKind, d: Duration) {
    if !d.is_zero() {
        thread::sleep(d);
    }
}

/// Drives an agent through whole episodes, writing narration and text frames to `out`.
pub struct Runner<W: Write = Stdout> {
    pacing: Pacing,
    out: W,
    seeds: Option<SeedSequence>,
    pause_hook: Box<dyn FnMut(PauseKind, Duration)>,
}

impl Runner<Stdout> {
    pub fn new(pacing: Pacing) -> Self {
        Self::with_output(pacing, io::stdout())
    }
}

impl<W: Write> Runner<W> {
    pub fn with_output(pacing: Pacing, out: W) -> Self {
        Self { pacing, out, seeds: None, pause_hook: Box::new(sleep_for) }
    }

    /// Replace the default sleep with `hook`, called with each pause and its pacing delay.
    pub fn with_pause_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(PauseKind, Duration) + 'static,
    {
        self.pause_hook = Box::new(hook);
        self
    }

    /// Reset every episode with a seed derived from `seed`, making the whole run reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seeds = Some(SeedSequence::new(seed));
        self
    }

    pub fn pacing(&self) -> Pacing { self.pacing }

    pub fn output(&self) -> &W { &self.out }

    pub fn into_output(self) -> W { self.out }

    /// Run `num_episodes` episodes. Any environment failure aborts the whole run.
    pub fn run<E, A>(&mut self, env: &mut E, agent: &mut A, num_episodes: usize) -> Result<()>
    where
        E: Env<Obs = u32, Act = u32> + ?Sized,
        A: Agent + ?Sized,
    {
        for episode in 0..num_episodes {
            let steps = self.run_episode(env, agent)?;
            tracing::info!(episode, steps, "episode finished");
            self.pause(PauseKind::Episode);
        }
        Ok(())
    }

    fn run_episode<E, A>(&mut self, env: &mut E, agent: &mut A) -> Result<usize>
    where
        E: Env<Obs = u32, Act = u32> + ?Sized,
        A: Agent + ?Sized,
    {
        let seed = self.seeds.as_mut().map(SeedSequence::next_subseed);
        let (mut state, _info) = env.reset(seed)?;
        writeln!(self.out, "{}", describe_state(state))?;
        self.render(env)?;

        let mut steps = 0;
        let mut done = false;
        while !done {
            let action = agent.select_action(state);
            self.render(env)?;
            self.pause(PauseKind::Step);
            let step = env.step(action)?;
            tracing::debug!(state, action, next_state = step.observation, reward = step.reward, "step");
            done = step.is_done();
            state = step.observation;
            steps += 1;
        }
        Ok(steps)
    }

    fn pause(&mut self, kind: PauseKind) {
        let delay = match kind {
            PauseKind::Step => self.pacing.step_delay,
            PauseKind::Episode => self.pacing.episode_delay,
        };
        (self.pause_hook)(kind, delay);
    }

    fn render<E: Env + ?Sized>(&mut self, env: &E) -> Result<()> {
        match env.render()? {
            Some(RenderFrame::Text(frame)) => writeln!(self.out, "{frame}")?,
            Some(RenderFrame::Pixels { width, height, .. }) => {
                tracing::trace!(width, height, "pixel frame not shown on a text sink");
            }
            None => {}
        }
        self.out.flush()?;
        Ok(())
    }
}
