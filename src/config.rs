//! Run configuration: built-in defaults, optionally overridden from the process environment.

use std::str::FromStr;
use std::time::Duration;

use crate::core::{GymError, Result};
use crate::remote::RenderMode;
use crate::rollout::Pacing;

pub const ENV_URL: &str = "TAXI_GYM_URL";
pub const ENV_ENV_ID: &str = "TAXI_ENV_ID";
pub const ENV_RENDER_MODE: &str = "TAXI_RENDER_MODE";
pub const ENV_EPISODES: &str = "TAXI_EPISODES";
pub const ENV_STEP_DELAY_MS: &str = "TAXI_STEP_DELAY_MS";
pub const ENV_EPISODE_DELAY_MS: &str = "TAXI_EPISODE_DELAY_MS";
pub const ENV_SEED: &str = "TAXI_SEED";

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Gym HTTP server, scheme included.
    pub server_url: String,
    pub env_id: String,
    /// Render mode of the simulation instance; the inspection instance never renders.
    pub render_mode: RenderMode,
    pub episodes: usize,
    pub pacing: Pacing,
    /// Seeds both the agent and the per-episode resets when set.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            env_id: "Taxi-v3".into(),
            render_mode: RenderMode::Human,
            episodes: 3,
            pacing: Pacing::default(),
            seed: None,
        }
    }
}

impl Config {
    /// Defaults overridden by any `TAXI_*` variables present in the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `TAXI_*` key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(url) = lookup(ENV_URL) {
            config.server_url = url;
        }
        if let Some(id) = lookup(ENV_ENV_ID) {
            config.env_id = id;
        }
        if let Some(mode) = lookup(ENV_RENDER_MODE) {
            config.render_mode = mode.parse()?;
        }
        if let Some(n) = lookup(ENV_EPISODES) {
            config.episodes = parse_var(ENV_EPISODES, &n)?;
        }
        if let Some(ms) = lookup(ENV_STEP_DELAY_MS) {
            config.pacing.step_delay = Duration::from_millis(parse_var(ENV_STEP_DELAY_MS, &ms)?);
        }
        if let Some(ms) = lookup(ENV_EPISODE_DELAY_MS) {
            config.pacing.episode_delay = Duration::from_millis(parse_var(ENV_EPISODE_DELAY_MS, &ms)?);
        }
        if let Some(seed) = lookup(ENV_SEED) {
            config.seed = Some(parse_var(ENV_SEED, &seed)?);
        }
        Ok(config)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| GymError::Config(format!("{key}={raw:?}: {e}")))
}
