use anyhow::{Context, Result};
use taxi_gymnasium::{
    Config, Env, GymClient, Introspect, RandomAgent, RenderMode, Runner, describe_environment,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("loading configuration")?;
    tracing::info!(server = %config.server_url, env_id = %config.env_id, "connecting to gym server");
    let client = GymClient::new(&config.server_url)?;

    let mut env = client
        .make_env(&config.env_id, RenderMode::None)
        .with_context(|| format!("creating {} for inspection", config.env_id))?;
    let descriptor = describe_environment(&env)?;
    env.close()?;

    // Training hook: a learning agent would be sized from `descriptor.cardinalities()` here.
    let mut agent = RandomAgent::for_space(&descriptor.action_space, config.seed)?;

    let mut sim = client
        .make_env(&config.env_id, config.render_mode)
        .with_context(|| format!("creating {} for simulation", config.env_id))?;
    tracing::info!(
        episodes = config.episodes,
        render_mode = %sim.render_mode(),
        actions = %sim.action_space(),
        "simulating"
    );
    let mut runner = Runner::new(config.pacing);
    if let Some(seed) = config.seed {
        runner = runner.with_seed(seed);
    }
    let outcome = runner.run(&mut sim, &mut agent, config.episodes);
    if let Err(e) = sim.close() {
        tracing::warn!("failed to close simulation env: {e}");
    }
    outcome?;

    Ok(())
}
