pub mod core;
pub mod spaces;
pub mod utils;
pub mod taxi;
pub mod inspect;
pub mod agent;
pub mod rollout;
pub mod wrappers;
pub mod remote;
pub mod config;

pub use crate::core::{Env, GymError, Info, InfoValue, Introspect, RenderFrame, Result, Step};
pub use crate::spaces::{AnySpace, Discrete, Space};
pub use crate::taxi::{describe_action, describe_state, Location, PassengerLocation, TaxiAction, TaxiState};
pub use crate::inspect::{describe_environment, describe_environment_to, inspect, EnvironmentDescriptor, TAXI_REWARD_RANGE};
pub use crate::agent::{Agent, RandomAgent};
pub use crate::rollout::{Pacing, PauseKind, Runner};
pub use crate::wrappers::{ClipReward, TimeLimit};
pub use crate::remote::{GymClient, RemoteEnv, RenderMode};
pub use crate::config::Config;
