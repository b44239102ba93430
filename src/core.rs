// Core traits and types shared by the inspector, the runner and the remote client.

use crate::spaces::AnySpace;

/// A small ordered info map returned alongside observations.
/// Keys are unique; inserting an existing key replaces its value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Info {
    entries: Vec<(String, InfoValue)>,
}

impl Info {
    /// Create an empty Info map.
    pub fn new() -> Self { Self { entries: Vec::new() } }

    /// Insert or replace a key with the given value.
    pub fn insert<K: Into<String>>(&mut self, key: K, value: InfoValue) {
        let k = key.into();
        if let Some((_, v)) = self.entries.iter_mut().find(|(kk, _)| kk == &k) {
            *v = value;
        } else {
            self.entries.push((k, value));
        }
    }

    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Build an Info map from a JSON object, keeping only scalar values.
    /// Nested arrays and objects are skipped; `null` or non-object input yields an empty map.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut info = Info::new();
        if let Some(obj) = value.as_object() {
            for (k, v) in obj {
                let converted = match v {
                    serde_json::Value::Bool(b) => Some(InfoValue::Bool(*b)),
                    serde_json::Value::Number(n) => n
                        .as_i64()
                        .map(InfoValue::I64)
                        .or_else(|| n.as_f64().map(InfoValue::F64)),
                    serde_json::Value::String(s) => Some(InfoValue::Str(s.clone())),
                    _ => None,
                };
                if let Some(v) = converted {
                    info.insert(k.as_str(), v);
                }
            }
        }
        info
    }
}

/// Value types carried in an [`Info`] map.
#[derive(Clone, Debug, PartialEq)]
pub enum InfoValue {
    Bool(bool),
    I64(i64),
    F64(f64),
    Str(String),
}

/// A frame returned by `Env::render`.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderFrame {
    /// Textual representation of a frame (ANSI grid for Taxi).
    Text(String),
    /// Raw pixel buffer in row-major RGB format, 3 bytes per pixel.
    Pixels {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
}

/// A step result from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct Step<Obs> {
    pub observation: Obs,
    pub reward: f64,
    pub terminated: bool,
    pub truncated: bool,
    pub info: Info,
}

impl<Obs> Step<Obs> {
    pub fn new(observation: Obs, reward: f64, terminated: bool, truncated: bool, info: Info) -> Self {
        Self { observation, reward, terminated, truncated, info }
    }

    /// True once the episode has ended, either naturally or by truncation.
    pub fn is_done(&self) -> bool { self.terminated || self.truncated }
}

/// Errors surfaced by the environment, the inspector and the runner.
#[derive(thiserror::Error, Debug)]
pub enum GymError {
    #[error("Invalid action: {0}")]
    InvalidAction(String),
    #[error("Invalid observation: {0}")]
    InvalidObservation(String),
    #[error("Environment not ready: {0}")]
    NotReady(String),
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    #[error("Malformed server response: {0}")]
    Protocol(String),
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Other error: {0}")]
    Other(String),
}

/// Convenience alias for results using GymError.
pub type Result<T> = std::result::Result<T, GymError>;

/// Core environment trait following the Gymnasium contract.
///
/// Every call may fail because the environment is usually a remote collaborator;
/// callers propagate those failures rather than recovering from them.
pub trait Env {
    type Obs;
    type Act;

    /// Reset the environment to an initial state.
    /// Implementations should re-seed internal RNGs when `seed` is provided.
    fn reset(&mut self, seed: Option<u64>) -> Result<(Self::Obs, Info)>;

    /// Apply an action and advance the environment by one step.
    fn step(&mut self, action: Self::Act) -> Result<Step<Self::Obs>>;

    /// Render a frame of the current state. `Ok(None)` means the environment
    /// displays the frame itself or rendering is disabled.
    fn render(&self) -> Result<Option<RenderFrame>> { Ok(None) }

    /// Close and release any external resources.
    fn close(&mut self) -> Result<()> { Ok(()) }
}

/// Read-only introspection of an environment's declared spaces and bounds.
///
/// Every property is optional on the collaborator side, so absence is modelled
/// with `Option` (or a space whose `n()` is `None`) rather than errors.
pub trait Introspect {
    fn observation_space(&self) -> AnySpace;

    fn action_space(&self) -> AnySpace;

    /// Declared `(min, max)` reward bounds, when the environment exposes them.
    fn reward_range(&self) -> Option<(f64, f64)> { None }

    /// The undecorated base environment when `self` is a wrapper.
    fn unwrapped(&self) -> Option<&dyn Introspect> { None }
}
