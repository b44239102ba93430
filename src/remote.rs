//! Client for a Gymnasium HTTP API server hosting the actual Taxi simulation.
//!
//! Protocol (all JSON):
//! - `POST /v1/envs/` with `{env_id, kwargs}` returns `{instance_id}`
//! - `GET  /v1/envs/{id}/observation_space/` and `.../action_space/` return `{info: {name, ...}}`
//! - `POST /v1/envs/{id}/reset/` returns `{observation}`
//! - `POST /v1/envs/{id}/step/` returns `{observation, reward, terminated, truncated, info}`
//! - `GET  /v1/envs/{id}/render/` returns `{render_frame}`
//! - `POST /v1/envs/{id}/close/`

use std::fmt;
use std::str::FromStr;

use reqwest::blocking::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};

use crate::core::{Env, GymError, Info, Introspect, RenderFrame, Result, Step};
use crate::spaces::{AnySpace, Space};

/// Rendering mode requested when the server constructs the environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RenderMode {
    /// Rendering suppressed; `render()` yields nothing.
    #[default]
    None,
    /// Text frames returned to the client.
    Ansi,
    /// The server displays frames in its own window.
    Human,
    /// Pixel frames returned to the client.
    RgbArray,
}

impl RenderMode {
    fn as_kwarg(self) -> Option<&'static str> {
        match self {
            RenderMode::None => None,
            RenderMode::Ansi => Some("ansi"),
            RenderMode::Human => Some("human"),
            RenderMode::RgbArray => Some("rgb_array"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = GymError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(RenderMode::None),
            "ansi" => Ok(RenderMode::Ansi),
            "human" => Ok(RenderMode::Human),
            "rgb_array" => Ok(RenderMode::RgbArray),
            other => Err(GymError::Config(format!("unknown render mode '{other}'"))),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_kwarg().unwrap_or("none"))
    }
}

#[derive(Debug, Clone)]
pub struct GymClient {
    base_uri: String,
    client: Client,
}

impl GymClient {
    /// `base_uri` is scheme, host and port, e.g. `http://127.0.0.1:5000`.
    pub fn new(base_uri: &str) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { base_uri: base_uri.trim_end_matches('/').to_string(), client })
    }

    pub fn base_uri(&self) -> &str { &self.base_uri }

    /// Create an environment instance on the server and fetch its spaces.
    pub fn make_env(&self, env_id: &str, render_mode: RenderMode) -> Result<RemoteEnv> {
        let mut kwargs = Map::new();
        if let Some(mode) = render_mode.as_kwarg() {
            kwargs.insert("render_mode".into(), Value::from(mode));
        }
        let body = json!({ "env_id": env_id, "kwargs": kwargs });

        let base_url = self.envs_url();
        let obj = self.http_post(&base_url, &body)?;
        let instance_id = field(&obj, "instance_id")?
            .as_str()
            .ok_or_else(|| protocol("instance_id is not a string"))?
            .to_string();

        let obj = self.http_get(&format!("{base_url}{instance_id}/observation_space/"))?;
        let obs_space = parse_space(field(&obj, "info")?)?;
        let obj = self.http_get(&format!("{base_url}{instance_id}/action_space/"))?;
        let act_space = parse_space(field(&obj, "info")?)?;

        tracing::info!(env_id, %instance_id, %render_mode, %obs_space, %act_space, "created remote environment");
        Ok(RemoteEnv {
            client: self.clone(),
            name: env_id.to_string(),
            instance_id,
            render_mode,
            obs_space,
            act_space,
        })
    }

    fn envs_url(&self) -> String {
        format!("{}/v1/envs/", self.base_uri)
    }

    fn http_get(&self, url: &str) -> Result<Value> {
        let res = self
            .client
            .get(url)
            .headers(Self::construct_common_headers())
            .send()?
            .error_for_status()?;
        Ok(res.json::<Value>()?)
    }

    fn http_post(&self, url: &str, body: &Value) -> Result<Value> {
        let res = self
            .client
            .post(url)
            .headers(Self::construct_common_headers())
            .json(body)
            .send()?
            .error_for_status()?;
        Ok(res.json::<Value>()?)
    }

    fn construct_common_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }
}

/// A Taxi-style environment living on the server: discrete observations, discrete actions.
#[derive(Debug)]
pub struct RemoteEnv {
    client: GymClient,
    name: String,
    instance_id: String,
    render_mode: RenderMode,
    obs_space: AnySpace,
    act_space: AnySpace,
}

impl RemoteEnv {
    pub fn name(&self) -> &str { &self.name }

    pub fn instance_id(&self) -> &str { &self.instance_id }

    pub fn render_mode(&self) -> RenderMode { self.render_mode }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}/{endpoint}/", self.client.envs_url(), self.instance_id)
    }
}

impl Env for RemoteEnv {
    type Obs = u32;
    type Act = u32;

    fn reset(&mut self, seed: Option<u64>) -> Result<(u32, Info)> {
        let body = match seed {
            Some(seed) => json!({ "seed": seed }),
            None => json!({}),
        };
        let obj = self.client.http_post(&self.url("reset"), &body)?;
        let obs = parse_discrete_obs(field(&obj, "observation")?)?;
        let info = obj.get("info").map(Info::from_json).unwrap_or_default();
        Ok((obs, info))
    }

    fn step(&mut self, action: u32) -> Result<Step<u32>> {
        if let Some(d) = self.act_space.as_discrete() {
            if !d.contains(&action) {
                return Err(GymError::InvalidAction(format!("{action} is not in {d}")));
            }
        }
        let obj = self.client.http_post(&self.url("step"), &json!({ "action": action }))?;
        parse_step(&obj)
    }

    fn render(&self) -> Result<Option<RenderFrame>> {
        if self.render_mode == RenderMode::None {
            return Ok(None);
        }
        let obj = self.client.http_get(&self.url("render"))?;
        parse_render_frame(obj.get("render_frame").unwrap_or(&Value::Null))
    }

    fn close(&mut self) -> Result<()> {
        self.client.http_post(&self.url("close"), &json!({}))?;
        tracing::debug!(instance_id = %self.instance_id, "closed remote environment");
        Ok(())
    }
}

impl Introspect for RemoteEnv {
    fn observation_space(&self) -> AnySpace { self.obs_space.clone() }

    fn action_space(&self) -> AnySpace { self.act_space.clone() }

    // The HTTP protocol carries no reward range; callers fall back to a per-family default.
}

fn protocol(msg: impl Into<String>) -> GymError {
    GymError::Protocol(msg.into())
}

fn field<'a>(obj: &'a Value, key: &str) -> Result<&'a Value> {
    obj.get(key).ok_or_else(|| protocol(format!("missing '{key}'")))
}

fn as_u32(v: &Value) -> Result<u32> {
    v.as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| protocol(format!("expected a non-negative integer, got {v}")))
}

fn as_f64_vec(v: &Value) -> Result<Vec<f64>> {
    v.as_array()
        .ok_or_else(|| protocol(format!("expected an array, got {v}")))?
        .iter()
        .map(|x| x.as_f64().ok_or_else(|| protocol(format!("expected a number, got {x}"))))
        .collect()
}

/// Parse a space description such as `{"name": "Discrete", "n": 500}`.
pub fn parse_space(info: &Value) -> Result<AnySpace> {
    let name = field(info, "name")?
        .as_str()
        .ok_or_else(|| protocol("space name is not a string"))?;
    match name {
        "Discrete" => {
            let n = as_u32(field(info, "n")?)?;
            if n == 0 {
                return Err(protocol("Discrete space with n = 0"));
            }
            Ok(AnySpace::discrete(n))
        }
        "Box" => {
            let shape = field(info, "shape")?
                .as_array()
                .ok_or_else(|| protocol("shape is not an array"))?
                .iter()
                .map(as_u32)
                .collect::<Result<Vec<_>>>()?;
            Ok(AnySpace::Box {
                shape,
                low: as_f64_vec(field(info, "low")?)?,
                high: as_f64_vec(field(info, "high")?)?,
            })
        }
        other => Err(GymError::NotSupported(format!("space type '{other}'"))),
    }
}

/// A discrete observation arrives either bare or wrapped in a one-element array.
pub fn parse_discrete_obs(v: &Value) -> Result<u32> {
    match v {
        Value::Array(items) if items.len() == 1 => as_u32(&items[0]),
        Value::Array(items) => Err(GymError::InvalidObservation(format!(
            "expected a single discrete observation, got {} values",
            items.len()
        ))),
        other => as_u32(other),
    }
}

pub fn parse_step(obj: &Value) -> Result<Step<u32>> {
    let observation = parse_discrete_obs(field(obj, "observation")?)?;
    let reward = field(obj, "reward")?
        .as_f64()
        .ok_or_else(|| protocol("reward is not a number"))?;
    let flag = |key: &str| -> Result<bool> {
        field(obj, key)?
            .as_bool()
            .ok_or_else(|| protocol(format!("{key} is not a bool")))
    };
    let terminated = flag("terminated")?;
    let truncated = flag("truncated")?;
    let info = obj.get("info").map(Info::from_json).unwrap_or_default();
    Ok(Step::new(observation, reward, terminated, truncated, info))
}

/// `null` means nothing to show (human mode), a string is an ANSI frame, and a
/// `[height][width][3]` array is an RGB image.
pub fn parse_render_frame(v: &Value) -> Result<Option<RenderFrame>> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(RenderFrame::Text(s.clone()))),
        Value::Array(rows) => {
            let height = rows.len();
            let width = match rows.first() {
                Some(first) => first
                    .as_array()
                    .ok_or_else(|| protocol("image row is not an array"))?
                    .len(),
                None => 0,
            };
            let mut data = Vec::with_capacity(width * height * 3);
            for row in rows {
                let row = row.as_array().ok_or_else(|| protocol("image row is not an array"))?;
                if row.len() != width {
                    return Err(protocol("ragged image rows"));
                }
                for px in row {
                    let px = px.as_array().ok_or_else(|| protocol("pixel is not an array"))?;
                    if px.len() != 3 {
                        return Err(protocol(format!("expected 3 channels, got {}", px.len())));
                    }
                    for c in px {
                        let c = c
                            .as_u64()
                            .and_then(|c| u8::try_from(c).ok())
                            .ok_or_else(|| protocol(format!("bad channel value {c}")))?;
                        data.push(c);
                    }
                }
            }
            Ok(Some(RenderFrame::Pixels { width: width as u32, height: height as u32, data }))
        }
        other => Err(protocol(format!("unexpected render frame {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::InfoValue;

    #[test]
    fn parses_taxi_spaces() {
        let obs = parse_space(&json!({ "name": "Discrete", "n": 500 })).unwrap();
        let act = parse_space(&json!({ "name": "Discrete", "n": 6 })).unwrap();
        assert_eq!(obs.n(), Some(500));
        assert_eq!(act.n(), Some(6));
    }

    #[test]
    fn parses_box_space_without_cardinality() {
        let space = parse_space(&json!({
            "name": "Box", "shape": [2], "low": [-1.2, -0.07], "high": [0.6, 0.07]
        }))
        .unwrap();
        assert_eq!(space.n(), None);
    }

    #[test]
    fn rejects_unknown_space() {
        let err = parse_space(&json!({ "name": "Tuple", "spaces": [] })).unwrap_err();
        assert!(matches!(err, GymError::NotSupported(_)));
        let err = parse_space(&json!({ "n": 3 })).unwrap_err();
        assert!(matches!(err, GymError::Protocol(_)));
    }

    #[test]
    fn observation_bare_or_wrapped() {
        assert_eq!(parse_discrete_obs(&json!(328)).unwrap(), 328);
        assert_eq!(parse_discrete_obs(&json!([328])).unwrap(), 328);
        assert!(parse_discrete_obs(&json!([1, 2])).is_err());
        assert!(parse_discrete_obs(&json!(-1)).is_err());
    }

    #[test]
    fn parses_step_reply() {
        let s = parse_step(&json!({
            "observation": [85],
            "reward": 20.0,
            "terminated": true,
            "truncated": false,
            "info": { "prob": 1.0, "action_mask": [1, 0, 1, 0, 0, 0] }
        }))
        .unwrap();
        assert_eq!(s.observation, 85);
        assert_eq!(s.reward, 20.0);
        assert!(s.terminated && !s.truncated);
        assert_eq!(s.info.get("prob"), Some(&InfoValue::F64(1.0)));
        assert!(s.info.get("action_mask").is_none());
    }

    #[test]
    fn step_reply_missing_flag_is_protocol_error() {
        let err = parse_step(&json!({ "observation": 1, "reward": -1, "terminated": false })).unwrap_err();
        assert!(matches!(err, GymError::Protocol(_)));
    }

    #[test]
    fn render_frames() {
        assert_eq!(parse_render_frame(&Value::Null).unwrap(), None);
        assert_eq!(
            parse_render_frame(&json!("+---------+")).unwrap(),
            Some(RenderFrame::Text("+---------+".into()))
        );
        let img = parse_render_frame(&json!([[[1, 2, 3], [4, 5, 6]]])).unwrap();
        assert_eq!(
            img,
            Some(RenderFrame::Pixels { width: 2, height: 1, data: vec![1, 2, 3, 4, 5, 6] })
        );
        assert!(parse_render_frame(&json!([[[1, 2]]])).is_err());
    }

    #[test]
    fn ragged_image_rows_are_rejected() {
        for frame in [json!([[], [[1, 2, 3]]]), json!([[[1, 2, 3]], []]), json!([[[1, 2, 3]], [[4, 5, 6], [7, 8, 9]]])] {
            assert!(matches!(parse_render_frame(&frame), Err(GymError::Protocol(_))), "accepted {frame}");
        }
        let empty = parse_render_frame(&json!([])).unwrap();
        assert_eq!(empty, Some(RenderFrame::Pixels { width: 0, height: 0, data: vec![] }));
    }

    #[test]
    fn render_mode_round_trips_through_text() {
        for mode in [RenderMode::None, RenderMode::Ansi, RenderMode::Human, RenderMode::RgbArray] {
            assert_eq!(mode.to_string().parse::<RenderMode>().unwrap(), mode);
        }
        assert!("window".parse::<RenderMode>().is_err());
    }
}
