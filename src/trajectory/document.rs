//! `show.json` document decoding and encoding.
//!
//! ```text
//! {
//!   "version": 1,
//!   "meta": { "title": "..." },
//!   "swarm": { "drones": [
//!     { "type": "generic",
//!       "settings": {
//!         "name": "d1",
//!         "trajectory": { "version": 1,
//!           "points": [[t, [x, y, z], [[cx, cy, cz], ...], [r, g, b]], ...] } } }
//!   ] }
//! }
//! ```
//!
//! The control-point list and the color are optional per point.

use std::collections::HashSet;

use glam::Vec3;
use serde::Deserialize;
use serde_json::{Value, json};

use super::sample::{Rgb, Trajectory, TrajectorySample};
use super::show::{DroneRecord, Show, TrajectoryError};

/// Document and trajectory format version understood by the decoder.
pub const SHOW_FORMAT_VERSION: u64 = 1;

fn default_version() -> u64 {
    SHOW_FORMAT_VERSION
}

#[derive(Debug, Deserialize)]
struct ShowDocument {
    version: u64,
    #[serde(default)]
    meta: Option<MetaDocument>,
    #[serde(default)]
    swarm: Option<SwarmDocument>,
}

#[derive(Debug, Deserialize)]
struct MetaDocument {
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SwarmDocument {
    #[serde(default)]
    drones: Vec<DroneDocument>,
}

#[derive(Debug, Deserialize)]
struct DroneDocument {
    #[serde(default)]
    settings: DroneSettings,
}

#[derive(Debug, Default, Deserialize)]
struct DroneSettings {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    trajectory: Option<TrajectoryDocument>,
    #[serde(default)]
    lights: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct TrajectoryDocument {
    #[serde(default = "default_version")]
    version: u64,
    #[serde(default)]
    points: Vec<Value>,
}

/// Identifier for a drone without a name: its 1-based position, bumped
/// past any id already in `taken`.
fn fallback_id(index: usize, taken: &mut HashSet<String>) -> String {
    let mut n = index + 1;
    loop {
        let id = format!("drone-{n}");
        if taken.insert(id.clone()) {
            return id;
        }
        n += 1;
    }
}

/// Decode a `show.json` document into a show.
///
/// Decoding is all-or-nothing: any malformed drone fails the whole show.
pub fn decode_document(bytes: &[u8]) -> Result<Show, TrajectoryError> {
    let document: ShowDocument = serde_json::from_slice(bytes)?;
    if document.version != SHOW_FORMAT_VERSION {
        return Err(TrajectoryError::UnsupportedVersion {
            what: "show document",
            version: document.version,
        });
    }

    let swarm = document.swarm.ok_or(TrajectoryError::MissingSwarm)?;
    let mut drones = Vec::with_capacity(swarm.drones.len());

    // Explicit names win over generated ones
    let mut taken: HashSet<String> = swarm
        .drones
        .iter()
        .filter_map(|d| d.settings.name.clone())
        .collect();

    for (index, drone) in swarm.drones.into_iter().enumerate() {
        let settings = drone.settings;
        let id = match settings.name {
            Some(name) => name,
            None => fallback_id(index, &mut taken),
        };

        if settings.lights.as_ref().is_some_and(|l| l.get("data").is_some()) {
            log::debug!("Drone {id:?}: encoded light program is not decoded");
        }

        let trajectory = settings
            .trajectory
            .ok_or_else(|| TrajectoryError::format(&id, "missing trajectory"))?;
        if trajectory.version != SHOW_FORMAT_VERSION {
            return Err(TrajectoryError::UnsupportedVersion {
                what: "trajectory",
                version: trajectory.version,
            });
        }

        let samples = trajectory
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| parse_point(point).map_err(|reason| format!("sample {i}: {reason}")))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| TrajectoryError::format(&id, reason))?;

        let trajectory =
            Trajectory::new(samples).map_err(|err| TrajectoryError::invalid(&id, err))?;
        drones.push(DroneRecord::new(id, trajectory));
    }

    if drones.is_empty() {
        log::warn!("Show document contains no drones");
    }

    Show::new(document.meta.and_then(|m| m.title), drones)
}

fn parse_point(point: &Value) -> Result<TrajectorySample, String> {
    let items = point
        .as_array()
        .ok_or_else(|| "point is not an array".to_string())?;
    if !(2..=4).contains(&items.len()) {
        return Err(format!("point has {} elements, expected 2 to 4", items.len()));
    }

    let time = items[0]
        .as_f64()
        .ok_or_else(|| "time is not a number".to_string())?;
    let position = parse_vec3(&items[1]).map_err(|e| format!("position {e}"))?;

    let controls = match items.get(2) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(controls)) => controls
            .iter()
            .map(parse_vec3)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("control point {e}"))?,
        Some(_) => return Err("control points are not an array".to_string()),
    };

    let color = match items.get(3) {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_rgb(value)?),
    };

    Ok(TrajectorySample {
        time,
        position,
        controls,
        color,
    })
}

fn parse_vec3(value: &Value) -> Result<Vec3, String> {
    let coords = value
        .as_array()
        .filter(|c| c.len() == 3)
        .ok_or_else(|| "is not an [x, y, z] triple".to_string())?;

    let mut out = [0.0f32; 3];
    for (slot, coord) in out.iter_mut().zip(coords) {
        *slot = coord
            .as_f64()
            .ok_or_else(|| "has a non-numeric coordinate".to_string())? as f32;
    }
    Ok(Vec3::from_array(out))
}

fn parse_rgb(value: &Value) -> Result<Rgb, String> {
    let channels = value
        .as_array()
        .filter(|c| c.len() == 3)
        .ok_or_else(|| "color is not an [r, g, b] triple".to_string())?;

    let mut out = [0u8; 3];
    for (slot, channel) in out.iter_mut().zip(channels) {
        *slot = channel
            .as_u64()
            .and_then(|c| u8::try_from(c).ok())
            .ok_or_else(|| "color channel is not an integer in 0..=255".to_string())?;
    }
    Ok(Rgb::new(out[0], out[1], out[2]))
}

fn vec3_json(v: Vec3) -> Value {
    json!([v.x as f64, v.y as f64, v.z as f64])
}

/// Encode a show as a `show.json` document.
pub fn encode_document(show: &Show) -> Result<Vec<u8>, serde_json::Error> {
    let drones: Vec<Value> = show
        .drones()
        .iter()
        .map(|drone| {
            let points: Vec<Value> = drone
                .trajectory
                .samples()
                .iter()
                .map(|s| {
                    let controls: Vec<Value> = s.controls.iter().copied().map(vec3_json).collect();
                    let mut point = vec![json!(s.time), vec3_json(s.position), json!(controls)];
                    if let Some(c) = s.color {
                        point.push(json!([c.r, c.g, c.b]));
                    }
                    Value::Array(point)
                })
                .collect();

            json!({
                "type": "generic",
                "settings": {
                    "name": drone.id,
                    "trajectory": { "version": SHOW_FORMAT_VERSION, "points": points },
                },
            })
        })
        .collect();

    let mut document = json!({
        "version": SHOW_FORMAT_VERSION,
        "swarm": { "drones": drones },
    });
    if let Some(title) = show.title() {
        document["meta"] = json!({ "title": title });
    }

    serde_json::to_vec(&document)
}
