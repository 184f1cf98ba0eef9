//! Decoded show: every drone's identity and trajectory.

use std::collections::HashSet;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::sample::{DroneState, InvalidTrajectory, Trajectory};

/// Errors raised while decoding trajectory data.
///
/// Everything except `Empty` is a format error: the document does not
/// describe a well-formed set of trajectories.
#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("Show document is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Unsupported {what} version {version}")]
    UnsupportedVersion { what: &'static str, version: u64 },
    #[error("Show document has no swarm section")]
    MissingSwarm,
    #[error("Trajectory format error in drone {drone:?}: {reason}")]
    Format { drone: String, reason: String },
    #[error("Drone {drone:?} has an empty trajectory")]
    Empty { drone: String },
}

impl TrajectoryError {
    pub(crate) fn format(drone: &str, reason: impl Into<String>) -> Self {
        TrajectoryError::Format {
            drone: drone.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(drone: &str, err: InvalidTrajectory) -> Self {
        match err {
            InvalidTrajectory::Empty => TrajectoryError::Empty {
                drone: drone.to_string(),
            },
            other => Self::format(drone, other.to_string()),
        }
    }
}

/// One drone of a show.
#[derive(Debug, Clone, PartialEq)]
pub struct DroneRecord {
    pub id: String,
    pub trajectory: Trajectory,
}

impl DroneRecord {
    pub fn new(id: impl Into<String>, trajectory: Trajectory) -> Self {
        Self {
            id: id.into(),
            trajectory,
        }
    }
}

/// A fully decoded show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Show {
    title: Option<String>,
    drones: Vec<DroneRecord>,
    duration: f64,
}

impl Show {
    /// Assemble a show, rejecting duplicate drone ids.
    pub fn new(title: Option<String>, drones: Vec<DroneRecord>) -> Result<Self, TrajectoryError> {
        let mut seen = HashSet::with_capacity(drones.len());
        for drone in &drones {
            if !seen.insert(drone.id.as_str()) {
                return Err(TrajectoryError::format(&drone.id, "duplicate drone id"));
            }
        }

        let duration = drones
            .iter()
            .map(|d| d.trajectory.end_time())
            .fold(0.0, f64::max);

        Ok(Self {
            title,
            drones,
            duration,
        })
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn drones(&self) -> &[DroneRecord] {
        &self.drones
    }

    pub fn drone(&self, id: &str) -> Option<&DroneRecord> {
        self.drones.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    /// Latest trajectory end across all drones (never negative).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Earliest trajectory start across all drones, or 0 for an empty show.
    pub fn start_time(&self) -> f64 {
        self.drones
            .iter()
            .map(|d| d.trajectory.start_time())
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    /// Sample every drone at show time `t`, in drone order.
    pub fn states_at(&self, t: f64) -> Vec<DroneState> {
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.drones
                .par_iter()
                .map(|d| d.trajectory.state_at(t))
                .collect()
        }

        #[cfg(target_arch = "wasm32")]
        {
            self.drones
                .iter()
                .map(|d| d.trajectory.state_at(t))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::TrajectorySample;
    use glam::Vec3;

    fn line(start: f64, end: f64, to: Vec3) -> Trajectory {
        Trajectory::new(vec![
            TrajectorySample::new(start, Vec3::ZERO),
            TrajectorySample::new(end, to),
        ])
        .unwrap()
    }

    #[test]
    fn test_duration_is_latest_end() {
        let show = Show::new(
            Some("Test".to_string()),
            vec![
                DroneRecord::new("a", line(0.0, 4.0, Vec3::X)),
                DroneRecord::new("b", line(1.0, 9.5, Vec3::Y)),
            ],
        )
        .unwrap();

        assert_eq!(show.duration(), 9.5);
        assert_eq!(show.start_time(), 0.0);
        assert_eq!(show.title(), Some("Test"));
        assert_eq!(show.len(), 2);
        assert!(show.drone("b").is_some());
        assert!(show.drone("c").is_none());
    }

    #[test]
    fn test_empty_show() {
        let show = Show::new(None, vec![]).unwrap();
        assert!(show.is_empty());
        assert_eq!(show.duration(), 0.0);
        assert_eq!(show.start_time(), 0.0);
        assert!(show.states_at(1.0).is_empty());
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Show::new(
            None,
            vec![
                DroneRecord::new("a", line(0.0, 1.0, Vec3::X)),
                DroneRecord::new("a", line(0.0, 1.0, Vec3::Y)),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, TrajectoryError::Format { ref drone, .. } if drone == "a"));
    }

    #[test]
    fn test_states_follow_drone_order() {
        let drones: Vec<_> = (0..100)
            .map(|i| DroneRecord::new(format!("d{i}"), line(0.0, 1.0, Vec3::splat(i as f32))))
            .collect();
        let show = Show::new(None, drones).unwrap();

        let states = show.states_at(0.5);
        assert_eq!(states.len(), 100);
        for (i, state) in states.iter().enumerate() {
            assert_eq!(state.position, Vec3::splat(i as f32 * 0.5));
        }

        // Same time, same answer
        assert_eq!(show.states_at(0.5), states);
    }

    #[test]
    fn test_invalid_trajectory_mapping() {
        let err = TrajectoryError::invalid("x", InvalidTrajectory::Empty);
        assert!(matches!(err, TrajectoryError::Empty { ref drone } if drone == "x"));

        let err = TrajectoryError::invalid("x", InvalidTrajectory::NonFinite { index: 3 });
        assert!(matches!(err, TrajectoryError::Format { .. }));
    }
}
