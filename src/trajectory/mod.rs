//! Trajectory decoding and interpolation.
//!
//! A show is decoded once per file load into a [`Show`]: one
//! [`DroneRecord`] per drone, each owning a [`Trajectory`] of keyframes
//! sorted by strictly increasing time. Playback then samples trajectories
//! as a pure function of show time:
//!
//! - positions interpolate linearly (or along the segment's Bézier curve)
//!   between the bracketing keyframes and clamp outside the recorded range;
//! - colors step: the latest color event at or before the query time holds.

mod document;
mod sample;
mod show;

pub use document::{SHOW_FORMAT_VERSION, decode_document, encode_document};
pub use sample::{DroneState, InvalidTrajectory, Rgb, Trajectory, TrajectorySample};
pub use show::{DroneRecord, Show, TrajectoryError};
