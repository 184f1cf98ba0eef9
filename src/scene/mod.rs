//! Drone handles and the scene graph they live in.

mod marker;
mod registry;

pub use marker::{DEFAULT_MARKER_COLOR, Marker, MarkerScene, flatten_colors, flatten_positions};
pub use registry::{DroneRegistry, RegisteredDrone, SceneGraph};
