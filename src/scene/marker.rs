//! In-memory scene adapter whose handles store the last applied state.
//!
//! Used by the headless CLI and the WebAssembly bindings, which hand flat
//! position/color buffers to whatever renders the drones.

use std::collections::BTreeSet;

use glam::Vec3;

use super::registry::{DroneRegistry, SceneGraph};
use crate::trajectory::{DroneState, Rgb};

/// Color of a drone whose light has not been switched on yet.
pub const DEFAULT_MARKER_COLOR: Rgb = Rgb::new(0xcf, 0x16, 0x57);

/// Drone marker: position and displayed color.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Color shown while no light event is active.
    pub base_color: Rgb,
    pub position: Vec3,
    pub color: Rgb,
}

impl Marker {
    pub fn new(base_color: Rgb) -> Self {
        Self {
            base_color,
            position: Vec3::ZERO,
            color: base_color,
        }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_COLOR)
    }
}

/// Scene that tracks which drone ids are attached.
#[derive(Debug, Default)]
pub struct MarkerScene {
    attached: BTreeSet<String>,
    removals: usize,
    applied: u64,
}

impl MarkerScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.attached.contains(id)
    }

    /// Number of attached markers.
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Total markers removed over the scene's lifetime.
    pub fn removals(&self) -> usize {
        self.removals
    }

    /// Total state writes over the scene's lifetime.
    pub fn applied(&self) -> u64 {
        self.applied
    }
}

impl SceneGraph for MarkerScene {
    type Handle = Marker;

    fn add(&mut self, id: &str, _handle: &Marker) {
        self.attached.insert(id.to_string());
    }

    fn remove(&mut self, id: &str, _handle: &Marker) {
        if self.attached.remove(id) {
            self.removals += 1;
        }
    }

    fn apply(&mut self, handle: &mut Marker, state: &DroneState) {
        handle.position = state.position;
        handle.color = state.color.unwrap_or(handle.base_color);
        self.applied += 1;
    }
}

/// Marker positions as a flat `[x0, y0, z0, x1, ...]` buffer.
pub fn flatten_positions(registry: &DroneRegistry<Marker>) -> Vec<f32> {
    registry
        .iter()
        .flat_map(|d| d.handle.position.to_array())
        .collect()
}

/// Marker colors as a flat `[r0, g0, b0, r1, ...]` buffer.
pub fn flatten_colors(registry: &DroneRegistry<Marker>) -> Vec<u8> {
    registry
        .iter()
        .flat_map(|d| [d.handle.color.r, d.handle.color.g, d.handle.color.b])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::example_show;

    #[test]
    fn test_apply_falls_back_to_base_color() {
        let mut scene = MarkerScene::new();
        let mut marker = Marker::default();

        scene.apply(
            &mut marker,
            &DroneState {
                position: Vec3::new(1.0, 2.0, 3.0),
                color: Some(Rgb::WHITE),
            },
        );
        assert_eq!(marker.color, Rgb::WHITE);

        scene.apply(
            &mut marker,
            &DroneState {
                position: Vec3::ZERO,
                color: None,
            },
        );
        assert_eq!(marker.color, DEFAULT_MARKER_COLOR);
        assert_eq!(scene.applied(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_ignored() {
        let mut scene = MarkerScene::new();
        scene.remove("ghost", &Marker::default());
        assert_eq!(scene.removals(), 0);
    }

    #[test]
    fn test_flatten_buffers() {
        let show = example_show();
        let mut scene = MarkerScene::new();
        let mut registry = DroneRegistry::instantiate(show.drones(), &Marker::default(), &mut scene);
        registry.apply_states(&show.states_at(2.0), &mut scene);

        let positions = flatten_positions(&registry);
        let expected = [10.0, 0.0, 0.0, 5.0, 2.0, 0.0];
        assert_eq!(positions.len(), expected.len());
        for (got, want) in positions.iter().zip(expected) {
            assert!((got - want).abs() < 1e-5, "{positions:?}");
        }
        assert_eq!(
            flatten_colors(&registry),
            vec![255, 0, 0, 0xcf, 0x16, 0x57]
        );
    }
}
