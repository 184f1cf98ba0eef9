//! Drone registry: one visual handle per decoded drone.

use std::collections::HashMap;

use crate::trajectory::{DroneRecord, DroneState};

/// Presentation-layer capabilities the registry and playback drive.
///
/// Implementations wrap whatever scene graph draws the drones; the core
/// never touches rendering directly.
pub trait SceneGraph {
    /// Visual object standing for one drone. New handles are cloned from a template.
    type Handle: Clone;

    /// Attach a handle to the scene.
    fn add(&mut self, id: &str, handle: &Self::Handle);

    /// Detach a handle from the scene.
    fn remove(&mut self, id: &str, handle: &Self::Handle);

    /// Write a sampled drone state into its handle.
    fn apply(&mut self, handle: &mut Self::Handle, state: &DroneState);
}

/// A registered drone and its handle.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredDrone<H> {
    pub id: String,
    pub handle: H,
}

/// Drone id to handle mapping, kept in show order.
#[derive(Debug, Clone)]
pub struct DroneRegistry<H> {
    drones: Vec<RegisteredDrone<H>>,
    index: HashMap<String, usize>,
}

impl<H> Default for DroneRegistry<H> {
    fn default() -> Self {
        Self {
            drones: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<H: Clone> DroneRegistry<H> {
    /// Empty registry with nothing attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clone `template` once per record and attach every clone to `scene`.
    pub fn instantiate<S>(records: &[DroneRecord], template: &H, scene: &mut S) -> Self
    where
        S: SceneGraph<Handle = H>,
    {
        let mut drones = Vec::with_capacity(records.len());
        let mut index = HashMap::with_capacity(records.len());

        for record in records {
            let handle = template.clone();
            scene.add(&record.id, &handle);
            index.insert(record.id.clone(), drones.len());
            drones.push(RegisteredDrone {
                id: record.id.clone(),
                handle,
            });
        }

        log::debug!("Registered {} drones", drones.len());
        Self { drones, index }
    }

    /// Detach every handle from `scene`, returning how many were removed.
    ///
    /// Calling this on an empty or already torn-down registry is a no-op.
    pub fn teardown<S>(&mut self, scene: &mut S) -> usize
    where
        S: SceneGraph<Handle = H>,
    {
        let removed = self.drones.len();
        for drone in self.drones.drain(..) {
            scene.remove(&drone.id, &drone.handle);
        }
        self.index.clear();

        if removed > 0 {
            log::debug!("Removed {removed} drones");
        }
        removed
    }

    /// Apply one state per drone, in registration order.
    pub fn apply_states<S>(&mut self, states: &[DroneState], scene: &mut S)
    where
        S: SceneGraph<Handle = H>,
    {
        if states.len() != self.drones.len() {
            log::warn!(
                "Got {} drone states for {} registered drones",
                states.len(),
                self.drones.len()
            );
        }
        for (drone, state) in self.drones.iter_mut().zip(states) {
            scene.apply(&mut drone.handle, state);
        }
    }

    pub fn len(&self) -> usize {
        self.drones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drones.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&H> {
        self.index.get(id).map(|&i| &self.drones[i].handle)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut H> {
        self.index.get(id).map(|&i| &mut self.drones[i].handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredDrone<H>> {
        self.drones.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.drones.iter().map(|d| d.id.as_str())
    }
}
