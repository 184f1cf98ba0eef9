//! Viewer session: the current show, its drones and the playback clock.

use super::engine::PlaybackEngine;
use crate::loader::{LoadError, load_show};
use crate::scene::{DroneRegistry, SceneGraph};
use crate::schema::PlaybackConfig;
use crate::trajectory::{DroneState, Show};

/// One viewer session driving a scene.
///
/// Loading is all-or-nothing: a file that fails to decode leaves the
/// previous show, its handles and the clock exactly as they were.
pub struct ShowSession<S: SceneGraph> {
    scene: S,
    template: S::Handle,
    engine: PlaybackEngine,
    show: Option<Show>,
    current_file: Option<String>,
    registry: DroneRegistry<S::Handle>,
}

impl<S: SceneGraph> ShowSession<S> {
    /// Empty session; new drones are cloned from `template`.
    pub fn new(scene: S, template: S::Handle, config: &PlaybackConfig) -> Self {
        Self {
            scene,
            template,
            engine: PlaybackEngine::new(config),
            show: None,
            current_file: None,
            registry: DroneRegistry::new(),
        }
    }

    /// Decode `bytes` and make it the current show.
    pub fn set_file(&mut self, name: &str, bytes: &[u8]) -> Result<&Show, LoadError> {
        let show = match load_show(bytes) {
            Ok(show) => show,
            Err(e) => {
                log::warn!("Failed to load {name:?}: {e}");
                return Err(e);
            }
        };
        Ok(self.set_show(Some(name), show))
    }

    /// Replace the current show with an already decoded one.
    ///
    /// `name` becomes the current file; `None` means the show has no backing file.
    pub fn set_show(&mut self, name: Option<&str>, show: Show) -> &Show {
        self.current_file = name.map(str::to_string);
        self.registry.teardown(&mut self.scene);
        self.registry = DroneRegistry::instantiate(show.drones(), &self.template, &mut self.scene);

        self.engine.set_duration(show.duration());
        self.engine.reset();

        let show = self.show.insert(show);
        let states = self.engine.sample(show);
        self.registry.apply_states(&states, &mut self.scene);
        show
    }

    /// Drop the current show and detach its drones.
    pub fn unload(&mut self) {
        self.registry.teardown(&mut self.scene);
        self.show = None;
        self.current_file = None;
        self.engine.set_duration(0.0);
        self.engine.reset();
    }

    pub fn play(&mut self) {
        self.engine.play();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn toggle(&mut self) {
        self.engine.toggle();
    }

    pub fn seek(&mut self, t: f64) {
        self.engine.seek(t);
        self.refresh();
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.refresh();
    }

    /// Advance by one frame of `delta` seconds, returning whether time moved.
    pub fn advance(&mut self, delta: f64) -> bool {
        let moved = self.engine.advance(delta);
        if moved {
            self.refresh();
        }
        moved
    }

    /// Re-apply the frame at the current time to every handle.
    fn refresh(&mut self) {
        if let Some(show) = &self.show {
            let states = self.engine.sample(show);
            self.registry.apply_states(&states, &mut self.scene);
        }
    }

    /// Drone states at the current time, empty without a show.
    pub fn states(&self) -> Vec<DroneState> {
        self.show
            .as_ref()
            .map(|show| self.engine.sample(show))
            .unwrap_or_default()
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn show(&self) -> Option<&Show> {
        self.show.as_ref()
    }

    pub fn registry(&self) -> &DroneRegistry<S::Handle> {
        &self.registry
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn engine(&self) -> &PlaybackEngine {
        &self.engine
    }

    pub fn current_time(&self) -> f64 {
        self.engine.current_time()
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    pub fn duration(&self) -> f64 {
        self.engine.duration()
    }

    pub fn drone_count(&self) -> usize {
        self.registry.len()
    }
}
