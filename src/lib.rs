//! Skyc player - Drone light show decoding and playback.
//!
//! This crate loads `.skyc` show archives, decodes every drone's timed
//! trajectory and plays the show back frame by frame, driving one visual
//! handle per drone through an injected scene graph.
//!
//! # Architecture
//!
//! - `archive`: ZIP container reading and writing
//! - `trajectory`: show document decoding and position/color queries
//! - `loader`: archive bytes to a decoded `Show`
//! - `scene`: drone registry and the scene graph capability
//! - `playback`: playback clock and viewer session
//! - `schema`: viewer configuration and the show manifest
//! - `library`: show files on disk (native only)
//!
//! # Example
//!
//! ```rust,no_run
//! use skyc_player::{
//!     playback::ShowSession,
//!     scene::{Marker, MarkerScene},
//!     schema::PlaybackConfig,
//! };
//!
//! let bytes = std::fs::read("sample_data/opening.skyc").unwrap();
//!
//! let mut session = ShowSession::new(MarkerScene::new(), Marker::default(), &PlaybackConfig::default());
//! session.set_file("opening.skyc", &bytes).unwrap();
//!
//! // Play one second at 60 frames per second
//! session.play();
//! for _ in 0..60 {
//!     session.advance(1.0 / 60.0);
//! }
//!
//! println!("{} drones at t = {:.2}s", session.drone_count(), session.current_time());
//! ```

pub mod archive;
pub mod loader;
pub mod playback;
pub mod scene;
pub mod schema;
pub mod trajectory;

// Show files on disk (native only)
#[cfg(not(target_arch = "wasm32"))]
pub mod library;

// WebAssembly bindings (only for wasm32 target)
#[cfg(target_arch = "wasm32")]
pub mod wasm;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use archive::{ArchiveError, ShowArchive};
pub use loader::{LoadError, load_show};
pub use playback::{PlaybackEngine, ShowSession, ShowState};
pub use scene::{DroneRegistry, SceneGraph};
pub use schema::{PlaybackConfig, ViewerConfig};
pub use trajectory::{DroneRecord, DroneState, Show, Trajectory, TrajectoryError};
