//! Playback module - Show clock and viewer session.
//!
//! `PlaybackEngine` owns show time and turns it into per-drone states;
//! `ShowSession` ties the engine to a loaded show and the scene that
//! draws it.

mod engine;
mod session;
mod state;

pub use engine::PlaybackEngine;
pub use session::ShowSession;
pub use state::ShowState;
