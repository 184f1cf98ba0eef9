use serde::Serialize;

/// Playback state shared with the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowState {
    pub playing: bool,
    /// Show time in seconds.
    pub current_time: f64,
}
