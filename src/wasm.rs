//! WebAssembly bindings for the show player.
//!
//! Provides a thin wrapper around `ShowSession` for the browser viewer,
//! which renders the flat position and color buffers itself.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::{
    playback::{ShowSession, ShowState},
    scene::{Marker, MarkerScene, flatten_colors, flatten_positions},
    schema::PlaybackConfig,
};

/// Initialize WASM module with panic hook and logging.
#[wasm_bindgen(start)]
pub fn init() {
    // Set panic hook for better error messages in browser
    console_error_panic_hook::set_once();

    // Initialize WASM logger
    wasm_logger::init(wasm_logger::Config::default());
}

/// WebAssembly wrapper for a viewer session.
#[wasm_bindgen]
pub struct WasmShowSession {
    session: ShowSession<MarkerScene>,
}

#[wasm_bindgen]
impl WasmShowSession {
    /// Create an empty session from JSON playback configuration.
    ///
    /// An empty string selects the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Result<WasmShowSession, JsValue> {
        let config: PlaybackConfig = if config_json.trim().is_empty() {
            PlaybackConfig::default()
        } else {
            serde_json::from_str(config_json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config JSON: {e}")))?
        };
        config
            .validate()
            .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))?;

        Ok(WasmShowSession {
            session: ShowSession::new(MarkerScene::new(), Marker::default(), &config),
        })
    }

    /// Load a show archive. On error the previous show stays loaded.
    #[wasm_bindgen(js_name = setFile)]
    pub fn set_file(&mut self, name: &str, bytes: &[u8]) -> Result<(), JsValue> {
        self.session
            .set_file(name, bytes)
            .map(|_| ())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.session.play();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.session.pause();
    }

    #[wasm_bindgen]
    pub fn toggle(&mut self) {
        self.session.toggle();
    }

    #[wasm_bindgen]
    pub fn seek(&mut self, t: f64) {
        self.session.seek(t);
    }

    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Advance by one frame of `dt` seconds. Returns whether time moved.
    #[wasm_bindgen]
    pub fn advance(&mut self, dt: f64) -> bool {
        self.session.advance(dt)
    }

    /// Drone positions as flat `[x, y, z, ...]`, in drone order.
    #[wasm_bindgen(js_name = getPositions)]
    pub fn get_positions(&self) -> Vec<f32> {
        flatten_positions(self.session.registry())
    }

    /// Drone colors as flat `[r, g, b, ...]`, in drone order.
    #[wasm_bindgen(js_name = getColors)]
    pub fn get_colors(&self) -> Vec<u8> {
        flatten_colors(self.session.registry())
    }

    #[wasm_bindgen(js_name = getDroneIds)]
    pub fn get_drone_ids(&self) -> js_sys::Array {
        self.session
            .registry()
            .ids()
            .map(JsValue::from_str)
            .collect()
    }

    #[wasm_bindgen(js_name = getCurrentFile)]
    pub fn get_current_file(&self) -> Option<String> {
        self.session.current_file().map(str::to_string)
    }

    #[wasm_bindgen(js_name = getTime)]
    pub fn get_time(&self) -> f64 {
        self.session.current_time()
    }

    #[wasm_bindgen(js_name = getDuration)]
    pub fn get_duration(&self) -> f64 {
        self.session.duration()
    }

    #[wasm_bindgen(js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.session.is_playing()
    }

    #[wasm_bindgen(js_name = getDroneCount)]
    pub fn get_drone_count(&self) -> usize {
        self.session.drone_count()
    }

    /// Get playback state and show summary as a JS object.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        let snapshot = SessionSnapshot {
            file: self.session.current_file(),
            title: self.session.show().and_then(|s| s.title()),
            playback: self.session.engine().state(),
            duration: self.session.duration(),
            drones: self.session.drone_count(),
        };

        serde_wasm_bindgen::to_value(&snapshot)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }
}

/// Serializable summary of a session.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot<'a> {
    file: Option<&'a str>,
    title: Option<&'a str>,
    playback: ShowState,
    duration: f64,
    drones: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    use crate::archive::CompressionMethod;
    use crate::loader::pack_show;
    use crate::test_support::example_show;

    #[wasm_bindgen_test]
    fn test_session_round() {
        let mut session = WasmShowSession::new("").unwrap();
        let bytes = pack_show(&example_show(), CompressionMethod::Deflate).unwrap();
        session.set_file("example.skyc", &bytes).unwrap();

        assert_eq!(session.get_drone_count(), 2);
        assert_eq!(session.get_positions().len(), 6);
        assert_eq!(session.get_colors().len(), 6);

        session.play();
        assert!(session.advance(1.0));
        assert_eq!(session.get_time(), 1.0);

        assert!(session.set_file("bad.skyc", b"nope").is_err());
        assert_eq!(session.get_current_file().as_deref(), Some("example.skyc"));
    }
}
