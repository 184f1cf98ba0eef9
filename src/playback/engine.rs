//! Playback clock: advances show time while playing and samples the show.

use super::state::ShowState;
use crate::schema::PlaybackConfig;
use crate::trajectory::{DroneState, Show};

/// Frame-driven playback clock for one show.
///
/// Sampling depends only on `current_time`, never on the sequence of
/// frames that led there.
#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    state: ShowState,
    duration: f64,
    looping: bool,
    time_scale: f64,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}

impl PlaybackEngine {
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            state: ShowState::default(),
            duration: 0.0,
            looping: config.looping,
            time_scale: config.time_scale,
        }
    }

    pub fn state(&self) -> ShowState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing
    }

    pub fn current_time(&self) -> f64 {
        self.state.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Set the length of the loaded show. Negative or non-finite values become 0.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
    }

    pub fn play(&mut self) {
        self.state.playing = true;
    }

    pub fn pause(&mut self) {
        self.state.playing = false;
    }

    pub fn toggle(&mut self) {
        self.state.playing = !self.state.playing;
    }

    /// Jump to show time `t` without changing the play state.
    pub fn seek(&mut self, t: f64) {
        if !t.is_finite() {
            log::warn!("Ignoring seek to non-finite time {t}");
            return;
        }
        self.state.current_time = t;
    }

    /// Rewind to the start of the show.
    pub fn reset(&mut self) {
        self.state.current_time = 0.0;
    }

    /// Whether a non-looping show has reached its end.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.state.current_time >= self.duration
    }

    /// Advance the clock by `delta` wall-clock seconds.
    ///
    /// Returns whether `current_time` changed. Paused engines, negative
    /// deltas and non-finite deltas leave the clock untouched.
    pub fn advance(&mut self, delta: f64) -> bool {
        if !self.state.playing {
            return false;
        }
        if !delta.is_finite() || delta < 0.0 {
            log::debug!("Ignoring frame delta {delta}");
            return false;
        }

        let previous = self.state.current_time;
        let next = previous + delta * self.time_scale;

        let next = if self.looping {
            if self.duration > 0.0 {
                next.rem_euclid(self.duration)
            } else {
                0.0
            }
        } else if previous >= self.duration {
            previous
        } else {
            next.min(self.duration)
        };

        self.state.current_time = next;
        next != previous
    }

    /// Drone states at the current time, in show order.
    pub fn sample(&self, show: &Show) -> Vec<DroneState> {
        show.states_at(self.state.current_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{example_show, fan_show};
    use glam::Vec3;
    use proptest::prelude::*;

    fn playing_engine(duration: f64, looping: bool) -> PlaybackEngine {
        let mut engine = PlaybackEngine::new(&PlaybackConfig {
            looping,
            time_scale: 1.0,
        });
        engine.set_duration(duration);
        engine.play();
        engine
    }

    #[test]
    fn test_controls() {
        let mut engine = PlaybackEngine::default();
        assert!(!engine.is_playing());

        engine.toggle();
        assert!(engine.is_playing());
        engine.toggle();
        assert!(!engine.is_playing());

        engine.play();
        engine.seek(3.5);
        assert!(engine.is_playing());
        assert_eq!(engine.current_time(), 3.5);

        engine.seek(f64::NAN);
        assert_eq!(engine.current_time(), 3.5);

        engine.reset();
        assert_eq!(engine.current_time(), 0.0);
        assert!(engine.is_playing());
    }

    #[test]
    fn test_paused_engine_does_not_advance() {
        let mut engine = playing_engine(10.0, false);
        engine.pause();
        engine.seek(2.0);
        for _ in 0..10 {
            assert!(!engine.advance(0.1));
        }
        assert_eq!(engine.current_time(), 2.0);
    }

    #[test]
    fn test_zero_delta_is_idempotent() {
        let show = example_show();
        let mut engine = playing_engine(show.duration(), false);
        engine.seek(1.0);
        let before = engine.sample(&show);

        assert!(!engine.advance(0.0));
        assert_eq!(engine.current_time(), 1.0);
        assert_eq!(engine.sample(&show), before);
    }

    #[test]
    fn test_invalid_deltas_are_ignored() {
        let mut engine = playing_engine(10.0, false);
        engine.seek(4.0);
        assert!(!engine.advance(-1.0));
        assert!(!engine.advance(f64::INFINITY));
        assert!(!engine.advance(f64::NAN));
        assert_eq!(engine.current_time(), 4.0);
    }

    #[test]
    fn test_time_scale() {
        let mut engine = PlaybackEngine::new(&PlaybackConfig {
            looping: false,
            time_scale: 2.0,
        });
        engine.set_duration(10.0);
        engine.play();
        assert!(engine.advance(1.5));
        assert_eq!(engine.current_time(), 3.0);
    }

    #[test]
    fn test_clamps_at_end_by_default() {
        let show = example_show();
        let mut engine = playing_engine(show.duration(), false);

        engine.seek(4.5);
        assert!(engine.advance(1.0));
        assert_eq!(engine.current_time(), 5.0);
        assert!(engine.is_finished());
        assert!(engine.is_playing());

        // Holds the last frame
        assert!(!engine.advance(1.0));
        assert_eq!(engine.current_time(), 5.0);
        assert_eq!(engine.sample(&show)[0].position, Vec3::new(10.0, 0.0, 10.0));
    }

    #[test]
    fn test_loops_when_enabled() {
        let mut engine = playing_engine(5.0, true);
        engine.seek(4.5);
        assert!(engine.advance(1.0));
        assert!((engine.current_time() - 0.5).abs() < 1e-12);
        assert!(!engine.is_finished());
    }

    #[test]
    fn test_loop_with_zero_duration_stays_at_start() {
        let mut engine = playing_engine(0.0, true);
        assert!(!engine.advance(1.0));
        assert_eq!(engine.current_time(), 0.0);
    }

    #[test]
    fn test_set_duration_sanitizes() {
        let mut engine = PlaybackEngine::default();
        engine.set_duration(-3.0);
        assert_eq!(engine.duration(), 0.0);
        engine.set_duration(f64::NAN);
        assert_eq!(engine.duration(), 0.0);
    }

    #[test]
    fn test_sample_matches_direct_query() {
        let show = fan_show(64, 8.0);
        let mut engine = playing_engine(show.duration(), false);
        engine.seek(2.0);

        let states = engine.sample(&show);
        for (record, state) in show.drones().iter().zip(&states) {
            assert_eq!(*state, record.trajectory.state_at(2.0));
        }
    }

    proptest! {
        #[test]
        fn prop_sampling_ignores_frame_history(
            deltas in prop::collection::vec(0.0f64..0.5, 1..40),
        ) {
            let show = example_show();
            let mut stepped = playing_engine(show.duration(), false);
            for delta in &deltas {
                stepped.advance(*delta);
            }

            let mut direct = PlaybackEngine::default();
            direct.set_duration(show.duration());
            direct.seek(stepped.current_time());

            prop_assert_eq!(stepped.sample(&show), direct.sample(&show));
        }

        #[test]
        fn prop_clamped_time_stays_in_range(
            deltas in prop::collection::vec(0.0f64..3.0, 1..40),
        ) {
            let mut engine = playing_engine(5.0, false);
            for delta in &deltas {
                engine.advance(*delta);
                prop_assert!((0.0..=5.0).contains(&engine.current_time()));
            }
        }

        #[test]
        fn prop_looped_time_stays_in_range(
            deltas in prop::collection::vec(0.0f64..3.0, 1..40),
        ) {
            let mut engine = playing_engine(5.0, true);
            for delta in &deltas {
                engine.advance(*delta);
                prop_assert!((0.0..5.0).contains(&engine.current_time()));
            }
        }
    }
}
