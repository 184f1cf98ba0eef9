//! Time-sampled drone trajectories and their interpolation.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// 8-bit RGB light color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One recorded keyframe of a drone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Show time in seconds.
    pub time: f64,
    /// Position in show coordinates (meters).
    pub position: Vec3,
    /// Bézier control points of the segment leading into this sample.
    /// Empty for a straight segment.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Vec3>,
    /// Light color switched on at this sample, held until the next color event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

impl TrajectorySample {
    pub fn new(time: f64, position: Vec3) -> Self {
        Self {
            time,
            position,
            controls: Vec::new(),
            color: None,
        }
    }

    pub fn with_controls(mut self, controls: Vec<Vec3>) -> Self {
        self.controls = controls;
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }

    fn is_finite(&self) -> bool {
        self.time.is_finite()
            && self.position.is_finite()
            && self.controls.iter().all(|c| c.is_finite())
    }
}

/// Instantaneous state of one drone.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DroneState {
    pub position: Vec3,
    pub color: Option<Rgb>,
}

/// Reasons a sample sequence cannot form a trajectory.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidTrajectory {
    #[error("trajectory has no samples")]
    Empty,
    #[error("sample {index} has a non-finite time or coordinate")]
    NonFinite { index: usize },
    #[error("sample {index} at t={time} does not come after t={previous}")]
    OutOfOrder {
        index: usize,
        previous: f64,
        time: f64,
    },
}

/// Where a query time falls relative to the samples.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Span {
    /// At or before the first sample.
    Start,
    /// At or after the last sample.
    End,
    /// Between samples `index` and `index + 1`.
    Segment { index: usize, fraction: f32 },
}

/// Ordered, non-empty keyframe sequence for a single drone.
///
/// Queries clamp to the first and last samples and binary-search the
/// bracketing pair in between, so sampling cost is O(log n).
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
    /// Color in effect at each sample (the latest event at or before it).
    held_colors: Vec<Option<Rgb>>,
}

impl Trajectory {
    /// Build a trajectory, rejecting empty, non-finite or unordered input.
    pub fn new(samples: Vec<TrajectorySample>) -> Result<Self, InvalidTrajectory> {
        if samples.is_empty() {
            return Err(InvalidTrajectory::Empty);
        }

        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(InvalidTrajectory::NonFinite { index });
        }

        for (index, pair) in samples.windows(2).enumerate() {
            if pair[1].time <= pair[0].time {
                return Err(InvalidTrajectory::OutOfOrder {
                    index: index + 1,
                    previous: pair[0].time,
                    time: pair[1].time,
                });
            }
        }

        let mut held_colors = Vec::with_capacity(samples.len());
        let mut current = None;
        for sample in &samples {
            current = sample.color.or(current);
            held_colors.push(current);
        }

        Ok(Self {
            samples,
            held_colors,
        })
    }

    /// Trajectory that holds a single position forever.
    pub fn stationary(position: Vec3) -> Self {
        Self {
            samples: vec![TrajectorySample::new(0.0, position)],
            held_colors: vec![None],
        }
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> &TrajectorySample {
        &self.samples[0]
    }

    pub fn last(&self) -> &TrajectorySample {
        &self.samples[self.samples.len() - 1]
    }

    /// Time of the first sample: the drone's show start offset.
    pub fn start_time(&self) -> f64 {
        self.first().time
    }

    /// Time of the last sample: the drone's show end.
    pub fn end_time(&self) -> f64 {
        self.last().time
    }

    pub fn duration(&self) -> f64 {
        self.end_time() - self.start_time()
    }

    fn locate(&self, t: f64) -> Span {
        if t.is_nan() || t <= self.start_time() {
            return Span::Start;
        }
        if t >= self.end_time() {
            return Span::End;
        }

        // first.time < t < last.time, so 1 <= upper <= len - 1
        let upper = self.samples.partition_point(|s| s.time <= t);
        let a = &self.samples[upper - 1];
        let b = &self.samples[upper];

        Span::Segment {
            index: upper - 1,
            fraction: ((t - a.time) / (b.time - a.time)) as f32,
        }
    }

    /// Position at show time `t`, clamped to the recorded range.
    pub fn position_at(&self, t: f64) -> Vec3 {
        match self.locate(t) {
            Span::Start => self.first().position,
            Span::End => self.last().position,
            Span::Segment { index, fraction } => {
                let a = &self.samples[index];
                let b = &self.samples[index + 1];
                if b.controls.is_empty() {
                    lerp(a.position, b.position, fraction)
                } else {
                    bezier(a.position, &b.controls, b.position, fraction)
                }
            }
        }
    }

    /// Light color at show time `t`: the latest color event at or before `t`.
    pub fn color_at(&self, t: f64) -> Option<Rgb> {
        match self.locate(t) {
            Span::Start => self.held_colors[0],
            Span::End => self.held_colors[self.held_colors.len() - 1],
            Span::Segment { index, .. } => self.held_colors[index],
        }
    }

    pub fn state_at(&self, t: f64) -> DroneState {
        DroneState {
            position: self.position_at(t),
            color: self.color_at(t),
        }
    }
}

#[inline]
fn lerp(a: Vec3, b: Vec3, fraction: f32) -> Vec3 {
    a + (b - a) * fraction
}

/// De Casteljau evaluation of the curve `start, controls..., end`.
fn bezier(start: Vec3, controls: &[Vec3], end: Vec3, fraction: f32) -> Vec3 {
    let mut points: SmallVec<[Vec3; 4]> = SmallVec::with_capacity(controls.len() + 2);
    points.push(start);
    points.extend_from_slice(controls);
    points.push(end);

    for level in (1..points.len()).rev() {
        for i in 0..level {
            points[i] = lerp(points[i], points[i + 1], fraction);
        }
    }
    points[0]
}
