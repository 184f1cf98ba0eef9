//! Show fixtures shared by unit tests.

use glam::Vec3;
use serde_json::json;

use crate::archive::{ArchiveWriter, CompressionMethod, SHOW_MEMBER};
use crate::trajectory::{DroneRecord, Rgb, Show, Trajectory, TrajectorySample};

/// Two drones: the documented three-keyframe path and a vertical climb.
pub fn example_show() -> Show {
    let path = Trajectory::new(vec![
        TrajectorySample::new(0.0, Vec3::new(0.0, 0.0, 0.0)),
        TrajectorySample::new(2.0, Vec3::new(10.0, 0.0, 0.0)).with_color(Rgb::new(255, 0, 0)),
        TrajectorySample::new(5.0, Vec3::new(10.0, 0.0, 10.0)),
    ])
    .unwrap();

    let climb = Trajectory::new(vec![
        TrajectorySample::new(1.0, Vec3::new(5.0, 0.0, 0.0)),
        TrajectorySample::new(4.0, Vec3::new(5.0, 6.0, 0.0)),
    ])
    .unwrap();

    Show::new(
        Some("Example".to_string()),
        vec![DroneRecord::new("d1", path), DroneRecord::new("d2", climb)],
    )
    .unwrap()
}

/// Show with `count` drones all flying from the origin to `(i, 0, 0)` over `duration`.
pub fn fan_show(count: usize, duration: f64) -> Show {
    let drones = (0..count)
        .map(|i| {
            let trajectory = Trajectory::new(vec![
                TrajectorySample::new(0.0, Vec3::ZERO),
                TrajectorySample::new(duration, Vec3::new(i as f32, 0.0, 0.0)),
            ])
            .unwrap();
            DroneRecord::new(format!("fan-{i}"), trajectory)
        })
        .collect();
    Show::new(None, drones).unwrap()
}

/// Build archive bytes from raw keyframes, bypassing trajectory validation.
pub fn show_archive(drones: &[(&str, Vec<(f64, Vec3)>)]) -> Vec<u8> {
    let drones: Vec<_> = drones
        .iter()
        .map(|(name, points)| {
            let points: Vec<_> = points
                .iter()
                .map(|(t, p)| json!([t, [p.x, p.y, p.z]]))
                .collect();
            json!({ "settings": { "name": name, "trajectory": { "version": 1, "points": points } } })
        })
        .collect();

    let document = json!({ "version": 1, "swarm": { "drones": drones } });
    let mut writer = ArchiveWriter::new(CompressionMethod::Deflate);
    writer
        .add_member(SHOW_MEMBER, &serde_json::to_vec(&document).unwrap())
        .unwrap();
    writer.finish().unwrap()
}
