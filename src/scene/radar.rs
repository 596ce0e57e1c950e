//! On-screen radar: world points projected onto a small compass disc

use nalgebra::Vector2;

use super::WorldPoint;
use crate::constants::RADAR_DIAMETER;
use crate::location::WorldLocation;

/// Radar positions in the radar's local units, centered on the viewer
///
/// Points within range are in `inside`; points beyond it are pinned to the
/// rim in `edge`, keeping their direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadarBlips {
    pub inside: Vec<Vector2<f32>>,
    pub edge: Vec<Vector2<f32>>,
}

/// Projects world points onto the radar disc
///
/// The disc has diameter [`RADAR_DIAMETER`] and covers `range` meters. It is
/// rotated by the viewer's bearing so the current heading points up (+y).
pub fn radar_blips(origin: &WorldLocation, points: &[WorldPoint], range: f32) -> RadarBlips {
    let radius = RADAR_DIAMETER / 2.0;
    let scale = if range > 0.0 { radius / range } else { 0.0 };

    let (sin_b, cos_b) = (origin.rotation() as f32).sin_cos();

    let mut blips = RadarBlips::default();
    for point in points {
        let relative = origin.relative_position_of(&point.location);
        let (east, north) = (relative.x as f32, relative.y as f32);

        let rotated = Vector2::new(east * cos_b - north * sin_b, east * sin_b + north * cos_b);
        let blip = rotated * scale;

        if blip.norm() <= radius {
            blips.inside.push(blip);
        } else {
            blips.edge.push(blip.normalize() * radius);
        }
    }
    blips
}
