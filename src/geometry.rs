use glam::DVec3;

use crate::angle::Angle;
use crate::scad::Transform;

/// Radius of the arc traced by keys `pitch` apart when each step turns by
/// `curvature`, measured out to the top of the caps.
pub fn curvature_radius(pitch: f64, curvature: Angle, cap_top_height: f64) -> f64 {
    (pitch / 2.) / (curvature.radians() / 2.).sin() + cap_top_height
}

// The "radius trick": drop the shape by `radius`, rotate it about `axis`, and
// lift it back, which swings it along an arc centered `radius` above the key.
pub fn swing(radius: f64, angle: Angle, axis: DVec3) -> [Transform; 3] {
    [
        Transform::Translate(DVec3::new(0., 0., -radius)),
        Transform::Rotate { angle, axis },
        Transform::Translate(DVec3::new(0., 0., radius)),
    ]
}

pub fn is_whole(value: f64) -> bool {
    value.fract() == 0.
}
