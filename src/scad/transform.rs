use glam::{DAffine3, DMat3, DVec3};

use crate::angle::Angle;

/// An affine step applied to a shape, kept in the form OpenSCAD writes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    Translate(DVec3),
    /// Rotation about an arbitrary (not necessarily unit) axis.
    Rotate { angle: Angle, axis: DVec3 },
    /// Euler rotation in degrees, applied about X, then Y, then Z.
    RotateXyz(DVec3),
    /// Reflection through the plane through the origin with the given normal.
    Mirror(DVec3),
}

impl Transform {
    pub fn affine(&self) -> DAffine3 {
        match *self {
            Transform::Translate(offset) => DAffine3::from_translation(offset),
            Transform::Rotate { angle, axis } => {
                DAffine3::from_axis_angle(axis.normalize(), angle.radians())
            }
            Transform::RotateXyz(degrees) => {
                DAffine3::from_rotation_z(degrees.z.to_radians())
                    * DAffine3::from_rotation_y(degrees.y.to_radians())
                    * DAffine3::from_rotation_x(degrees.x.to_radians())
            }
            Transform::Mirror(normal) => {
                let n = normal.normalize();
                DAffine3::from_mat3(DMat3::from_cols(
                    DVec3::X - 2. * n.x * n,
                    DVec3::Y - 2. * n.y * n,
                    DVec3::Z - 2. * n.z * n,
                ))
            }
        }
    }
}

/// Compose transforms listed in application order into a single matrix.
pub fn compose<'a>(steps: impl IntoIterator<Item = &'a Transform>) -> DAffine3 {
    steps
        .into_iter()
        .fold(DAffine3::IDENTITY, |acc, step| step.affine() * acc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_about_z_turns_x_into_y() {
        let rotation = Transform::Rotate {
            angle: Angle::Degrees(90.),
            axis: DVec3::Z,
        };
        let moved = rotation.affine().transform_point3(DVec3::X);
        assert!(moved.abs_diff_eq(DVec3::Y, 1e-12));
    }

    #[test]
    fn mirror_flips_only_the_normal_component() {
        let mirror = Transform::Mirror(DVec3::new(1., 0., 0.));
        let moved = mirror.affine().transform_point3(DVec3::new(3., 4., 5.));
        assert_eq!(moved, DVec3::new(-3., 4., 5.));
    }

    #[test]
    fn euler_rotation_applies_x_before_z() {
        let rotation = Transform::RotateXyz(DVec3::new(90., 0., 90.));
        // Y goes to Z under X, and Z is unaffected by Z.
        let moved = rotation.affine().transform_point3(DVec3::Y);
        assert!(moved.abs_diff_eq(DVec3::Z, 1e-12));
    }

    #[test]
    fn compose_applies_in_listed_order() {
        let steps = [
            Transform::Translate(DVec3::new(1., 0., 0.)),
            Transform::Rotate {
                angle: Angle::Degrees(90.),
                axis: DVec3::Z,
            },
        ];
        let moved = compose(&steps).transform_point3(DVec3::ZERO);
        assert!(moved.abs_diff_eq(DVec3::Y, 1e-12));
    }
}
