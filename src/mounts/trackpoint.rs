use crate::params::PLATE_THICKNESS;
use crate::scad::{cube, cylinder_outer, hull, sphere, Shape};

/// A mount for a TrackPoint module, placed between keys like a switch.
///
/// The stick's stem passes up between the keycaps; the module's board is
/// screwed to the underside of the mount.
pub struct TrackPointMount {
    stem_hole_radius_lower: f64,
    stem_hole_radius_upper: f64,
    screw_hole_radius: f64,
    screw_hole_offset: f64,
    mount_thickness: f64,

    stem_radius: f64,
    // Barbells are about the only thing that comes in this length.
    stem_length: f64,
    ball_radius: f64,
    stem_base_height: f64,

    board_size: (f64, f64, f64),
    z_offset: f64,
}

impl Default for TrackPointMount {
    fn default() -> Self {
        Self {
            stem_hole_radius_lower: 7.8 / 2.,
            stem_hole_radius_upper: 6.5 / 2.,
            screw_hole_radius: 2. / 2.,
            screw_hole_offset: 18.75 / 2.,
            mount_thickness: PLATE_THICKNESS * 1.5,
            stem_radius: 0.6,
            stem_length: 25.,
            ball_radius: 1.5,
            stem_base_height: 2.,
            board_size: (23.5, 17., 1.),
            z_offset: 5.,
        }
    }
}

impl TrackPointMount {
    pub fn holes(&self) -> Shape {
        let through = self.mount_thickness * 2.2;
        let (board_x, board_y, board_z) = self.board_size;
        (cylinder_outer(self.stem_hole_radius_lower, 2., true)
            .translate((0., 0., 0.5 - self.mount_thickness))
            + cylinder_outer(self.stem_hole_radius_upper, through, true)
            + cylinder_outer(self.screw_hole_radius, through, true)
                .translate((self.screw_hole_offset, 0., 0.))
            + cylinder_outer(self.screw_hole_radius, through, true)
                .translate((-self.screw_hole_offset, 0., 0.))
            + cube(board_x, board_y, board_z).translate((0., 0., -self.mount_thickness)))
        .down(self.z_offset)
    }

    pub fn mount(&self) -> Shape {
        let surround_radius = self.screw_hole_radius * 2.5;
        let cutout_x = 7.;
        let cutout_y = surround_radius + 5.;
        let bar = hull([
            cylinder_outer(surround_radius, self.mount_thickness, true)
                .translate((self.screw_hole_offset, 0., 0.)),
            cylinder_outer(surround_radius, self.mount_thickness, true)
                .translate((-self.screw_hole_offset, 0., 0.)),
        ])
        .down(self.mount_thickness / 2.);

        // Notches around the stem leave room for the neighboring switches.
        let notch = cube(10., 10., 20.);
        [(1., 1.), (-1., 1.), (1., -1.), (-1., -1.)]
            .into_iter()
            .fold(bar, |shape, (x, y)| {
                shape - notch.translate((x * cutout_x, y * cutout_y, 0.))
            })
            .down(self.z_offset)
            .color((0., 1., 0.))
    }

    /// The stick itself, for preview renders.
    pub fn stick(&self) -> Shape {
        (cylinder_outer(self.stem_radius, self.stem_length, true)
            + sphere(self.ball_radius, Some(12)).up(self.stem_length / 2.))
        .up(self.stem_length / 2. - self.mount_thickness + self.stem_base_height)
        .down(self.z_offset)
        .color((0.8, 0.8, 0.8))
    }
}
