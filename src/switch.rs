use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::angle::Angle;
use crate::layout::Position;
use crate::params::{
    BACKPLATE_HOLES, BACKPLATE_LED_XY, BACKPLATE_LED_Y, BACKPLATE_THICKNESS, EPSILON,
    KEYSWITCH_LENGTH, KEYSWITCH_WIDTH, PLATE_THICKNESS, SOCKET_NUB_DEPTH, SOCKET_NUB_LENGTH,
    SOCKET_NUB_RADIUS, SWITCH_BOTTOM_HOUSING_XYZ, SWITCH_STEM_XYZ, SWITCH_TOP_HOUSING_XYZ,
};
use crate::scad::{cube, cylinder, cylinder_outer, hull, text, Shape};

/// Which plate to print under each key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SocketKind {
    /// A bare plate; also the one to use with single-key PCBs.
    #[default]
    Plain,
    /// A plate with a backplate for hotswap sockets, 5-pin switches and LEDs.
    Backplate,
    /// A plate labeled with its layout position underneath, for troubleshooting.
    Tagged,
}

/// The plate a switch clips into. The top face of the plate is the XY plane,
/// centered on the switch.
pub struct Switch {
    kind: SocketKind,
    wall_thickness: f64,
}

impl Switch {
    pub fn new(kind: SocketKind, wall_thickness: f64) -> Self {
        Self {
            kind,
            wall_thickness,
        }
    }

    pub fn mount_width(&self) -> f64 {
        KEYSWITCH_WIDTH + self.wall_thickness * 2.
    }

    pub fn mount_length(&self) -> f64 {
        KEYSWITCH_LENGTH + self.wall_thickness * 2.
    }

    pub fn socket(&self, position: Position) -> Shape {
        match self.kind {
            SocketKind::Plain => self.plate(),
            SocketKind::Backplate => self.plate_with_backplate(),
            SocketKind::Tagged => self.plate() + tag(position),
        }
    }

    pub fn plate(&self) -> Shape {
        let frame = cube(self.mount_width(), self.mount_length(), PLATE_THICKNESS)
            .down(PLATE_THICKNESS / 2.);
        let hole = cube(
            KEYSWITCH_WIDTH,
            KEYSWITCH_LENGTH,
            PLATE_THICKNESS + 2. * EPSILON,
        )
        .down(PLATE_THICKNESS / 2.);

        // Nubs on the side walls catch the switch clips.
        let nub = hull([
            cylinder(SOCKET_NUB_RADIUS, SOCKET_NUB_LENGTH, true, Some(30))
                .rotate(Angle::Degrees(90.), DVec3::X)
                .translate((KEYSWITCH_WIDTH / 2., 0., -PLATE_THICKNESS + SOCKET_NUB_RADIUS)),
            cube(self.wall_thickness, SOCKET_NUB_LENGTH, SOCKET_NUB_DEPTH).translate((
                (KEYSWITCH_WIDTH + self.wall_thickness) / 2.,
                0.,
                -PLATE_THICKNESS + SOCKET_NUB_DEPTH / 2.,
            )),
        ]);

        frame - hole + nub.clone() + nub.mirror(DVec3::X)
    }

    pub fn plate_with_backplate(&self) -> Shape {
        let backplate = cube(self.mount_width(), self.mount_length(), BACKPLATE_THICKNESS)
            .down(PLATE_THICKNESS + BACKPLATE_THICKNESS / 2.);
        let depth = BACKPLATE_THICKNESS + 2. * EPSILON;
        let holes = BACKPLATE_HOLES.iter().map(|&(x, y, radius)| {
            cylinder_outer(radius, depth, true)
                .translate((x, y, -PLATE_THICKNESS - BACKPLATE_THICKNESS / 2.))
        });
        let led = cube(BACKPLATE_LED_XY.0, BACKPLATE_LED_XY.1, depth)
            .translate((0., BACKPLATE_LED_Y, -PLATE_THICKNESS - BACKPLATE_THICKNESS / 2.));

        holes.fold(self.plate() + backplate, |shape, hole| shape - hole) - led
    }
}

fn tag(position: Position) -> Shape {
    text(
        &format!("{},{}", position.column, position.row),
        KEYSWITCH_LENGTH / 3.,
        None,
    )
    .linear_extrude(1.)
    .down(PLATE_THICKNESS + 1.)
}

/// A rough MX switch, for preview renders.
pub fn switch_body() -> Shape {
    let top = SWITCH_TOP_HOUSING_XYZ;
    let bottom = SWITCH_BOTTOM_HOUSING_XYZ;
    let stem = SWITCH_STEM_XYZ;
    cube(top.x, top.y, top.z).up(top.z / 2.)
        + cube(bottom.x, bottom.y, bottom.z).down(bottom.z / 2.)
        + cube(stem.x, stem.y, stem.z).up(top.z + stem.z / 2.)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plate_top_is_flush_with_the_key() {
        let switch = Switch::new(SocketKind::Plain, 1.5);
        let bounds = switch.plate().bounds().unwrap();
        assert!(bounds.max.z.abs() < 1e-9);
        assert!((bounds.min.z + PLATE_THICKNESS).abs() < 1e-9);
        assert!((bounds.size().x - (KEYSWITCH_WIDTH + 3.)).abs() < 1e-9);
    }

    #[test]
    fn backplate_hangs_below_the_plate() {
        let switch = Switch::new(SocketKind::Backplate, 1.5);
        let bounds = switch.socket(Position::new(0., 0.)).bounds().unwrap();
        assert!((bounds.min.z + PLATE_THICKNESS + BACKPLATE_THICKNESS).abs() < 1e-9);
    }

    #[test]
    fn tagged_sockets_name_their_position() {
        let switch = Switch::new(SocketKind::Tagged, 1.5);
        let script = switch.socket(Position::new(2., 0.5)).to_scad();
        assert!(script.contains("text(text=\"2,0.5\""));
    }

    #[test]
    fn switch_sits_on_the_plate() {
        let bounds = switch_body().bounds().unwrap();
        assert!((bounds.min.z + SWITCH_BOTTOM_HOUSING_XYZ.z).abs() < 1e-9);
        assert!(bounds.max.z > SWITCH_TOP_HOUSING_XYZ.z);
    }
}
