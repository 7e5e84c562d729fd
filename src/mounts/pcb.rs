use crate::params::SWITCH_BOTTOM_HOUSING_XYZ;
use crate::scad::{cube, cylinder, Shape};

const BOARD_SIZE: f64 = 19.15;
const BOARD_THICKNESS: f64 = 1.6;
// x, y, radius
const SCREW_HOLES: [(f64, f64, f64); 4] = [
    (8., 8., 0.5),
    (-8., 8., 0.5),
    (8., -8., 0.5),
    (-8., -8., 0.5),
];

/// A small PCB carrying one switch, screwed to the underside of its socket.
#[derive(Default)]
pub struct SingleKeyPcb;

impl SingleKeyPcb {
    pub fn shape(&self) -> Shape {
        let top = -SWITCH_BOTTOM_HOUSING_XYZ.z;
        let board = cube(BOARD_SIZE, BOARD_SIZE, BOARD_THICKNESS).up(top - BOARD_THICKNESS / 2.);
        SCREW_HOLES.iter().fold(board, |board, &(x, y, radius)| {
            board
                - cylinder(radius, BOARD_THICKNESS * 2., true, Some(16))
                    .translate((x, y, top - BOARD_THICKNESS / 2.))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_sits_under_the_switch() {
        let bounds = SingleKeyPcb.shape().bounds().unwrap();
        assert!((bounds.max.z + SWITCH_BOTTOM_HOUSING_XYZ.z).abs() < 1e-9);
        assert!((bounds.size().x - BOARD_SIZE).abs() < 1e-9);
    }

    #[test]
    fn four_screw_holes() {
        assert_eq!(SingleKeyPcb.shape().to_scad().matches("cylinder(").count(), 4);
    }
}
