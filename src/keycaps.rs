use glam::DVec3;

use crate::assembly::Hand;
use crate::error::{Error, Result};
use crate::layout::Position;
use crate::legends::{Cluster, Legends};
use crate::params::{KEYCAP_LIFT, KEYSWITCH_LENGTH, SA_DOUBLE_LENGTH, SA_LENGTH};
use crate::scad::{hull, polygon, sphere, text, Shape};

const SLICE: f64 = 0.1;

pub const KEYCAP_COLOR: (f64, f64, f64) = (1.0, 0.98, 0.95);
const LEGEND_COLOR: (f64, f64, f64) = (0., 0., 0.);
const LEGEND_FONT: &str = "FiraCode Nerd Font Propo";

fn rectangle(half_x: f64, half_y: f64) -> Shape {
    polygon([
        (half_x, half_y),
        (half_x, -half_y),
        (-half_x, -half_y),
        (-half_x, half_y),
    ])
}

// A thin horizontal slice of the cap at height `z`.
fn slice(half_x: f64, half_y: f64, z: f64) -> Shape {
    rectangle(half_x, half_y).linear_extrude(SLICE).up(z)
}

/// An SA row 3 keycap with a flat top, sitting on a switch whose plate top is
/// the XY plane.
///
/// Only 1u, 1.5u (wide along X) and 2u (long along Y) caps exist.
pub fn sa_cap(units: f64) -> Result<Shape> {
    let (cap, rgb) = if units == 1. {
        let base = 18.5 / 2.;
        let middle = 17. / 2.;
        (
            hull([
                slice(base, base, SLICE / 2.),
                slice(middle, middle, 6.),
                slice(6., 6., 12.),
            ]),
            (220., 163., 163.),
        )
    } else if units == 1.5 {
        (
            hull([
                slice(28. / 2., SA_LENGTH / 2., SLICE / 2.),
                slice(11., 6., 12.),
            ]),
            (240., 223., 175.),
        )
    } else if units == 2. {
        (
            hull([
                slice(SA_LENGTH / 2., SA_DOUBLE_LENGTH / 2., SLICE / 2.),
                slice(6., 16., 12.),
            ]),
            (127., 159., 127.),
        )
    } else {
        return Err(Error::UnsupportedKeySize(units));
    };

    Ok(cap
        .up(KEYCAP_LIFT)
        .color((rgb.0 / 255., rgb.1 / 255., rgb.2 / 255.)))
}

// The home row gets a dished top.
fn is_homing_key(cluster: Cluster, position: Position) -> bool {
    match cluster {
        Cluster::Thumb => position == Position::new(1., 0.),
        Cluster::Finger => position.row == 2. && (1. ..=4.).contains(&position.column),
    }
}

/// The cap for the key at `position`, with its legend cut into the top.
pub fn keycap(position: Position, cluster: Cluster, hand: Hand, legends: Legends) -> Result<Shape> {
    let mut cap = if is_homing_key(cluster, position) {
        sa_cap(1.)? - sphere(30., Some(50)).up(48.)
    } else if !position.is_whole_row() {
        sa_cap(2.)?
    } else if !position.is_whole_column() {
        sa_cap(2.)?.rotate_xyz((0., 0., 90.))
    } else {
        sa_cap(1.)?
    }
    .color(KEYCAP_COLOR);

    if let Some(legend) = legends.legend(hand, cluster, position) {
        let size = if legend.chars().count() > 1 {
            KEYSWITCH_LENGTH / 6.
        } else {
            KEYSWITCH_LENGTH / 3.
        };
        let mut label = text(&legend, size, Some(LEGEND_FONT))
            .linear_extrude(30.)
            .up(10.)
            .color(LEGEND_COLOR);
        // Undo the hand mirror so the text reads the right way round.
        if hand == Hand::Left {
            label = label.mirror(DVec3::X);
        }
        if cluster == Cluster::Thumb {
            label = label.rotate_xyz((0., 0., -90.));
        }
        cap -= label;
    }
    Ok(cap)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_sizes() {
        for (units, length) in [(1., 18.5), (1.5, 28.), (2., 18.25)] {
            let bounds = sa_cap(units).unwrap().bounds().unwrap();
            assert!((bounds.size().x - length).abs() < 1e-9, "{units}u");
        }
        let double = sa_cap(2.).unwrap().bounds().unwrap();
        assert!((double.size().y - SA_DOUBLE_LENGTH).abs() < 1e-9);
    }

    #[test]
    fn caps_float_above_the_plate() {
        let bounds = sa_cap(1.).unwrap().bounds().unwrap();
        assert!(bounds.min.z >= KEYCAP_LIFT);
        assert!((bounds.max.z - (KEYCAP_LIFT + 12. + SLICE)).abs() < 1e-9);
    }

    #[test]
    fn rejects_other_sizes() {
        for units in [0., 1.25, 3.] {
            assert!(matches!(
                sa_cap(units),
                Err(Error::UnsupportedKeySize(u)) if u == units
            ));
        }
    }

    #[test]
    fn legends_are_cut_into_the_cap() {
        let cap = keycap(Position::new(1., 0.), Cluster::Finger, Hand::Right, Legends::Lynx).unwrap();
        let script = cap.to_scad();
        assert!(script.contains("difference()"));
        assert!(script.contains("text(text=\"7\""));
    }

    #[test]
    fn left_legends_are_mirrored_back() {
        let cap = keycap(Position::new(0., 0.), Cluster::Finger, Hand::Left, Legends::Lynx).unwrap();
        assert!(cap.to_scad().contains("mirror(v=[1, 0, 0])"));
    }

    #[test]
    fn double_keys_get_long_caps() {
        let cap = keycap(Position::new(0., 0.5), Cluster::Thumb, Hand::Right, Legends::None).unwrap();
        let bounds = cap.bounds().unwrap();
        assert!((bounds.size().y - SA_DOUBLE_LENGTH).abs() < 1e-9);
    }
}
