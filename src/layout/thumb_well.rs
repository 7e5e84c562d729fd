use std::f64::consts::PI;

use glam::DVec3;

use super::{Corner, Layout, Position, WebLink, WebParams, Well};
use crate::angle::Angle;
use crate::params::{
    THUMB_COLUMNS, THUMB_COL_CURV, THUMB_DOUBLE_KEY_LIFT, THUMB_PLACEMENT, THUMB_ROWS,
};
use crate::scad::{hull, Shape, Transform};

/// The 2u key, standing upright in column 0.
const DOUBLE_KEY: Position = Position::new(0., 0.5);

pub(super) const POSITIONS: [Position; 8] = [
    Position::new(0., -1.),
    DOUBLE_KEY,
    Position::new(1., -1.),
    Position::new(1., 0.),
    Position::new(1., 1.),
    Position::new(2., -1.),
    Position::new(2., 0.),
    Position::new(2., 1.),
];

// Keys in column 1 next to the 2u key are webbed to it by hand.
const BESIDE_DOUBLE_KEY: [Position; 2] = [Position::new(1., 0.), Position::new(1., 1.)];

impl Layout {
    pub fn thumb_well() -> Self {
        Self {
            well: Well::Thumb,
            column_curvature: THUMB_COL_CURV,
            ..Self::grid(THUMB_COLUMNS, THUMB_ROWS)
        }
    }
}

pub(super) fn placement_adjust(column: f64, row: f64) -> Option<Transform> {
    let position = Position::new(column, row);
    (!position.is_whole_column() || !position.is_whole_row())
        .then_some(Transform::Translate(DVec3::new(0., 0., THUMB_DOUBLE_KEY_LIFT)))
}

pub(super) fn layout_place() -> Vec<Transform> {
    let rotate = |radians: f64, axis: (f64, f64, f64)| Transform::Rotate {
        angle: Angle::Radians(radians),
        axis: axis.into(),
    };
    vec![
        Transform::Translate(DVec3::new(17., 0., 3.)),
        rotate(PI / 2.8, (0., 1., 0.)),
        rotate(PI * 9. / 32., (0., 0., 1.)),
        rotate(PI / 14., (1., 1., 0.)),
        rotate(PI / (-11. / 6.), (-1., 1., 0.)),
        rotate(PI / -20., (0., 1., 0.)),
        Transform::Rotate {
            angle: Angle::Degrees(15.),
            axis: DVec3::ONE,
        },
        Transform::Translate(THUMB_PLACEMENT),
    ]
}

pub(super) fn has_web(link: WebLink) -> bool {
    match link {
        WebLink::TopLeftOf(p) => p.column > 0. && p.row > -1. && !BESIDE_DOUBLE_KEY.contains(&p),
        WebLink::LeftOf(p) => p.column > 0. && !BESIDE_DOUBLE_KEY.contains(&p),
        WebLink::Above(p) => p.row > -1. && p != DOUBLE_KEY && p != Position::new(0., -1.),
    }
}

/// Hulls joining the 2u key to the keys around it.
pub(super) fn double_key_webs(layout: &Layout, params: &WebParams) -> Vec<Shape> {
    use Corner::*;

    let post = |column: f64, row: f64, corner: Corner| {
        let position = Position::new(column, row);
        if position == DOUBLE_KEY {
            layout.web_corner_spanning(position, corner, (1., 2.), params)
        } else {
            layout.web_corner(position, corner, params)
        }
    };
    let (column, row) = (DOUBLE_KEY.column, DOUBLE_KEY.row);

    vec![
        hull([
            post(column, row, TopRight),
            post(0., -1., BottomRight),
            post(1., -1., BottomLeft),
            post(1., 0., TopLeft),
        ]),
        hull([
            post(0., -1., BottomLeft),
            post(0., -1., BottomRight),
            post(column, row, TopRight),
            post(column, row, TopLeft),
        ]),
        hull([
            post(column, row, BottomRight),
            post(1., 1., TopLeft),
            post(1., 1., BottomLeft),
        ]),
        hull([
            post(column, row, BottomRight),
            post(column, row, TopRight),
            post(1., 0., BottomLeft),
            post(1., 1., TopLeft),
        ]),
        hull([
            post(column, row, TopRight),
            post(1., 0., BottomLeft),
            post(1., 0., TopLeft),
        ]),
    ]
}
