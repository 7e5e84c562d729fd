use glam::DVec3;

use super::{Layout, Position, Well};
use crate::params::{
    FINGER_MIDDLE_COLUMN_NUDGE, FINGER_OUTER_COLUMN_NUDGE, FINGER_PLACEMENT, FINGER_TENTING,
};
use crate::scad::Transform;

// Row 2 and column 2 sit flat before tenting.
pub(super) const NEUTRAL: f64 = 2.;

// No key in the bottom row of the innermost column.
const MISSING_KEY: Position = Position::new(0., 4.);
// The key right of the missing one has no neighbor on its left.
const NO_LEFT_NEIGHBOR: Position = Position::new(1., 4.);

impl Layout {
    pub fn finger_well(columns: usize, rows: usize, use_1_5u_keys: bool) -> Self {
        Self {
            well: Well::Finger { use_1_5u_keys },
            ..Self::grid(columns, rows)
        }
    }
}

pub(super) fn positions(rectangle: impl Iterator<Item = Position>) -> Vec<Position> {
    rectangle.filter(|p| *p != MISSING_KEY).collect()
}

/// Outer columns spread out to make room for 1.5u keys.
pub(super) fn column_adjust(column: f64, use_1_5u_keys: bool) -> f64 {
    if use_1_5u_keys && column >= 5. {
        column + (column - 4.) * 0.25
    } else {
        column
    }
}

pub(super) fn placement_adjust(column: f64) -> Option<Transform> {
    if column == 2. {
        Some(Transform::Translate(FINGER_MIDDLE_COLUMN_NUDGE))
    } else if column >= 4. {
        Some(Transform::Translate(FINGER_OUTER_COLUMN_NUDGE))
    } else {
        None
    }
}

pub(super) fn layout_place() -> Vec<Transform> {
    vec![
        Transform::Rotate {
            angle: FINGER_TENTING,
            axis: DVec3::Y,
        },
        Transform::Rotate {
            angle: FINGER_TENTING,
            axis: DVec3::X,
        },
        Transform::Translate(FINGER_PLACEMENT),
    ]
}

pub(super) fn has_top_left_web(p: Position) -> bool {
    p.column > 0. && p.row > 0. && p != NO_LEFT_NEIGHBOR
}

pub(super) fn has_left_web(p: Position) -> bool {
    p.column > 0. && p != NO_LEFT_NEIGHBOR
}

#[cfg(test)]
mod tests {
    use super::super::WebLink;
    use super::*;
    use crate::params::ROW_CURV;

    fn count(links: &[WebLink], f: fn(&WebLink) -> bool) -> usize {
        links.iter().filter(|l| f(l)).count()
    }

    #[test]
    fn default_well_has_29_keys() {
        let layout = Layout::finger_well(6, 5, false);
        let positions = layout.generate_positions();
        assert_eq!(positions.len(), 29);
        assert!(!positions.contains(&MISSING_KEY));
    }

    #[test]
    fn web_counts() {
        let links = Layout::finger_well(6, 5, false).web_links();
        assert_eq!(count(&links, |l| matches!(l, WebLink::LeftOf(_))), (6 - 1) * 5 - 1);
        assert_eq!(count(&links, |l| matches!(l, WebLink::TopLeftOf(_))), 19);
        assert_eq!(count(&links, |l| matches!(l, WebLink::Above(_))), 23);
        assert!(!links.contains(&WebLink::LeftOf(NO_LEFT_NEIGHBOR)));
    }

    #[test]
    fn wide_outer_columns() {
        let layout = Layout::finger_well(7, 5, true);
        assert_eq!(layout.column_adjust(4.), 4.);
        assert_eq!(layout.column_adjust(5.), 5.25);
        assert_eq!(layout.column_adjust(6.), 6.5);

        let narrow = Layout::finger_well(7, 5, false);
        assert_eq!(narrow.column_adjust(6.), 6.);
    }

    #[test]
    fn row_two_is_flat() {
        let layout = Layout::finger_well(6, 5, false);
        assert!(layout.row_angle(2.).degrees().abs() < 1e-12);
        let slope = -ROW_CURV.degrees();
        for row in [0., 1., 3., 4.] {
            let expected = 2. * ROW_CURV.degrees() + slope * row;
            assert!((layout.row_angle(row).degrees() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn columns_get_their_nudges() {
        assert_eq!(
            placement_adjust(2.),
            Some(Transform::Translate(FINGER_MIDDLE_COLUMN_NUDGE))
        );
        assert_eq!(
            placement_adjust(5.25),
            Some(Transform::Translate(FINGER_OUTER_COLUMN_NUDGE))
        );
        assert_eq!(placement_adjust(3.), None);
    }

    #[test]
    fn well_is_lifted_off_the_desk() {
        let layout = Layout::finger_well(6, 5, false);
        for position in layout.generate_positions() {
            let origin = layout.key_transform(position).translation;
            assert!(origin.z > 0., "{position:?} is below the desk at {origin}");
        }
    }
}
