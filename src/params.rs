use std::f64::consts::PI;

use glam::DVec3;

use crate::angle::Angle;

// MX switch dimensions (mm)
pub(crate) const KEYSWITCH_WIDTH: f64 = 14.4;
pub(crate) const KEYSWITCH_LENGTH: f64 = 14.4;
// Depth of the socket plate, which is also the default web thickness
pub(crate) const PLATE_THICKNESS: f64 = 4.;
// Rough envelope of the switch housing, for preview renders
pub(crate) const SWITCH_TOP_HOUSING_XYZ: DVec3 = DVec3::new(15.6, 15.6, 6.6);
pub(crate) const SWITCH_BOTTOM_HOUSING_XYZ: DVec3 = DVec3::new(14., 14., 5.);
pub(crate) const SWITCH_STEM_XYZ: DVec3 = DVec3::new(4., 4., 3.6);

// Retention nubs on the inside of the socket walls
pub(crate) const SOCKET_NUB_RADIUS: f64 = 1.;
pub(crate) const SOCKET_NUB_LENGTH: f64 = 2.75;
pub(crate) const SOCKET_NUB_DEPTH: f64 = 1.5;

// Hotswap backplate: pins and pad holes measured from the switch center
// x, y, radius
pub(crate) const BACKPLATE_THICKNESS: f64 = 1.8;
pub(crate) const BACKPLATE_HOLES: [(f64, f64, f64); 5] = [
    (0., 0., 4.1 / 2.),
    (-5.08, 0., 1.75 / 2.),
    (5.08, 0., 1.75 / 2.),
    (-3.81, 2.54, 3. / 2.),
    (2.54, 5.08, 3. / 2.),
];
// LED window above the center pin
pub(crate) const BACKPLATE_LED_XY: (f64, f64) = (5.5, 3.5);
pub(crate) const BACKPLATE_LED_Y: f64 = -4.7;

// SA keycaps (mm)
pub(crate) const SA_LENGTH: f64 = 18.25;
pub(crate) const SA_DOUBLE_LENGTH: f64 = 37.5;
// Distance from the top of the plate to the bottom of a keycap
pub(crate) const KEYCAP_LIFT: f64 = 5.;

// Approx. height from the top of the plate to the top of the shortest SA cap
pub(crate) const SA_PROFILE_KEY_HEIGHT: f64 = 12.7;

// Key pitch used to derive the curvature radii
pub(crate) const OFFSET_PER_ROW: f64 = 17.5;
pub(crate) const OFFSET_PER_COL: f64 = 19.;
// Extra footprint of every additional unit a key spans
pub(crate) const SPAN_PITCH: f64 = 24.;

pub(crate) const WEB_POST_SIZE: f64 = 0.1;
pub(crate) const DEFAULT_WALL_THICKNESS: f64 = 1.5;

// Cupping, per row/column
pub(crate) const ROW_CURV: Angle = Angle::Radians(PI / 12.);
pub(crate) const COL_CURV: Angle = Angle::Radians(PI / 36.);
pub(crate) const THUMB_COL_CURV: Angle = Angle::Radians(PI / 8.);

// Finger well
pub(crate) const FINGER_COLUMNS: usize = 6;
pub(crate) const FINGER_ROWS: usize = 5;
pub(crate) const FINGER_TENTING: Angle = Angle::Radians(PI / 10.);
pub(crate) const FINGER_PLACEMENT: DVec3 = DVec3::new(0., 0., 29.3);
// Hand-tuned nudges correcting the curvature for the middle and outer columns
pub(crate) const FINGER_MIDDLE_COLUMN_NUDGE: DVec3 = DVec3::new(0., 6.82, -4.);
pub(crate) const FINGER_OUTER_COLUMN_NUDGE: DVec3 = DVec3::new(0., -20.8, 7.64);

// Thumb well
pub(crate) const THUMB_COLUMNS: usize = 3;
pub(crate) const THUMB_ROWS: usize = 3;
pub(crate) const THUMB_PLACEMENT: DVec3 = DVec3::new(-54., -77., 7.3);
// 2u keys sit slightly proud of their neighbors
pub(crate) const THUMB_DOUBLE_KEY_LIFT: f64 = 1.;

// Used to make cutters just slightly bigger than what they're cutting
pub(crate) const EPSILON: f64 = 0.01;
