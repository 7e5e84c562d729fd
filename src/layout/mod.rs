//! Mapping a flat (column, row) key grid onto a curved key well.
//!
//! Keys are placed with the "radius trick": the row curvature is applied
//! first, then the column curvature, then any per-well nudges and the
//! placement of the whole cluster.

mod finger_well;
mod thumb_well;

use glam::{DAffine3, DVec3};

use crate::angle::Angle;
use crate::geometry::{curvature_radius, is_whole, swing};
use crate::params::{
    COL_CURV, DEFAULT_WALL_THICKNESS, KEYSWITCH_LENGTH, KEYSWITCH_WIDTH, OFFSET_PER_COL,
    OFFSET_PER_ROW, PLATE_THICKNESS, ROW_CURV, SA_PROFILE_KEY_HEIGHT, SPAN_PITCH, WEB_POST_SIZE,
};
use crate::scad::{compose, cube, hull, union, Shape, Transform};

/// A key location in layout coordinates. Half coordinates mark keys that
/// span two rows or columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub column: f64,
    pub row: f64,
}

impl Position {
    pub const fn new(column: f64, row: f64) -> Self {
        Self { column, row }
    }

    pub fn is_whole_row(&self) -> bool {
        is_whole(self.row)
    }

    pub fn is_whole_column(&self) -> bool {
        is_whole(self.column)
    }

    fn offset(&self, columns: f64, rows: f64) -> Self {
        Self::new(self.column + columns, self.row + rows)
    }
}

impl From<(f64, f64)> for Position {
    fn from((column, row): (f64, f64)) -> Self {
        Self::new(column, row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    pub fn new(left: bool, top: bool) -> Self {
        match (left, top) {
            (true, true) => Corner::TopLeft,
            (false, true) => Corner::TopRight,
            (true, false) => Corner::BottomLeft,
            (false, false) => Corner::BottomRight,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Per-position (x, y) adjustment, used to grow or shift web corners.
pub type XyAdjust<'a> = &'a dyn Fn(Position) -> (f64, f64);

/// How web posts are sized and offset.
#[derive(Clone, Copy, Default)]
pub struct WebParams<'a> {
    /// Applied to the post before it is placed on the key.
    pub z_offset: f64,
    /// Defaults to the layout's web thickness.
    pub thickness: Option<f64>,
    pub size_adjust: Option<XyAdjust<'a>>,
    pub position_adjust: Option<XyAdjust<'a>>,
}

impl WebParams<'_> {
    /// A web of `thickness` whose top face sits `z_offset` from the key's top face.
    pub fn at_depth(z_offset: f64, thickness: f64) -> Self {
        Self {
            z_offset,
            thickness: Some(thickness),
            ..Self::default()
        }
    }
}

/// One web between a key and its neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WebLink {
    /// Fills the gap between the key, its left and upper neighbors, and the
    /// key diagonally above and to the left.
    TopLeftOf(Position),
    LeftOf(Position),
    Above(Position),
}

/// The shape of a key well.
#[derive(Debug, Clone, PartialEq)]
pub enum Well {
    /// A plain curved grid.
    Grid { positions_to_skip: Vec<Position> },
    /// The main finger cluster, optionally with 1.5u outer columns.
    Finger { use_1_5u_keys: bool },
    /// The fixed eight-key thumb cluster.
    Thumb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    columns: usize,
    rows: usize,
    well: Well,
    row_curvature: Angle,
    column_curvature: Angle,
    wall_thickness: f64,
    web_thickness: f64,
}

impl Layout {
    pub fn grid(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            well: Well::Grid {
                positions_to_skip: Vec::new(),
            },
            row_curvature: ROW_CURV,
            column_curvature: COL_CURV,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            web_thickness: PLATE_THICKNESS,
        }
    }

    pub fn skipping(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        if let Well::Grid { positions_to_skip } = &mut self.well {
            positions_to_skip.extend(positions);
        }
        self
    }

    pub fn with_wall_thickness(mut self, wall_thickness: f64) -> Self {
        self.wall_thickness = wall_thickness;
        self
    }

    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    pub fn web_thickness(&self) -> f64 {
        self.web_thickness
    }

    pub fn row_radius(&self) -> f64 {
        curvature_radius(OFFSET_PER_ROW, self.row_curvature, SA_PROFILE_KEY_HEIGHT)
    }

    pub fn column_radius(&self) -> f64 {
        curvature_radius(OFFSET_PER_COL, self.column_curvature, SA_PROFILE_KEY_HEIGHT)
    }

    pub fn generate_positions(&self) -> Vec<Position> {
        match &self.well {
            Well::Grid { positions_to_skip } => self
                .rectangle()
                .filter(|p| !positions_to_skip.contains(p))
                .collect(),
            Well::Finger { .. } => finger_well::positions(self.rectangle()),
            Well::Thumb => thumb_well::POSITIONS.to_vec(),
        }
    }

    fn rectangle(&self) -> impl Iterator<Item = Position> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| {
            (0..columns).map(move |column| Position::new(column as f64, row as f64))
        })
    }

    pub fn column_adjust(&self, column: f64) -> f64 {
        match self.well {
            Well::Finger { use_1_5u_keys } => finger_well::column_adjust(column, use_1_5u_keys),
            _ => column,
        }
    }

    pub fn row_adjust(&self, row: f64) -> f64 {
        row
    }

    // The row/column whose keys sit flat before the cluster is placed.
    fn neutral(&self) -> f64 {
        match self.well {
            Well::Finger { .. } => finger_well::NEUTRAL,
            _ => 0.,
        }
    }

    /// Rotation about X for an adjusted row.
    pub fn row_angle(&self, row: f64) -> Angle {
        Angle::Degrees(self.row_curvature.times(self.neutral() - row).degrees())
    }

    /// Rotation about Y for an adjusted column.
    pub fn column_angle(&self, column: f64) -> Angle {
        Angle::Degrees(self.column_curvature.times(self.neutral() - column).degrees())
    }

    fn placement_adjust(&self, column: f64, row: f64) -> Option<Transform> {
        match self.well {
            Well::Grid { .. } => None,
            Well::Finger { .. } => finger_well::placement_adjust(column),
            Well::Thumb => thumb_well::placement_adjust(column, row),
        }
    }

    fn layout_place(&self) -> Vec<Transform> {
        match self.well {
            Well::Grid { .. } => Vec::new(),
            Well::Finger { .. } => finger_well::layout_place(),
            Well::Thumb => thumb_well::layout_place(),
        }
    }

    /// Every transform that takes a key from the origin to `position`, in
    /// application order.
    pub fn placement(&self, position: impl Into<Position>) -> Vec<Transform> {
        let position = position.into();
        let row = self.row_adjust(position.row);
        let column = self.column_adjust(position.column);

        let mut steps = Vec::with_capacity(16);
        steps.extend(swing(self.row_radius(), self.row_angle(row), DVec3::X));
        steps.extend(swing(self.column_radius(), self.column_angle(column), DVec3::Y));
        steps.extend(self.placement_adjust(column, row));
        steps.extend(self.layout_place());
        steps
    }

    pub fn key_transform(&self, position: impl Into<Position>) -> DAffine3 {
        compose(&self.placement(position))
    }

    pub fn key_place(&self, position: impl Into<Position>, shape: &Shape) -> Shape {
        shape.transformed_by(&self.placement(position))
    }

    /// Place the shape built for each position at that position, and union
    /// the lot.
    pub fn place_all(&self, shape_at: impl Fn(Position) -> Shape) -> Shape {
        union(
            self.generate_positions()
                .into_iter()
                .map(|position| self.key_place(position, &shape_at(position))),
        )
    }

    pub fn web_corner(&self, position: impl Into<Position>, corner: Corner, params: &WebParams) -> Shape {
        self.web_corner_spanning(position, corner, (1., 1.), params)
    }

    /// A thin post at the given corner of a key that covers `span` (columns,
    /// rows) key units, used as a hull anchor for webs and walls.
    pub fn web_corner_spanning(
        &self,
        position: impl Into<Position>,
        corner: Corner,
        span: (f64, f64),
        params: &WebParams,
    ) -> Shape {
        let position = position.into();
        let thickness = params.thickness.unwrap_or(self.web_thickness);
        let post = cube(WEB_POST_SIZE, WEB_POST_SIZE, thickness).down(thickness / 2.);

        let (mut x_adjust, mut y_adjust) = (0., 0.);
        if let Some(size_adjust) = params.size_adjust {
            let (x, y) = size_adjust(position);
            x_adjust += x / 2.;
            y_adjust += y / 2.;
        }
        if let Some(position_adjust) = params.position_adjust {
            let (x, y) = position_adjust(position);
            x_adjust += if corner.is_left() { -x } else { x };
            y_adjust += if corner.is_top() { y } else { -y };
        }

        let (column_span, row_span) = span;
        let x = (KEYSWITCH_WIDTH + (column_span - 1.) * SPAN_PITCH - WEB_POST_SIZE) / 2.
            + self.wall_thickness
            + x_adjust;
        let y = (KEYSWITCH_LENGTH + (row_span - 1.) * SPAN_PITCH - WEB_POST_SIZE) / 2.
            + self.wall_thickness
            + y_adjust;

        self.key_place(
            position,
            &post.translate((
                if corner.is_left() { -x } else { x },
                if corner.is_top() { y } else { -y },
                params.z_offset,
            )),
        )
    }

    fn web_hull(&self, corners: [(Position, Corner); 4], params: &WebParams) -> Shape {
        hull(
            corners
                .into_iter()
                .map(|(position, corner)| self.web_corner(position, corner, params)),
        )
    }

    pub fn web_left_of(&self, position: impl Into<Position>, params: &WebParams) -> Shape {
        let position = position.into();
        let left = position.offset(-1., 0.);
        self.web_hull(
            [
                (position, Corner::TopLeft),
                (position, Corner::BottomLeft),
                (left, Corner::BottomRight),
                (left, Corner::TopRight),
            ],
            params,
        )
    }

    pub fn web_above(&self, position: impl Into<Position>, params: &WebParams) -> Shape {
        let position = position.into();
        let above = position.offset(0., -1.);
        self.web_hull(
            [
                (position, Corner::TopLeft),
                (position, Corner::TopRight),
                (above, Corner::BottomRight),
                (above, Corner::BottomLeft),
            ],
            params,
        )
    }

    pub fn web_top_left_of(&self, position: impl Into<Position>, params: &WebParams) -> Shape {
        let position = position.into();
        self.web_hull(
            [
                (position, Corner::TopLeft),
                (position.offset(-1., 0.), Corner::TopRight),
                (position.offset(-1., -1.), Corner::BottomRight),
                (position.offset(0., -1.), Corner::BottomLeft),
            ],
            params,
        )
    }

    fn has_web(&self, link: WebLink) -> bool {
        match (&self.well, link) {
            (Well::Finger { .. }, WebLink::TopLeftOf(p)) => finger_well::has_top_left_web(p),
            (Well::Finger { .. }, WebLink::LeftOf(p)) => finger_well::has_left_web(p),
            (Well::Thumb, link) => thumb_well::has_web(link),
            (_, WebLink::TopLeftOf(p)) => p.column > 0. && p.row > 0.,
            (_, WebLink::LeftOf(p)) => p.column > 0.,
            (_, WebLink::Above(p)) => p.row > 0.,
        }
    }

    /// The regular webs of this layout, in the order they are generated.
    pub fn web_links(&self) -> Vec<WebLink> {
        let positions = self.generate_positions();
        let kinds: [fn(Position) -> WebLink; 3] =
            [WebLink::TopLeftOf, WebLink::LeftOf, WebLink::Above];
        kinds
            .into_iter()
            .flat_map(|kind| positions.iter().map(move |p| kind(*p)))
            .filter(|link| self.has_web(*link))
            .collect()
    }

    pub fn web(&self, link: WebLink, params: &WebParams) -> Shape {
        match link {
            WebLink::TopLeftOf(position) => self.web_top_left_of(position, params),
            WebLink::LeftOf(position) => self.web_left_of(position, params),
            WebLink::Above(position) => self.web_above(position, params),
        }
    }

    /// Every web of the layout, including the irregular ones around 2u keys.
    pub fn web_all(&self, params: &WebParams) -> Shape {
        let regular = self.web_links().into_iter().map(|link| self.web(link, params));
        let irregular = match self.well {
            Well::Thumb => thumb_well::double_key_webs(self, params),
            _ => Vec::new(),
        };
        union(regular.chain(irregular))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn grid_enumerates_row_major_and_honors_skips() {
        let layout = Layout::grid(3, 2).skipping([Position::new(1., 1.)]);
        let positions = layout.generate_positions();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], Position::new(0., 0.));
        assert_eq!(positions[1], Position::new(1., 0.));
        assert!(!positions.contains(&Position::new(1., 1.)));
    }

    #[test]
    fn grid_angles_are_linear_through_zero() {
        let layout = Layout::grid(6, 5);
        let slope = -ROW_CURV.degrees();
        for row in [-1., 0., 0.5, 1., 4.] {
            assert!((layout.row_angle(row).degrees() - slope * row).abs() < 1e-9);
        }
        assert!((layout.column_angle(3.).degrees() + 3. * COL_CURV.degrees()).abs() < 1e-9);
    }

    #[test]
    fn radii_follow_pitch_and_cap_height() {
        let layout = Layout::grid(6, 5);
        let expected = 8.75 / (PI / 24.).sin() + 12.7;
        assert!((layout.row_radius() - expected).abs() < 1e-9);
        assert!(layout.column_radius() > layout.row_radius());
    }

    #[test]
    fn origin_key_of_a_grid_stays_put() {
        let transform = Layout::grid(6, 5).key_transform((0., 0.));
        assert!(transform.abs_diff_eq(DAffine3::IDENTITY, 1e-9));
    }

    #[test]
    fn key_placement_is_pure() {
        let layout = Layout::grid(6, 5);
        let a = layout.key_transform((2., 3.));
        let b = layout.key_transform((2., 3.));
        assert_eq!(a.to_cols_array(), b.to_cols_array());

        let key = cube(1., 1., 1.);
        assert_eq!(
            layout.key_place((2., 3.), &key).to_scad(),
            layout.key_place((2., 3.), &key).to_scad()
        );
    }

    #[test]
    fn key_transform_matches_key_place() {
        let layout = Layout::grid(6, 5);
        let transform = layout.key_transform((1., 2.));
        let placed = layout.key_place((1., 2.), &cube(0., 0., 0.));
        for vertex in placed.vertices() {
            assert!(vertex.abs_diff_eq(transform.transform_point3(DVec3::ZERO), 1e-9));
        }
    }

    #[test]
    fn web_corners_sit_outside_the_switch_hole() {
        let layout = Layout::grid(1, 1);
        let bounds = layout
            .web_corner((0., 0.), Corner::TopLeft, &WebParams::default())
            .bounds()
            .unwrap();
        let expected_x = -((KEYSWITCH_WIDTH - WEB_POST_SIZE) / 2. + DEFAULT_WALL_THICKNESS);
        let center = (bounds.min + bounds.max) / 2.;
        assert!(center.abs_diff_eq(
            DVec3::new(expected_x, -expected_x, -PLATE_THICKNESS / 2.),
            1e-9
        ));
        assert!((bounds.size().z - PLATE_THICKNESS).abs() < 1e-9);
    }

    #[test]
    fn web_params_adjust_corners() {
        let layout = Layout::grid(1, 1);
        let grow = |_: Position| (2., 4.);
        let shift = |_: Position| (1., 1.);
        let plain = layout
            .web_corner((0., 0.), Corner::BottomRight, &WebParams::default())
            .bounds()
            .unwrap();
        let adjusted = layout
            .web_corner(
                (0., 0.),
                Corner::BottomRight,
                &WebParams {
                    z_offset: -3.,
                    thickness: Some(1.),
                    size_adjust: Some(&grow),
                    position_adjust: Some(&shift),
                },
            )
            .bounds()
            .unwrap();
        assert!((adjusted.min.x - plain.min.x - 2.).abs() < 1e-9);
        assert!((adjusted.min.y - plain.min.y + 1.).abs() < 1e-9);
        assert!((adjusted.max.z + 3.).abs() < 1e-9);
        assert!((adjusted.size().z - 1.).abs() < 1e-9);
    }

    #[test]
    fn grid_webs_cover_every_adjacency() {
        let layout = Layout::grid(3, 3);
        let links = layout.web_links();
        let count = |f: fn(&WebLink) -> bool| links.iter().filter(|l| f(l)).count();
        assert_eq!(count(|l| matches!(l, WebLink::TopLeftOf(_))), 4);
        assert_eq!(count(|l| matches!(l, WebLink::LeftOf(_))), 6);
        assert_eq!(count(|l| matches!(l, WebLink::Above(_))), 6);
    }

    #[test]
    fn corners_from_flags() {
        assert_eq!(Corner::new(true, false), Corner::BottomLeft);
        assert!(Corner::TopRight.is_top());
        assert!(!Corner::TopRight.is_left());
    }
}
