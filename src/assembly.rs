//! The printable parts of one keyboard half.
//!
//! Parts are built in right-hand model space. Anything that has to read
//! correctly after mirroring (sockets, button holes, the TrackPoint) is
//! adjusted per hand here; [`Hand::orient`] then mirrors the finished part.

use std::fmt;

use glam::DVec3;

use crate::angle::Angle;
use crate::config::{BottomCover, Config};
use crate::error::Result;
use crate::keycaps::keycap;
use crate::layout::{Corner, Layout, Position, WebParams};
use crate::legends::{Cluster, Legends};
use crate::mounts::hardware::{screw_hole, tenting_nut};
use crate::mounts::{BoardMount, LcdMount, MiniDinMount, SingleKeyPcb, TrackPointMount};
use crate::params::{KEYSWITCH_LENGTH, KEYSWITCH_WIDTH, SA_DOUBLE_LENGTH, WEB_POST_SIZE};
use crate::scad::{cube, cylinder_outer, fudge_radius, hull, sphere, union, Shape, Transform};
use crate::switch::{switch_body, Switch};

const PART_COLOR: (f64, f64, f64) = (0.1, 0.1, 0.1);

// Height of the microcontroller board above its mounting surface.
const BOARD_DISTANCE: f64 = 8.;
// Magnets and cover edges hang this far below the key tops.
const COVER_EDGE_DEPTH: f64 = 5.;
// Half the length of a cover edge post along its edge.
const EDGE_POST_REACH: f64 = 10.;
const TRIPOD_BOSS_RADIUS: f64 = 9.;
const TRIPOD_SCREW: &str = "1/4-20";
const TRIPOD_SCREW_DEPTH: f64 = 12.;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub const BOTH: [Hand; 2] = [Hand::Right, Hand::Left];

    pub fn name(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }

    pub fn is_left(self) -> bool {
        self == Hand::Left
    }

    /// Mirror a finished right-hand part into this hand.
    pub fn orient(self, shape: Shape) -> Shape {
        match self {
            Hand::Left => shape.mirror(DVec3::X),
            Hand::Right => shape,
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The top shell and the bottom cover share their edge and magnet geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Top,
    Bottom,
}

/// Which edge of a key a cover edge post sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// The left or right edge.
    Side,
    /// The top or bottom edge.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCorner {
    pub edge: Edge,
    pub position: Position,
    pub corner: Corner,
    /// Slides the post along its edge.
    pub offset: f64,
}

const fn edge(edge: Edge, column: f64, row: f64, corner: Corner, offset: f64) -> EdgeCorner {
    EdgeCorner {
        edge,
        position: Position::new(column, row),
        corner,
        offset,
    }
}

use Corner::{BottomLeft, BottomRight, TopLeft, TopRight};
use Edge::{End, Side};

// Down the inner side of the finger well.
const INNER_EDGE: [EdgeCorner; 6] = [
    edge(Side, 0., 1., TopLeft, 0.),
    edge(Side, 0., 1., BottomLeft, 0.),
    edge(Side, 0., 2., TopLeft, 0.),
    edge(Side, 0., 2., BottomLeft, 0.),
    edge(Side, 0., 3., TopLeft, 0.),
    edge(Side, 0., 3., BottomLeft, 7.),
];

// Along the bottom, up the outer side and back along the top.
const OUTER_EDGE: [EdgeCorner; 24] = [
    edge(End, 1., 4., BottomLeft, -7.),
    edge(End, 1., 4., BottomRight, -3.),
    edge(End, 2., 4., BottomLeft, -3.),
    edge(End, 2., 4., BottomRight, 3.),
    edge(End, 3., 4., BottomLeft, 3.),
    edge(End, 3., 4., BottomRight, 3.),
    edge(End, 4., 4., BottomLeft, 3.),
    edge(End, 4., 4., BottomRight, 0.),
    edge(End, 5., 4., BottomLeft, 0.),
    edge(End, 5., 4., BottomRight, -2.),
    edge(Side, 5., 4., BottomRight, -2.),
    edge(Side, 5., 4., TopRight, 0.),
    edge(Side, 5., 3., BottomRight, 0.),
    edge(Side, 5., 3., TopRight, 0.),
    edge(Side, 5., 2., BottomRight, 0.),
    edge(Side, 5., 2., TopRight, 0.),
    edge(Side, 5., 1., BottomRight, 0.),
    edge(Side, 5., 1., TopRight, 0.),
    edge(Side, 5., 0., BottomRight, 0.),
    edge(Side, 5., 0., TopRight, 2.),
    edge(End, 5., 0., TopRight, -2.),
    edge(End, 5., 0., TopLeft, 0.),
    edge(End, 4., 0., TopRight, 0.),
    edge(End, 4., 0., TopLeft, -0.3),
];

// The short stretch above column 0, which meets the connector mount.
fn top_edge(shell: Shell) -> [EdgeCorner; 2] {
    let (right, left) = match shell {
        Shell::Top => (0., 3.),
        Shell::Bottom => (2., 0.),
    };
    [
        edge(End, 0., 0., TopRight, right),
        edge(End, 0., 0., TopLeft, left),
    ]
}

// Where the magnets holding the bottom cover sit, and which way each is
// pushed out from its key.
const MAGNETS: [(Position, DVec3); 6] = [
    (Position::new(0., 0.), DVec3::Y),
    (Position::new(0., 2.), DVec3::NEG_X),
    (Position::new(1., 4.), DVec3::NEG_Y),
    (Position::new(5., 4.), DVec3::NEG_Y),
    (Position::new(5., 2.), DVec3::X),
    (Position::new(5., 0.), DVec3::Y),
];

const fn rotate(degrees: f64, x: f64, y: f64, z: f64) -> Transform {
    Transform::Rotate {
        angle: Angle::Degrees(degrees),
        axis: DVec3::new(x, y, z),
    }
}

const fn translate(x: f64, y: f64, z: f64) -> Transform {
    Transform::Translate(DVec3::new(x, y, z))
}

/// Above column 5, row 0.
const FINGER_NUT_1: [Transform; 2] = [rotate(20., 1., 0., 0.), translate(64., 45., 45.)];
/// Beside column 5, row 4.
const FINGER_NUT_2: [Transform; 3] = [
    rotate(-15., 1., 0., 0.),
    rotate(-5., 0., 1., 0.),
    translate(78., -49., 10.),
];
/// Beside column 0, row 1. The connector and the LCD mount bolt on here.
const FINGER_NUT_3: [Transform; 3] = [
    rotate(15., 0., 1., 0.),
    rotate(9., 1., 0., 0.),
    translate(-54., 16., 49.),
];

/// At the outer corner of the 2u thumb key.
const THUMB_NUT_1: [Transform; 6] = [
    rotate(-10., 1., 0., 0.),
    rotate(5., 0., 1., 0.),
    rotate(48., 0., 0., 1.),
    translate(20., -25., 9.),
    rotate(10., 1., 1., 1.),
    translate(-54., -77., 7.3),
];
/// Behind the thumb well, between columns 1 and 2 of row -1.
const THUMB_NUT_3: [Transform; 6] = [
    rotate(-15., 1., 0., 0.),
    rotate(-20., 0., 0., 1.),
    rotate(-10., 0., 1., 0.),
    translate(-3., 57., 33.2),
    rotate(10., 1., 1., 1.),
    translate(-54., -77., 7.3),
];

const BOARD_PLACEMENT: [Transform; 4] = [
    rotate(90., 0., 0., 1.),
    rotate(-120., 1., 0., 0.),
    rotate(17., 0., 1., 0.),
    translate(-19., 53., 74.3),
];

pub struct KeyboardAssembly {
    finger: Layout,
    thumb: Layout,
    switch: Switch,
    legends: Legends,
    wall_thickness: f64,
    use_color: bool,
    enable_trackpoint: bool,
    enable_nuts: bool,
    bottom_thumb_nuts: bool,
    cover: BottomCover,
    board: BoardMount,
    connector_mount: MiniDinMount,
    trackpoint: TrackPointMount,
    lcd: LcdMount,
}

impl KeyboardAssembly {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        let finger = Layout::finger_well(config.columns, config.rows, config.use_1_5u_keys)
            .with_wall_thickness(config.wall_thickness);
        let thumb = Layout::thumb_well().with_wall_thickness(config.wall_thickness);
        Ok(Self {
            finger,
            thumb,
            switch: Switch::new(config.socket, config.wall_thickness),
            legends: config.legends,
            wall_thickness: config.wall_thickness,
            use_color: config.use_color,
            enable_trackpoint: config.enable_trackpoint,
            enable_nuts: config.enable_nuts,
            bottom_thumb_nuts: config.bottom_thumb_nuts,
            cover: config.bottom_cover.clone(),
            board: BoardMount::new(BOARD_DISTANCE),
            connector_mount: MiniDinMount::default(),
            trackpoint: TrackPointMount::default(),
            lcd: LcdMount::default(),
        })
    }

    pub fn place_board(&self, shape: &Shape) -> Shape {
        shape.transformed_by(&BOARD_PLACEMENT)
    }

    pub fn place_connector_mount(&self, shape: &Shape) -> Shape {
        let mount = &self.connector_mount;
        let shape = shape.rotate(Angle::Degrees(-90.), DVec3::Y).translate((
            (KEYSWITCH_WIDTH + mount.outer_frame_thickness) / -2. - 1.5,
            0.,
            -mount.outer_radius() - 2.,
        ));
        self.finger.key_place((0., 0.), &shape)
    }

    pub fn place_trackpoint(&self, shape: &Shape) -> Shape {
        self.finger.key_place((0.5, 2.5), shape)
    }

    fn cover_web(&self) -> WebParams<'static> {
        WebParams::at_depth(-self.cover.offset, self.cover.thickness)
    }

    /// The socket for one key. 2u keys get plate extensions where their
    /// stabilizers go.
    pub fn switch_socket(&self, position: Position, hand: Hand) -> Shape {
        let mut shape = self.switch.socket(position);
        let web_thickness = self.finger.web_thickness();
        let wall = self.wall_thickness;

        if !position.is_whole_row() {
            let plate_height = (SA_DOUBLE_LENGTH - KEYSWITCH_LENGTH + 0.4) / 2.;
            let stabilizer = cube(KEYSWITCH_WIDTH + wall * 2., plate_height, web_thickness)
                .translate((
                    0.,
                    (plate_height + KEYSWITCH_LENGTH) / 2. + wall,
                    -web_thickness / 2.,
                ));
            shape = shape + stabilizer.clone() + stabilizer.mirror(DVec3::Y);
        } else if !position.is_whole_column() {
            let plate_width = (SA_DOUBLE_LENGTH - KEYSWITCH_WIDTH + 0.4) / 2.;
            let stabilizer = cube(plate_width, KEYSWITCH_LENGTH + wall * 2., web_thickness)
                .translate((
                    (plate_width + KEYSWITCH_WIDTH) / 2. + wall,
                    0.,
                    -web_thickness / 2.,
                ));
            shape = shape + stabilizer.clone() + stabilizer.mirror(DVec3::X);
        }

        // Undone by the final mirror, so tags and backplates keep their
        // orientation on the left half.
        match hand {
            Hand::Left => shape.mirror(DVec3::X),
            Hand::Right => shape,
        }
    }

    /// The patch of bottom cover under one key.
    pub fn switch_bottom_cover(&self, position: Position) -> Shape {
        let (width, length) = if !position.is_whole_row() {
            (KEYSWITCH_WIDTH + self.wall_thickness * 2., SA_DOUBLE_LENGTH)
        } else if !position.is_whole_column() {
            (SA_DOUBLE_LENGTH, KEYSWITCH_LENGTH + self.wall_thickness * 2.)
        } else {
            (
                KEYSWITCH_WIDTH + self.wall_thickness * 2.,
                KEYSWITCH_LENGTH + self.wall_thickness * 2.,
            )
        };
        cube(width, length, self.cover.thickness).down(self.cover.offset + self.cover.thickness / 2.)
    }

    fn finish(&self, shape: Shape) -> Shape {
        if self.use_color {
            shape.color(PART_COLOR)
        } else {
            shape
        }
    }

    /// The finger well with the microcontroller board mount, the Mini-DIN
    /// connector mount and, on the right, the TrackPoint mount.
    pub fn finger_part(&self, hand: Hand) -> Shape {
        let finger = &self.finger;
        let web = WebParams::default();
        let board = &self.board;

        let back_posts = hull([
            self.place_board(&(cube(60., 120., 8.) & board.back_mounting_posts())),
            finger.web_corner((3., 0.), TopRight, &web),
            finger.web_corner((3., 0.), TopLeft, &web),
        ]);
        let front_posts = hull([
            self.place_board(&(cube(60., 120., 6.) & board.front_mounting_posts())),
            finger.web_corner((1., 0.), TopLeft, &web),
            finger.web_corner((1., 0.), TopRight, &web),
        ]);
        // Room to press the buttons on the board.
        let button = cube(4., 6., 10.);
        let boot_button_x = if hand.is_left() { -5. } else { 5. };
        let board_base = board.base(2.) + cube(11., 2.9, 13.).translate((0., 1.5, 6.5))
            - board.board_profile()
            - button.translate((boot_button_x, -22., 0.))
            - button.translate((-6., -46., 0.))
            - button.translate((6., -46., 0.));

        let connector = hull([
            self.place_connector_mount(&self.connector_mount.frame()),
            finger.web_corner((0., 0.), BottomLeft, &web),
            finger.web_corner((0., 0.), TopLeft, &web),
            self.cover_edge_corner(
                edge(Side, 0., 1., TopLeft, self.cover.post_size),
                Shell::Top,
                false,
            ),
            finger.web_corner((0., 1.), TopLeft, &web),
        ]);

        let mut shape = finger.place_all(|position| self.switch_socket(position, hand))
            + finger.web_all(&web)
            + self.place_board(&board.render())
            + back_posts
            - self.place_board(&button.translate((6., -46., 0.)))
            + front_posts
            + self.place_board(&board_base)
            + connector
            + self.finger_cover_edge(Shell::Top)
            - self.place_cover_magnets(&self.cover_magnet_hole())
            - self.place_connector_mount(&self.connector_mount.hole());

        if self.enable_trackpoint && !hand.is_left() {
            shape += self.place_trackpoint(&self.trackpoint.mount());
            shape -= self.place_trackpoint(&self.trackpoint.holes());
        }

        self.finish(shape)
    }

    /// The boss a cover magnet is glued into: a cylinder capped with a dome.
    pub fn cover_magnet_mount(&self, shell: Shell) -> Shape {
        let thickness = self.cover.magnet_thickness;
        let radius = self.cover.magnet_radius + self.cover.magnet_mount_thickness;
        // A 12-gon radius lines the 16-facet dome up with the cylinder
        // better than the true radius does.
        let dome = sphere(fudge_radius(radius, 12), Some(16))
            - cube(radius * 2., radius * 2., radius * 2.).down(radius);
        let shape = cylinder_outer(radius, thickness, true).up(thickness / 2.) + dome.up(thickness);
        match shell {
            Shell::Top => shape,
            Shell::Bottom => shape.mirror(DVec3::Z),
        }
    }

    pub fn cover_magnet_hole(&self) -> Shape {
        cylinder_outer(self.cover.magnet_radius, self.cover.magnet_thickness * 2., true)
    }

    pub fn place_cover_magnets(&self, shape: &Shape) -> Shape {
        let shape = shape.down(COVER_EDGE_DEPTH);
        union(MAGNETS.iter().map(|&(position, direction)| {
            self.finger
                .key_place(position, &shape.translate(direction * KEYSWITCH_LENGTH))
        }))
    }

    /// A post on the outline of the top shell or bottom cover, hulled with
    /// web corners to build the cover edges. An `outer` post is a sliver at
    /// the very outside of the edge.
    pub fn cover_edge_corner(&self, at: EdgeCorner, shell: Shell, outer: bool) -> Shape {
        let cover = &self.cover;
        let vertical_offset = match shell {
            Shell::Top => COVER_EDGE_DEPTH - cover.post_size / 2.,
            Shell::Bottom => COVER_EDGE_DEPTH + cover.post_size / 2.,
        };
        let across = |edge: Edge| {
            if at.edge == edge && !outer {
                cover.thickness
            } else {
                cover.post_size
            }
        };
        let post = cube(across(Side), across(End), cover.post_size).down(vertical_offset);

        let protrusion = cover.edge_protrusion
            + if outer {
                (cover.thickness - cover.post_size) / 2.
            } else {
                0.
            };
        let along = |toward: bool| if toward { EDGE_POST_REACH } else { -EDGE_POST_REACH };
        let sign = |toward: bool| if toward { 1. } else { -1. };

        let post = match at.edge {
            Side => post
                .left(protrusion * sign(at.corner.is_left()))
                .forward(along(at.corner.is_top()) + at.offset),
            End => post
                .forward(protrusion * sign(at.corner.is_top()))
                .left(along(at.corner.is_left()) + at.offset),
        };
        self.finger.key_place(at.position, &post)
    }

    /// Each edge post paired with the web corner it hangs off, grouped into
    /// runs that are hulled pairwise.
    pub fn generate_cover_edge_corners(&self, shell: Shell) -> Vec<Vec<[Shape; 2]>> {
        let web = match shell {
            Shell::Top => WebParams::default(),
            Shell::Bottom => self.cover_web(),
        };
        let pair = |at: &EdgeCorner| {
            [
                self.cover_edge_corner(*at, shell, false),
                self.finger.web_corner(at.position, at.corner, &web),
            ]
        };
        vec![
            INNER_EDGE.iter().map(&pair).collect(),
            OUTER_EDGE.iter().map(&pair).collect(),
            top_edge(shell).iter().map(&pair).collect(),
        ]
    }

    pub fn finger_cover_edge(&self, shell: Shell) -> Shape {
        let edges = self
            .generate_cover_edge_corners(shell)
            .into_iter()
            .flat_map(|run| {
                run.windows(2)
                    .map(|pair| hull(pair.iter().flatten().cloned()))
                    .collect::<Vec<_>>()
            });
        union(edges) + self.place_cover_magnets(&self.cover_magnet_mount(shell))
    }

    pub fn finger_bottom_cover(&self) -> Shape {
        let finger = &self.finger;
        let cover = &self.cover;
        let cover_web = self.cover_web();
        let mount = &self.connector_mount;

        let boss_height = 10. + cover.thickness;
        let connector_boss = hull([
            self.place_connector_mount(
                &cylinder_outer(mount.outer_radius(), boss_height, true).down(boss_height / 2. + 0.3),
            ) - finger.key_place((0., 0.), &cube(30., 30., 20.).up(10. - cover.offset)),
            finger.web_corner((1., 0.), TopLeft, &cover_web),
            finger.web_corner((1., 0.), BottomLeft, &cover_web),
        ]);
        // The cable runs through here, one cover thickness above the cover.
        let passage_web = WebParams::at_depth(-cover.offset + cover.thickness, cover.thickness);
        let cable_passage = hull([
            self.place_connector_mount(&cylinder_outer(
                mount.outer_radius() - mount.outer_frame_width,
                20.,
                true,
            )),
            finger.web_corner((1., 0.), TopLeft, &passage_web),
            finger.web_corner((1., 0.), BottomLeft, &passage_web),
        ]);

        let shape = finger.place_all(|position| self.switch_bottom_cover(position))
            + finger.web_all(&cover_web)
            + connector_boss
            + self.finger_cover_edge(Shell::Bottom)
            - self.place_cover_magnets(&self.cover_magnet_hole())
            - cable_passage;

        if self.enable_nuts {
            let nuts: [&[Transform]; 3] = [&FINGER_NUT_1, &FINGER_NUT_2, &FINGER_NUT_3];
            shape + union(nuts.map(|nut| tenting_nut(true).transformed_by(nut)))
        } else {
            shape
        }
    }

    /// Fixed feet reaching from the bottom cover to the desk (the XY plane).
    pub fn finger_bottom_cover_feet(&self) -> Shape {
        let cover = &self.cover;
        let spot = cube(
            KEYSWITCH_WIDTH + self.wall_thickness * 2.,
            KEYSWITCH_LENGTH + self.wall_thickness * 2.,
            0.1,
        )
        .down(cover.offset + cover.thickness);
        let pad = cube(10., 10., 0.1);

        union(
            [
                ((0., 1.), (-60., 45.)),
                ((0., 3.), (-60., -45.)),
                ((5., 0.), (70., 45.)),
                ((5., 4.), (70., -65.)),
            ]
            .map(|(position, (x, y))| {
                hull([
                    self.finger.key_place(position, &spot),
                    pad.translate((x, y, 0.05)),
                ])
            }),
        )
    }

    /// Threaded tenting nuts tied into the bottom cover.
    pub fn finger_bottom_cover_nuts(&self) -> Shape {
        let finger = &self.finger;
        let web = self.cover_web();
        let nut = tenting_nut(true);
        // A thin slab on the side of the nut facing the cover.
        let face = |placement: &[Transform], (x, y): (f64, f64)| {
            let slab = if x == 0. {
                cube(10., 0.1, 10.)
            } else {
                cube(0.1, 10., 10.)
            };
            slab.translate((x, y, 0.)).transformed_by(placement)
        };
        let tie = |placement: &[Transform], side: (f64, f64), key: (f64, f64), corners: [Corner; 2]| {
            hull([
                face(placement, side),
                finger.web_corner(key, corners[0], &web),
                finger.web_corner(key, corners[1], &web),
            ])
        };

        nut.transformed_by(&FINGER_NUT_1)
            + nut.transformed_by(&FINGER_NUT_2)
            + nut.transformed_by(&FINGER_NUT_3)
            + tie(FINGER_NUT_1.as_slice(), (0., -5.), (5., 0.), [TopLeft, TopRight])
            + tie(FINGER_NUT_2.as_slice(), (-5., 0.), (5., 4.), [TopRight, BottomRight])
            + tie(FINGER_NUT_3.as_slice(), (5., 0.), (0., 1.), [TopLeft, BottomLeft])
    }

    /// The bottom cover with a boss under the middle of the well that takes
    /// a camera tripod screw from below.
    pub fn finger_bottom_cover_with_tripod_mount(&self) -> Shape {
        let cover = &self.cover;
        let center = Position::new(2.5, 2.);
        let underside = self
            .finger
            .key_transform(center)
            .transform_point3(DVec3::new(0., 0., -cover.offset - cover.thickness));

        let disc = cylinder_outer(TRIPOD_BOSS_RADIUS, 0.1, true);
        let boss = hull([
            self.finger
                .key_place(center, &disc.down(cover.offset + cover.thickness / 2.)),
            disc.translate((underside.x, underside.y, 0.05)),
        ]);
        let screw = screw_hole(TRIPOD_SCREW, TRIPOD_SCREW_DEPTH * 2., true)
            .translate((underside.x, underside.y, 0.));

        self.finger_bottom_cover() + boss - screw
    }

    /// The thumb well, with a tenting nut when thumb nuts are enabled.
    pub fn thumb_part(&self, hand: Hand) -> Shape {
        let thumb = &self.thumb;
        let web = WebParams::default();
        let mut shape = thumb.place_all(|position| self.switch_socket(position, hand))
            + thumb.web_all(&web);

        if self.enable_nuts && self.bottom_thumb_nuts {
            let face = |x: f64, y: f64, size: (f64, f64)| {
                cube(size.0, size.1, 10.)
                    .translate((x, y, 0.))
                    .transformed_by(&THUMB_NUT_1)
            };
            shape = shape
                + tenting_nut(true).transformed_by(&THUMB_NUT_1)
                + hull([
                    face(0., 5., (10., 0.1)),
                    thumb.web_corner((0., 1.), BottomLeft, &web),
                    thumb.web_corner((0., 1.), TopLeft, &web),
                ])
                + hull([
                    face(5., 0., (0.1, 10.)),
                    thumb.web_corner((0., 1.), BottomRight, &web),
                    thumb.web_corner((0., 1.), BottomLeft, &web),
                ]);
        }

        self.finish(shape)
    }

    /// The separate piece bolting the finger and thumb parts together.
    pub fn connector(&self) -> Shape {
        let nut = tenting_nut(false).down(10.);
        let face = cube(10., 0.1, 10.);
        nut.transformed_by(&FINGER_NUT_3)
            + nut.transformed_by(&THUMB_NUT_3)
            + hull([
                face.translate((0., -5., -10.)).transformed_by(&FINGER_NUT_3),
                face.translate((0., 5., -10.)).transformed_by(&THUMB_NUT_3),
            ])
    }

    /// Finger and thumb parts joined into one shell.
    pub fn single_piece(&self, hand: Hand) -> Shape {
        let finger = &self.finger;
        let thumb = &self.thumb;
        let web = WebParams::default();
        let web_thickness = finger.web_thickness();

        let inner_wall_post = finger.key_place(
            (0., 3.),
            &cube(WEB_POST_SIZE, WEB_POST_SIZE, web_thickness).translate((
                -((KEYSWITCH_WIDTH - WEB_POST_SIZE) / 2. + finger.wall_thickness()),
                0.,
                -web_thickness / 2.,
            )),
        );

        self.finger_part(hand)
            + hull([
                finger.web_corner((0., 2.), BottomLeft, &web),
                finger.web_corner((0., 3.), TopLeft, &web),
                thumb.web_corner((2., -1.), TopLeft, &web),
                thumb.web_corner((2., -1.), BottomLeft, &web),
                thumb.web_corner((1., -1.), BottomRight, &web),
                thumb.web_corner((1., -1.), TopRight, &web),
            ])
            + hull([
                finger.web_corner((0., 3.), TopLeft, &web),
                inner_wall_post,
                thumb.web_corner((2., 0.), TopLeft, &web),
                thumb.web_corner((2., -1.), BottomLeft, &web),
                thumb.web_corner((1., -1.), BottomRight, &web),
                thumb.web_corner((1., 0.), TopRight, &web),
            ])
            + hull([
                finger.web_corner((0., 2.), BottomLeft, &web),
                self.cover_edge_corner(edge(Side, 0., 2., TopLeft, 0.), Shell::Top, true),
                thumb.web_corner((2., -1.), TopLeft, &web),
                thumb.web_corner((1., -1.), TopRight, &web),
            ])
            + self.thumb_part(hand)
            - self.place_cover_magnets(&self.cover_magnet_hole())
    }

    /// The LCD frame, bolted to the left half's third finger nut. Built in
    /// the combined preview's coordinates, where the left half sits 100mm
    /// to the left.
    pub fn lcd_mount(&self) -> Shape {
        let to_left_half = |shape: Shape| shape.mirror(DVec3::X).left(100.);
        let lcd = &self.lcd;
        lcd.frame()
            + lcd.mount(to_left_half(
                cube(10., 0.1, 9.)
                    .translate((0., 5., -10.))
                    .transformed_by(&FINGER_NUT_3),
            ))
            + to_left_half(tenting_nut(false).down(10.).transformed_by(&FINGER_NUT_3))
    }

    pub fn trackpoint_stick(&self) -> Shape {
        self.place_trackpoint(&self.trackpoint.stick())
    }

    fn key_caps(&self, layout: &Layout, cluster: Cluster, hand: Hand) -> Result<Shape> {
        let caps = layout
            .generate_positions()
            .into_iter()
            .map(|position| {
                let cap = keycap(position, cluster, hand, self.legends)?;
                Ok(layout.key_place(position, &cap))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(union(caps))
    }

    /// Keycaps with legends, for preview renders.
    pub fn keycaps(&self, hand: Hand) -> Result<Shape> {
        Ok(self.key_caps(&self.finger, Cluster::Finger, hand)?
            + self.key_caps(&self.thumb, Cluster::Thumb, hand)?)
    }

    pub fn keyswitches(&self) -> Shape {
        self.finger.place_all(|_| switch_body()) + self.thumb.place_all(|_| switch_body())
    }

    pub fn pcbs(&self) -> Shape {
        let pcb = SingleKeyPcb.shape();
        self.finger.place_all(|_| pcb.clone()) + self.thumb.place_all(|_| pcb.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn assembly() -> KeyboardAssembly {
        KeyboardAssembly::new(&Config::default()).unwrap()
    }

    #[test]
    fn mirroring_twice_restores_the_part() {
        let connector = assembly().connector();
        let twice = Hand::Left.orient(Hand::Left.orient(connector.clone()));
        for (a, b) in connector.vertices().iter().zip(twice.vertices()) {
            assert!(a.abs_diff_eq(b, 1e-9));
        }
        assert_eq!(Hand::Right.orient(connector.clone()), connector);
    }

    #[test]
    fn left_mirror_flips_x() {
        let connector = assembly().connector();
        let right = connector.bounds().unwrap();
        let left = Hand::Left.orient(connector).bounds().unwrap();
        assert!((right.min.x + left.max.x).abs() < 1e-9);
        assert!((right.max.x + left.min.x).abs() < 1e-9);
    }

    #[test]
    fn rejects_layouts_without_anchor_keys() {
        let config = Config {
            columns: 5,
            ..Config::default()
        };
        assert!(matches!(
            KeyboardAssembly::new(&config),
            Err(Error::InvalidLayout(_))
        ));
    }

    #[test]
    fn double_keys_get_stabilizer_plates() {
        let assembly = assembly();
        let plain = assembly
            .switch_socket(Position::new(1., 0.), Hand::Right)
            .bounds()
            .unwrap();
        let tall = assembly
            .switch_socket(Position::new(0., 0.5), Hand::Right)
            .bounds()
            .unwrap();
        assert!(tall.size().y > plain.size().y + 10.);
        assert!((tall.size().x - plain.size().x).abs() < 1e-9);

        let wide = assembly
            .switch_socket(Position::new(0.5, 1.), Hand::Right)
            .bounds()
            .unwrap();
        assert!(wide.size().x > plain.size().x + 10.);
        assert!((wide.min.x + wide.max.x).abs() < 1e-9);
    }

    #[test]
    fn left_sockets_are_premirrored() {
        let assembly = assembly();
        let position = Position::new(1., 1.);
        assert_eq!(
            assembly.switch_socket(position, Hand::Left),
            assembly.switch_socket(position, Hand::Right).mirror(DVec3::X)
        );
    }

    #[test]
    fn cover_edge_runs() {
        let runs = assembly().generate_cover_edge_corners(Shell::Bottom);
        let lengths: Vec<_> = runs.iter().map(Vec::len).collect();
        assert_eq!(lengths, [6, 24, 2]);
    }

    #[test]
    fn cover_sits_below_the_sockets() {
        let assembly = assembly();
        let cover = assembly
            .switch_bottom_cover(Position::new(2., 2.))
            .bounds()
            .unwrap();
        assert!((cover.max.z + 11.).abs() < 1e-9);
        assert!((cover.min.z + 14.).abs() < 1e-9);
    }

    #[test]
    fn trackpoint_only_on_the_right() {
        // The mount is the only colored piece of an uncolored part.
        let marker = "color(c=[0, 1, 0, 1])";
        let assembly = assembly();
        assert!(assembly.finger_part(Hand::Right).to_scad().contains(marker));
        assert!(!assembly.finger_part(Hand::Left).to_scad().contains(marker));

        let config = Config {
            enable_trackpoint: false,
            ..Config::default()
        };
        let without = KeyboardAssembly::new(&config).unwrap();
        assert!(!without.finger_part(Hand::Right).to_scad().contains(marker));
    }

    #[test]
    fn nuts_follow_the_config() {
        let plain = assembly().finger_bottom_cover().to_scad();
        assert!(!plain.contains("M6x1"));

        let config = Config {
            enable_nuts: true,
            ..Config::default()
        };
        let with_nuts = KeyboardAssembly::new(&config).unwrap();
        assert_eq!(with_nuts.finger_bottom_cover().to_scad().matches("\"M6x1\"").count(), 3);
        // Thumb nuts need both switches.
        assert!(!with_nuts.thumb_part(Hand::Right).to_scad().contains("M6x1"));

        let config = Config {
            enable_nuts: true,
            bottom_thumb_nuts: true,
            ..Config::default()
        };
        let thumb = KeyboardAssembly::new(&config).unwrap().thumb_part(Hand::Right);
        assert!(thumb.to_scad().contains("M6x1"));
    }

    #[test]
    fn tripod_mount_reaches_the_desk() {
        let assembly = assembly();
        let shape = assembly.finger_bottom_cover_with_tripod_mount();
        assert!(shape.to_scad().contains("screw_hole(\"1/4-20\""));
        assert!(shape.vertices().iter().any(|v| v.z.abs() < 1e-9));
    }

    #[test]
    fn feet_stand_on_the_desk() {
        let feet = assembly().finger_bottom_cover_feet();
        let on_desk = feet.vertices().iter().filter(|v| v.z.abs() < 1e-9).count();
        // Four bottom corners per pad.
        assert_eq!(on_desk, 16);
    }

    #[test]
    fn connector_uses_clearance_holes() {
        let script = assembly().connector().to_scad();
        assert_eq!(script.matches("thread=false").count(), 2);
    }

    #[test]
    fn single_piece_contains_both_wells() {
        let assembly = assembly();
        let single = assembly.single_piece(Hand::Right).node_count();
        let finger = assembly.finger_part(Hand::Right).node_count();
        let thumb = assembly.thumb_part(Hand::Right).node_count();
        assert!(single > finger + thumb);
    }

    #[test]
    fn colored_parts() {
        let config = Config {
            use_color: true,
            ..Config::default()
        };
        let assembly = KeyboardAssembly::new(&config).unwrap();
        assert!(assembly.thumb_part(Hand::Right).to_scad().contains("color("));
    }

    #[test]
    fn keycaps_cover_every_key() {
        let assembly = assembly();
        let caps = assembly.keycaps(Hand::Right).unwrap().to_scad();
        // 29 finger keys and 8 thumb keys, minus the blank 2u key.
        assert_eq!(caps.matches("text(").count(), 36);
    }
}
