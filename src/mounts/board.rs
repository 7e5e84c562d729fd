use crate::scad::{cube, hull, union, Shape};

// Black Pill / RP2040 "TYPE-C" board (mm). The board's origin is the middle
// of its USB edge; it extends along -Y.
const BOARD_WIDTH: f64 = 20.8;
const BOARD_LENGTH: f64 = 53.3;
const BOARD_THICKNESS: f64 = 1.6;
const BOARD_CLEARANCE: f64 = 0.2;

const POST_SIZE: f64 = 3.;
// How far each post reaches under the edge of the board.
const POST_OVERLAP: f64 = 1.;
// Material above the board that holds it down.
const POST_LIP: f64 = 1.5;
// Posts start this far below the mounting surface so they fuse into it.
const POST_ROOT: f64 = 1.;

/// Clips holding a microcontroller board `distance_from_surface` above the
/// mounting surface (the XY plane).
pub struct BoardMount {
    distance_from_surface: f64,
}

impl BoardMount {
    pub fn new(distance_from_surface: f64) -> Self {
        Self {
            distance_from_surface,
        }
    }

    fn post(&self, x: f64, y: f64) -> Shape {
        let height = POST_ROOT + self.distance_from_surface + BOARD_THICKNESS + POST_LIP;
        cube(POST_SIZE, POST_SIZE, height).translate((x, y, height / 2. - POST_ROOT))
    }

    fn post_x(&self) -> f64 {
        (BOARD_WIDTH + POST_SIZE) / 2. - POST_OVERLAP
    }

    /// The pair of posts at the far end of the board.
    pub fn back_mounting_posts(&self) -> Shape {
        let y = -BOARD_LENGTH - POST_SIZE / 2. + POST_OVERLAP;
        (self.post(-self.post_x(), y) + self.post(self.post_x(), y)) - self.board_profile()
    }

    /// The pair of posts next to the USB connector.
    pub fn front_mounting_posts(&self) -> Shape {
        let y = POST_SIZE / 2. - POST_OVERLAP;
        (self.post(-self.post_x(), y) + self.post(self.post_x(), y)) - self.board_profile()
    }

    /// The space the board and its USB plug need, including the slot it
    /// slides into.
    pub fn board_profile(&self) -> Shape {
        let board = cube(
            BOARD_WIDTH + BOARD_CLEARANCE,
            BOARD_LENGTH + BOARD_CLEARANCE,
            BOARD_THICKNESS + BOARD_CLEARANCE,
        )
        .translate((
            0.,
            -BOARD_LENGTH / 2.,
            self.distance_from_surface + BOARD_THICKNESS / 2.,
        ));
        // Room under the board for components and solder joints.
        let underside = cube(
            BOARD_WIDTH - 2. * POST_OVERLAP,
            BOARD_LENGTH,
            self.distance_from_surface,
        )
        .translate((0., -BOARD_LENGTH / 2., self.distance_from_surface / 2. + 0.01));
        let usb_plug = cube(12., 20., 7.).translate((
            0.,
            10.,
            self.distance_from_surface + BOARD_THICKNESS + 1.,
        ));
        union([board, underside, usb_plug])
    }

    pub fn render(&self) -> Shape {
        self.back_mounting_posts() + self.front_mounting_posts()
    }

    /// A plate joining all four posts at the mounting surface.
    pub fn base(&self, thickness: f64) -> Shape {
        let slab = cube(60., 120., thickness);
        hull([
            slab.clone() & self.back_mounting_posts(),
            slab & self.front_mounting_posts(),
        ])
    }
}
