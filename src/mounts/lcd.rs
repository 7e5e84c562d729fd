use glam::DVec3;

use super::hardware::screw_hole;
use crate::angle::Angle;
use crate::scad::{cube, hull, union, Shape};

/// A frame holding a small LCD, screwed in through its four corner holes.
pub struct LcdMount {
    lcd_size: DVec3,
    mounting_hole_centers: (f64, f64),
    margin_width: (f64, f64),
    // Wall width around the screen, and overall frame depth.
    frame_thickness: (f64, f64),
    corner_size: f64,
}

impl Default for LcdMount {
    fn default() -> Self {
        Self {
            lcd_size: DVec3::new(27.8, 39.3, 1.2),
            mounting_hole_centers: (22.5, 34.),
            margin_width: (0.5, 1.1),
            frame_thickness: (4., 3.),
            corner_size: 3.75,
        }
    }
}

impl LcdMount {
    pub fn place(&self, shape: &Shape) -> Shape {
        shape
            .rotate(Angle::Degrees(20.), DVec3::X)
            .translate((-25., 48., 50.))
    }

    fn outer_size(&self) -> (f64, f64) {
        (
            self.lcd_size.x + (self.frame_thickness.0 - self.margin_width.0) * 2.,
            self.lcd_size.y + (self.frame_thickness.0 - self.margin_width.1) * 2.,
        )
    }

    fn corner(&self) -> Shape {
        let block_size = self.corner_size + self.frame_thickness.0 / 2.;
        let block_thickness = self.frame_thickness.1 - self.lcd_size.z;
        let xy_offset = (self.corner_size - block_size) / 2.;
        let z_offset = (self.frame_thickness.1 - block_thickness) / 2.;

        (cube(block_size, block_size, block_thickness).translate((xy_offset, xy_offset, 0.))
            - screw_hole("M2x1", block_thickness + 0.01, false))
        .up(z_offset)
    }

    pub fn frame(&self) -> Shape {
        let (outer_x, outer_y) = self.outer_size();
        let depth = self.frame_thickness.1;
        let (hole_x, hole_y) = (
            self.mounting_hole_centers.0 / 2.,
            self.mounting_hole_centers.1 / 2.,
        );

        let bezel = cube(outer_x, outer_y, depth)
            - cube(
                self.lcd_size.x - self.margin_width.0 * 2.,
                self.lcd_size.y - self.margin_width.1 * 2.,
                depth + 1.,
            )
            - cube(self.lcd_size.x, self.lcd_size.y, depth)
                .translate((0., 0., -depth + self.lcd_size.z));

        let corner = self.corner();
        let corners = [
            (0., -hole_x, -hole_y),
            (90., hole_x, -hole_y),
            (180., hole_x, hole_y),
            (270., -hole_x, hole_y),
        ]
        .into_iter()
        .map(|(degrees, x, y)| corner.rotate_xyz((0., 0., degrees)).translate((x, y, 0.)));

        self.place(&(bezel + union(corners)))
    }

    /// A strip from the bottom edge of the frame, hulled to `target`.
    pub fn mount(&self, target: Shape) -> Shape {
        let (outer_x, _) = self.outer_size();
        let edge = cube(outer_x, 0.01, self.frame_thickness.1).translate((
            0.,
            -self.lcd_size.y / 2. - (self.frame_thickness.0 - self.margin_width.1),
            0.,
        ));
        hull([self.place(&edge), target])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_uses_m2_clearance_holes() {
        let script = LcdMount::default().frame().to_scad();
        assert_eq!(script.matches("screw_hole(\"M2x1\"").count(), 4);
        assert!(script.contains("thread=false"));
    }

    #[test]
    fn mount_reaches_its_target() {
        let lcd = LcdMount::default();
        let target = cube(1., 1., 1.).translate((0., 0., -40.));
        let bounds = lcd.mount(target).bounds().unwrap();
        assert!(bounds.min.z < -39.);
        assert!(bounds.max.z > 40.);
    }
}
