use crate::scad::{cylinder_outer, Shape};

/// A round panel mount for a Mini-DIN socket, used as the cable connector.
pub struct MiniDinMount {
    connector_radius: f64,
    inner_frame_width: f64,
    inner_frame_thickness: f64,
    pub outer_frame_width: f64,
    pub outer_frame_thickness: f64,
}

impl Default for MiniDinMount {
    fn default() -> Self {
        Self {
            connector_radius: 11.4 / 2.,
            inner_frame_width: 2.,
            inner_frame_thickness: 1.25,
            outer_frame_width: 3.,
            outer_frame_thickness: 4.,
        }
    }
}

impl MiniDinMount {
    pub fn outer_radius(&self) -> f64 {
        self.connector_radius + self.inner_frame_width + self.outer_frame_width
    }

    pub fn frame(&self) -> Shape {
        cylinder_outer(self.outer_radius(), self.outer_frame_thickness, false)
    }

    /// The cutout: a through hole for the socket body and a recess that the
    /// socket's flange sits in.
    pub fn hole(&self) -> Shape {
        (cylinder_outer(
            self.outer_radius() - self.outer_frame_width,
            self.outer_frame_thickness * 8.,
            true,
        ) - cylinder_outer(self.outer_radius(), self.inner_frame_thickness, false)
            .translate((0., 0., self.outer_frame_width / 2.)))
            + cylinder_outer(
                self.connector_radius,
                self.inner_frame_thickness * 8.,
                true,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outer_radius_adds_both_frames() {
        assert!((MiniDinMount::default().outer_radius() - 10.7).abs() < 1e-12);
    }

    #[test]
    fn frame_sits_on_the_xy_plane() {
        let bounds = MiniDinMount::default().frame().bounds().unwrap();
        assert!(bounds.min.z.abs() < 1e-12);
        assert!((bounds.max.z - 4.).abs() < 1e-12);
    }
}
