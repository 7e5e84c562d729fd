use std::f64::consts::TAU;

use glam::{DAffine3, DVec3};

use super::{Combine, Node, Shape};

/// Facets used to sample round primitives that do not carry their own count.
const SAMPLE_SEGMENTS: u32 = 16;

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: DVec3,
    pub max: DVec3,
}

impl Bounds {
    pub fn size(&self) -> DVec3 {
        self.max - self.min
    }
}

fn ring(radius: f64, z: f64, segments: u32) -> impl Iterator<Item = DVec3> {
    (0..segments).map(move |i| {
        let theta = TAU * i as f64 / segments as f64;
        DVec3::new(radius * theta.cos(), radius * theta.sin(), z)
    })
}

fn push_points(out: &mut Vec<DVec3>, world: DAffine3, points: impl IntoIterator<Item = DVec3>) {
    out.extend(points.into_iter().map(|p| world.transform_point3(p)));
}

impl Shape {
    /// World-space sample points of every solid leaf: cube corners, cylinder
    /// rims, sphere poles and equators, polygon outlines.
    ///
    /// Material removed by a difference is skipped. Text and library calls
    /// contribute only their origin.
    pub fn vertices(&self) -> Vec<DVec3> {
        let mut out = Vec::new();
        self.collect_vertices(DAffine3::IDENTITY, &mut out);
        out
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let vertices = self.vertices();
        let first = *vertices.first()?;
        Some(vertices.iter().fold(
            Bounds {
                min: first,
                max: first,
            },
            |bounds, v| Bounds {
                min: bounds.min.min(*v),
                max: bounds.max.max(*v),
            },
        ))
    }

    fn collect_vertices(&self, world: DAffine3, out: &mut Vec<DVec3>) {
        match &*self.0 {
            Node::Empty => {}
            Node::Cube { size } => {
                let half = *size / 2.;
                let corners = (0..8).map(|i| {
                    DVec3::new(
                        if i & 1 == 0 { -half.x } else { half.x },
                        if i & 2 == 0 { -half.y } else { half.y },
                        if i & 4 == 0 { -half.z } else { half.z },
                    )
                });
                push_points(out, world, corners);
            }
            Node::Cylinder {
                r1,
                r2,
                height,
                center,
                segments,
            } => {
                let segments = segments.unwrap_or(SAMPLE_SEGMENTS);
                let bottom = if *center { -height / 2. } else { 0. };
                let rims = ring(*r1, bottom, segments).chain(ring(*r2, bottom + height, segments));
                push_points(out, world, rims);
            }
            Node::Sphere { radius, segments } => {
                let segments = segments.unwrap_or(SAMPLE_SEGMENTS);
                let equator = ring(*radius, 0., segments);
                let poles = [DVec3::Z * *radius, DVec3::NEG_Z * *radius];
                push_points(out, world, equator.chain(poles));
            }
            Node::Polygon { points } => {
                push_points(out, world, points.iter().map(|p| p.extend(0.)));
            }
            Node::Text { .. } | Node::Library(_) => push_points(out, world, [DVec3::ZERO]),
            Node::LinearExtrude { height, child } => {
                child.collect_vertices(world, out);
                child.collect_vertices(world * DAffine3::from_translation(DVec3::Z * *height), out);
            }
            Node::Transformed { transform, child } => {
                child.collect_vertices(world * transform.affine(), out);
            }
            Node::Color { child, .. } => child.collect_vertices(world, out),
            Node::Combined {
                op: Combine::Difference,
                children,
            } => {
                if let Some(first) = children.first() {
                    first.collect_vertices(world, out);
                }
            }
            Node::Combined { children, .. } => {
                for child in children {
                    child.collect_vertices(world, out);
                }
            }
        }
    }
}
