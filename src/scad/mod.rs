//! An immutable CSG expression tree, written out as OpenSCAD.
//!
//! Every operation returns a new [`Shape`]; subtrees are reference counted so
//! placing the same socket thirty times shares one node.

mod render;
mod transform;
mod vertices;

use std::f64::consts::PI;
use std::iter::Sum;
use std::ops::{Add, AddAssign, BitAnd, Sub, SubAssign};
use std::rc::Rc;

use glam::{DVec2, DVec3};

use crate::angle::Angle;

pub use render::SCAD_HEADER;
pub use transform::{compose, Transform};
pub use vertices::Bounds;

/// Default facet count for cylinders built with [`cylinder_outer`].
pub const CYLINDER_SEGMENTS: u32 = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Shape(Rc<Node>);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    Union,
    Difference,
    Intersection,
    Hull,
}

/// An argument to an external OpenSCAD library module.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Number(f64),
    Bool(bool),
    Str(String),
}

/// A call into an OpenSCAD library that the generated script includes.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryCall {
    pub module: &'static str,
    pub includes: &'static [&'static str],
    pub positional: Vec<Arg>,
    pub named: Vec<(&'static str, Arg)>,
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Empty,
    Cube {
        size: DVec3,
    },
    Cylinder {
        r1: f64,
        r2: f64,
        height: f64,
        center: bool,
        segments: Option<u32>,
    },
    Sphere {
        radius: f64,
        segments: Option<u32>,
    },
    Polygon {
        points: Vec<DVec2>,
    },
    Text {
        text: String,
        size: f64,
        font: Option<String>,
    },
    LinearExtrude {
        height: f64,
        child: Shape,
    },
    Library(LibraryCall),
    Transformed {
        transform: Transform,
        child: Shape,
    },
    Color {
        rgba: [f64; 4],
        child: Shape,
    },
    Combined {
        op: Combine,
        children: Vec<Shape>,
    },
}

/// A cube centered on the origin.
pub fn cube(x: f64, y: f64, z: f64) -> Shape {
    Shape::new(Node::Cube {
        size: DVec3::new(x, y, z),
    })
}

pub fn cylinder(radius: f64, height: f64, center: bool, segments: Option<u32>) -> Shape {
    Shape::new(Node::Cylinder {
        r1: radius,
        r2: radius,
        height,
        center,
        segments,
    })
}

/// The radius a polygon with `segments` sides needs so that its flat faces,
/// rather than its vertices, sit at `radius`.
pub fn fudge_radius(radius: f64, segments: u32) -> f64 {
    radius / (PI / segments as f64).cos()
}

/// A cylinder whose faceted surface fully contains the circle of `radius`.
pub fn cylinder_outer(radius: f64, height: f64, center: bool) -> Shape {
    cylinder(
        fudge_radius(radius, CYLINDER_SEGMENTS),
        height,
        center,
        Some(CYLINDER_SEGMENTS),
    )
}

pub fn sphere(radius: f64, segments: Option<u32>) -> Shape {
    Shape::new(Node::Sphere { radius, segments })
}

/// A 2D polygon in the XY plane.
pub fn polygon(points: impl IntoIterator<Item = (f64, f64)>) -> Shape {
    Shape::new(Node::Polygon {
        points: points.into_iter().map(DVec2::from).collect(),
    })
}

/// 2D text, centered on the origin.
pub fn text(text: &str, size: f64, font: Option<&str>) -> Shape {
    Shape::new(Node::Text {
        text: text.to_owned(),
        size,
        font: font.map(str::to_owned),
    })
}

pub fn library(call: LibraryCall) -> Shape {
    Shape::new(Node::Library(call))
}

pub fn hull(shapes: impl IntoIterator<Item = Shape>) -> Shape {
    Shape::combine(Combine::Hull, shapes)
}

pub fn union(shapes: impl IntoIterator<Item = Shape>) -> Shape {
    Shape::combine(Combine::Union, shapes)
}

impl Shape {
    fn new(node: Node) -> Self {
        Self(Rc::new(node))
    }

    pub fn empty() -> Self {
        Self::new(Node::Empty)
    }

    pub fn is_empty(&self) -> bool {
        matches!(*self.0, Node::Empty)
    }

    fn combine(op: Combine, shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut children = Vec::new();
        for shape in shapes {
            if shape.is_empty() {
                continue;
            }
            // Unions are associative, so nested ones are flattened.
            if let Node::Combined {
                op: Combine::Union,
                children: nested,
            } = &*shape.0
            {
                if op == Combine::Union {
                    children.extend(nested.iter().cloned());
                    continue;
                }
            }
            children.push(shape);
        }
        match (op, children.len()) {
            (_, 0) => Self::empty(),
            (Combine::Union, 1) => children.remove(0),
            _ => Self::new(Node::Combined { op, children }),
        }
    }

    pub fn transformed(&self, transform: Transform) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        Self::new(Node::Transformed {
            transform,
            child: self.clone(),
        })
    }

    /// Apply transforms listed in application order.
    pub fn transformed_by<'a>(&self, steps: impl IntoIterator<Item = &'a Transform>) -> Self {
        steps
            .into_iter()
            .fold(self.clone(), |shape, step| shape.transformed(*step))
    }

    pub fn translate(&self, offset: impl Into<DVec3>) -> Self {
        self.transformed(Transform::Translate(offset.into()))
    }

    pub fn up(&self, z: f64) -> Self {
        self.translate((0., 0., z))
    }

    pub fn down(&self, z: f64) -> Self {
        self.translate((0., 0., -z))
    }

    pub fn left(&self, x: f64) -> Self {
        self.translate((-x, 0., 0.))
    }

    pub fn right(&self, x: f64) -> Self {
        self.translate((x, 0., 0.))
    }

    pub fn forward(&self, y: f64) -> Self {
        self.translate((0., y, 0.))
    }

    pub fn back(&self, y: f64) -> Self {
        self.translate((0., -y, 0.))
    }

    pub fn rotate(&self, angle: Angle, axis: impl Into<DVec3>) -> Self {
        self.transformed(Transform::Rotate {
            angle,
            axis: axis.into(),
        })
    }

    /// Euler rotation in degrees about X, then Y, then Z.
    pub fn rotate_xyz(&self, degrees: impl Into<DVec3>) -> Self {
        self.transformed(Transform::RotateXyz(degrees.into()))
    }

    pub fn mirror(&self, normal: impl Into<DVec3>) -> Self {
        self.transformed(Transform::Mirror(normal.into()))
    }

    pub fn color(&self, rgb: (f64, f64, f64)) -> Self {
        self.color_rgba([rgb.0, rgb.1, rgb.2, 1.])
    }

    pub fn color_rgba(&self, rgba: [f64; 4]) -> Self {
        if self.is_empty() {
            return self.clone();
        }
        Self::new(Node::Color {
            rgba,
            child: self.clone(),
        })
    }

    /// Extrude a 2D shape upward from the XY plane.
    pub fn linear_extrude(&self, height: f64) -> Self {
        Self::new(Node::LinearExtrude {
            height,
            child: self.clone(),
        })
    }

    /// Number of nodes in the tree, counting shared subtrees once per use.
    pub fn node_count(&self) -> usize {
        1 + match &*self.0 {
            Node::LinearExtrude { child, .. }
            | Node::Transformed { child, .. }
            | Node::Color { child, .. } => child.node_count(),
            Node::Combined { children, .. } => children.iter().map(Shape::node_count).sum(),
            _ => 0,
        }
    }

    fn difference(self, cut: Shape) -> Self {
        if self.is_empty() || cut.is_empty() {
            return self;
        }
        // `a - b - c` reads as one difference with two cuts.
        if let Node::Combined {
            op: Combine::Difference,
            children,
        } = &*self.0
        {
            let mut children = children.clone();
            children.push(cut);
            return Self::new(Node::Combined {
                op: Combine::Difference,
                children,
            });
        }
        Self::new(Node::Combined {
            op: Combine::Difference,
            children: vec![self, cut],
        })
    }
}

impl Add for Shape {
    type Output = Shape;

    fn add(self, rhs: Shape) -> Shape {
        union([self, rhs])
    }
}

impl AddAssign for Shape {
    fn add_assign(&mut self, rhs: Shape) {
        *self = self.clone() + rhs;
    }
}

impl Sub for Shape {
    type Output = Shape;

    fn sub(self, rhs: Shape) -> Shape {
        self.difference(rhs)
    }
}

impl SubAssign for Shape {
    fn sub_assign(&mut self, rhs: Shape) {
        *self = self.clone() - rhs;
    }
}

impl BitAnd for Shape {
    type Output = Shape;

    fn bitand(self, rhs: Shape) -> Shape {
        Shape::combine(Combine::Intersection, [self, rhs])
    }
}

impl Sum for Shape {
    fn sum<I: Iterator<Item = Shape>>(iter: I) -> Shape {
        union(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_unions_are_flattened() {
        let shape = cube(1., 1., 1.) + sphere(1., None) + cylinder(1., 2., true, None);
        match &*shape.0 {
            Node::Combined { op, children } => {
                assert_eq!(*op, Combine::Union);
                assert_eq!(children.len(), 3);
            }
            other => panic!("expected a union, got {other:?}"),
        }
    }

    #[test]
    fn empty_shapes_vanish_from_booleans() {
        let solid = cube(1., 2., 3.);
        assert_eq!(Shape::empty() + solid.clone(), solid);
        assert_eq!(solid.clone() - Shape::empty(), solid);
        assert!((Shape::empty() - solid.clone()).is_empty());
        assert!(hull(Vec::new()).is_empty());
        assert!(Shape::empty().up(3.).is_empty());
    }

    #[test]
    fn chained_differences_share_one_node() {
        let shape = cube(4., 4., 4.) - sphere(1., None) - sphere(2., None);
        assert_eq!(shape.node_count(), 4);
    }

    #[test]
    fn sum_unions_an_iterator() {
        let shape: Shape = (0..3).map(|i| cube(1., 1., 1.).right(i as f64)).sum();
        // Union + three (translate + cube) pairs.
        assert_eq!(shape.node_count(), 7);
    }

    #[test]
    fn fudged_radius_puts_faces_on_the_circle() {
        let radius = fudge_radius(2., 4);
        assert!((radius - 2. * 2f64.sqrt()).abs() < 1e-12);
    }
}
