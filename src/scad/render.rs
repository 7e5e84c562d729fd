use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use glam::{DVec2, DVec3};

use super::{Arg, Combine, Node, Shape, Transform};
use crate::error::{Error, Result};

pub const SCAD_HEADER: &str = "// Generated by dactyl-lynx. Edit the generator, not this file.";

const INDENT: &str = "    ";

fn number(value: f64) -> String {
    // OpenSCAD has no notion of signed zero.
    if value == 0. {
        return "0".to_owned();
    }
    format!("{value}")
}

fn vec2(v: DVec2) -> String {
    format!("[{}, {}]", number(v.x), number(v.y))
}

fn vec3(v: DVec3) -> String {
    format!("[{}, {}, {}]", number(v.x), number(v.y), number(v.z))
}

fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            _ => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

fn arg(value: &Arg) -> String {
    match value {
        Arg::Number(n) => number(*n),
        Arg::Bool(b) => b.to_string(),
        Arg::Str(s) => string_literal(s),
    }
}

fn fragments(segments: Option<u32>) -> String {
    segments.map(|n| format!(", $fn={n}")).unwrap_or_default()
}

impl Shape {
    /// The OpenSCAD script for this shape, including any library includes it
    /// needs.
    pub fn to_scad(&self) -> String {
        let mut includes = Vec::new();
        self.collect_includes(&mut includes);

        let mut out = String::new();
        out.push_str(SCAD_HEADER);
        out.push('\n');
        for include in &includes {
            let _ = writeln!(out, "include <{include}>");
        }
        out.push('\n');
        self.write_node(&mut out, 0);
        out
    }

    pub fn write_scad(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, self.to_scad()).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn collect_includes(&self, includes: &mut Vec<&'static str>) {
        match &*self.0 {
            Node::Library(call) => {
                for &include in call.includes {
                    if !includes.contains(&include) {
                        includes.push(include);
                    }
                }
            }
            Node::LinearExtrude { child, .. }
            | Node::Transformed { child, .. }
            | Node::Color { child, .. } => child.collect_includes(includes),
            Node::Combined { children, .. } => {
                for child in children {
                    child.collect_includes(includes);
                }
            }
            _ => {}
        }
    }

    fn write_node(&self, out: &mut String, depth: usize) {
        let pad = INDENT.repeat(depth);
        match &*self.0 {
            Node::Empty => {}
            Node::Cube { size } => {
                let _ = writeln!(out, "{pad}cube(size={}, center=true);", vec3(*size));
            }
            Node::Cylinder {
                r1,
                r2,
                height,
                center,
                segments,
            } => {
                let radii = if r1 == r2 {
                    format!("r={}", number(*r1))
                } else {
                    format!("r1={}, r2={}", number(*r1), number(*r2))
                };
                let _ = writeln!(
                    out,
                    "{pad}cylinder(h={}, {radii}, center={center}{});",
                    number(*height),
                    fragments(*segments)
                );
            }
            Node::Sphere { radius, segments } => {
                let _ = writeln!(
                    out,
                    "{pad}sphere(r={}{});",
                    number(*radius),
                    fragments(*segments)
                );
            }
            Node::Polygon { points } => {
                let points = points.iter().map(|p| vec2(*p)).collect::<Vec<_>>();
                let _ = writeln!(out, "{pad}polygon(points=[{}]);", points.join(", "));
            }
            Node::Text { text, size, font } => {
                let font = font
                    .as_deref()
                    .map(|f| format!(", font={}", string_literal(f)))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{pad}text(text={}, size={}, halign=\"center\", valign=\"center\"{font});",
                    string_literal(text),
                    number(*size)
                );
            }
            Node::Library(call) => {
                let args = call
                    .positional
                    .iter()
                    .map(arg)
                    .chain(
                        call.named
                            .iter()
                            .map(|(name, value)| format!("{name}={}", arg(value))),
                    )
                    .collect::<Vec<_>>();
                let _ = writeln!(out, "{pad}{}({});", call.module, args.join(", "));
            }
            Node::LinearExtrude { height, child } => {
                let header = format!("linear_extrude(height={})", number(*height));
                Self::write_block(out, depth, &header, std::slice::from_ref(child));
            }
            Node::Transformed { transform, child } => {
                let header = match transform {
                    Transform::Translate(offset) => format!("translate(v={})", vec3(*offset)),
                    Transform::Rotate { angle, axis } => {
                        format!("rotate(a={}, v={})", number(angle.degrees()), vec3(*axis))
                    }
                    Transform::RotateXyz(degrees) => format!("rotate(a={})", vec3(*degrees)),
                    Transform::Mirror(normal) => format!("mirror(v={})", vec3(*normal)),
                };
                Self::write_block(out, depth, &header, std::slice::from_ref(child));
            }
            Node::Color { rgba, child } => {
                let header = format!(
                    "color(c=[{}, {}, {}, {}])",
                    number(rgba[0]),
                    number(rgba[1]),
                    number(rgba[2]),
                    number(rgba[3])
                );
                Self::write_block(out, depth, &header, std::slice::from_ref(child));
            }
            Node::Combined { op, children } => {
                let header = match op {
                    Combine::Union => "union()",
                    Combine::Difference => "difference()",
                    Combine::Intersection => "intersection()",
                    Combine::Hull => "hull()",
                };
                Self::write_block(out, depth, header, children);
            }
        }
    }

    fn write_block(out: &mut String, depth: usize, header: &str, children: &[Shape]) {
        let pad = INDENT.repeat(depth);
        let _ = writeln!(out, "{pad}{header} {{");
        for child in children {
            child.write_node(out, depth + 1);
        }
        let _ = writeln!(out, "{pad}}}");
    }
}

#[cfg(test)]
mod tests {
    use super::super::{cube, cylinder, hull, library, sphere, text, LibraryCall};
    use super::*;
    use crate::angle::Angle;

    fn body(script: &str) -> Vec<&str> {
        script
            .lines()
            .skip_while(|line| !line.is_empty())
            .skip(1)
            .collect()
    }

    #[test]
    fn writes_nested_blocks() {
        let shape = (cube(1., 2., 3.) - sphere(1.5, Some(16))).translate((0., 0., -2.));
        assert_eq!(
            body(&shape.to_scad()),
            [
                "translate(v=[0, 0, -2]) {",
                "    difference() {",
                "        cube(size=[1, 2, 3], center=true);",
                "        sphere(r=1.5, $fn=16);",
                "    }",
                "}",
            ]
        );
    }

    #[test]
    fn rotations_are_written_in_degrees() {
        let shape = cylinder(1., 2., false, None).rotate(Angle::Degrees(-90.), (0., 1., 0.));
        assert!(shape.to_scad().contains("rotate(a=-90, v=[0, 1, 0]) {"));
    }

    #[test]
    fn text_is_escaped() {
        let shape = text("\\", 3., Some("Fira \"Code\""));
        assert!(shape
            .to_scad()
            .contains(r#"text(text="\\", size=3, halign="center", valign="center", font="Fira \"Code\"");"#));
    }

    #[test]
    fn library_includes_only_when_used() {
        let plain = hull([cube(1., 1., 1.), cube(1., 1., 1.).up(4.)]);
        assert!(!plain.to_scad().contains("include"));

        let screw = library(LibraryCall {
            module: "screw_hole",
            includes: &["BOSL2/std.scad", "BOSL2/screws.scad"],
            positional: vec![Arg::Str("M6x1".into())],
            named: vec![("length", Arg::Number(10.01)), ("thread", Arg::Bool(true))],
        });
        let script = (plain - screw).to_scad();
        assert!(script.contains("include <BOSL2/std.scad>\ninclude <BOSL2/screws.scad>\n"));
        assert!(script.contains("screw_hole(\"M6x1\", length=10.01, thread=true);"));
    }

    #[test]
    fn braces_balance() {
        let shape = hull([
            cube(1., 1., 1.).color((0.1, 0.2, 0.3)),
            text("A", 2., None).linear_extrude(1.).mirror((1., 0., 0.)),
        ]) + sphere(2., None).rotate_xyz((0., 0., 90.));
        let script = shape.to_scad();
        assert_eq!(script.matches('{').count(), script.matches('}').count());
    }

    #[test]
    fn writes_files_and_creates_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("things").join("cube.scad");
        cube(1., 1., 1.).write_scad(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(SCAD_HEADER));
    }
}
