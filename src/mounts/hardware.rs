//! Threaded and clearance holes, drawn by BOSL2's `screw_hole` module.

use crate::scad::{cube, library, Arg, LibraryCall, Shape};

const BOSL2_SCREWS: &[&str] = &["BOSL2/std.scad", "BOSL2/screws.scad"];
const SCREW_SEGMENTS: f64 = 32.;

pub const TENTING_NUT_SIZE: f64 = 10.;
const TENTING_SCREW: &str = "M6x1";

/// A beveled hole for the ISO or UTS screw named by `spec` (e.g. `"M2x1"` or
/// `"1/4-20"`), centered on the origin along Z.
pub fn screw_hole(spec: &str, length: f64, thread: bool) -> Shape {
    library(LibraryCall {
        module: "screw_hole",
        includes: BOSL2_SCREWS,
        positional: vec![Arg::Str(spec.to_owned())],
        named: vec![
            ("length", Arg::Number(length)),
            ("thread", Arg::Bool(thread)),
            ("bevel", Arg::Bool(true)),
            ("blunt_start", Arg::Bool(true)),
            ("$fn", Arg::Number(SCREW_SEGMENTS)),
        ],
    })
}

/// A cube with an M6 hole through it, for tenting legs or for bolting parts
/// together when `threaded` is false.
pub fn tenting_nut(threaded: bool) -> Shape {
    cube(TENTING_NUT_SIZE, TENTING_NUT_SIZE, TENTING_NUT_SIZE)
        - screw_hole(TENTING_SCREW, TENTING_NUT_SIZE + 0.01, threaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nuts_pull_in_bosl2() {
        let script = tenting_nut(true).to_scad();
        assert!(script.contains("include <BOSL2/screws.scad>"));
        assert!(script.contains(
            "screw_hole(\"M6x1\", length=10.01, thread=true, bevel=true, blunt_start=true, $fn=32);"
        ));
    }

    #[test]
    fn unthreaded_nuts_are_clearance_holes() {
        assert!(tenting_nut(false).to_scad().contains("thread=false"));
    }
}
