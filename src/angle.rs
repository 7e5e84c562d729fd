#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Angle {
    Degrees(f64),
    Radians(f64),
}

impl Angle {
    pub fn degrees(self) -> f64 {
        match self {
            Angle::Degrees(degrees) => degrees,
            Angle::Radians(radians) => radians.to_degrees(),
        }
    }

    pub fn radians(self) -> f64 {
        match self {
            Angle::Degrees(degrees) => degrees.to_radians(),
            Angle::Radians(radians) => radians,
        }
    }

    /// Scale the angle, keeping its unit.
    pub fn times(self, factor: f64) -> Angle {
        match self {
            Angle::Degrees(degrees) => Angle::Degrees(degrees * factor),
            Angle::Radians(radians) => Angle::Radians(radians * factor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn converts_between_units() {
        assert!((Angle::Radians(PI).degrees() - 180.).abs() < 1e-12);
        assert!((Angle::Degrees(90.).radians() - PI / 2.).abs() < 1e-12);
    }

    #[test]
    fn times_keeps_the_unit() {
        assert_eq!(Angle::Degrees(15.).times(-2.), Angle::Degrees(-30.));
        assert_eq!(Angle::Radians(0.5).times(2.), Angle::Radians(1.));
    }
}
