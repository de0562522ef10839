use std::fmt;

use crate::figure::Point;

/// The three irreducible geometric quantities of the area method.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometricQuantity {
    /// Signed area `S_ABC` of the triangle `ABC`.
    Area(Point, Point, Point),
    /// Pythagoras difference `P_ABC = AB^2 + CB^2 - AC^2`.
    Pythagoras(Point, Point, Point),
    /// Ratio `AB / CD` of two parallel directed segments.
    Ratio(Point, Point, Point, Point),
}

impl GeometricQuantity {
    #[must_use]
    pub fn points(&self) -> Vec<&Point> {
        match self {
            GeometricQuantity::Area(a, b, c) | GeometricQuantity::Pythagoras(a, b, c) => {
                vec![a, b, c]
            }
            GeometricQuantity::Ratio(a, b, c, d) => vec![a, b, c, d],
        }
    }

    #[must_use]
    pub fn contains(&self, point: &Point) -> bool {
        self.points().into_iter().any(|p| p == point)
    }

    /// How many times `point` occurs in this quantity.
    #[must_use]
    pub fn occurrences(&self, point: &Point) -> usize {
        self.points().into_iter().filter(|p| *p == point).count()
    }
}

impl fmt::Display for GeometricQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometricQuantity::Area(a, b, c) => write!(f, "(S {a} {b} {c})"),
            GeometricQuantity::Pythagoras(a, b, c) => write!(f, "(P {a} {b} {c})"),
            GeometricQuantity::Ratio(a, b, c, d) => write!(f, "(R {a} {b} {c} {d})"),
        }
    }
}
