use log::{debug, warn};
use num_traits::ToPrimitive;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::errors::AreaError;
use crate::expr::{Expression, GeometricQuantity};
use crate::figure::{Construction, Figure, Point, RESERVED_LABELS};
use crate::HashMap;

const EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Coord { x, y }
    }

    fn sub(self, other: Coord) -> Coord {
        Coord::new(self.x - other.x, self.y - other.y)
    }

    fn add(self, other: Coord) -> Coord {
        Coord::new(self.x + other.x, self.y + other.y)
    }

    fn scale(self, k: f64) -> Coord {
        Coord::new(self.x * k, self.y * k)
    }

    fn dot(self, other: Coord) -> f64 {
        self.x * other.x + self.y * other.y
    }

    fn cross(self, other: Coord) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Rotation by 90 degrees counter-clockwise
    fn rot90(self) -> Coord {
        Coord::new(-self.y, self.x)
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Coord::new(x, y)
    }
}

/// Float coordinates for every point of a figure.
///
/// Only used to cross-check symbolic results, never as a proof.
#[derive(Debug, Clone, Default)]
pub struct NumericModel {
    coords: HashMap<String, Coord>,
}

impl NumericModel {
    /// Place the free points at `free_coords` and compute every constructed
    /// point from them.
    ///
    /// # Errors
    /// - [`AreaError::UnknownPoint`] if a free point has no coordinates
    /// - [`AreaError::NumericDegenerate`] for intersections of parallel lines
    ///   and feet on degenerate lines
    pub fn new(figure: &Figure, free_coords: &HashMap<String, Coord>) -> Result<Self, AreaError> {
        let mut model = NumericModel::default();
        let frame = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)];
        for (label, xy) in RESERVED_LABELS.iter().zip(frame) {
            model.coords.insert((*label).to_owned(), xy.into());
        }
        for point in figure.points() {
            let coord = match point.construction() {
                Construction::Free => *free_coords
                    .get(point.label())
                    .ok_or_else(|| AreaError::UnknownPoint(point.label().to_owned()))?,
                construction => model.construct(point, construction)?,
            };
            debug!("{point} = ({:.4}, {:.4})", coord.x, coord.y);
            model.coords.insert(point.label().to_owned(), coord);
        }
        Ok(model)
    }

    /// Free points drawn uniformly from `[-10, 10]^2` with a seeded RNG.
    ///
    /// # Errors
    /// See [`NumericModel::new`].
    pub fn random(figure: &Figure, seed: u64) -> Result<Self, AreaError> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let free_coords = figure
            .free_points()
            .map(|p| {
                let xy = Coord::new(rng.gen_range(-10.0..=10.0), rng.gen_range(-10.0..=10.0));
                (p.label().to_owned(), xy)
            })
            .collect();
        Self::new(figure, &free_coords)
    }

    /// # Errors
    /// [`AreaError::UnknownPoint`] if the point has no coordinates.
    pub fn coord(&self, point: &Point) -> Result<Coord, AreaError> {
        self.coords
            .get(point.label())
            .copied()
            .ok_or_else(|| AreaError::UnknownPoint(point.label().to_owned()))
    }

    fn construct(&self, point: &Point, construction: &Construction) -> Result<Coord, AreaError> {
        let degenerate = |what: &str| AreaError::NumericDegenerate(format!("{point}: {what}"));
        Ok(match construction {
            Construction::Free => self.coord(point)?,
            Construction::Intersection { u, v, p, q } => {
                let (u, v, p, q) = (self.coord(u)?, self.coord(v)?, self.coord(p)?, self.coord(q)?);
                let (d1, d2) = (v.sub(u), q.sub(p));
                let denom = d1.cross(d2);
                if denom.abs() < EPSILON {
                    return Err(degenerate("parallel lines"));
                }
                let t = p.sub(u).cross(d2) / denom;
                u.add(d1.scale(t))
            }
            Construction::Foot { p, u, v } => {
                let (p, u, v) = (self.coord(p)?, self.coord(u)?, self.coord(v)?);
                let d = v.sub(u);
                let len2 = d.dot(d);
                if len2 < EPSILON {
                    return Err(degenerate("foot on a degenerate line"));
                }
                u.add(d.scale(p.sub(u).dot(d) / len2))
            }
            Construction::PRatio { w, u, v, r } => {
                let (w, u, v) = (self.coord(w)?, self.coord(u)?, self.coord(v)?);
                w.add(v.sub(u).scale(r.test_value(self)?))
            }
            Construction::TRatio { u, v, r } => {
                let (u, v) = (self.coord(u)?, self.coord(v)?);
                u.add(v.sub(u).rot90().scale(r.test_value(self)?))
            }
        })
    }

    fn quantity(&self, q: &GeometricQuantity) -> Result<f64, AreaError> {
        Ok(match q {
            GeometricQuantity::Area(a, b, c) => {
                let (a, b, c) = (self.coord(a)?, self.coord(b)?, self.coord(c)?);
                0.5 * b.sub(a).cross(c.sub(a))
            }
            GeometricQuantity::Pythagoras(a, b, c) => {
                let (a, b, c) = (self.coord(a)?, self.coord(b)?, self.coord(c)?);
                2.0 * a.sub(b).dot(c.sub(b))
            }
            GeometricQuantity::Ratio(a, b, c, d) => {
                let (a, b, c, d) = (self.coord(a)?, self.coord(b)?, self.coord(c)?, self.coord(d)?);
                let cd = d.sub(c);
                let len2 = cd.dot(cd);
                if len2 < EPSILON {
                    return Err(AreaError::DivisionByZero(q.to_string()));
                }
                b.sub(a).dot(cd) / len2
            }
        })
    }
}

fn to_f64(n: &num::BigInt) -> f64 {
    n.to_f64().unwrap_or(f64::NAN)
}

impl Expression {
    /// Numeric value under `model`.
    ///
    /// # Errors
    /// [`AreaError::DivisionByZero`] for a vanishing float denominator and
    /// [`AreaError::UnknownPoint`] for points missing from `model`.
    pub fn test_value(&self, model: &NumericModel) -> Result<f64, AreaError> {
        Ok(match self {
            Expression::Number(n) => to_f64(n),
            Expression::Quantity(q) => model.quantity(q)?,
            Expression::Negate(e) => -e.test_value(model)?,
            Expression::Sum(a, b) => a.test_value(model)? + b.test_value(model)?,
            Expression::Product(a, b) => a.test_value(model)? * b.test_value(model)?,
            Expression::Fraction(a, b) => {
                let d = b.test_value(model)?;
                if d.abs() < EPSILON {
                    warn!("Numeric zero denominator in {self}");
                    return Err(AreaError::DivisionByZero(self.to_string()));
                }
                a.test_value(model)? / d
            }
            Expression::BigProduct(p) => {
                let mut value = to_f64(p.coefficient());
                for (q, exp) in p.factors().iter() {
                    value *= model.quantity(q)?.powi(*exp);
                }
                value
            }
            Expression::SumOfProducts(s) => {
                let mut value = 0.0;
                for term in s.terms() {
                    value += Expression::BigProduct(term).test_value(model)?;
                }
                value
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(list: &[(&str, f64, f64)]) -> HashMap<String, Coord> {
        list.iter()
            .map(|(l, x, y)| ((*l).to_owned(), Coord::new(*x, *y)))
            .collect()
    }

    #[test]
    fn constructions() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let d = figure.free("D").unwrap();
        let i = figure.intersection("I", &a, &b, &c, &d).unwrap();
        let f = figure.foot("F", &c, &a, &b).unwrap();
        let m = figure.midpoint("M", &a, &b).unwrap();
        let t = figure.tratio("T", &a, &b, Expression::one()).unwrap();
        let model = NumericModel::new(
            &figure,
            &coords(&[("A", 0.0, 0.0), ("B", 4.0, 0.0), ("C", 1.0, 2.0), ("D", 1.0, -2.0)]),
        )
        .unwrap();
        assert_eq!(model.coord(&i).unwrap(), Coord::new(1.0, 0.0));
        assert_eq!(model.coord(&f).unwrap(), Coord::new(1.0, 0.0));
        assert_eq!(model.coord(&m).unwrap(), Coord::new(2.0, 0.0));
        assert_eq!(model.coord(&t).unwrap(), Coord::new(0.0, 4.0));

        // 4 S(A,B,T) / P(A,B,A) = r
        let s = Expression::area(a.clone(), b.clone(), t).test_value(&model).unwrap();
        let p = Expression::pythagoras(a.clone(), b.clone(), a.clone())
            .test_value(&model)
            .unwrap();
        assert!((4.0 * s / p - 1.0).abs() < 1e-9);

        let r = Expression::ratio(a.clone(), m, a, b);
        assert!((r.test_value(&model).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parallel_lines_are_degenerate() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let d = figure.free("D").unwrap();
        figure.intersection("I", &a, &b, &c, &d).unwrap();
        let err = NumericModel::new(
            &figure,
            &coords(&[("A", 0.0, 0.0), ("B", 1.0, 0.0), ("C", 0.0, 1.0), ("D", 1.0, 1.0)]),
        )
        .unwrap_err();
        assert!(matches!(err, AreaError::NumericDegenerate(_)));
    }

    #[test]
    fn random_is_reproducible() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        figure.free("B").unwrap();
        let m1 = NumericModel::random(&figure, 7).unwrap();
        let m2 = NumericModel::random(&figure, 7).unwrap();
        assert_eq!(m1.coord(&a).unwrap(), m2.coord(&a).unwrap());
        let c = m1.coord(&a).unwrap();
        assert!(c.x.abs() <= 10.0 && c.y.abs() <= 10.0);
    }
}
