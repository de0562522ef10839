mod point;

use indexmap::IndexMap;
use log::debug;

use crate::errors::AreaError;
use crate::expr::Expression;
use crate::HashSet;

pub use point::{Construction, Point};

/// Labels of the reference points used by the independent-variable reducer.
pub const RESERVED_LABELS: [&str; 3] = ["iO", "iU", "iV"];

/// The construction graph: every point of a theorem in the order it was
/// introduced.
#[derive(Debug, Clone, Default)]
pub struct Figure {
    points: IndexMap<String, Point>,
}

impl Figure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, label: &str, construction: Construction) -> Result<Point, AreaError> {
        if self.points.contains_key(label) || RESERVED_LABELS.contains(&label) {
            return Err(AreaError::DuplicatePoint(label.to_owned()));
        }
        debug!("Adding {} point {label}", construction.kind());
        let point = Point::new(label, construction);
        self.points.insert(label.to_owned(), point.clone());
        Ok(point)
    }

    /// Add a free point.
    pub fn free(&mut self, label: &str) -> Result<Point, AreaError> {
        self.add(label, Construction::Free)
    }

    /// Intersection of the lines `uv` and `pq`.
    pub fn intersection(
        &mut self,
        label: &str,
        u: &Point,
        v: &Point,
        p: &Point,
        q: &Point,
    ) -> Result<Point, AreaError> {
        let construction = Construction::Intersection {
            u: u.clone(),
            v: v.clone(),
            p: p.clone(),
            q: q.clone(),
        };
        self.add(label, construction)
    }

    /// Foot of the perpendicular from `p` onto `uv`.
    pub fn foot(&mut self, label: &str, p: &Point, u: &Point, v: &Point) -> Result<Point, AreaError> {
        let construction = Construction::Foot {
            p: p.clone(),
            u: u.clone(),
            v: v.clone(),
        };
        self.add(label, construction)
    }

    /// The point `w + r * (v - u)`.
    pub fn pratio(
        &mut self,
        label: &str,
        w: &Point,
        u: &Point,
        v: &Point,
        r: Expression,
    ) -> Result<Point, AreaError> {
        let construction = Construction::PRatio {
            w: w.clone(),
            u: u.clone(),
            v: v.clone(),
            r,
        };
        self.add(label, construction)
    }

    /// The point on the perpendicular to `uv` at `u` with ratio `r`.
    pub fn tratio(&mut self, label: &str, u: &Point, v: &Point, r: Expression) -> Result<Point, AreaError> {
        let construction = Construction::TRatio {
            u: u.clone(),
            v: v.clone(),
            r,
        };
        self.add(label, construction)
    }

    /// Midpoint of `ab`, i.e. `a + 1/2 * (b - a)`.
    pub fn midpoint(&mut self, label: &str, a: &Point, b: &Point) -> Result<Point, AreaError> {
        self.pratio(label, a, a, b, Expression::fraction(1.into(), 2.into()))
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Point> {
        self.points.get(label)
    }

    /// Look up a point by label.
    pub fn point(&self, label: &str) -> Result<Point, AreaError> {
        self.get(label)
            .cloned()
            .ok_or_else(|| AreaError::UnknownPoint(label.to_owned()))
    }

    pub fn points(&self) -> impl Iterator<Item = &Point> {
        self.points.values()
    }

    pub fn free_points(&self) -> impl Iterator<Item = &Point> {
        self.points.values().filter(|p| p.is_free())
    }

    /// Constructed (non-free) points, most recently constructed first.
    /// This is the elimination order.
    pub fn constructed_points_rev(&self) -> impl Iterator<Item = &Point> {
        self.points.values().rev().filter(|p| !p.is_free())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The smallest figure that contains `roots` and everything they were
    /// built from, in dependency order.
    #[must_use]
    pub fn closure<'a, I>(roots: I) -> Self
    where
        I: IntoIterator<Item = &'a Point>,
    {
        fn visit(point: &Point, seen: &mut HashSet<Point>, figure: &mut Figure) {
            if !seen.insert(point.clone()) {
                return;
            }
            for dep in point.construction().dependencies() {
                visit(&dep, seen, figure);
            }
            figure
                .points
                .insert(point.label().to_owned(), point.clone());
        }

        let mut seen = HashSet::new();
        let mut figure = Figure::new();
        for root in roots {
            visit(root, &mut seen, &mut figure);
        }
        figure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_labels_rejected() {
        let mut figure = Figure::new();
        figure.free("A").unwrap();
        assert!(matches!(
            figure.free("A"),
            Err(AreaError::DuplicatePoint(_))
        ));
        assert!(matches!(
            figure.free("iO"),
            Err(AreaError::DuplicatePoint(_))
        ));
    }

    #[test]
    fn elimination_order_is_reverse_construction() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        figure.midpoint("M", &a, &b).unwrap();
        figure.foot("F", &c, &a, &b).unwrap();
        let order: Vec<_> = figure
            .constructed_points_rev()
            .map(|p| p.label().to_owned())
            .collect();
        assert_eq!(order, vec!["F", "M"]);
    }

    #[test]
    fn closure_keeps_dependency_order() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let _d = figure.free("D").unwrap();
        let m = figure.midpoint("M", &a, &b).unwrap();
        let f = figure.foot("F", &c, &m, &b).unwrap();

        let sub = Figure::closure([&f]);
        let labels: Vec<_> = sub.points().map(|p| p.label().to_owned()).collect();
        assert_eq!(labels.len(), 5);
        assert!(!labels.contains(&"D".to_owned()));
        let pos = |l: &str| labels.iter().position(|x| x == l).unwrap();
        assert!(pos("A") < pos("M"));
        assert!(pos("B") < pos("M"));
        assert!(pos("M") < pos("F"));
        assert_eq!(labels.last().unwrap(), "F");
    }
}
