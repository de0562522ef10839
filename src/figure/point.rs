use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::expr::Expression;

/// How a point was introduced into the figure.
///
/// The fields are fixed when the point is constructed; the algebra engine only
/// ever reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construction {
    Free,
    /// Intersection of the lines `uv` and `pq`.
    Intersection {
        u: Point,
        v: Point,
        p: Point,
        q: Point,
    },
    /// Foot of the perpendicular from `p` onto the line `uv`.
    Foot { p: Point, u: Point, v: Point },
    /// `Y = W + r * (V - U)`
    PRatio {
        w: Point,
        u: Point,
        v: Point,
        r: Expression,
    },
    /// `Y` on the perpendicular to `uv` through `u` with `4 * S(u, v, Y) / P(u, v, u) = r`
    TRatio { u: Point, v: Point, r: Expression },
}

impl Construction {
    /// Every point this construction refers to, including the ones hidden
    /// inside the ratio expression.
    #[must_use]
    pub fn dependencies(&self) -> Vec<Point> {
        match self {
            Construction::Free => vec![],
            Construction::Intersection { u, v, p, q } => {
                vec![u.clone(), v.clone(), p.clone(), q.clone()]
            }
            Construction::Foot { p, u, v } => vec![p.clone(), u.clone(), v.clone()],
            Construction::PRatio { w, u, v, r } => {
                let mut deps = vec![w.clone(), u.clone(), v.clone()];
                deps.extend(r.points());
                deps
            }
            Construction::TRatio { u, v, r } => {
                let mut deps = vec![u.clone(), v.clone()];
                deps.extend(r.points());
                deps
            }
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Construction::Free => "free",
            Construction::Intersection { .. } => "intersection",
            Construction::Foot { .. } => "foot",
            Construction::PRatio { .. } => "pratio",
            Construction::TRatio { .. } => "tratio",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct PointData {
    label: String,
    construction: Construction,
}

/// Shared handle to a point of the construction graph.
///
/// Identity, ordering and hashing all go through the label, so two handles
/// with the same label are the same point.
#[derive(Clone)]
pub struct Point(Rc<PointData>);

impl Point {
    #[must_use]
    pub fn new(label: impl Into<String>, construction: Construction) -> Self {
        Point(Rc::new(PointData {
            label: label.into(),
            construction,
        }))
    }

    #[must_use]
    pub fn free(label: impl Into<String>) -> Self {
        Self::new(label, Construction::Free)
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.0.label
    }

    #[must_use]
    pub fn construction(&self) -> &Construction {
        &self.0.construction
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        matches!(self.0.construction, Construction::Free)
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.label == other.0.label
    }
}

impl Eq for Point {}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The total order used by the uniformizer.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.label.cmp(&other.0.label)
    }
}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.label.hash(state);
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.label)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.label)
    }
}
