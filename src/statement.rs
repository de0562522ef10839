use std::collections::BTreeSet;
use std::fmt;

use crate::expr::Expression;
use crate::figure::Point;
use crate::uniformize::CollinearMemo;

/// A geometric statement, true iff its zero-expression vanishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Collinear(Point, Point, Point),
    /// `AB` parallel to `CD`
    Parallel(Point, Point, Point, Point),
    /// `AB` perpendicular to `CD`
    Perpendicular(Point, Point, Point, Point),
    /// `|AB| = |CD|`
    EqualLength(Point, Point, Point, Point),
    Equal(Expression, Expression),
}

impl Statement {
    /// The expression that vanishes exactly when the statement holds.
    #[must_use]
    pub fn zero_expression(&self) -> Expression {
        let s = |a: &Point, b: &Point, c: &Point| Expression::area(a.clone(), b.clone(), c.clone());
        let p = |a: &Point, b: &Point, c: &Point| {
            Expression::pythagoras(a.clone(), b.clone(), c.clone())
        };
        match self {
            Statement::Collinear(a, b, c) => s(a, b, c),
            // S_ACBD
            Statement::Parallel(a, b, c, d) => Expression::sum(s(a, c, b), s(a, b, d)),
            // P_ACBD
            Statement::Perpendicular(a, b, c, d) => Expression::difference(p(a, c, d), p(b, c, d)),
            Statement::EqualLength(a, b, c, d) => Expression::difference(p(a, b, a), p(c, d, c)),
            Statement::Equal(lhs, rhs) => Expression::difference(lhs.clone(), rhs.clone()),
        }
    }

    /// Every point the statement talks about, in label order.
    #[must_use]
    pub fn points(&self) -> BTreeSet<Point> {
        match self {
            Statement::Collinear(a, b, c) => [a, b, c].into_iter().cloned().collect(),
            Statement::Parallel(a, b, c, d)
            | Statement::Perpendicular(a, b, c, d)
            | Statement::EqualLength(a, b, c, d) => [a, b, c, d].into_iter().cloned().collect(),
            Statement::Equal(lhs, rhs) => {
                let mut points = lhs.points();
                points.extend(rhs.points());
                points
            }
        }
    }

    /// Normalized printed form, equal for statements that differ only in
    /// point order or sign.
    #[must_use]
    pub fn key(&self) -> String {
        let uniform = self.zero_expression().uniformize(&CollinearMemo::new());
        let simplified = uniform.simplify().unwrap_or(uniform);
        match simplified {
            Expression::Negate(inner) => inner.to_string(),
            e => e.to_string(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Collinear(a, b, c) => write!(f, "(collinear {a} {b} {c})"),
            Statement::Parallel(a, b, c, d) => write!(f, "(parallel {a} {b} {c} {d})"),
            Statement::Perpendicular(a, b, c, d) => write!(f, "(perpendicular {a} {b} {c} {d})"),
            Statement::EqualLength(a, b, c, d) => write!(f, "(equal-length {a} {b} {c} {d})"),
            Statement::Equal(lhs, rhs) => write!(f, "(= {lhs} {rhs})"),
        }
    }
}
