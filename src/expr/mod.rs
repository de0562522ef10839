mod big_product;
mod parse;
mod quantity;
mod sum_of_products;

use std::collections::BTreeSet;
use std::fmt;

use num::BigInt;
use num_traits::{One, Zero};

use crate::figure::Point;

pub use big_product::{BigProduct, Factors};
pub use parse::ParseError;
pub use quantity::GeometricQuantity;
pub use sum_of_products::SumOfProducts;

/// Expression tree of the area method.
///
/// Structurally immutable: every rewrite returns a new tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Number(BigInt),
    Quantity(GeometricQuantity),
    Negate(Box<Expression>),
    Sum(Box<Expression>, Box<Expression>),
    Product(Box<Expression>, Box<Expression>),
    Fraction(Box<Expression>, Box<Expression>),
    BigProduct(BigProduct),
    SumOfProducts(SumOfProducts),
}

impl Expression {
    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn number(n: impl Into<BigInt>) -> Self {
        Expression::Number(n.into())
    }

    #[must_use]
    pub fn zero() -> Self {
        Expression::Number(BigInt::zero())
    }

    #[must_use]
    pub fn one() -> Self {
        Expression::Number(BigInt::one())
    }

    #[must_use]
    pub fn area(a: Point, b: Point, c: Point) -> Self {
        Expression::Quantity(GeometricQuantity::Area(a, b, c))
    }

    #[must_use]
    pub fn pythagoras(a: Point, b: Point, c: Point) -> Self {
        Expression::Quantity(GeometricQuantity::Pythagoras(a, b, c))
    }

    #[must_use]
    pub fn ratio(a: Point, b: Point, c: Point, d: Point) -> Self {
        Expression::Quantity(GeometricQuantity::Ratio(a, b, c, d))
    }

    #[must_use]
    pub fn negate(e: Expression) -> Self {
        Expression::Negate(Box::new(e))
    }

    #[must_use]
    pub fn sum(a: Expression, b: Expression) -> Self {
        Expression::Sum(Box::new(a), Box::new(b))
    }

    /// `a - b`, spelled as `a + (-b)`.
    #[must_use]
    pub fn difference(a: Expression, b: Expression) -> Self {
        Expression::sum(a, Expression::negate(b))
    }

    #[must_use]
    pub fn product(a: Expression, b: Expression) -> Self {
        Expression::Product(Box::new(a), Box::new(b))
    }

    #[must_use]
    pub fn fraction(numerator: Expression, denominator: Expression) -> Self {
        Expression::Fraction(Box::new(numerator), Box::new(denominator))
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// `Number(0)` and the empty `SumOfProducts` are the two zeros.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        match self {
            Expression::Number(n) => n.is_zero(),
            Expression::SumOfProducts(s) => s.is_zero(),
            _ => false,
        }
    }

    #[must_use]
    pub fn is_one(&self) -> bool {
        matches!(self, Expression::Number(n) if n.is_one())
    }

    #[must_use]
    pub fn as_number(&self) -> Option<&BigInt> {
        match self {
            Expression::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Does `point` occur anywhere in the tree?
    #[must_use]
    pub fn contains_point(&self, point: &Point) -> bool {
        match self {
            Expression::Number(_) => false,
            Expression::Quantity(q) => q.contains(point),
            Expression::Negate(e) => e.contains_point(point),
            Expression::Sum(a, b) | Expression::Product(a, b) | Expression::Fraction(a, b) => {
                a.contains_point(point) || b.contains_point(point)
            }
            Expression::BigProduct(p) => p.factors().iter().any(|(q, _)| q.contains(point)),
            Expression::SumOfProducts(s) => s
                .terms()
                .any(|t| t.factors().iter().any(|(q, _)| q.contains(point))),
        }
    }

    /// Every point referenced by the tree.
    #[must_use]
    pub fn points(&self) -> BTreeSet<Point> {
        let mut points = BTreeSet::new();
        self.for_each_quantity(&mut |q| points.extend(q.points().into_iter().cloned()));
        points
    }

    /// Visit every geometric quantity leaf.
    pub fn for_each_quantity<F>(&self, f: &mut F)
    where
        F: FnMut(&GeometricQuantity),
    {
        match self {
            Expression::Number(_) => {}
            Expression::Quantity(q) => f(q),
            Expression::Negate(e) => e.for_each_quantity(f),
            Expression::Sum(a, b) | Expression::Product(a, b) | Expression::Fraction(a, b) => {
                a.for_each_quantity(f);
                b.for_each_quantity(f);
            }
            Expression::BigProduct(p) => p.factors().iter().for_each(|(q, _)| f(q)),
            Expression::SumOfProducts(s) => {
                for term in s.terms() {
                    term.factors().iter().for_each(|(q, _)| f(q));
                }
            }
        }
    }

    /// Number of nodes in the tree
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Expression::Number(_) | Expression::Quantity(_) => 1,
            Expression::Negate(e) => 1 + e.size(),
            Expression::Sum(a, b) | Expression::Product(a, b) | Expression::Fraction(a, b) => {
                1 + a.size() + b.size()
            }
            Expression::BigProduct(p) => 1 + p.factors().iter().count(),
            Expression::SumOfProducts(s) => s.size(),
        }
    }

    /// Rewrite `BigProduct`/`SumOfProducts` nodes into plain binary nodes so
    /// that the structural rewrites can look inside them.
    #[must_use]
    pub fn unfold(&self) -> Expression {
        match self {
            Expression::Number(_) | Expression::Quantity(_) => self.clone(),
            Expression::Negate(e) => Expression::negate(e.unfold()),
            Expression::Sum(a, b) => Expression::sum(a.unfold(), b.unfold()),
            Expression::Product(a, b) => Expression::product(a.unfold(), b.unfold()),
            Expression::Fraction(a, b) => Expression::fraction(a.unfold(), b.unfold()),
            Expression::BigProduct(p) => p.to_expression(),
            Expression::SumOfProducts(s) => s.to_basic_expression(),
        }
    }
}

// ============================================================================
// Conversions and operators
// ============================================================================

impl From<i64> for Expression {
    fn from(n: i64) -> Self {
        Expression::Number(n.into())
    }
}

impl From<BigInt> for Expression {
    fn from(n: BigInt) -> Self {
        Expression::Number(n)
    }
}

impl From<GeometricQuantity> for Expression {
    fn from(q: GeometricQuantity) -> Self {
        Expression::Quantity(q)
    }
}

impl std::ops::Add for Expression {
    type Output = Expression;

    fn add(self, rhs: Self) -> Self::Output {
        Expression::sum(self, rhs)
    }
}

impl std::ops::Sub for Expression {
    type Output = Expression;

    fn sub(self, rhs: Self) -> Self::Output {
        Expression::difference(self, rhs)
    }
}

impl std::ops::Mul for Expression {
    type Output = Expression;

    fn mul(self, rhs: Self) -> Self::Output {
        Expression::product(self, rhs)
    }
}

impl std::ops::Div for Expression {
    type Output = Expression;

    fn div(self, rhs: Self) -> Self::Output {
        Expression::fraction(self, rhs)
    }
}

impl std::ops::Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Self::Output {
        Expression::negate(self)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{n}"),
            Expression::Quantity(q) => write!(f, "{q}"),
            Expression::Negate(e) => write!(f, "(- {e})"),
            Expression::Sum(a, b) => write!(f, "(+ {a} {b})"),
            Expression::Product(a, b) => write!(f, "(* {a} {b})"),
            Expression::Fraction(a, b) => write!(f, "(/ {a} {b})"),
            Expression::BigProduct(p) => write!(f, "{p}"),
            Expression::SumOfProducts(s) => write!(f, "{s}"),
        }
    }
}
