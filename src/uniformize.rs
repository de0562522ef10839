use log::warn;
use num::BigInt;
use num_traits::Zero;

use crate::expr::{BigProduct, Expression, Factors, GeometricQuantity, SumOfProducts};
use crate::figure::Point;
use crate::HashSet;

/// Triples of points already known to be collinear.
///
/// Triples are stored sorted, so the order of insertion and lookup does not
/// matter.
#[derive(Debug, Clone, Default)]
pub struct CollinearMemo {
    triples: HashSet<[Point; 3]>,
}

impl CollinearMemo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: &Point, b: &Point, c: &Point) -> [Point; 3] {
        let mut key = [a.clone(), b.clone(), c.clone()];
        key.sort();
        key
    }

    /// Returns `true` if the triple was not known before.
    pub fn insert(&mut self, a: &Point, b: &Point, c: &Point) -> bool {
        self.triples.insert(Self::key(a, b, c))
    }

    #[must_use]
    pub fn contains(&self, a: &Point, b: &Point, c: &Point) -> bool {
        self.triples.contains(&Self::key(a, b, c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// Canonical representative of a single geometric quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Canonical {
    Zero,
    /// `1` or `-1`
    Unit { negative: bool },
    Quantity {
        quantity: GeometricQuantity,
        negative: bool,
    },
}

impl Canonical {
    fn signed(quantity: GeometricQuantity, negative: bool) -> Self {
        Canonical::Quantity { quantity, negative }
    }

    fn into_expression(self) -> Expression {
        match self {
            Canonical::Zero => Expression::zero(),
            Canonical::Unit { negative: false } => Expression::one(),
            Canonical::Unit { negative: true } => Expression::from(-1),
            Canonical::Quantity {
                quantity,
                negative: false,
            } => Expression::Quantity(quantity),
            Canonical::Quantity {
                quantity,
                negative: true,
            } => Expression::negate(Expression::Quantity(quantity)),
        }
    }
}

fn canonical(quantity: &GeometricQuantity, memo: &CollinearMemo) -> Canonical {
    match quantity {
        GeometricQuantity::Area(a, b, c) => {
            if a == b || b == c || a == c || memo.contains(a, b, c) {
                return Canonical::Zero;
            }
            // Sort the three points, one transposition at a time, to track
            // the parity of the permutation.
            let mut pts = [a.clone(), b.clone(), c.clone()];
            let mut negative = false;
            for (i, j) in [(0, 1), (1, 2), (0, 1)] {
                if pts[i] > pts[j] {
                    pts.swap(i, j);
                    negative = !negative;
                }
            }
            let [a, b, c] = pts;
            Canonical::signed(GeometricQuantity::Area(a, b, c), negative)
        }
        GeometricQuantity::Pythagoras(a, b, c) => {
            if a == b || b == c {
                return Canonical::Zero;
            }
            let (a, c) = if c < a { (c, a) } else { (a, c) };
            // P(A,B,A) = P(B,A,B) = 2 AB^2
            let quantity = if a == c && b < a {
                GeometricQuantity::Pythagoras(b.clone(), a.clone(), b.clone())
            } else {
                GeometricQuantity::Pythagoras(a.clone(), b.clone(), c.clone())
            };
            Canonical::signed(quantity, false)
        }
        GeometricQuantity::Ratio(a, b, c, d) => {
            if a == b {
                return Canonical::Zero;
            }
            let mut negative = false;
            let (a, b) = if b < a {
                negative = !negative;
                (b, a)
            } else {
                (a, b)
            };
            let (c, d) = if d < c {
                negative = !negative;
                (d, c)
            } else {
                (c, d)
            };
            if a == c && b == d {
                return Canonical::Unit { negative };
            }
            Canonical::signed(
                GeometricQuantity::Ratio(a.clone(), b.clone(), c.clone(), d.clone()),
                negative,
            )
        }
    }
}

fn uniformize_big_product(product: &BigProduct, memo: &CollinearMemo) -> BigProduct {
    let mut coefficient = product.coefficient().clone();
    let mut factors = Factors::new();
    for (quantity, exp) in product.factors().iter() {
        let odd = exp % 2 != 0;
        match canonical(quantity, memo) {
            Canonical::Zero if *exp > 0 => return BigProduct::constant(BigInt::zero()),
            Canonical::Zero => {
                warn!("Zero factor {quantity} with negative exponent {exp} kept as is");
                factors = factors.with_factor(quantity.clone(), *exp);
            }
            Canonical::Unit { negative } => {
                if negative && odd {
                    coefficient = -coefficient;
                }
            }
            Canonical::Quantity { quantity, negative } => {
                if negative && odd {
                    coefficient = -coefficient;
                }
                factors = factors.with_factor(quantity, *exp);
            }
        }
    }
    BigProduct::new(coefficient, factors)
}

impl Expression {
    /// Rewrite every geometric quantity to its canonical representative.
    ///
    /// Only the sign and the textual representative change, never the value.
    #[must_use]
    pub fn uniformize(&self, memo: &CollinearMemo) -> Expression {
        match self {
            Expression::Number(_) => self.clone(),
            Expression::Quantity(q) => canonical(q, memo).into_expression(),
            Expression::Negate(e) => Expression::negate(e.uniformize(memo)),
            Expression::Sum(a, b) => Expression::sum(a.uniformize(memo), b.uniformize(memo)),
            Expression::Product(a, b) => {
                Expression::product(a.uniformize(memo), b.uniformize(memo))
            }
            Expression::Fraction(a, b) => {
                Expression::fraction(a.uniformize(memo), b.uniformize(memo))
            }
            Expression::BigProduct(p) => Expression::BigProduct(uniformize_big_product(p, memo)),
            Expression::SumOfProducts(s) => {
                let mut sop = SumOfProducts::new();
                for term in s.terms() {
                    sop.add_term(uniformize_big_product(&term, memo));
                }
                Expression::SumOfProducts(sop)
            }
        }
    }
}

/// Shorthand for uniformizing without any known collinearities.
#[must_use]
pub fn uniformize(e: &Expression) -> Expression {
    e.uniformize(&CollinearMemo::new())
}

/// Does the area `S(a, b, c)` vanish syntactically or through `memo`?
#[must_use]
pub fn trivially_collinear(a: &Point, b: &Point, c: &Point, memo: &CollinearMemo) -> bool {
    let area = GeometricQuantity::Area(a.clone(), b.clone(), c.clone());
    canonical(&area, memo) == Canonical::Zero
}
