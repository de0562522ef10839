use std::collections::BTreeMap;
use std::fmt;

use num::BigInt;
use num_traits::{One, Signed, Zero};

use super::{Expression, GeometricQuantity};

/// Multiset of geometric quantities with integer exponents.
/// We use `BTreeMap` to keep the quantities sorted, so equal multisets have
/// equal keys and equal hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Factors {
    // Map from quantity to exponent, never zero
    powers: BTreeMap<GeometricQuantity, i32>,
}

impl Factors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_factor(mut self, quantity: GeometricQuantity, exponent: i32) -> Self {
        self.multiply(quantity, exponent);
        self
    }

    fn multiply(&mut self, quantity: GeometricQuantity, exponent: i32) {
        let exp = self.powers.entry(quantity).or_insert(0);
        *exp += exponent;
        if *exp == 0 {
            self.powers.retain(|_, e| *e != 0);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GeometricQuantity, &i32)> {
        self.powers.iter()
    }

    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.powers.is_empty()
    }

    #[must_use]
    pub fn degree(&self) -> i32 {
        self.powers.values().sum()
    }
}

impl std::ops::Mul<&Factors> for Factors {
    type Output = Factors;

    /// Multiply two multisets by adding their exponents
    fn mul(mut self, rhs: &Factors) -> Self::Output {
        for (quantity, exp) in &rhs.powers {
            *self.powers.entry(quantity.clone()).or_insert(0) += exp;
        }
        self.powers.retain(|_, exp| *exp != 0);
        self
    }
}

impl fmt::Display for Factors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (quantity, exp) in &self.powers {
            if !first {
                write!(f, " ")?;
            }
            first = false;
            if *exp == 1 {
                write!(f, "{quantity}")?;
            } else {
                write!(f, "(^ {quantity} {exp})")?;
            }
        }
        Ok(())
    }
}

/// An n-ary product `coefficient * q1^e1 * ... * qn^en`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigProduct {
    coefficient: BigInt,
    factors: Factors,
}

impl BigProduct {
    #[must_use]
    pub fn new(coefficient: BigInt, factors: Factors) -> Self {
        BigProduct {
            coefficient,
            factors,
        }
    }

    #[must_use]
    pub fn constant(coefficient: BigInt) -> Self {
        Self::new(coefficient, Factors::new())
    }

    #[must_use]
    pub fn quantity(quantity: GeometricQuantity) -> Self {
        Self::new(BigInt::one(), Factors::new().with_factor(quantity, 1))
    }

    #[must_use]
    pub fn coefficient(&self) -> &BigInt {
        &self.coefficient
    }

    #[must_use]
    pub fn factors(&self) -> &Factors {
        &self.factors
    }

    #[must_use]
    pub fn into_parts(self) -> (BigInt, Factors) {
        (self.coefficient, self.factors)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    /// Only factors with positive exponents, i.e. a product that needs no
    /// fraction to be written down.
    #[must_use]
    pub fn is_polynomial(&self) -> bool {
        self.factors.iter().all(|(_, e)| *e > 0)
    }

    /// Unfold into plain `Product` nodes, with a `Fraction` for negative
    /// exponents.
    #[must_use]
    pub fn to_expression(&self) -> Expression {
        let mut numerator: Option<Expression> = None;
        let mut denominator: Option<Expression> = None;
        for (quantity, exp) in self.factors.iter() {
            let slot = if *exp > 0 {
                &mut numerator
            } else {
                &mut denominator
            };
            for _ in 0..exp.unsigned_abs() {
                let q = Expression::Quantity(quantity.clone());
                *slot = Some(match slot.take() {
                    None => q,
                    Some(prev) => Expression::product(prev, q),
                });
            }
        }

        let magnitude = Expression::Number(self.coefficient.abs());
        let numerator = match numerator {
            None => magnitude,
            Some(n) if self.coefficient.abs().is_one() => n,
            Some(n) => Expression::product(magnitude, n),
        };
        let unsigned = match denominator {
            None => numerator,
            Some(d) => Expression::fraction(numerator, d),
        };
        if self.coefficient.is_negative() {
            Expression::negate(unsigned)
        } else {
            unsigned
        }
    }
}

impl std::ops::Mul<&BigProduct> for &BigProduct {
    type Output = BigProduct;

    fn mul(self, rhs: &BigProduct) -> BigProduct {
        BigProduct {
            coefficient: &self.coefficient * &rhs.coefficient,
            factors: self.factors.clone() * &rhs.factors,
        }
    }
}

impl fmt::Display for BigProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.factors.is_constant() {
            return write!(f, "{}", self.coefficient);
        }
        if self.coefficient.is_one() && self.factors.powers.len() == 1 {
            return write!(f, "{}", self.factors);
        }
        write!(f, "(* {} {})", self.coefficient, self.factors)
    }
}
