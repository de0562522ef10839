use std::collections::BTreeMap;
use std::fmt;

use num::{BigInt, Integer};
use num_traits::{Signed, Zero};

use super::big_product::{BigProduct, Factors};
use super::Expression;
use crate::errors::AreaError;

// ============================================================================
// SumOfProducts
// ============================================================================

/// Flattened polynomial form: a set of [`BigProduct`] monomials.
///
/// Terms are keyed by their factor multiset, so two terms with identical
/// factors are merged on insertion and a term whose coefficient drops to zero
/// is removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SumOfProducts {
    // Map from factor multiset to coefficient, never zero
    terms: BTreeMap<Factors, BigInt>,
}

impl SumOfProducts {
    /// Create the empty (zero) sum
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn constant(n: BigInt) -> Self {
        Self::new().with_term(BigProduct::constant(n))
    }

    #[must_use]
    pub fn with_term(mut self, term: BigProduct) -> Self {
        self.add_term(term);
        self
    }

    /// Add a monomial, merging it with an existing term of the same factors.
    pub fn add_term(&mut self, term: BigProduct) {
        let (coefficient, factors) = term.into_parts();
        if coefficient.is_zero() {
            return;
        }
        let slot = self.terms.entry(factors).or_insert_with(BigInt::zero);
        *slot += coefficient;
        if slot.is_zero() {
            self.terms.retain(|_, c| !c.is_zero());
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    #[must_use]
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = BigProduct> + '_ {
        self.terms
            .iter()
            .map(|(f, c)| BigProduct::new(c.clone(), f.clone()))
    }

    /// Get the constant value if there are no geometric quantities left
    #[must_use]
    pub fn as_constant(&self) -> Option<BigInt> {
        match self.terms.len() {
            0 => Some(BigInt::zero()),
            1 => self
                .terms
                .iter()
                .next()
                .filter(|(f, _)| f.is_constant())
                .map(|(_, c)| c.clone()),
            _ => None,
        }
    }

    /// GCD of all coefficients, zero for the empty sum
    #[must_use]
    pub fn content(&self) -> BigInt {
        self.terms
            .values()
            .fold(BigInt::zero(), |acc, c| acc.gcd(c))
    }

    /// Divide every coefficient by the content and make the leading term
    /// positive. Only the presentation changes; zero stays zero.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let content = self.content();
        if content.is_zero() {
            return Self::new();
        }
        let flip = self
            .terms
            .values()
            .next_back()
            .is_some_and(|c| c.is_negative());
        let divisor = if flip { -content } else { content };
        SumOfProducts {
            terms: self
                .terms
                .iter()
                .map(|(f, c)| (f.clone(), c / &divisor))
                .collect(),
        }
    }

    #[must_use]
    pub fn to_expression(&self) -> Expression {
        Expression::SumOfProducts(self.clone())
    }

    /// Unfold into plain `Sum`/`Product` nodes.
    #[must_use]
    pub fn to_basic_expression(&self) -> Expression {
        self.terms()
            .map(|t| t.to_expression())
            .reduce(Expression::sum)
            .unwrap_or_else(|| Expression::from(0))
    }

    #[must_use]
    pub fn size(&self) -> usize {
        1 + self
            .terms
            .keys()
            .map(|f| 1 + f.iter().count())
            .sum::<usize>()
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl std::ops::Add<&SumOfProducts> for SumOfProducts {
    type Output = SumOfProducts;

    fn add(mut self, rhs: &SumOfProducts) -> Self {
        for term in rhs.terms() {
            self.add_term(term);
        }
        self
    }
}

impl std::ops::Mul<&SumOfProducts> for &SumOfProducts {
    type Output = SumOfProducts;

    fn mul(self, rhs: &SumOfProducts) -> SumOfProducts {
        let mut result = SumOfProducts::new();
        for lhs_term in self.terms() {
            for rhs_term in rhs.terms() {
                result.add_term(&lhs_term * &rhs_term);
            }
        }
        result
    }
}

impl std::ops::Neg for SumOfProducts {
    type Output = SumOfProducts;

    fn neg(mut self) -> Self::Output {
        for c in self.terms.values_mut() {
            *c = -std::mem::take(c);
        }
        self
    }
}

// ============================================================================
// Conversion
// ============================================================================

impl Expression {
    /// Expand a fraction-free expression into a flat sum of monomials.
    ///
    /// # Errors
    /// A `Fraction` anywhere in the tree is a contract violation and yields
    /// [`AreaError::MalformedExpression`].
    pub fn to_sum_of_products(&self) -> Result<SumOfProducts, AreaError> {
        match self {
            Expression::Number(n) => Ok(SumOfProducts::constant(n.clone())),
            Expression::Quantity(q) => {
                Ok(SumOfProducts::new().with_term(BigProduct::quantity(q.clone())))
            }
            Expression::Negate(e) => Ok(-e.to_sum_of_products()?),
            Expression::Sum(a, b) => Ok(a.to_sum_of_products()? + &b.to_sum_of_products()?),
            Expression::Product(a, b) => Ok(&a.to_sum_of_products()? * &b.to_sum_of_products()?),
            Expression::Fraction(..) => Err(AreaError::MalformedExpression(format!(
                "no sum of products for the fraction {self}"
            ))),
            Expression::BigProduct(p) if !p.is_polynomial() => Err(
                AreaError::MalformedExpression(format!("negative exponent in {self}")),
            ),
            Expression::BigProduct(p) => Ok(SumOfProducts::new().with_term(p.clone())),
            Expression::SumOfProducts(s) if !s.terms().all(|t| t.is_polynomial()) => Err(
                AreaError::MalformedExpression(format!("negative exponent in {self}")),
            ),
            Expression::SumOfProducts(s) => Ok(s.clone()),
        }
    }
}

impl fmt::Display for SumOfProducts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<_> = self.terms().collect();
        match terms.as_slice() {
            [] => write!(f, "0"),
            [term] => write!(f, "{term}"),
            _ => {
                write!(f, "(+")?;
                for term in &terms {
                    write!(f, " {term}")?;
                }
                write!(f, ")")
            }
        }
    }
}
