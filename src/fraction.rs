use crate::errors::AreaError;
use crate::expr::Expression;

/// Numerator and optional denominator of a partially reduced expression.
type Split = (Expression, Option<Expression>);

fn mul(a: Expression, b: Option<Expression>) -> Expression {
    match b {
        None => a,
        Some(b) => Expression::product(a, b),
    }
}

fn mul_opt(a: Option<Expression>, b: Option<Expression>) -> Option<Expression> {
    match (a, b) {
        (None, b) => b,
        (a, None) => a,
        (Some(a), Some(b)) => Some(Expression::product(a, b)),
    }
}

fn split(e: &Expression) -> Result<Split, AreaError> {
    match e {
        Expression::Number(_) | Expression::Quantity(_) => Ok((e.clone(), None)),
        Expression::BigProduct(p) if p.is_polynomial() => Ok((e.clone(), None)),
        Expression::BigProduct(p) => split(&p.to_expression()),
        Expression::SumOfProducts(s) if s.terms().all(|t| t.is_polynomial()) => {
            Ok((e.clone(), None))
        }
        Expression::SumOfProducts(s) => split(&s.to_basic_expression()),
        Expression::Negate(x) => {
            let (n, d) = split(x)?;
            Ok((Expression::negate(n), d))
        }
        Expression::Sum(a, b) => {
            let (na, da) = split(a)?;
            let (nb, db) = split(b)?;
            Ok(match (da, db) {
                (None, None) => (Expression::sum(na, nb), None),
                (Some(da), None) => (Expression::sum(na, Expression::product(nb, da.clone())), Some(da)),
                (None, Some(db)) => (Expression::sum(Expression::product(na, db.clone()), nb), Some(db)),
                (Some(da), Some(db)) if da == db => (Expression::sum(na, nb), Some(da)),
                (Some(da), Some(db)) => (
                    Expression::sum(
                        Expression::product(na, db.clone()),
                        Expression::product(nb, da.clone()),
                    ),
                    Some(Expression::product(da, db)),
                ),
            })
        }
        Expression::Product(a, b) => {
            let (na, da) = split(a)?;
            let (nb, db) = split(b)?;
            Ok((Expression::product(na, nb), mul_opt(da, db)))
        }
        Expression::Fraction(a, b) => {
            let (na, da) = split(a)?;
            let (nb, db) = split(b)?;
            if nb.is_zero() {
                return Err(AreaError::DivisionByZero(e.to_string()));
            }
            // (na / da) / (nb / db) = (na * db) / (nb * da)
            Ok((mul(na, db), Some(mul(nb, da))))
        }
    }
}

impl Expression {
    /// Collapse nested fractions into at most one top-level `Fraction` whose
    /// numerator and denominator are fraction-free.
    ///
    /// # Errors
    /// A denominator that is syntactically zero yields
    /// [`AreaError::DivisionByZero`].
    pub fn reduce_to_single_fraction(&self) -> Result<Expression, AreaError> {
        match split(self)? {
            (n, None) => Ok(n),
            (_, Some(d)) if d.is_zero() => Err(AreaError::DivisionByZero(self.to_string())),
            (n, Some(d)) => Ok(Expression::fraction(n, d)),
        }
    }

    /// Numerator and denominator of a single fraction, a `Negate` in front
    /// is moved into the numerator.
    #[must_use]
    pub fn numerator_denominator(&self) -> (Expression, Expression) {
        match self {
            Expression::Fraction(n, d) => ((**n).clone(), (**d).clone()),
            Expression::Negate(inner) => {
                let (n, d) = inner.numerator_denominator();
                (Expression::negate(n), d)
            }
            e => (e.clone(), Expression::one()),
        }
    }

    #[must_use]
    pub fn contains_fraction(&self) -> bool {
        match self {
            Expression::Number(_) | Expression::Quantity(_) => false,
            Expression::Fraction(..) => true,
            Expression::Negate(e) => e.contains_fraction(),
            Expression::Sum(a, b) | Expression::Product(a, b) => {
                a.contains_fraction() || b.contains_fraction()
            }
            Expression::BigProduct(p) => !p.is_polynomial(),
            Expression::SumOfProducts(s) => !s.terms().all(|t| t.is_polynomial()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Point;

    fn s(a: &str, b: &str, c: &str) -> Expression {
        Expression::area(Point::free(a), Point::free(b), Point::free(c))
    }

    fn assert_single_fraction(e: &Expression) {
        match e {
            Expression::Fraction(n, d) => {
                assert!(!n.contains_fraction());
                assert!(!d.contains_fraction());
            }
            e => assert!(!e.contains_fraction()),
        }
    }

    #[test]
    fn sum_of_fractions() {
        let (x, y, z, w) = (s("A", "B", "C"), s("A", "B", "D"), s("A", "C", "D"), s("B", "C", "D"));
        let e = Expression::sum(
            Expression::fraction(x.clone(), y.clone()),
            Expression::fraction(z.clone(), w.clone()),
        );
        let r = e.reduce_to_single_fraction().unwrap();
        assert_single_fraction(&r);
        assert_eq!(
            r.to_string(),
            "(/ (+ (* (S A B C) (S B C D)) (* (S A C D) (S A B D))) (* (S A B D) (S B C D)))"
        );
    }

    #[test]
    fn same_denominator_fast_path() {
        let (x, y, z) = (s("A", "B", "C"), s("A", "B", "D"), s("A", "C", "D"));
        let e = Expression::sum(
            Expression::fraction(x, z.clone()),
            Expression::fraction(y, z),
        );
        let r = e.reduce_to_single_fraction().unwrap();
        assert_eq!(r.to_string(), "(/ (+ (S A B C) (S A B D)) (S A C D))");
    }

    #[test]
    fn nested_fraction() {
        let (x, y, z) = (s("A", "B", "C"), s("A", "B", "D"), s("A", "C", "D"));
        // (x / y) / (z / x) = x^2 / (z y)
        let e = Expression::fraction(
            Expression::fraction(x.clone(), y.clone()),
            Expression::negate(Expression::fraction(z.clone(), x.clone())),
        );
        let r = e.reduce_to_single_fraction().unwrap();
        assert_single_fraction(&r);
        let (n, d) = r.numerator_denominator();
        assert_eq!(n, Expression::product(x.clone(), x));
        assert_eq!(d, Expression::product(Expression::negate(z), y));
    }

    #[test]
    fn zero_denominator() {
        let x = s("A", "B", "C");
        let e = Expression::fraction(x, Expression::zero());
        assert!(matches!(
            e.reduce_to_single_fraction(),
            Err(AreaError::DivisionByZero(_))
        ));
    }
}
