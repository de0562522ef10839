use log::error;
use num::{BigInt, BigRational, Integer};
use num_traits::{Signed, Zero};

use crate::errors::AreaError;
use crate::expr::Expression;

impl Expression {
    /// Apply the local rewrite rules once, bottom-up.
    ///
    /// # Errors
    /// A `Fraction` whose denominator is (or becomes) zero yields
    /// [`AreaError::DivisionByZero`] with the printed fraction.
    pub fn simplify_in_one_step(&self) -> Result<Expression, AreaError> {
        match self {
            Expression::Number(_) | Expression::Quantity(_) => Ok(self.clone()),
            Expression::Negate(e) => Ok(negate(e.simplify_in_one_step()?)),
            Expression::Sum(a, b) => Ok(sum(a.simplify_in_one_step()?, b.simplify_in_one_step()?)),
            Expression::Product(a, b) => Ok(product(
                a.simplify_in_one_step()?,
                b.simplify_in_one_step()?,
            )),
            Expression::Fraction(a, b) => {
                fraction(a.simplify_in_one_step()?, b.simplify_in_one_step()?)
            }
            Expression::BigProduct(p) => {
                if p.is_zero() {
                    Ok(Expression::zero())
                } else if p.factors().is_constant() {
                    Ok(Expression::Number(p.coefficient().clone()))
                } else {
                    Ok(self.clone())
                }
            }
            Expression::SumOfProducts(s) => Ok(s
                .as_constant()
                .map_or_else(|| self.clone(), Expression::Number)),
        }
    }

    /// Apply [`Expression::simplify_in_one_step`] until nothing changes.
    ///
    /// # Errors
    /// See [`Expression::simplify_in_one_step`].
    pub fn simplify(&self) -> Result<Expression, AreaError> {
        let mut current = self.simplify_in_one_step()?;
        loop {
            let next = current.simplify_in_one_step()?;
            if next == current {
                return Ok(current);
            }
            current = next;
        }
    }
}

fn negate(e: Expression) -> Expression {
    match e {
        Expression::Number(n) => Expression::Number(-n),
        Expression::Negate(inner) => *inner,
        e => Expression::negate(e),
    }
}

fn sum(a: Expression, b: Expression) -> Expression {
    match (a, b) {
        (a, b) if a.is_zero() => b,
        (a, b) if b.is_zero() => a,
        (Expression::Number(x), Expression::Number(y)) => Expression::Number(x + y),
        (a, b) if as_rational(&a).is_some() && as_rational(&b).is_some() => {
            fold(&a, &b, |x, y| Some(x + y)).unwrap_or_else(|| Expression::sum(a, b))
        }
        (Expression::Negate(x), Expression::Negate(y)) => {
            Expression::negate(Expression::sum(*x, *y))
        }
        (a, Expression::Negate(y)) if a == *y => Expression::zero(),
        (Expression::Negate(x), b) if *x == b => Expression::zero(),
        (a, b) => Expression::sum(a, b),
    }
}

fn product(a: Expression, b: Expression) -> Expression {
    let minus_one = Expression::from(-1);
    match (a, b) {
        (a, b) if a.is_zero() || b.is_zero() => Expression::zero(),
        (a, b) if a.is_one() => b,
        (a, b) if b.is_one() => a,
        (a, b) if a == minus_one => Expression::negate(b),
        (a, b) if b == minus_one => Expression::negate(a),
        (Expression::Number(x), Expression::Number(y)) => Expression::Number(x * y),
        (a, b) if as_rational(&a).is_some() && as_rational(&b).is_some() => {
            fold(&a, &b, |x, y| Some(x * y)).unwrap_or_else(|| Expression::product(a, b))
        }
        (Expression::Negate(x), b) => Expression::negate(Expression::product(*x, b)),
        (a, Expression::Negate(y)) => Expression::negate(Expression::product(a, *y)),
        (Expression::Number(x), b) if x.is_negative() => {
            Expression::negate(Expression::product(Expression::Number(-x), b))
        }
        (a, Expression::Number(y)) if y.is_negative() => {
            Expression::negate(Expression::product(a, Expression::Number(-y)))
        }
        // a * (n / a) = n
        (a, Expression::Fraction(n, d)) if a == *d => *n,
        (Expression::Fraction(n, d), b) if *d == b => *n,
        (a, b) => Expression::product(a, b),
    }
}

fn fraction(n: Expression, d: Expression) -> Result<Expression, AreaError> {
    if d.is_zero() {
        let printed = Expression::fraction(n, d).to_string();
        error!("Zero denominator in {printed}");
        return Err(AreaError::DivisionByZero(printed));
    }
    if n.is_zero() {
        return Ok(Expression::zero());
    }
    if n == d {
        return Ok(Expression::one());
    }
    if d.is_one() {
        return Ok(n);
    }
    if d == Expression::from(-1) {
        return Ok(Expression::negate(n));
    }
    if let Some(folded) = fold(&n, &d, |x, y| (!y.is_zero()).then(|| x / y)) {
        return Ok(folded);
    }
    Ok(match (n, d) {
        (Expression::Negate(x), d) => Expression::negate(Expression::fraction(*x, d)),
        (n, Expression::Negate(y)) => Expression::negate(Expression::fraction(n, *y)),
        (Expression::Number(x), Expression::Number(y)) => number_fraction(x, y),
        (n, Expression::Number(y)) if y.is_negative() => {
            Expression::negate(Expression::fraction(n, Expression::Number(-y)))
        }
        (Expression::Number(x), d) if x.is_negative() => {
            Expression::negate(Expression::fraction(Expression::Number(-x), d))
        }
        // n / (x / y) = (n * y) / x
        (n, Expression::Fraction(x, y)) => {
            Expression::fraction(Expression::product(n, *y), *x)
        }
        // (x / y) / d = x / (y * d)
        (Expression::Fraction(x, y), d) => {
            Expression::fraction(*x, Expression::product(*y, d))
        }
        (n, d) => cancel_common_factors(n, d),
    })
}

/// Value of a constant: an integer, a fraction of integers, or the
/// negation of either.
fn as_rational(e: &Expression) -> Option<BigRational> {
    match e {
        Expression::Number(n) => Some(BigRational::from_integer(n.clone())),
        Expression::Fraction(n, d) => match (n.as_ref(), d.as_ref()) {
            (Expression::Number(n), Expression::Number(d)) if !d.is_zero() => {
                Some(BigRational::new(n.clone(), d.clone()))
            }
            _ => None,
        },
        Expression::Negate(x) => as_rational(x).map(|r| -r),
        _ => None,
    }
}

/// Fold two constants with `op`, `None` if either is not a constant.
fn fold<F>(a: &Expression, b: &Expression, op: F) -> Option<Expression>
where
    F: FnOnce(BigRational, BigRational) -> Option<BigRational>,
{
    let value = op(as_rational(a)?, as_rational(b)?)?;
    let (numer, denom) = value.into_raw();
    Some(number_fraction(numer, denom))
}

/// Reduce `x / y` by the gcd, sign in front.
fn number_fraction(x: BigInt, y: BigInt) -> Expression {
    let g = x.gcd(&y);
    let (mut x, mut y) = (x / &g, y / &g);
    if y.is_negative() {
        x = -x;
        y = -y;
    }
    if y == BigInt::from(1) {
        Expression::Number(x)
    } else if x.is_negative() {
        Expression::negate(Expression::fraction(
            Expression::Number(-x),
            Expression::Number(y),
        ))
    } else {
        Expression::fraction(Expression::Number(x), Expression::Number(y))
    }
}

fn factors_of(e: Expression, out: &mut Vec<Expression>) {
    match e {
        Expression::Product(a, b) => {
            factors_of(*a, out);
            factors_of(*b, out);
        }
        e => out.push(e),
    }
}

fn rebuild(factors: Vec<Expression>) -> Expression {
    factors
        .into_iter()
        .reduce(Expression::product)
        .unwrap_or_else(Expression::one)
}

/// `(m * rest) / k` with integers `m` and `k`: divide both by their gcd.
fn cancel_numbers(n: &Expression, k: &BigInt) -> Option<Expression> {
    let mut num = Vec::new();
    factors_of(n.clone(), &mut num);
    let pos = num
        .iter()
        .position(|f| matches!(f, Expression::Number(_)))?;
    let Expression::Number(m) = &num[pos] else {
        return None;
    };
    let g = m.gcd(k);
    if g == BigInt::from(1) {
        return None;
    }
    num[pos] = Expression::Number(m / &g);
    Some(Expression::fraction(rebuild(num), Expression::Number(k / &g)))
}

fn cancel_common_factors(n: Expression, d: Expression) -> Expression {
    // Whole-operand matches first, they keep the remaining factor untouched.
    if let Expression::Product(a, b) = &n {
        if **b == d {
            return (**a).clone();
        }
        if **a == d {
            return (**b).clone();
        }
    }
    if let Expression::Product(a, b) = &d {
        if **b == n {
            return Expression::fraction(Expression::one(), (**a).clone());
        }
        if **a == n {
            return Expression::fraction(Expression::one(), (**b).clone());
        }
    }
    if let Expression::Number(k) = &d {
        if let Some(reduced) = cancel_numbers(&n, k) {
            return reduced;
        }
    }
    if !matches!(n, Expression::Product(..)) || !matches!(d, Expression::Product(..)) {
        return Expression::fraction(n, d);
    }

    let (mut num, mut den) = (Vec::new(), Vec::new());
    factors_of(n.clone(), &mut num);
    factors_of(d.clone(), &mut den);
    let mut cancelled = false;
    num.retain(|f| {
        if let Some(pos) = den.iter().position(|g| g == f) {
            den.remove(pos);
            cancelled = true;
            false
        } else {
            true
        }
    });
    if !cancelled {
        return Expression::fraction(n, d);
    }
    Expression::fraction(rebuild(num), rebuild(den))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Point;

    fn s(a: &str, b: &str, c: &str) -> Expression {
        Expression::area(Point::free(a), Point::free(b), Point::free(c))
    }

    #[test]
    fn sum_rules() {
        let x = s("A", "B", "C");
        let e = Expression::sum(Expression::zero(), x.clone());
        assert_eq!(e.simplify().unwrap(), x);
        let e = Expression::difference(x.clone(), x.clone());
        assert!(e.simplify().unwrap().is_zero());
        let e = Expression::sum(Expression::from(2), Expression::from(-5));
        assert_eq!(e.simplify().unwrap(), Expression::from(-3));
        let y = s("A", "B", "D");
        let e = Expression::sum(Expression::negate(x.clone()), Expression::negate(y.clone()));
        assert_eq!(
            e.simplify().unwrap(),
            Expression::negate(Expression::sum(x, y))
        );
    }

    #[test]
    fn product_rules() {
        let x = s("A", "B", "C");
        let y = s("A", "B", "D");
        let e = Expression::product(Expression::from(1), x.clone());
        assert_eq!(e.simplify().unwrap(), x);
        let e = Expression::product(Expression::from(-2), x.clone());
        assert_eq!(e.simplify().unwrap().to_string(), "(- (* 2 (S A B C)))");
        let e = Expression::product(
            Expression::negate(x.clone()),
            Expression::negate(y.clone()),
        );
        assert_eq!(e.simplify().unwrap(), Expression::product(x.clone(), y.clone()));
        let e = Expression::product(x.clone(), Expression::fraction(y.clone(), x.clone()));
        assert_eq!(e.simplify().unwrap(), y);
    }

    #[test]
    fn fraction_rules() {
        let x = s("A", "B", "C");
        let y = s("A", "B", "D");
        assert_eq!(
            Expression::fraction(x.clone(), x.clone()).simplify().unwrap(),
            Expression::one()
        );
        assert_eq!(
            Expression::fraction(Expression::from(6), Expression::from(-4))
                .simplify()
                .unwrap()
                .to_string(),
            "(- (/ 3 2))"
        );
        assert_eq!(
            Expression::fraction(Expression::from(8), Expression::from(4))
                .simplify()
                .unwrap(),
            Expression::from(2)
        );
        let e = Expression::fraction(
            Expression::product(Expression::product(x.clone(), y.clone()), s("A", "C", "D")),
            Expression::product(y.clone(), s("B", "C", "D")),
        );
        assert_eq!(
            e.simplify().unwrap().to_string(),
            "(/ (* (S A B C) (S A C D)) (S B C D))"
        );
        let e = Expression::fraction(Expression::negate(x.clone()), y.clone());
        assert_eq!(
            e.simplify().unwrap(),
            Expression::negate(Expression::fraction(x, y))
        );
    }

    #[test]
    fn negative_number_denominator() {
        let x = s("A", "B", "C");
        let e = Expression::fraction(
            Expression::product(x.clone(), Expression::from(2)),
            Expression::from(-2),
        );
        assert_eq!(e.simplify().unwrap(), Expression::negate(x.clone()));
        let e = Expression::fraction(
            Expression::negate(Expression::product(x.clone(), Expression::from(4))),
            Expression::from(-4),
        );
        assert_eq!(e.simplify().unwrap(), x);
        let e = Expression::fraction(x.clone(), Expression::from(-3));
        assert_eq!(
            e.simplify().unwrap().to_string(),
            "(- (/ (S A B C) 3))"
        );
    }

    #[test]
    fn numeric_factors_cancel() {
        let x = s("A", "B", "C");
        let e = Expression::fraction(
            Expression::product(x.clone(), Expression::from(4)),
            Expression::from(2),
        );
        assert_eq!(
            e.simplify().unwrap(),
            Expression::product(x.clone(), Expression::from(2))
        );
        let e = Expression::fraction(
            Expression::product(Expression::from(6), x.clone()),
            Expression::from(4),
        );
        assert_eq!(e.simplify().unwrap().to_string(), "(/ (* 3 (S A B C)) 2)");
        let e = Expression::fraction(
            Expression::product(Expression::from(3), x.clone()),
            Expression::from(2),
        );
        assert_eq!(e.clone().simplify().unwrap(), e);
    }

    #[test]
    fn zero_denominator_fails_first() {
        let x = s("A", "B", "C");
        let e = Expression::fraction(Expression::zero(), Expression::difference(x.clone(), x));
        let err = e.simplify().unwrap_err();
        println!("{err}");
        assert!(matches!(err, AreaError::DivisionByZero(_)));
    }

    #[test]
    fn idempotent() {
        let x = s("A", "B", "C");
        let y = s("A", "B", "D");
        let e = Expression::fraction(
            Expression::sum(Expression::product(Expression::from(-3), x.clone()), y.clone()),
            Expression::product(Expression::negate(y), x),
        );
        let once = e.simplify().unwrap();
        assert_eq!(once.simplify().unwrap(), once);
    }
}
