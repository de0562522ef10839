mod area;
mod pythagoras;
mod ratio;
mod usage;

use indexmap::IndexSet;
use log::debug;

use crate::errors::AreaError;
use crate::expr::{Expression, GeometricQuantity};
use crate::figure::{Construction, Point};
use crate::oracle::{Decision, DecisionOracle};
use crate::statement::Statement;
use crate::uniformize::{trivially_collinear, CollinearMemo};

pub use usage::{ConstructionKind, Lemma, LemmaGroup, LemmaUsage, LEMMA_SLOTS};

// ============================================================================
// Quantity shorthands
// ============================================================================

fn s3(a: &Point, b: &Point, c: &Point) -> Expression {
    Expression::area(a.clone(), b.clone(), c.clone())
}

fn p3(a: &Point, b: &Point, c: &Point) -> Expression {
    Expression::pythagoras(a.clone(), b.clone(), c.clone())
}

/// `S_ABCD = S_ABC + S_ACD`
fn s4(a: &Point, b: &Point, c: &Point, d: &Point) -> Expression {
    Expression::sum(s3(a, b, c), s3(a, c, d))
}

/// `P_ABCD = P_ABD - P_CBD`
fn p4(a: &Point, b: &Point, c: &Point, d: &Point) -> Expression {
    Expression::difference(p3(a, b, d), p3(c, b, d))
}

fn r4(a: &Point, b: &Point, c: &Point, d: &Point) -> Expression {
    Expression::ratio(a.clone(), b.clone(), c.clone(), d.clone())
}

fn int(n: i64) -> Expression {
    Expression::from(n)
}

// ============================================================================
// Eliminator
// ============================================================================

/// Removes constructed points from expressions with the area-method lemmas.
///
/// Case splits on collinearity are delegated to the oracle; positive answers
/// are remembered in a [`CollinearMemo`] that also feeds the uniformizer.
pub struct Eliminator<'o, O: ?Sized> {
    oracle: &'o mut O,
    known_collinear: CollinearMemo,
    usage: LemmaUsage,
    ndg_conditions: IndexSet<Expression>,
}

impl<'o, O> Eliminator<'o, O>
where
    O: DecisionOracle + ?Sized,
{
    pub fn new(oracle: &'o mut O) -> Self {
        Eliminator {
            oracle,
            known_collinear: CollinearMemo::new(),
            usage: LemmaUsage::new(),
            ndg_conditions: IndexSet::new(),
        }
    }

    #[must_use]
    pub fn usage(&self) -> &LemmaUsage {
        &self.usage
    }

    #[must_use]
    pub fn known_collinear(&self) -> &CollinearMemo {
        &self.known_collinear
    }

    /// Denominators introduced by the lemmas, each must be non-zero for the
    /// proof to be valid.
    pub fn ndg_conditions(&self) -> impl Iterator<Item = &Expression> {
        self.ndg_conditions.iter()
    }

    /// Rewrite every occurrence of `point` away, then uniformize and simplify.
    ///
    /// # Errors
    /// - [`AreaError::MalformedExpression`] for a free `point`
    /// - [`AreaError::UnknownStatement`] if the oracle cannot settle a case split
    /// - [`AreaError::DivisionByZero`] if a lemma denominator vanishes
    pub fn eliminate(&mut self, e: &Expression, point: &Point) -> Result<Expression, AreaError> {
        if point.is_free() {
            return Err(AreaError::MalformedExpression(format!(
                "cannot eliminate the free point {point}"
            )));
        }
        let eliminated = self.eliminate_in(e, point)?;
        eliminated.uniformize(&self.known_collinear).simplify()
    }

    fn eliminate_in(&mut self, e: &Expression, y: &Point) -> Result<Expression, AreaError> {
        if !e.contains_point(y) {
            return Ok(e.clone());
        }
        match e {
            Expression::Number(_) => Ok(e.clone()),
            Expression::Quantity(q) => self.eliminate_quantity(q, y),
            Expression::Negate(x) => Ok(Expression::negate(self.eliminate_in(x, y)?)),
            Expression::Sum(a, b) => Ok(Expression::sum(
                self.eliminate_in(a, y)?,
                self.eliminate_in(b, y)?,
            )),
            Expression::Product(a, b) => Ok(Expression::product(
                self.eliminate_in(a, y)?,
                self.eliminate_in(b, y)?,
            )),
            Expression::Fraction(a, b) => Ok(Expression::fraction(
                self.eliminate_in(a, y)?,
                self.eliminate_in(b, y)?,
            )),
            Expression::BigProduct(_) | Expression::SumOfProducts(_) => {
                self.eliminate_in(&e.unfold(), y)
            }
        }
    }

    fn eliminate_quantity(
        &mut self,
        q: &GeometricQuantity,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        let result = match q {
            GeometricQuantity::Area(a, b, c) => self.eliminate_area(a, b, c, y)?,
            GeometricQuantity::Pythagoras(a, b, c) => self.eliminate_pythagoras(a, b, c, y)?,
            GeometricQuantity::Ratio(a, b, c, d) => self.eliminate_ratio(a, b, c, d, y)?,
        };
        debug!("Eliminated {y} from {q}: {result}");
        Ok(result)
    }

    fn record(&mut self, group: LemmaGroup, y: &Point) -> Result<(), AreaError> {
        let kind = ConstructionKind::of(y.construction()).ok_or_else(|| {
            AreaError::MalformedExpression(format!("no lemma for the free point {y}"))
        })?;
        let lemma = Lemma::new(group, kind);
        debug!("Applying lemma {lemma} to {y}");
        self.usage.record(lemma);
        Ok(())
    }

    fn ndg(&mut self, denominator: &Expression) {
        let uniform = denominator.uniformize(&CollinearMemo::new());
        if self.ndg_conditions.insert(uniform) {
            debug!("New non-degeneracy condition {denominator} != 0");
        }
    }

    /// `denominator` recorded as a non-degeneracy condition
    fn divide(&mut self, numerator: Expression, denominator: Expression) -> Expression {
        self.ndg(&denominator);
        Expression::fraction(numerator, denominator)
    }

    /// Is `{a, b, c}` collinear? Trivial cases and known triples skip the oracle.
    ///
    /// # Errors
    /// [`AreaError::UnknownStatement`] when the oracle answers `Unknown`, and
    /// whatever the oracle itself fails with.
    pub fn collinear(&mut self, a: &Point, b: &Point, c: &Point) -> Result<bool, AreaError> {
        if trivially_collinear(a, b, c, &self.known_collinear) {
            return Ok(true);
        }
        let statement = Statement::Collinear(a.clone(), b.clone(), c.clone());
        match self.oracle.decide(&statement)? {
            Decision::True => {
                self.known_collinear.insert(a, b, c);
                Ok(true)
            }
            Decision::False => Ok(false),
            Decision::Unknown => Err(AreaError::UnknownStatement(statement.to_string())),
        }
    }

    /// The lemmas for `G(Y)` where `G` is linear in `Y`: `S_ABY` and `P_ABY`.
    /// The `TRatio` case differs between the two and is passed in.
    fn linear<G, T>(
        &mut self,
        group: LemmaGroup,
        y: &Point,
        g: G,
        tratio: T,
    ) -> Result<Expression, AreaError>
    where
        G: Fn(&Point) -> Expression,
        T: FnOnce(&Point, &Point, &Expression) -> Expression,
    {
        self.record(group, y)?;
        Ok(match y.construction() {
            Construction::Free => {
                return Err(AreaError::MalformedExpression(format!(
                    "no lemma for the free point {y}"
                )))
            }
            Construction::Intersection { u, v, p, q } => {
                let numerator = Expression::difference(
                    Expression::product(s3(u, p, q), g(v)),
                    Expression::product(s3(v, p, q), g(u)),
                );
                self.divide(numerator, s4(u, p, v, q))
            }
            Construction::Foot { p, u, v } => {
                let numerator = Expression::sum(
                    Expression::product(p3(p, u, v), g(v)),
                    Expression::product(p3(p, v, u), g(u)),
                );
                self.divide(numerator, p3(u, v, u))
            }
            Construction::PRatio { w, u, v, r } => Expression::sum(
                g(w),
                Expression::product(r.clone(), Expression::difference(g(v), g(u))),
            ),
            Construction::TRatio { u, v, r } => tratio(u, v, r),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::figure::Figure;

    fn never(_: &Statement) -> Result<Decision, AreaError> {
        Ok(Decision::Unknown)
    }

    #[test]
    fn free_point_is_rejected() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let mut oracle = never;
        let mut eliminator = Eliminator::new(&mut oracle);
        let e = Expression::area(a.clone(), b, c);
        assert!(matches!(
            eliminator.eliminate(&e, &a),
            Err(AreaError::MalformedExpression(_))
        ));
    }

    #[test]
    fn untouched_without_point() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let m = figure.midpoint("M", &a, &b).unwrap();
        let mut oracle = never;
        let mut eliminator = Eliminator::new(&mut oracle);
        let e = Expression::area(a, b, c);
        assert_eq!(eliminator.eliminate(&e, &m).unwrap(), e);
        assert_eq!(eliminator.usage().total(), 0);
    }

    #[test]
    fn unknown_collinearity_is_surfaced() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let mut oracle = never;
        let mut eliminator = Eliminator::new(&mut oracle);
        assert!(eliminator.collinear(&a, &a, &b).unwrap());
        assert!(matches!(
            eliminator.collinear(&a, &b, &c),
            Err(AreaError::UnknownStatement(_))
        ));
    }

    #[test]
    fn positive_answers_are_memoised() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let mut calls = 0;
        let mut oracle = |_: &Statement| {
            calls += 1;
            Ok::<_, AreaError>(Decision::True)
        };
        let mut eliminator = Eliminator::new(&mut oracle);
        assert!(eliminator.collinear(&a, &b, &c).unwrap());
        assert!(eliminator.collinear(&c, &a, &b).unwrap());
        assert_eq!(eliminator.known_collinear().len(), 1);
        drop(eliminator);
        assert_eq!(calls, 1);
    }
}
