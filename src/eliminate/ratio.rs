use crate::errors::AreaError;
use crate::expr::Expression;
use crate::figure::{Construction, Point};
use crate::oracle::DecisionOracle;

use super::{p3, p4, r4, s3, s4, Eliminator, LemmaGroup};

/// `S_APQ - r/4 P_PQP`, the signed distance term of the `TRatio` lemmas.
fn tratio_area(a: &Point, p: &Point, q: &Point, r: &Expression) -> Expression {
    Expression::difference(
        s3(a, p, q),
        Expression::product(
            Expression::fraction(r.clone(), Expression::from(4)),
            p3(p, q, p),
        ),
    )
}

impl<O> Eliminator<'_, O>
where
    O: DecisionOracle + ?Sized,
{
    /// `AB / CD` with `y` among `a, b, c, d`.
    pub(super) fn eliminate_ratio(
        &mut self,
        a: &Point,
        b: &Point,
        c: &Point,
        d: &Point,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        if a == b {
            return Ok(Expression::zero());
        }
        if c == d {
            return Err(AreaError::DivisionByZero(r4(a, b, c, d).to_string()));
        }
        let in_numerator = a == y || b == y;
        let in_denominator = c == y || d == y;
        if !in_numerator {
            // AB / CY = 1 / (CY / AB)
            let inverted = self.eliminate_ratio(c, d, a, b, y)?;
            return Ok(self.divide(Expression::one(), inverted));
        }
        if a == y {
            // YB / CD = -(BY / CD)
            return Ok(Expression::negate(self.eliminate_ratio(b, a, c, d, y)?));
        }
        if c == y {
            return Ok(Expression::negate(self.eliminate_ratio(a, b, d, c, y)?));
        }
        if in_denominator {
            self.eliminate_shared_ratio(a, c, y)
        } else {
            self.eliminate_plain_ratio(a, c, d, y)
        }
    }

    /// `AY / CD` with `y` not in `c, d`.
    fn eliminate_plain_ratio(
        &mut self,
        a: &Point,
        c: &Point,
        d: &Point,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        self.record(LemmaGroup::Ratio, y)?;
        Ok(match y.construction() {
            Construction::Free => {
                return Err(AreaError::MalformedExpression(format!(
                    "no lemma for the free point {y}"
                )))
            }
            Construction::Intersection { u, v, p, q } => {
                if self.collinear(a, u, v)? {
                    self.divide(s3(a, p, q), s4(c, p, d, q))
                } else {
                    self.divide(s3(a, u, v), s4(c, u, d, v))
                }
            }
            Construction::Foot { p, u, v } => {
                if self.collinear(a, u, v)? {
                    self.divide(p4(p, c, a, d), p3(c, d, c))
                } else {
                    self.divide(s3(a, u, v), s4(c, u, d, v))
                }
            }
            Construction::PRatio { w, u, v, r } => {
                if self.collinear(a, w, y)? {
                    // (AW/UV + r) / (CD/UV)
                    self.divide(
                        Expression::sum(r4(a, w, u, v), r.clone()),
                        r4(c, d, u, v),
                    )
                } else {
                    self.divide(s4(a, u, w, v), s4(c, u, d, v))
                }
            }
            Construction::TRatio { u: p, v: q, r } => {
                if self.collinear(a, p, y)? {
                    self.divide(tratio_area(a, p, q, r), s4(c, p, d, q))
                } else {
                    let areas = self.divide(s3(a, p, y), s4(c, p, d, y));
                    self.eliminate_in(&areas, y)?
                }
            }
        })
    }

    /// `AY / CY`
    fn eliminate_shared_ratio(
        &mut self,
        a: &Point,
        c: &Point,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        if a == c {
            return Ok(Expression::one());
        }
        self.record(LemmaGroup::Ratio, y)?;
        Ok(match y.construction() {
            Construction::Free => {
                return Err(AreaError::MalformedExpression(format!(
                    "no lemma for the free point {y}"
                )))
            }
            Construction::Intersection { u, v, p, q } => {
                if self.collinear(a, u, v)? {
                    self.divide(s3(a, p, q), s3(c, p, q))
                } else {
                    self.divide(s3(a, u, v), s3(c, u, v))
                }
            }
            Construction::Foot { p, u, v } => {
                if self.collinear(a, u, v)? {
                    self.divide(p4(a, u, p, v), p4(c, u, p, v))
                } else {
                    self.divide(s3(a, u, v), s3(c, u, v))
                }
            }
            Construction::PRatio { w, u, v, r } => {
                if self.collinear(a, w, y)? {
                    self.divide(
                        Expression::sum(r4(a, w, u, v), r.clone()),
                        Expression::sum(r4(c, w, u, v), r.clone()),
                    )
                } else {
                    self.divide(s4(a, u, w, v), s4(c, u, w, v))
                }
            }
            Construction::TRatio { u: p, v: q, r } => {
                if self.collinear(a, p, y)? {
                    self.divide(tratio_area(a, p, q, r), tratio_area(c, p, q, r))
                } else {
                    let areas = self.divide(s3(a, p, y), s3(c, p, y));
                    self.eliminate_in(&areas, y)?
                }
            }
        })
    }
}
