use crate::eliminate::Eliminator;
use crate::errors::AreaError;
use crate::expr::{Expression, GeometricQuantity};
use crate::figure::{Point, RESERVED_LABELS};
use crate::oracle::DecisionOracle;

/// The three reference points `iO`, `iU`, `iV`.
///
/// `iO iU` is perpendicular to `iO iV` and both have the same length, so
/// every free point is fixed by its two areas against the axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFrame {
    pub o: Point,
    pub u: Point,
    pub v: Point,
}

impl ReferenceFrame {
    #[must_use]
    pub fn new() -> Self {
        let [o, u, v] = RESERVED_LABELS;
        ReferenceFrame {
            o: Point::free(o),
            u: Point::free(u),
            v: Point::free(v),
        }
    }

    /// `S(iO, iU, p)`
    #[must_use]
    pub fn x(&self, p: &Point) -> Expression {
        Expression::area(self.o.clone(), self.u.clone(), p.clone())
    }

    /// `S(iO, iV, p)`
    #[must_use]
    pub fn y(&self, p: &Point) -> Expression {
        Expression::area(self.o.clone(), self.v.clone(), p.clone())
    }

    /// `S(iO, iU, iV)`
    #[must_use]
    pub fn souv(&self) -> Expression {
        Expression::area(self.o.clone(), self.u.clone(), self.v.clone())
    }

    fn dx(&self, a: &Point, b: &Point) -> Expression {
        Expression::difference(self.x(a), self.x(b))
    }

    fn dy(&self, a: &Point, b: &Point) -> Expression {
        Expression::difference(self.y(a), self.y(b))
    }

    /// `S_ABC` over the frame
    #[must_use]
    pub fn area(&self, a: &Point, b: &Point, c: &Point) -> Expression {
        let numerator = Expression::difference(
            Expression::product(self.dy(c, a), self.dx(b, a)),
            Expression::product(self.dy(b, a), self.dx(c, a)),
        );
        Expression::fraction(numerator, self.souv())
    }

    /// `P_ABC` over the frame
    #[must_use]
    pub fn pythagoras(&self, a: &Point, b: &Point, c: &Point) -> Expression {
        let dot = Expression::sum(
            Expression::product(self.dy(a, b), self.dy(c, b)),
            Expression::product(self.dx(a, b), self.dx(c, b)),
        );
        Expression::fraction(Expression::product(Expression::from(4), dot), self.souv())
    }
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_free(q: &GeometricQuantity) -> Result<(), AreaError> {
    match q.points().into_iter().find(|p| !p.is_free()) {
        Some(p) => Err(AreaError::MalformedExpression(format!(
            "constructed point {p} left in {q}"
        ))),
        None => Ok(()),
    }
}

impl<O> Eliminator<'_, O>
where
    O: DecisionOracle + ?Sized,
{
    /// Express a fully eliminated expression over the reference frame.
    ///
    /// # Errors
    /// - [`AreaError::MalformedExpression`] if a constructed point is left
    /// - [`AreaError::UnknownStatement`] if a ratio needs an undecidable
    ///   collinearity
    pub fn to_independent_variables(
        &mut self,
        e: &Expression,
        frame: &ReferenceFrame,
    ) -> Result<Expression, AreaError> {
        Ok(match e {
            Expression::Number(_) => e.clone(),
            Expression::Quantity(q) => self.reduce_quantity(q, frame)?,
            Expression::Negate(x) => Expression::negate(self.to_independent_variables(x, frame)?),
            Expression::Sum(a, b) => Expression::sum(
                self.to_independent_variables(a, frame)?,
                self.to_independent_variables(b, frame)?,
            ),
            Expression::Product(a, b) => Expression::product(
                self.to_independent_variables(a, frame)?,
                self.to_independent_variables(b, frame)?,
            ),
            Expression::Fraction(a, b) => Expression::fraction(
                self.to_independent_variables(a, frame)?,
                self.to_independent_variables(b, frame)?,
            ),
            Expression::BigProduct(_) | Expression::SumOfProducts(_) => {
                self.to_independent_variables(&e.unfold(), frame)?
            }
        })
    }

    fn reduce_quantity(
        &mut self,
        q: &GeometricQuantity,
        frame: &ReferenceFrame,
    ) -> Result<Expression, AreaError> {
        ensure_free(q)?;
        Ok(match q {
            GeometricQuantity::Area(a, b, c) => frame.area(a, b, c),
            GeometricQuantity::Pythagoras(a, b, c) => frame.pythagoras(a, b, c),
            GeometricQuantity::Ratio(a, b, c, d) => {
                if self.collinear(a, c, d)? {
                    // P_BCAD / P_CDC
                    Expression::fraction(
                        Expression::difference(frame.pythagoras(b, c, d), frame.pythagoras(a, c, d)),
                        frame.pythagoras(c, d, c),
                    )
                } else {
                    // S_ACB / S_ACD
                    Expression::fraction(frame.area(a, c, b), frame.area(a, c, d))
                }
            }
        })
    }
}
