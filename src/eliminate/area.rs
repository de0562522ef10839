use crate::errors::AreaError;
use crate::expr::Expression;
use crate::figure::Point;
use crate::oracle::DecisionOracle;

use super::{p4, s3, Eliminator, LemmaGroup};

impl<O> Eliminator<'_, O>
where
    O: DecisionOracle + ?Sized,
{
    /// `S_ABC` with `y` among `a, b, c`.
    pub(super) fn eliminate_area(
        &mut self,
        a: &Point,
        b: &Point,
        c: &Point,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        // Rotate cyclically so that y comes last: S_ABC = S_BCA = S_CAB
        let (a, b) = if c == y {
            (a, b)
        } else if a == y {
            (b, c)
        } else {
            (c, a)
        };
        if a == y || b == y {
            return Ok(Expression::zero());
        }
        self.linear(
            LemmaGroup::Area,
            y,
            |x| s3(a, b, x),
            // S_ABY = S_ABP - r/4 P_PAQB
            |p, q, r| {
                Expression::difference(
                    s3(a, b, p),
                    Expression::product(
                        Expression::fraction(r.clone(), Expression::from(4)),
                        p4(p, a, q, b),
                    ),
                )
            },
        )
    }
}
