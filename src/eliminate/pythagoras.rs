use crate::errors::AreaError;
use crate::expr::Expression;
use crate::figure::{Construction, Point};
use crate::oracle::DecisionOracle;

use super::{int, p3, s3, s4, Eliminator, LemmaGroup};

impl<O> Eliminator<'_, O>
where
    O: DecisionOracle + ?Sized,
{
    /// `P_ABC` with `y` among `a, b, c`.
    pub(super) fn eliminate_pythagoras(
        &mut self,
        a: &Point,
        b: &Point,
        c: &Point,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        if b == y {
            if a == y || c == y {
                return Ok(Expression::zero());
            }
            return self.eliminate_middle(a, c, y);
        }
        if a == y && c == y {
            // P_YBY = P_BYB
            return self.eliminate_middle(b, b, y);
        }
        // P_YBC = P_CBY
        let (a, b) = if c == y { (a, b) } else { (c, b) };
        self.linear(
            LemmaGroup::LinearPythagoras,
            y,
            |x| p3(a, b, x),
            // P_ABY = P_ABP - 4 r S_PAQB
            |p, q, r| {
                Expression::difference(
                    p3(a, b, p),
                    Expression::product(
                        Expression::product(int(4), r.clone()),
                        s4(p, a, q, b),
                    ),
                )
            },
        )
    }

    /// `P_AYB`, quadratic in `y`.
    fn eliminate_middle(
        &mut self,
        a: &Point,
        b: &Point,
        y: &Point,
    ) -> Result<Expression, AreaError> {
        self.record(LemmaGroup::MiddlePythagoras, y)?;
        let result = match y.construction() {
            Construction::Free => {
                return Err(AreaError::MalformedExpression(format!(
                    "no lemma for the free point {y}"
                )))
            }
            Construction::Intersection { u, v, p, q } => {
                let (s_upq, s_vpq) = (s3(u, p, q), s3(v, p, q));
                let den = s4(u, p, v, q);
                let linear = self.divide(
                    Expression::difference(
                        Expression::product(s_upq.clone(), p3(a, v, b)),
                        Expression::product(s_vpq.clone(), p3(a, u, b)),
                    ),
                    den.clone(),
                );
                let quadratic = Expression::fraction(
                    Expression::product(Expression::product(s_upq, s_vpq), p3(u, v, u)),
                    Expression::product(den.clone(), den),
                );
                Expression::sum(linear, quadratic)
            }
            Construction::Foot { p, u, v } => {
                let (p_puv, p_pvu) = (p3(p, u, v), p3(p, v, u));
                let den = p3(u, v, u);
                let linear = self.divide(
                    Expression::sum(
                        Expression::product(p_puv.clone(), p3(a, v, b)),
                        Expression::product(p_pvu.clone(), p3(a, u, b)),
                    ),
                    den.clone(),
                );
                let quadratic = Expression::fraction(Expression::product(p_puv, p_pvu), den);
                Expression::difference(linear, quadratic)
            }
            // P_AWB + r (P_AVB - P_AUB + 2 P_WUV) - r (1 - r) P_UVU
            Construction::PRatio { w, u, v, r } => {
                let inner = Expression::sum(
                    Expression::difference(p3(a, v, b), p3(a, u, b)),
                    Expression::product(int(2), p3(w, u, v)),
                );
                let correction = Expression::product(
                    Expression::product(r.clone(), Expression::difference(int(1), r.clone())),
                    p3(u, v, u),
                );
                Expression::difference(
                    Expression::sum(p3(a, w, b), Expression::product(r.clone(), inner)),
                    correction,
                )
            }
            // P_APB + r^2 P_PQP - 4 r (S_APQ + S_BPQ)
            Construction::TRatio { u: p, v: q, r } => {
                let square = Expression::product(
                    Expression::product(r.clone(), r.clone()),
                    p3(p, q, p),
                );
                let cross = Expression::product(
                    Expression::product(int(4), r.clone()),
                    Expression::sum(s3(a, p, q), s3(b, p, q)),
                );
                Expression::difference(Expression::sum(p3(a, p, b), square), cross)
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::eliminate::{ConstructionKind, Eliminator, Lemma, LemmaGroup};
    use crate::errors::AreaError;
    use crate::expr::Expression;
    use crate::figure::Figure;
    use crate::oracle::Decision;
    use crate::statement::Statement;

    fn never(_: &Statement) -> Result<Decision, AreaError> {
        Ok(Decision::Unknown)
    }

    #[test]
    fn foot_of_degenerate_line() {
        let mut figure = Figure::new();
        let p = figure.free("P").unwrap();
        let u = figure.free("U").unwrap();
        let f = figure.foot("F", &p, &u, &u).unwrap();
        let mut oracle = never;
        let mut eliminator = Eliminator::new(&mut oracle);
        let e = Expression::pythagoras(f.clone(), u.clone(), p.clone());
        let err = eliminator.eliminate(&e, &f).unwrap_err();
        assert!(matches!(err, AreaError::DivisionByZero(_)), "{err}");
    }

    #[test]
    fn position_dispatch() {
        let mut figure = Figure::new();
        let a = figure.free("A").unwrap();
        let b = figure.free("B").unwrap();
        let c = figure.free("C").unwrap();
        let m = figure.midpoint("M", &a, &b).unwrap();
        let mut oracle = never;
        let mut eliminator = Eliminator::new(&mut oracle);

        let linear = Lemma::new(LemmaGroup::LinearPythagoras, ConstructionKind::PRatio);
        let middle = Lemma::new(LemmaGroup::MiddlePythagoras, ConstructionKind::PRatio);

        eliminator
            .eliminate(&Expression::pythagoras(m.clone(), a.clone(), c.clone()), &m)
            .unwrap();
        assert_eq!(eliminator.usage().count(linear), 1);

        eliminator
            .eliminate(&Expression::pythagoras(a.clone(), m.clone(), c.clone()), &m)
            .unwrap();
        assert_eq!(eliminator.usage().count(middle), 1);

        eliminator
            .eliminate(&Expression::pythagoras(m.clone(), c.clone(), m.clone()), &m)
            .unwrap();
        assert_eq!(eliminator.usage().count(middle), 2);

        let zero = eliminator
            .eliminate(&Expression::pythagoras(m.clone(), m.clone(), c), &m)
            .unwrap();
        assert!(zero.is_zero());
    }
}
