use num::BigInt;
use symbolic_expressions::{Sexp, SexpError};
use thiserror::Error;

use super::Expression;
use crate::figure::{Figure, Point};

/// Error type for parsing area-method expressions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("S-expression parse error: {0}")]
    Sexp(String),
    #[error("invalid expression: {0}")]
    Expr(String),
    #[error("unknown point label: {0}")]
    Label(String),
    #[error("wrong number of arguments for '{op}': expected {expected}, got {got}")]
    Arity {
        op: String,
        expected: &'static str,
        got: usize,
    },
    #[error("invalid literal '{0}'")]
    Literal(String),
}

impl From<SexpError> for ParseError {
    fn from(e: SexpError) -> Self {
        ParseError::Sexp(format!("{e:?}"))
    }
}

impl Expression {
    /// Parse the textual form, resolving point labels through `figure`.
    ///
    /// Accepted forms: integer literals, `(S a b c)`, `(P a b c)`,
    /// `(R a b c d)`, `(- x)`, `(- a b)`, `(+ a b ...)`, `(* a b ...)`,
    /// `(/ a b)` and `(^ x n)` with an integer exponent.
    ///
    /// # Errors
    /// Fails on malformed s-expressions, unknown operators, wrong arity or
    /// labels that are not in `figure`.
    pub fn parse(s: &str, figure: &Figure) -> Result<Self, ParseError> {
        let sexp = symbolic_expressions::parser::parse_str(s.trim())?;
        parse_sexp(&sexp, figure)
    }
}

impl Figure {
    /// Parse an expression over the points of this figure.
    ///
    /// # Errors
    /// See [`Expression::parse`].
    pub fn parse_expression(&self, s: &str) -> Result<Expression, ParseError> {
        Expression::parse(s, self)
    }
}

fn parse_sexp(sexp: &Sexp, figure: &Figure) -> Result<Expression, ParseError> {
    match sexp {
        Sexp::String(s) => parse_literal(s),
        Sexp::List(items) => {
            let Some((Sexp::String(op), args)) = items.split_first() else {
                return Err(ParseError::Expr("expected (op ...)".to_owned()));
            };
            parse_application(op, args, figure)
        }
        Sexp::Empty => Err(ParseError::Expr("empty sexp".to_owned())),
    }
}

fn parse_literal(s: &str) -> Result<Expression, ParseError> {
    s.parse::<BigInt>()
        .map(Expression::Number)
        .map_err(|_| ParseError::Literal(s.to_owned()))
}

fn parse_application(op: &str, args: &[Sexp], figure: &Figure) -> Result<Expression, ParseError> {
    let arity = |expected: &'static str| ParseError::Arity {
        op: op.to_owned(),
        expected,
        got: args.len(),
    };
    match op {
        "S" | "P" => {
            let [a, b, c] = args else {
                return Err(arity("3"));
            };
            let (a, b, c) = (label(a, figure)?, label(b, figure)?, label(c, figure)?);
            Ok(if op == "S" {
                Expression::area(a, b, c)
            } else {
                Expression::pythagoras(a, b, c)
            })
        }
        "R" => {
            let [a, b, c, d] = args else {
                return Err(arity("4"));
            };
            Ok(Expression::ratio(
                label(a, figure)?,
                label(b, figure)?,
                label(c, figure)?,
                label(d, figure)?,
            ))
        }
        "-" => match args {
            [x] => Ok(Expression::negate(parse_sexp(x, figure)?)),
            [a, b] => Ok(Expression::difference(
                parse_sexp(a, figure)?,
                parse_sexp(b, figure)?,
            )),
            _ => Err(arity("1 or 2")),
        },
        "+" | "*" => {
            if args.len() < 2 {
                return Err(arity("at least 2"));
            }
            let combine = if op == "+" {
                Expression::sum
            } else {
                Expression::product
            };
            let mut operands = args.iter().map(|a| parse_sexp(a, figure));
            let mut acc = operands.next().ok_or_else(|| arity("at least 2"))??;
            for operand in operands {
                acc = combine(acc, operand?);
            }
            Ok(acc)
        }
        "/" => {
            let [a, b] = args else {
                return Err(arity("2"));
            };
            Ok(Expression::fraction(
                parse_sexp(a, figure)?,
                parse_sexp(b, figure)?,
            ))
        }
        "^" => {
            let [base, exp] = args else {
                return Err(arity("2"));
            };
            let base = parse_sexp(base, figure)?;
            let Sexp::String(exp) = exp else {
                return Err(ParseError::Expr("exponent must be an integer".to_owned()));
            };
            let exp = exp
                .parse::<i32>()
                .map_err(|_| ParseError::Literal(exp.clone()))?;
            if exp.unsigned_abs() > MAX_EXPONENT {
                return Err(ParseError::Expr(format!(
                    "exponent {exp} is above {MAX_EXPONENT}"
                )));
            }
            Ok(power(base, exp))
        }
        _ => Err(ParseError::Expr(format!("unknown operator '{op}'"))),
    }
}

/// `(^ x n)` is unfolded into `n` factors.
const MAX_EXPONENT: u32 = 64;

fn power(base: Expression, exp: i32) -> Expression {
    let mut acc = Expression::one();
    for i in 0..exp.unsigned_abs() {
        acc = if i == 0 {
            base.clone()
        } else {
            Expression::product(acc, base.clone())
        };
    }
    if exp < 0 {
        Expression::fraction(Expression::one(), acc)
    } else {
        acc
    }
}

fn label(sexp: &Sexp, figure: &Figure) -> Result<Point, ParseError> {
    let Sexp::String(label) = sexp else {
        return Err(ParseError::Expr(format!("expected a point label, got {sexp}")));
    };
    figure
        .get(label)
        .cloned()
        .ok_or_else(|| ParseError::Label(label.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figure() -> Figure {
        let mut figure = Figure::new();
        for l in ["A", "B", "C", "D"] {
            figure.free(l).unwrap();
        }
        figure
    }

    #[test]
    fn display_parses_back() {
        let figure = figure();
        let input = "(/ (+ (S A B C) (- (P A B A))) (* 2 (R A B C D)))";
        let e = figure.parse_expression(input).unwrap();
        assert_eq!(e.to_string(), input);
    }

    #[test]
    fn nary_and_power() {
        let figure = figure();
        let e = figure.parse_expression("(+ 1 2 3)").unwrap();
        assert_eq!(e.to_string(), "(+ (+ 1 2) 3)");
        let e = figure.parse_expression("(^ (S A B C) 2)").unwrap();
        assert_eq!(e.to_string(), "(* (S A B C) (S A B C))");
        let e = figure.parse_expression("(- (S A B C) 1)").unwrap();
        assert_eq!(e.to_string(), "(+ (S A B C) (- 1))");
    }

    #[test]
    fn exponent_is_bounded() {
        let figure = figure();
        let positive = figure.parse_expression("(^ (S A B C) 64)").unwrap();
        let negative = figure.parse_expression("(^ (S A B C) -64)").unwrap();
        assert_eq!(negative.size(), positive.size() + 2);
        let err = figure
            .parse_expression("(^ (S A B C) 2000000000)")
            .unwrap_err();
        println!("{err}");
        assert!(matches!(err, ParseError::Expr(_)));
        assert!(figure.parse_expression("(^ (S A B C) -65)").is_err());
    }

    #[test]
    fn errors() {
        let figure = figure();
        assert!(matches!(
            figure.parse_expression("(S A B X)"),
            Err(ParseError::Label(_))
        ));
        assert!(matches!(
            figure.parse_expression("(S A B)"),
            Err(ParseError::Arity { .. })
        ));
        assert!(matches!(
            figure.parse_expression("(% A B)"),
            Err(ParseError::Expr(_))
        ));
        assert!(matches!(
            figure.parse_expression("abc"),
            Err(ParseError::Literal(_))
        ));
    }
}
