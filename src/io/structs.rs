use serde::{Deserialize, Serialize};

use crate::errors::AreaError;
use crate::figure::{Figure, Point};
use crate::prover::Theorem;
use crate::statement::Statement;

/// A theorem as it is stored on disk: points by label, ratios and
/// expressions in their s-expression form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TheoremSpec {
    pub name: String,
    /// Construction steps in order
    pub steps: Vec<StepSpec>,
    pub statement: StatementSpec,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSpec {
    Free {
        label: String,
    },
    Intersection {
        label: String,
        u: String,
        v: String,
        p: String,
        q: String,
    },
    Foot {
        label: String,
        p: String,
        u: String,
        v: String,
    },
    #[serde(rename = "pratio")]
    PRatio {
        label: String,
        w: String,
        u: String,
        v: String,
        r: String,
    },
    #[serde(rename = "tratio")]
    TRatio {
        label: String,
        u: String,
        v: String,
        r: String,
    },
    Midpoint {
        label: String,
        a: String,
        b: String,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatementSpec {
    Collinear { points: [String; 3] },
    Parallel { points: [String; 4] },
    Perpendicular { points: [String; 4] },
    EqualLength { points: [String; 4] },
    Equal { lhs: String, rhs: String },
}

impl StepSpec {
    /// Add the step to `figure`.
    ///
    /// # Errors
    /// Unknown or duplicate labels and unparsable ratios.
    pub fn apply(&self, figure: &mut Figure) -> Result<Point, AreaError> {
        match self {
            StepSpec::Free { label } => figure.free(label),
            StepSpec::Intersection { label, u, v, p, q } => {
                let (u, v) = (figure.point(u)?, figure.point(v)?);
                let (p, q) = (figure.point(p)?, figure.point(q)?);
                figure.intersection(label, &u, &v, &p, &q)
            }
            StepSpec::Foot { label, p, u, v } => {
                let (p, u, v) = (figure.point(p)?, figure.point(u)?, figure.point(v)?);
                figure.foot(label, &p, &u, &v)
            }
            StepSpec::PRatio { label, w, u, v, r } => {
                let (w, u, v) = (figure.point(w)?, figure.point(u)?, figure.point(v)?);
                let r = figure.parse_expression(r)?;
                figure.pratio(label, &w, &u, &v, r)
            }
            StepSpec::TRatio { label, u, v, r } => {
                let (u, v) = (figure.point(u)?, figure.point(v)?);
                let r = figure.parse_expression(r)?;
                figure.tratio(label, &u, &v, r)
            }
            StepSpec::Midpoint { label, a, b } => {
                let (a, b) = (figure.point(a)?, figure.point(b)?);
                figure.midpoint(label, &a, &b)
            }
        }
    }
}

impl StatementSpec {
    /// Resolve the labels against `figure`.
    ///
    /// # Errors
    /// Unknown labels and unparsable expressions.
    pub fn resolve(&self, figure: &Figure) -> Result<Statement, AreaError> {
        let get = |l: &String| figure.point(l);
        Ok(match self {
            StatementSpec::Collinear { points: [a, b, c] } => {
                Statement::Collinear(get(a)?, get(b)?, get(c)?)
            }
            StatementSpec::Parallel { points: [a, b, c, d] } => {
                Statement::Parallel(get(a)?, get(b)?, get(c)?, get(d)?)
            }
            StatementSpec::Perpendicular { points: [a, b, c, d] } => {
                Statement::Perpendicular(get(a)?, get(b)?, get(c)?, get(d)?)
            }
            StatementSpec::EqualLength { points: [a, b, c, d] } => {
                Statement::EqualLength(get(a)?, get(b)?, get(c)?, get(d)?)
            }
            StatementSpec::Equal { lhs, rhs } => {
                Statement::Equal(figure.parse_expression(lhs)?, figure.parse_expression(rhs)?)
            }
        })
    }
}

impl TheoremSpec {
    /// Build the figure step by step and resolve the statement in it.
    ///
    /// # Errors
    /// See [`StepSpec::apply`] and [`StatementSpec::resolve`].
    pub fn to_theorem(&self) -> Result<Theorem, AreaError> {
        let mut figure = Figure::new();
        for step in &self.steps {
            step.apply(&mut figure)?;
        }
        let statement = self.statement.resolve(&figure)?;
        Ok(Theorem::new(self.name.clone(), figure, statement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ParseError;

    const MIDPOINTS: &str = r#"{
        "name": "midline",
        "steps": [
            {"kind": "free", "label": "A"},
            {"kind": "free", "label": "B"},
            {"kind": "free", "label": "C"},
            {"kind": "midpoint", "label": "M", "a": "A", "b": "B"},
            {"kind": "pratio", "label": "N", "w": "A", "u": "A", "v": "C", "r": "(/ 1 2)"}
        ],
        "statement": {"kind": "parallel", "points": ["M", "N", "B", "C"]}
    }"#;

    #[test]
    fn theorem_from_json() {
        let spec: TheoremSpec = serde_json::from_str(MIDPOINTS).unwrap();
        assert_eq!(spec.steps.len(), 5);
        let theorem = spec.to_theorem().unwrap();
        assert_eq!(theorem.name(), "midline");
        assert_eq!(theorem.figure().len(), 5);
        assert_eq!(theorem.statement().to_string(), "(parallel M N B C)");
    }

    #[test]
    fn equal_statement() {
        let json = r#"{
            "name": "half",
            "steps": [
                {"kind": "free", "label": "A"},
                {"kind": "free", "label": "B"},
                {"kind": "midpoint", "label": "M", "a": "A", "b": "B"}
            ],
            "statement": {"kind": "equal", "lhs": "(R A M A B)", "rhs": "(/ 1 2)"}
        }"#;
        let spec: TheoremSpec = serde_json::from_str(json).unwrap();
        let theorem = spec.to_theorem().unwrap();
        assert!(matches!(theorem.statement(), Statement::Equal(_, _)));
    }

    #[test]
    fn unknown_label() {
        let spec = TheoremSpec {
            name: "broken".to_owned(),
            steps: vec![
                StepSpec::Free {
                    label: "A".to_owned(),
                },
                StepSpec::Midpoint {
                    label: "M".to_owned(),
                    a: "A".to_owned(),
                    b: "Z".to_owned(),
                },
            ],
            statement: StatementSpec::Collinear {
                points: ["A".to_owned(), "M".to_owned(), "M".to_owned()],
            },
        };
        assert!(matches!(spec.to_theorem(), Err(AreaError::UnknownPoint(l)) if l == "Z"));

        let spec = TheoremSpec {
            steps: vec![StepSpec::Free {
                label: "A".to_owned(),
            }],
            statement: StatementSpec::Equal {
                lhs: "(S A A Q)".to_owned(),
                rhs: "0".to_owned(),
            },
            ..spec
        };
        assert!(matches!(
            spec.to_theorem(),
            Err(AreaError::Parse(ParseError::Label(l))) if l == "Q"
        ));
    }
}
