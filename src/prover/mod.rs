mod conf;
mod report;

use log::{debug, info, warn};

use crate::eliminate::Eliminator;
use crate::errors::AreaError;
use crate::expr::Expression;
use crate::figure::Figure;
use crate::independent::ReferenceFrame;
use crate::numeric::NumericModel;
use crate::oracle::{DecisionOracle, ProverOracle};
use crate::statement::Statement;
use crate::uniformize::CollinearMemo;

pub use conf::ProverConf;
pub use report::{EliminationStep, ProofReport, Verdict};

/// A statement about the points of a figure.
#[derive(Debug, Clone)]
pub struct Theorem {
    name: String,
    figure: Figure,
    statement: Statement,
}

impl Theorem {
    #[must_use]
    pub fn new(name: impl Into<String>, figure: Figure, statement: Statement) -> Self {
        Theorem {
            name: name.into(),
            figure,
            statement,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn figure(&self) -> &Figure {
        &self.figure
    }

    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

/// Area-method prover
#[derive(Debug, Clone, Default)]
pub struct Prover {
    conf: ProverConf,
}

impl Prover {
    #[must_use]
    pub fn new(conf: ProverConf) -> Self {
        Prover { conf }
    }

    #[must_use]
    pub fn conf(&self) -> &ProverConf {
        &self.conf
    }

    /// Prove with a [`ProverOracle`] for the case splits.
    ///
    /// # Errors
    /// See [`Prover::prove_with_oracle`].
    pub fn prove(&self, theorem: &Theorem) -> Result<ProofReport, AreaError> {
        let mut oracle = ProverOracle::new(self.conf.clone());
        let mut report = self.prove_with_oracle(theorem, &mut oracle)?;
        report.lemma_usage.merge(oracle.usage());
        Ok(report)
    }

    /// Eliminate every constructed point, reduce to the reference frame and
    /// decide whether the numerator vanishes.
    ///
    /// # Errors
    /// - [`AreaError::UnknownStatement`] if a case split cannot be settled
    /// - [`AreaError::DivisionByZero`] for a vanishing denominator
    /// - [`AreaError::ExpressionTooLarge`], [`AreaError::EliminationLimit`]
    ///   and [`AreaError::RecursionBudgetExceeded`] when a limit is hit
    pub fn prove_with_oracle<O>(
        &self,
        theorem: &Theorem,
        oracle: &mut O,
    ) -> Result<ProofReport, AreaError>
    where
        O: DecisionOracle + ?Sized,
    {
        info!("Proving {}: {}", theorem.name, theorem.statement);
        let zero_expression = theorem.statement.zero_expression();
        let mut current = zero_expression.uniformize(&CollinearMemo::new()).simplify()?;
        self.check_size(&current)?;

        let mut eliminator = Eliminator::new(oracle);
        let mut steps = Vec::new();
        for point in theorem.figure.constructed_points_rev() {
            if !current.contains_point(point) {
                continue;
            }
            if steps.len() >= self.conf.max_eliminations {
                return Err(AreaError::EliminationLimit(self.conf.max_eliminations));
            }
            current = eliminator.eliminate(&current, point)?;
            let size = current.size();
            debug!("After eliminating {point}: {current}");
            info!("Eliminated {point}, expression size {size}");
            self.check_size(&current)?;
            steps.push(EliminationStep {
                point: point.label().to_owned(),
                size,
            });
        }

        let frame = ReferenceFrame::new();
        let reduced = current
            .uniformize(eliminator.known_collinear())
            .simplify()?;
        let independent = eliminator
            .to_independent_variables(&reduced, &frame)?
            .uniformize(&CollinearMemo::new());
        self.check_size(&independent)?;
        let single = independent.reduce_to_single_fraction()?;
        let (numerator, denominator) = single.numerator_denominator();
        let numerator = numerator.to_sum_of_products()?;
        let denominator = denominator.to_sum_of_products()?;
        if denominator.is_zero() {
            return Err(AreaError::DivisionByZero(single.to_string()));
        }
        debug!("Final numerator: {}", numerator.normalized());

        let verdict = if numerator.is_zero() {
            Verdict::Proved
        } else {
            Verdict::Disproved
        };
        info!("{}: {verdict}", theorem.name);

        let numeric_value = if self.conf.numeric_check {
            self.numeric_check(theorem, &zero_expression, verdict)
        } else {
            None
        };

        Ok(ProofReport {
            name: theorem.name.clone(),
            statement: theorem.statement.to_string(),
            verdict,
            reason: None,
            steps,
            lemma_usage: *eliminator.usage(),
            ndg_conditions: eliminator.ndg_conditions().map(ToString::to_string).collect(),
            numerator_terms: numerator.term_count(),
            numeric_value,
        })
    }

    fn check_size(&self, e: &Expression) -> Result<(), AreaError> {
        let size = e.size();
        if size > self.conf.max_expression_size {
            return Err(AreaError::ExpressionTooLarge {
                size,
                limit: self.conf.max_expression_size,
            });
        }
        Ok(())
    }

    /// Evaluate the statement at random coordinates. Disagreement with the
    /// verdict is only logged.
    fn numeric_check(
        &self,
        theorem: &Theorem,
        zero_expression: &Expression,
        verdict: Verdict,
    ) -> Option<f64> {
        let value = NumericModel::random(&theorem.figure, self.conf.rng_seed)
            .and_then(|model| zero_expression.test_value(&model));
        match value {
            Ok(value) => {
                let vanishes = value.abs() <= self.conf.numeric_tolerance;
                if vanishes != (verdict == Verdict::Proved) {
                    warn!(
                        "Numeric check disagrees for {}: verdict {verdict}, value {value:e}",
                        theorem.name
                    );
                }
                Some(value)
            }
            Err(e) => {
                warn!("Numeric check skipped for {}: {e}", theorem.name);
                None
            }
        }
    }
}
