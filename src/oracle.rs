use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::eliminate::LemmaUsage;
use crate::errors::AreaError;
use crate::figure::Figure;
use crate::prover::{Prover, ProverConf, Theorem, Verdict};
use crate::statement::Statement;
use crate::HashMap;

/// Answer of a [`DecisionOracle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    True,
    False,
    Unknown,
}

/// Decides auxiliary statements the eliminator needs for its case splits.
pub trait DecisionOracle {
    /// # Errors
    /// Resource-limit failures of the oracle itself; an undecidable statement
    /// is `Ok(Decision::Unknown)`, not an error.
    fn decide(&mut self, statement: &Statement) -> Result<Decision, AreaError>;
}

impl<F> DecisionOracle for F
where
    F: FnMut(&Statement) -> Result<Decision, AreaError>,
{
    fn decide(&mut self, statement: &Statement) -> Result<Decision, AreaError> {
        self(statement)
    }
}

/// Decides statements by running the prover itself on the minimal figure
/// that contains the statement's points.
#[derive(Debug, Clone)]
pub struct ProverOracle {
    conf: ProverConf,
    depth: usize,
    memo: HashMap<String, Decision>,
    usage: LemmaUsage,
}

impl ProverOracle {
    #[must_use]
    pub fn new(conf: ProverConf) -> Self {
        Self::nested(conf, 0)
    }

    fn nested(conf: ProverConf, depth: usize) -> Self {
        ProverOracle {
            conf,
            depth,
            memo: HashMap::new(),
            usage: LemmaUsage::new(),
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Lemmas fired by all sub-proofs run so far, at any depth
    #[must_use]
    pub fn usage(&self) -> &LemmaUsage {
        &self.usage
    }

    /// Number of memoised decisions
    #[must_use]
    pub fn memo_len(&self) -> usize {
        self.memo.len()
    }
}

impl DecisionOracle for ProverOracle {
    fn decide(&mut self, statement: &Statement) -> Result<Decision, AreaError> {
        let key = statement.key();
        if let Some(decision) = self.memo.get(&key) {
            debug!("Oracle memo hit for {statement}: {decision:?}");
            return Ok(*decision);
        }
        if self.depth >= self.conf.max_oracle_depth {
            return Err(AreaError::RecursionBudgetExceeded {
                depth: self.depth + 1,
                limit: self.conf.max_oracle_depth,
            });
        }

        info!("Oracle at depth {} deciding {statement}", self.depth);
        let points = statement.points();
        let theorem = Theorem::new(
            format!("oracle: {statement}"),
            Figure::closure(&points),
            statement.clone(),
        );
        let conf = ProverConf {
            numeric_check: false,
            ..self.conf.clone()
        };
        let mut nested = Self::nested(conf.clone(), self.depth + 1);
        nested.memo = std::mem::take(&mut self.memo);
        let outcome = Prover::new(conf).prove_with_oracle(&theorem, &mut nested);
        self.usage.merge(&nested.usage);
        self.memo = nested.memo;

        let decision = match outcome {
            Ok(report) => {
                self.usage.merge(&report.lemma_usage);
                match report.verdict {
                    Verdict::Proved => Decision::True,
                    Verdict::Disproved => Decision::False,
                    Verdict::Inconclusive => Decision::Unknown,
                }
            }
            Err(AreaError::UnknownStatement(_) | AreaError::DivisionByZero(_)) => Decision::Unknown,
            Err(e) => return Err(e),
        };
        debug!("Oracle decided {statement}: {decision:?}");
        self.memo.insert(key, decision);
        Ok(decision)
    }
}
