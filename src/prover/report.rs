use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::eliminate::LemmaUsage;

/// A proof attempt has 3 outcomes:
/// the statement holds, it does not,
/// or a case split could not be settled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Proved,
    Disproved,
    Inconclusive,
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Proved => write!(f, "proved"),
            Verdict::Disproved => write!(f, "disproved"),
            Verdict::Inconclusive => write!(f, "inconclusive"),
        }
    }
}

/// One point elimination of a proof.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EliminationStep {
    /// Label of the eliminated point
    pub point: String,
    /// Size of the expression after the step
    pub size: usize,
}

/// Stats about a proof attempt.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProofReport {
    /// Name of the theorem
    pub name: String,
    /// The statement in its printed form
    pub statement: String,
    pub verdict: Verdict,
    /// Why the proof is inconclusive
    pub reason: Option<String>,
    pub steps: Vec<EliminationStep>,
    pub lemma_usage: LemmaUsage,
    /// Denominators that must not vanish
    pub ndg_conditions: Vec<String>,
    /// Terms left in the final numerator, zero for a proof
    pub numerator_terms: usize,
    /// Value of the statement at random coordinates
    pub numeric_value: Option<f64>,
}

impl ProofReport {
    /// Report for a proof that stopped at an undecidable case split.
    #[must_use]
    pub fn inconclusive(name: String, statement: String, reason: String) -> Self {
        ProofReport {
            name,
            statement,
            verdict: Verdict::Inconclusive,
            reason: Some(reason),
            steps: Vec::new(),
            lemma_usage: LemmaUsage::new(),
            ndg_conditions: Vec::new(),
            numerator_terms: 0,
            numeric_value: None,
        }
    }
}

impl Display for ProofReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {}", self.name, self.verdict)?;
        writeln!(f, "  statement: {}", self.statement)?;
        if let Some(reason) = &self.reason {
            writeln!(f, "  reason: {reason}")?;
        }
        for step in &self.steps {
            writeln!(f, "  eliminated {} (size {})", step.point, step.size)?;
        }
        for ndg in &self.ndg_conditions {
            writeln!(f, "  ndg: {ndg} != 0")?;
        }
        write!(f, "  lemmas used: {}", self.lemma_usage.total())
    }
}
