use bon::Builder;
use serde::{Deserialize, Serialize};

/// Limits and switches of a proof attempt
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
pub struct ProverConf {
    /// How deep the decision oracle may nest proofs
    #[builder(default = 3)]
    pub max_oracle_depth: usize,
    /// Node count above which a proof is abandoned
    #[builder(default = 250_000)]
    pub max_expression_size: usize,
    #[builder(default = 64)]
    pub max_eliminations: usize,
    /// Cross-check the verdict with random coordinates
    #[builder(default = true)]
    pub numeric_check: bool,
    #[builder(default = 2024)]
    pub rng_seed: u64,
    #[builder(default = 1e-6)]
    pub numeric_tolerance: f64,
}

impl Default for ProverConf {
    fn default() -> Self {
        Self::builder().build()
    }
}
