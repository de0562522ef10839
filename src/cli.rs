use std::path::PathBuf;

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::prover::ProverConf;

#[derive(Parser, Serialize, Deserialize, Debug, Eq, PartialEq, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JSON file with a list of theorems
    #[arg(long)]
    file: PathBuf,

    /// How deep auxiliary proofs may nest
    #[arg(long)]
    oracle_depth: Option<usize>,

    /// Node limit for intermediate expressions
    #[arg(long)]
    max_size: Option<usize>,

    /// Maximal number of point eliminations per proof
    #[arg(long)]
    max_eliminations: Option<usize>,

    /// Skip the cross-check at random coordinates
    #[arg(long, default_value_t = false)]
    no_numeric_check: bool,

    /// RNG Seed for the numeric cross-check
    #[arg(long, default_value_t = 2024)]
    rng_seed: u64,

    /// Write the reports to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub fn file(&self) -> &PathBuf {
        &self.file
    }

    #[must_use]
    pub fn output(&self) -> Option<&PathBuf> {
        self.output.as_ref()
    }

    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Prover configuration with the limits given on the command line.
    #[must_use]
    pub fn prover_conf(&self) -> ProverConf {
        ProverConf::builder()
            .maybe_max_oracle_depth(self.oracle_depth)
            .maybe_max_expression_size(self.max_size)
            .maybe_max_eliminations(self.max_eliminations)
            .numeric_check(!self.no_numeric_check)
            .rng_seed(self.rng_seed)
            .build()
    }
}
