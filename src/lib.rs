#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::redundant_closure_for_method_calls,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod eliminate;
pub mod errors;
pub mod expr;
pub mod figure;
pub mod fraction;
pub mod independent;
pub mod io;
pub mod numeric;
pub mod oracle;
pub mod prover;
pub mod simplify;
pub mod statement;
pub mod uniformize;

pub use errors::AreaError;
pub use expr::{BigProduct, Expression, GeometricQuantity, SumOfProducts};
pub use figure::{Construction, Figure, Point};
pub use oracle::{Decision, DecisionOracle, ProverOracle};
pub use prover::{ProofReport, Prover, ProverConf, Theorem, Verdict};
pub use statement::Statement;

type HashMap<K, V> = hashbrown::HashMap<K, V>;
type HashSet<T> = hashbrown::HashSet<T>;
