pub mod reader;
pub mod structs;

pub use reader::{read_theorem_specs, read_theorems};
pub use structs::{StatementSpec, StepSpec, TheoremSpec};
