use thiserror::Error;

use crate::expr::ParseError;

#[derive(Error, Debug)]
pub enum AreaError {
    #[error("Could not decide the auxiliary statement: {0}")]
    UnknownStatement(String),
    #[error("Division by zero in {0}")]
    DivisionByZero(String),
    #[error("Malformed expression: {0}")]
    MalformedExpression(String),
    #[error("Nested oracle depth {depth} exceeds the budget of {limit}")]
    RecursionBudgetExceeded { depth: usize, limit: usize },
    #[error("Expression grew to {size} nodes, above the limit of {limit}")]
    ExpressionTooLarge { size: usize, limit: usize },
    #[error("More than {0} eliminations needed")]
    EliminationLimit(usize),
    #[error("Unknown point: {0}")]
    UnknownPoint(String),
    #[error("Point label already taken: {0}")]
    DuplicatePoint(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Degenerate numeric configuration: {0}")]
    NumericDegenerate(String),
    #[error("IO Error during file loading")]
    Io(#[from] std::io::Error),
    #[error("Error during JSON parsing")]
    Json(#[from] serde_json::Error),
}

impl AreaError {
    /// Resource-limit failures are the only ones worth re-running with a
    /// larger budget.
    #[must_use]
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            AreaError::RecursionBudgetExceeded { .. }
                | AreaError::ExpressionTooLarge { .. }
                | AreaError::EliminationLimit(_)
        )
    }
}
