use logic::LogicError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PartitionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed partition line: `{0}`")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error(transparent)]
    Logic(#[from] LogicError),
    #[error(transparent)]
    Partition(#[from] PartitionError),
    /// A state grew past the size budget of the identity-keyed mode.
    #[error("state of size {size} exceeds the budget of {budget}")]
    BudgetExceeded { size: usize, budget: usize },
    /// The stop callback asked the search to give up.
    #[error("search interrupted")]
    Interrupted,
    /// An internal invariant was violated. Never recovered.
    #[error("invariant violated: {0}")]
    Invariant(String),
    #[error("this build does not support {0}")]
    Unsupported(&'static str),
}
