use thiserror::Error;

/// A rewrite was handed a formula outside its normal-form precondition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LogicError {
    #[error("expected a formula in negation normal form, found `{0}`")]
    ExpectedNnf(String),
    #[error("expected a formula in next normal form, found `{0}`")]
    ExpectedXnf(String),
}
