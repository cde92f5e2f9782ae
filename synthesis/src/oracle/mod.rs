//! One-step decision procedures consulted before case splitting.
//!
//! Both oracles only look at what can be decided in the current step, so an
//! `Unknown` answer is normal and sends the search on to the case split.
use logic::{FormulaId, Store};

use crate::error::SynthesisError;
use crate::strategy::Assignment;

mod bdd;
#[cfg(feature = "smt")]
mod smt;

pub use self::bdd::{BddRealizability, BddUnrealizability};
#[cfg(feature = "smt")]
pub use self::smt::SmtRealizability;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleOutcome {
    /// The system wins in one step, optionally with the output values that
    /// do it.
    Winning(Option<Assignment>),
    /// The system cannot win from here.
    Losing,
    Unknown,
}

/// Which engine decides one-step realizability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OracleBackend {
    #[default]
    Bdd,
    /// Quantified z3 queries; needs the `smt` feature.
    Smt,
}

pub trait OneStepOracle {
    fn check(&mut self, store: &mut Store, formula: FormulaId) -> Result<OracleOutcome, SynthesisError>;
}
