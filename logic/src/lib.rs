//! Hash-consed LTLf and propositional formulas.
//!
//! Every formula lives in a [`Store`] and is addressed by a copyable
//! [`FormulaId`] (or [`PlId`] for the propositional view). Two handles from the
//! same store are equal exactly when the formulas are structurally equal.
mod definitions;
mod error;
mod store;
mod eval;
mod nnf;
mod print;
mod copy;
mod size;
mod atoms;
mod replace;

pub use definitions::*;
pub use error::LogicError;
pub use store::Store;
pub use eval::eval;
pub use nnf::to_nnf;
pub use print::{pl_to_string, to_string};
pub use copy::copy;
pub use size::size;
pub use atoms::{find_atoms, find_pl_atoms};
pub use replace::replace;
