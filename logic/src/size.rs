use crate::definitions::{Formula, FormulaId};
use crate::error::LogicError;
use crate::print::to_string;
use crate::store::Store;

/// Number of nodes of an NNF formula, counting shared subformulas once per
/// occurrence.
pub fn size(store: &Store, formula: FormulaId) -> Result<usize, LogicError> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        let node = store.get(formula);
        match node {
            Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
                Err(LogicError::ExpectedNnf(to_string(store, formula)))
            }
            _ => node
                .children()
                .iter()
                .try_fold(1, |acc, child| Ok(acc + size(store, *child)?)),
        }
    })
}
