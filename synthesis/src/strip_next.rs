use logic::{to_string, Formula, FormulaId, LogicError, Store};

use crate::error::SynthesisError;

/// Consumes one step of an XNF formula whose propositions are already
/// decided: `X[!] f` becomes `f & not_end`, `X f` becomes `f | end`,
/// `not_end` becomes `tt` and `end` becomes `ff`.
pub fn strip_next(store: &mut Store, formula: FormulaId) -> Result<FormulaId, SynthesisError> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || step(store, formula))
}

fn step(store: &mut Store, formula: FormulaId) -> Result<FormulaId, SynthesisError> {
    let node = store.get(formula).clone();
    match node {
        Formula::True | Formula::False | Formula::Atom(_) | Formula::PropNot(_) => Ok(formula),
        // the step exists, so a bare `true` is met and `false` is not
        Formula::PropTrue => Ok(store.make_tt()),
        Formula::PropFalse => Ok(store.make_ff()),
        Formula::Next(arg) => {
            let not_end = store.make_not_end();
            Ok(store.make_and(vec![arg, not_end]))
        }
        Formula::WeakNext(arg) => {
            let end = store.make_end();
            Ok(store.make_or(vec![arg, end]))
        }
        Formula::And(args) => {
            let args = strip_all(store, &args)?;
            Ok(store.make_and(args))
        }
        Formula::Or(args) => {
            let args = strip_all(store, &args)?;
            Ok(store.make_or(args))
        }
        Formula::Eventually(_) if store.is_not_end(formula) => Ok(store.make_tt()),
        Formula::Always(_) if store.is_end(formula) => Ok(store.make_ff()),
        Formula::Until(_) | Formula::Release(_) | Formula::Eventually(_) | Formula::Always(_) => {
            Err(LogicError::ExpectedXnf(to_string(store, formula)).into())
        }
        Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
            Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
        }
    }
}

fn strip_all(store: &mut Store, args: &[FormulaId]) -> Result<Vec<FormulaId>, SynthesisError> {
    args.iter().map(|arg| strip_next(store, *arg)).collect()
}
