use logic::{to_string, Formula, FormulaId, LogicError, PlId, PlSymbol, Store};

use crate::error::SynthesisError;

/// Propositional view of an XNF formula for the current step.
///
/// Atoms and their negations become literals over proposition names. Next-step
/// obligations, `true`, and the trace-end sentinels become opaque literals that
/// are carried through case splitting untouched.
pub fn to_pl(store: &mut Store, formula: FormulaId) -> Result<PlId, SynthesisError> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || project(store, formula))
}

fn project(store: &mut Store, formula: FormulaId) -> Result<PlId, SynthesisError> {
    let node = store.get(formula).clone();
    match node {
        Formula::True => Ok(store.make_pl_true()),
        Formula::False | Formula::PropFalse => Ok(store.make_pl_false()),
        Formula::Atom(name) => Ok(store.make_literal(PlSymbol::Name(name), false)),
        Formula::PropNot(atom) => match store.get(atom) {
            Formula::Atom(name) => {
                let name = name.clone();
                Ok(store.make_literal(PlSymbol::Name(name), true))
            }
            _ => Err(SynthesisError::Invariant(format!(
                "propositional negation of a non-atom: {}",
                to_string(store, formula)
            ))),
        },
        Formula::PropTrue | Formula::Next(_) | Formula::WeakNext(_) => {
            Ok(store.make_literal(PlSymbol::Formula(formula), false))
        }
        Formula::And(args) => {
            let args = args.iter().map(|arg| to_pl(store, *arg)).collect::<Result<_, _>>()?;
            Ok(store.make_pl_and(args))
        }
        Formula::Or(args) => {
            let args = args.iter().map(|arg| to_pl(store, *arg)).collect::<Result<_, _>>()?;
            Ok(store.make_pl_or(args))
        }
        Formula::Eventually(_) | Formula::Always(_)
            if store.is_not_end(formula) || store.is_end(formula) =>
        {
            Ok(store.make_literal(PlSymbol::Formula(formula), false))
        }
        Formula::Until(_) | Formula::Release(_) | Formula::Eventually(_) | Formula::Always(_) => {
            Err(LogicError::ExpectedXnf(to_string(store, formula)).into())
        }
        Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
            Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
        }
    }
}
