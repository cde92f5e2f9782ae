use logic::{pl_to_string, FormulaId, Pl, PlId, PlSymbol, Store};

use crate::error::SynthesisError;

/// Lifts a propositional view back to LTLf. Inverse of [`crate::to_pl`].
pub fn to_ltlf(store: &mut Store, formula: PlId) -> Result<FormulaId, SynthesisError> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || lift(store, formula))
}

fn lift(store: &mut Store, formula: PlId) -> Result<FormulaId, SynthesisError> {
    let node = store.get_pl(formula).clone();
    match node {
        Pl::True => Ok(store.make_tt()),
        Pl::False => Ok(store.make_ff()),
        Pl::Literal { symbol: PlSymbol::Name(name), negated } => {
            let atom = store.make_atom(&name);
            if negated {
                Ok(store.make_prop_not(atom))
            } else {
                Ok(atom)
            }
        }
        Pl::Literal { symbol: PlSymbol::Formula(inner), negated: false } => Ok(inner),
        Pl::Literal { symbol: PlSymbol::Formula(_), negated: true } => Err(SynthesisError::Invariant(
            format!("negated next-step literal {}", pl_to_string(store, formula)),
        )),
        Pl::And(args) => {
            let args = args.iter().map(|arg| to_ltlf(store, *arg)).collect::<Result<_, _>>()?;
            Ok(store.make_and(args))
        }
        Pl::Or(args) => {
            let args = args.iter().map(|arg| to_ltlf(store, *arg)).collect::<Result<_, _>>()?;
            Ok(store.make_or(args))
        }
    }
}
