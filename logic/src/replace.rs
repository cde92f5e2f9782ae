use std::collections::HashMap;

use crate::definitions::{Pl, PlId, PlSymbol};
use crate::store::Store;

/// Substitutes truth values for literals: a literal on `symbol` becomes
/// `value != negated`. Literals not in `replacements` are kept.
pub fn replace(store: &mut Store, replacements: &HashMap<PlSymbol, bool>, formula: PlId) -> PlId {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || substitute(store, replacements, formula))
}

fn substitute(store: &mut Store, replacements: &HashMap<PlSymbol, bool>, formula: PlId) -> PlId {
    let node = store.get_pl(formula).clone();
    match node {
        Pl::True | Pl::False => formula,
        Pl::Literal { symbol, negated } => match replacements.get(&symbol) {
            Some(value) if *value != negated => store.make_pl_true(),
            Some(_) => store.make_pl_false(),
            None => formula,
        },
        Pl::And(args) => {
            let args = args.iter().map(|arg| replace(store, replacements, *arg)).collect();
            store.make_pl_and(args)
        }
        Pl::Or(args) => {
            let args = args.iter().map(|arg| replace(store, replacements, *arg)).collect();
            store.make_pl_or(args)
        }
    }
}
