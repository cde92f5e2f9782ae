use std::collections::BTreeSet;

use crate::definitions::{Formula, FormulaId, Pl, PlId, PlSymbol, Symbol};
use crate::store::Store;

/// Proposition names occurring in an LTLf formula.
pub fn find_atoms(store: &Store, formula: FormulaId) -> BTreeSet<Symbol> {
    let mut atoms = BTreeSet::new();
    let mut seen = BTreeSet::new();
    let mut stack = vec![formula];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        match store.get(current) {
            Formula::Atom(name) => {
                atoms.insert(name.clone());
            }
            node => stack.extend(node.children().iter().copied()),
        }
    }
    atoms
}

/// Proposition names occurring as plain literals of a propositional formula.
/// Opaque next-step literals are not looked into.
pub fn find_pl_atoms(store: &Store, formula: PlId) -> BTreeSet<Symbol> {
    let mut atoms = BTreeSet::new();
    let mut stack = vec![formula];
    while let Some(current) = stack.pop() {
        match store.get_pl(current) {
            Pl::Literal { symbol: PlSymbol::Name(name), .. } => {
                atoms.insert(name.clone());
            }
            Pl::And(args) | Pl::Or(args) => stack.extend(args.iter().copied()),
            _ => {}
        }
    }
    atoms
}
