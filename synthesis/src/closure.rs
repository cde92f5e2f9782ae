use std::collections::BTreeSet;

use indexmap::IndexSet;
use logic::{Formula, FormulaId, Store};

use crate::error::SynthesisError;
use crate::xnf::{is_xnf_leaf, XnfRewriter};

/// The XNF leaves that can occur in any state reachable from a root formula,
/// each with a stable index.
///
/// Every state the search visits is an and/or combination of these leaves,
/// so the index doubles as a BDD variable in the symbolic state encoding.
#[derive(Debug, Clone, Default)]
pub struct Closure {
    leaves: IndexSet<FormulaId>,
    atoms: BTreeSet<String>,
}

impl Closure {
    /// Builds the closure of an XNF formula.
    ///
    /// Collects the leaves of `root`, then repeatedly unrolls the argument of
    /// every next-step leaf into XNF and collects its leaves too, until no new
    /// argument turns up.
    pub fn new(store: &mut Store, xnf: &mut XnfRewriter, root: FormulaId) -> Result<Closure, SynthesisError> {
        let mut closure = Closure::default();
        let end = store.make_end();
        let not_end = store.make_not_end();
        closure.leaves.insert(end);
        closure.leaves.insert(not_end);

        let mut expanded = IndexSet::new();
        let mut pending = vec![root];
        while let Some(state) = pending.pop() {
            let mut stack = vec![state];
            while let Some(current) = stack.pop() {
                if is_xnf_leaf(store, current) {
                    if !closure.leaves.insert(current) {
                        continue;
                    }
                    match store.get(current).clone() {
                        Formula::Next(arg) | Formula::WeakNext(arg) => {
                            if expanded.insert(arg) {
                                pending.push(xnf.apply(store, arg)?);
                            }
                        }
                        Formula::Atom(name) => {
                            closure.atoms.insert(name);
                        }
                        Formula::PropNot(atom) => {
                            if let Formula::Atom(name) = store.get(atom) {
                                closure.atoms.insert(name.clone());
                            }
                        }
                        _ => {}
                    }
                } else {
                    match store.get(current) {
                        Formula::And(args) | Formula::Or(args) => stack.extend(args.iter().copied()),
                        _ => {
                            return Err(SynthesisError::Invariant(format!(
                                "closure of a formula not in next normal form: {}",
                                logic::to_string(store, current)
                            )))
                        }
                    }
                }
            }
        }
        Ok(closure)
    }

    pub fn get_id(&self, formula: FormulaId) -> Option<usize> {
        self.leaves.get_index_of(&formula)
    }

    pub fn get_formula(&self, index: usize) -> Option<FormulaId> {
        self.leaves.get_index(index).copied()
    }

    /// Number of leaves, atoms included.
    pub fn nb_formulas(&self) -> usize {
        self.leaves.len()
    }

    /// Number of distinct proposition names among the leaves.
    pub fn nb_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &BTreeSet<String> {
        &self.atoms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_of_until() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let until = store.make_until(vec![a, b]);
        let mut rewriter = XnfRewriter::new();
        let root = rewriter.apply(&mut store, until).unwrap();
        let closure = Closure::new(&mut store, &mut rewriter, root).unwrap();

        let next = store.make_next(until);
        assert!(closure.get_id(a).is_some());
        assert!(closure.get_id(b).is_some());
        assert!(closure.get_id(next).is_some());
        // a, b, X[!](a U b), end, not_end
        assert_eq!(closure.nb_formulas(), 5);
        assert_eq!(closure.nb_atoms(), 2);
        let id = closure.get_id(next).unwrap();
        assert_eq!(closure.get_formula(id), Some(next));
    }

    #[test]
    fn test_closure_follows_next_arguments() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let f = store.make_eventually(b);
        let inner = store.make_next(f);
        let outer = store.make_weak_next(inner);
        let root = store.make_and(vec![a, outer]);
        let mut rewriter = XnfRewriter::new();
        let closure = Closure::new(&mut store, &mut rewriter, root).unwrap();
        let next_f = store.make_next(f);
        assert!(closure.get_id(outer).is_some());
        assert!(closure.get_id(inner).is_some());
        assert!(closure.get_id(b).is_some());
        assert!(closure.get_id(next_f).is_some());
        assert_eq!(closure.atoms().iter().cloned().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
