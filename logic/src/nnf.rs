use std::collections::HashMap;

use crate::definitions::{Formula, FormulaId};
use crate::store::Store;

/// Rewrites `formula` into negation normal form.
///
/// The result contains no `Not`, `Implies`, `Equivalent` or `Xor` node;
/// negation survives only as `PropNot` on atoms. Negating an atom also allows
/// the trace to end (`~a` is `!a | end`).
pub fn to_nnf(store: &mut Store, formula: FormulaId) -> FormulaId {
    let mut rewriter = NnfRewriter::default();
    rewriter.apply(store, formula, false)
}

#[derive(Default)]
struct NnfRewriter {
    cache: HashMap<(FormulaId, bool), FormulaId>,
}

impl NnfRewriter {
    fn apply(&mut self, store: &mut Store, formula: FormulaId, negated: bool) -> FormulaId {
        if let Some(result) = self.cache.get(&(formula, negated)) {
            return *result;
        }
        let result = stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
            self.rewrite(store, formula, negated)
        });
        self.cache.insert((formula, negated), result);
        result
    }

    fn apply_all(&mut self, store: &mut Store, args: &[FormulaId], negated: bool) -> Vec<FormulaId> {
        args.iter().map(|arg| self.apply(store, *arg, negated)).collect()
    }

    fn rewrite(&mut self, store: &mut Store, formula: FormulaId, negated: bool) -> FormulaId {
        let node = store.get(formula).clone();
        match node {
            Formula::True if negated => store.make_ff(),
            Formula::False if negated => store.make_tt(),
            Formula::PropTrue if negated => store.make_end(),
            Formula::PropFalse if negated => store.make_tt(),
            Formula::True | Formula::False | Formula::PropTrue | Formula::PropFalse => formula,
            Formula::Atom(_) if negated => {
                let prop_not = store.make_prop_not(formula);
                let end = store.make_end();
                store.make_or(vec![prop_not, end])
            }
            Formula::PropNot(atom) if negated => {
                let end = store.make_end();
                store.make_or(vec![atom, end])
            }
            Formula::Atom(_) | Formula::PropNot(_) => formula,
            Formula::Not(arg) => self.apply(store, arg, !negated),
            Formula::And(args) => {
                let args = self.apply_all(store, &args, negated);
                if negated { store.make_or(args) } else { store.make_and(args) }
            }
            Formula::Or(args) => {
                let args = self.apply_all(store, &args, negated);
                if negated { store.make_and(args) } else { store.make_or(args) }
            }
            Formula::Implies(args) => {
                // a -> b -> c  ==  ~a | ~b | c
                let Some((last, premises)) = args.split_last() else {
                    return if negated { store.make_ff() } else { store.make_tt() };
                };
                let mut items = self.apply_all(store, premises, !negated);
                items.push(self.apply(store, *last, negated));
                if negated { store.make_and(items) } else { store.make_or(items) }
            }
            Formula::Equivalent(args) => {
                let positive = self.apply_all(store, &args, false);
                let negative = self.apply_all(store, &args, true);
                if negated {
                    let some_false = store.make_or(negative);
                    let some_true = store.make_or(positive);
                    store.make_and(vec![some_false, some_true])
                } else {
                    let all_true = store.make_and(positive);
                    let all_false = store.make_and(negative);
                    store.make_or(vec![all_true, all_false])
                }
            }
            Formula::Xor(args) => {
                let positive = self.apply_all(store, &args, false);
                let negative = self.apply_all(store, &args, true);
                if negated {
                    let all_true = store.make_and(positive);
                    let all_false = store.make_and(negative);
                    store.make_or(vec![all_true, all_false])
                } else {
                    let some_true = store.make_or(positive);
                    let some_false = store.make_or(negative);
                    store.make_and(vec![some_true, some_false])
                }
            }
            Formula::Next(arg) => {
                let arg = self.apply(store, arg, negated);
                if negated { store.make_weak_next(arg) } else { store.make_next(arg) }
            }
            Formula::WeakNext(arg) => {
                let arg = self.apply(store, arg, negated);
                if negated { store.make_next(arg) } else { store.make_weak_next(arg) }
            }
            Formula::Until(args) => {
                let args = self.apply_all(store, &args, negated);
                if negated { store.make_release(args) } else { store.make_until(args) }
            }
            Formula::Release(args) => {
                let args = self.apply_all(store, &args, negated);
                if negated { store.make_until(args) } else { store.make_release(args) }
            }
            Formula::Eventually(arg) => {
                let arg = self.apply(store, arg, negated);
                if negated { store.make_always(arg) } else { store.make_eventually(arg) }
            }
            Formula::Always(arg) => {
                let arg = self.apply(store, arg, negated);
                if negated { store.make_eventually(arg) } else { store.make_always(arg) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_nnf(store: &Store, formula: FormulaId) -> bool {
        match store.get(formula) {
            Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => false,
            node => node.children().iter().all(|child| is_nnf(store, *child)),
        }
    }

    #[test]
    fn test_negated_constants() {
        let mut store = Store::new();
        let tt = store.make_tt();
        let ff = store.make_ff();
        let prop_true = store.make_prop_true();
        let prop_false = store.make_prop_false();
        let end = store.make_end();

        let not_tt = store.make_not(tt);
        assert_eq!(to_nnf(&mut store, not_tt), ff);
        let not_prop_true = store.make_not(prop_true);
        assert_eq!(to_nnf(&mut store, not_prop_true), end);
        let not_prop_false = store.make_not(prop_false);
        assert_eq!(to_nnf(&mut store, not_prop_false), tt);
    }

    #[test]
    fn test_negated_atoms() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let end = store.make_end();
        let not_a = store.make_not(a);
        let nnf = to_nnf(&mut store, not_a);
        let prop_not = store.make_prop_not(a);
        assert_eq!(nnf, store.make_or(vec![prop_not, end]));

        let negated_prop_not = store.make_not(prop_not);
        let nnf = to_nnf(&mut store, negated_prop_not);
        assert_eq!(nnf, store.make_or(vec![a, end]));
    }

    #[test]
    fn test_dualities() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let not_a = store.make_not(a);
        let not_b = store.make_not(b);
        let nnf_not_a = to_nnf(&mut store, not_a);
        let nnf_not_b = to_nnf(&mut store, not_b);

        let until = store.make_until(vec![a, b]);
        let not_until = store.make_not(until);
        let expected = store.make_release(vec![nnf_not_a, nnf_not_b]);
        assert_eq!(to_nnf(&mut store, not_until), expected);

        let next = store.make_next(a);
        let not_next = store.make_not(next);
        let expected = store.make_weak_next(nnf_not_a);
        assert_eq!(to_nnf(&mut store, not_next), expected);

        let eventually = store.make_eventually(a);
        let not_eventually = store.make_not(eventually);
        let expected = store.make_always(nnf_not_a);
        assert_eq!(to_nnf(&mut store, not_eventually), expected);

        let not_end = store.make_not_end();
        let end = store.make_end();
        let negated = store.make_not(not_end);
        assert_eq!(to_nnf(&mut store, negated), end);
    }

    #[test]
    fn test_boolean_connectives() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let not_a = store.make_not(a);
        let nnf_not_a = to_nnf(&mut store, not_a);

        let implies = store.make_implies(vec![a, b]);
        let expected = store.make_or(vec![nnf_not_a, b]);
        assert_eq!(to_nnf(&mut store, implies), expected);

        let iff = store.make_equivalent(vec![a, b]);
        let xor = store.make_xor(vec![a, b]);
        let iff_nnf = to_nnf(&mut store, iff);
        let xor_nnf = to_nnf(&mut store, xor);
        assert!(is_nnf(&store, iff_nnf));
        assert!(is_nnf(&store, xor_nnf));
        let not_xor = store.make_not(xor);
        assert_eq!(to_nnf(&mut store, not_xor), iff_nnf);
    }

    #[test]
    fn test_idempotence() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let f = store.make_eventually(b);
        let implies = store.make_implies(vec![a, f]);
        let g = store.make_always(implies);
        let formula = store.make_not(g);
        let once = to_nnf(&mut store, formula);
        let twice = to_nnf(&mut store, once);
        assert_eq!(once, twice);
        assert!(is_nnf(&store, once));
    }
}
