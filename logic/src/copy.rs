use std::collections::HashMap;

use crate::definitions::{Formula, FormulaId};
use crate::store::Store;

/// Re-creates `formula` from `source` inside `target` and returns its handle
/// there. Used to give each worker thread a private store.
pub fn copy(source: &Store, target: &mut Store, formula: FormulaId) -> FormulaId {
    let mut done = HashMap::new();
    copy_rec(source, target, formula, &mut done)
}

fn copy_rec(
    source: &Store,
    target: &mut Store,
    formula: FormulaId,
    done: &mut HashMap<FormulaId, FormulaId>,
) -> FormulaId {
    if let Some(copied) = done.get(&formula) {
        return *copied;
    }
    let result = stacker::maybe_grow(32 * 1024, 1024 * 1024, || {
        let node = source.get(formula);
        let args: Vec<FormulaId> = node
            .children()
            .iter()
            .map(|child| copy_rec(source, target, *child, done))
            .collect();
        // children already canonical in the target, intern without re-simplifying
        let copied = match node {
            Formula::True => Formula::True,
            Formula::False => Formula::False,
            Formula::PropTrue => Formula::PropTrue,
            Formula::PropFalse => Formula::PropFalse,
            Formula::Atom(name) => Formula::Atom(name.clone()),
            Formula::Not(_) => Formula::Not(args[0]),
            Formula::PropNot(_) => Formula::PropNot(args[0]),
            Formula::Next(_) => Formula::Next(args[0]),
            Formula::WeakNext(_) => Formula::WeakNext(args[0]),
            Formula::Eventually(_) => Formula::Eventually(args[0]),
            Formula::Always(_) => Formula::Always(args[0]),
            Formula::And(_) => return target.make_and(args),
            Formula::Or(_) => return target.make_or(args),
            Formula::Implies(_) => Formula::Implies(args),
            Formula::Equivalent(_) => return target.make_equivalent(args),
            Formula::Xor(_) => return target.make_xor(args),
            Formula::Until(_) => Formula::Until(args),
            Formula::Release(_) => Formula::Release(args),
        };
        target.intern(copied)
    });
    done.insert(formula, result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_preserves_structure() {
        let mut source = Store::new();
        let a = source.make_atom("a");
        let b = source.make_atom("b");
        let until = source.make_until(vec![a, b]);
        let g = source.make_always(until);
        let not_end = source.make_not_end();
        let formula = source.make_and(vec![g, not_end]);

        let mut target = Store::new();
        // shift handles in the target so ids differ from the source
        target.make_atom("z");
        let copied = copy(&source, &mut target, formula);
        assert_eq!(copy(&source, &mut target, formula), copied);
        let a_target = target.make_atom("a");
        let b_target = target.make_atom("b");
        let until_target = target.make_until(vec![a_target, b_target]);
        let g_target = target.make_always(until_target);
        let not_end_target = target.make_not_end();
        assert_eq!(target.make_and(vec![g_target, not_end_target]), copied);
    }
}
