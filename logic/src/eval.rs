use crate::definitions::{Formula, FormulaId};
use crate::store::Store;

/// Whether `formula` holds on the empty trace.
///
/// The value is computed once, when the node is interned.
pub fn eval(store: &Store, formula: FormulaId) -> bool {
    store.accepts_empty(formula)
}

/// Empty-trace semantics of a single node, given the value of its children.
pub(crate) fn node_accepts_empty(node: &Formula, child: impl Fn(FormulaId) -> bool) -> bool {
    match node {
        Formula::True
        | Formula::WeakNext(_)
        | Formula::Release(_)
        | Formula::Always(_) => true,
        Formula::False
        | Formula::PropTrue
        | Formula::PropFalse
        | Formula::Atom(_)
        | Formula::PropNot(_)
        | Formula::Next(_)
        | Formula::Until(_)
        | Formula::Eventually(_) => false,
        Formula::Not(arg) => !child(*arg),
        Formula::And(args) => args.iter().all(|arg| child(*arg)),
        Formula::Or(args) => args.iter().any(|arg| child(*arg)),
        Formula::Implies(args) => match args.split_last() {
            Some((last, premises)) => {
                !premises.iter().all(|arg| child(*arg)) || child(*last)
            }
            None => true,
        },
        Formula::Equivalent(args) => {
            let all = args.iter().all(|arg| child(*arg));
            let none = !args.iter().any(|arg| child(*arg));
            all || none
        }
        Formula::Xor(args) => args.iter().filter(|arg| child(**arg)).count() % 2 == 1,
    }
}
