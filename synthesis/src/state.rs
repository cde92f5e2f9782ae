use std::collections::HashMap;
use std::fmt;

use logic::{size, to_string, Formula, FormulaId, LogicError, Store};

use crate::bdd::{BddManager, BddNode};
use crate::closure::Closure;
use crate::error::SynthesisError;

/// How search states are told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateEquivalenceMode {
    /// Hash-consed formula identity, with a bound on formula size.
    Hash,
    /// Canonical BDD over the closure leaves.
    Bdd,
}

impl fmt::Display for StateEquivalenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateEquivalenceMode::Hash => write!(f, "hash"),
            StateEquivalenceMode::Bdd => write!(f, "bdd"),
        }
    }
}

/// Deduplication key of a search state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Formula(FormulaId),
    Bdd(BddNode),
}

/// Maps XNF formulas to [`StateKey`]s.
#[derive(Debug)]
pub enum StateEncoder {
    Hash {
        budget: usize,
    },
    Bdd {
        manager: BddManager,
        closure: Closure,
        cache: HashMap<FormulaId, BddNode>,
    },
}

impl StateEncoder {
    pub fn hash(budget: usize) -> StateEncoder {
        StateEncoder::Hash { budget }
    }

    pub fn bdd(closure: Closure) -> StateEncoder {
        StateEncoder::Bdd {
            manager: BddManager::new(),
            closure,
            cache: HashMap::new(),
        }
    }

    pub fn mode(&self) -> StateEquivalenceMode {
        match self {
            StateEncoder::Hash { .. } => StateEquivalenceMode::Hash,
            StateEncoder::Bdd { .. } => StateEquivalenceMode::Bdd,
        }
    }

    pub fn key(&mut self, store: &mut Store, formula: FormulaId) -> Result<StateKey, SynthesisError> {
        match self {
            StateEncoder::Hash { budget } => {
                let size = size(store, formula)?;
                if size > *budget {
                    return Err(SynthesisError::BudgetExceeded { size, budget: *budget });
                }
                Ok(StateKey::Formula(formula))
            }
            StateEncoder::Bdd { manager, closure, cache } => {
                let node = to_bdd(store, manager, closure, cache, formula)?;
                Ok(StateKey::Bdd(node))
            }
        }
    }
}

/// Symbolic encoding of an XNF formula: each closure leaf is a variable.
/// `true` needs a further step, so it shares the variable of `not_end`.
fn to_bdd(
    store: &mut Store,
    manager: &mut BddManager,
    closure: &Closure,
    cache: &mut HashMap<FormulaId, BddNode>,
    formula: FormulaId,
) -> Result<BddNode, SynthesisError> {
    if let Some(node) = cache.get(&formula) {
        return Ok(*node);
    }
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || encode(store, manager, closure, cache, formula))
}

fn encode(
    store: &mut Store,
    manager: &mut BddManager,
    closure: &Closure,
    cache: &mut HashMap<FormulaId, BddNode>,
    formula: FormulaId,
) -> Result<BddNode, SynthesisError> {
    let node = store.get(formula).clone();
    let result = match node {
        Formula::True => manager.one(),
        Formula::False | Formula::PropFalse => manager.zero(),
        Formula::PropTrue => {
            let not_end = store.make_not_end();
            leaf_var(store, manager, closure, not_end)?
        }
        Formula::Atom(_) | Formula::PropNot(_) | Formula::Next(_) | Formula::WeakNext(_) => {
            leaf_var(store, manager, closure, formula)?
        }
        Formula::And(args) => {
            let mut result = manager.one();
            for arg in args {
                let arg = to_bdd(store, manager, closure, cache, arg)?;
                result = manager.apply_and(result, arg);
            }
            result
        }
        Formula::Or(args) => {
            let mut result = manager.zero();
            for arg in args {
                let arg = to_bdd(store, manager, closure, cache, arg)?;
                result = manager.apply_or(result, arg);
            }
            result
        }
        Formula::Eventually(_) | Formula::Always(_)
            if store.is_not_end(formula) || store.is_end(formula) =>
        {
            leaf_var(store, manager, closure, formula)?
        }
        Formula::Until(_) | Formula::Release(_) | Formula::Eventually(_) | Formula::Always(_) => {
            return Err(LogicError::ExpectedXnf(to_string(store, formula)).into())
        }
        Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
            return Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
        }
    };
    cache.insert(formula, result);
    Ok(result)
}

fn leaf_var(
    store: &Store,
    manager: &mut BddManager,
    closure: &Closure,
    leaf: FormulaId,
) -> Result<BddNode, SynthesisError> {
    match closure.get_id(leaf) {
        Some(id) => Ok(manager.mk_var(id as u32)),
        None => Err(SynthesisError::Invariant(format!(
            "{} is not in the closure",
            to_string(store, leaf)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xnf::XnfRewriter;

    #[test]
    fn test_hash_mode_budget() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let formula = store.make_and(vec![a, b]);
        let mut encoder = StateEncoder::hash(3);
        assert_eq!(encoder.key(&mut store, formula).unwrap(), StateKey::Formula(formula));
        let mut encoder = StateEncoder::hash(2);
        assert!(matches!(
            encoder.key(&mut store, formula),
            Err(SynthesisError::BudgetExceeded { size: 3, budget: 2 })
        ));
    }

    #[test]
    fn test_bdd_mode_identifies_equivalent_states() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let c = store.make_atom("c");
        let ab = store.make_and(vec![a, b]);
        let ac = store.make_and(vec![a, c]);
        let root = store.make_or(vec![ab, ac]);
        let mut rewriter = XnfRewriter::new();
        let closure = Closure::new(&mut store, &mut rewriter, root).unwrap();
        let mut encoder = StateEncoder::bdd(closure);

        // a & (b | c) is a different formula with the same boolean function
        let b_or_c = store.make_or(vec![b, c]);
        let factored = store.make_and(vec![a, b_or_c]);
        assert_ne!(root, factored);
        let k1 = encoder.key(&mut store, root).unwrap();
        let k2 = encoder.key(&mut store, factored).unwrap();
        assert_eq!(k1, k2);
        assert_ne!(k1, encoder.key(&mut store, ab).unwrap());
        assert_eq!(encoder.mode(), StateEquivalenceMode::Bdd);
    }

    #[test]
    fn test_bdd_mode_rejects_unknown_leaf() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let mut rewriter = XnfRewriter::new();
        let closure = Closure::new(&mut store, &mut rewriter, a).unwrap();
        let mut encoder = StateEncoder::bdd(closure);
        let z = store.make_atom("z");
        assert!(matches!(encoder.key(&mut store, z), Err(SynthesisError::Invariant(_))));
    }
}
