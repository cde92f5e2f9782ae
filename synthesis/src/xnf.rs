use std::collections::HashMap;

use logic::{to_string, Formula, FormulaId, LogicError, Store};

use crate::error::SynthesisError;

/// Rewrites NNF formulas into next normal form, where every temporal
/// obligation sits directly under a `X[!]` or `X`. Results are cached.
#[derive(Debug, Default)]
pub struct XnfRewriter {
    cache: HashMap<FormulaId, FormulaId>,
}

impl XnfRewriter {
    pub fn new() -> XnfRewriter {
        XnfRewriter::default()
    }

    pub fn apply(&mut self, store: &mut Store, formula: FormulaId) -> Result<FormulaId, SynthesisError> {
        if let Some(result) = self.cache.get(&formula) {
            return Ok(*result);
        }
        let result = stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.rewrite(store, formula))?;
        self.cache.insert(formula, result);
        Ok(result)
    }

    fn rewrite(&mut self, store: &mut Store, formula: FormulaId) -> Result<FormulaId, SynthesisError> {
        let node = store.get(formula).clone();
        match node {
            Formula::True
            | Formula::False
            | Formula::PropTrue
            | Formula::PropFalse
            | Formula::Atom(_)
            | Formula::PropNot(_)
            | Formula::Next(_)
            | Formula::WeakNext(_) => Ok(formula),
            Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
                Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
            }
            Formula::And(args) => {
                let args = self.apply_all(store, &args)?;
                Ok(store.make_and(args))
            }
            Formula::Or(args) => {
                let args = self.apply_all(store, &args)?;
                Ok(store.make_or(args))
            }
            Formula::Until(args) => {
                // a U rest  =>  (rest & not_end) | (a & X[!](a U rest))
                let head = self.apply(store, args[0])?;
                let tail = store.make_until(args[1..].to_vec());
                let tail = self.apply(store, tail)?;
                let not_end = store.make_not_end();
                let next = store.make_next(formula);
                let now = store.make_and(vec![tail, not_end]);
                let later = store.make_and(vec![head, next]);
                Ok(store.make_or(vec![now, later]))
            }
            Formula::Release(args) => {
                // a R rest  =>  (rest | end) & (a | X(a R rest))
                let head = self.apply(store, args[0])?;
                let tail = store.make_release(args[1..].to_vec());
                let tail = self.apply(store, tail)?;
                let end = store.make_end();
                let weak_next = store.make_weak_next(formula);
                let now = store.make_or(vec![tail, end]);
                let later = store.make_or(vec![head, weak_next]);
                Ok(store.make_and(vec![now, later]))
            }
            Formula::Eventually(arg) => {
                if store.is_not_end(formula) {
                    return Ok(formula);
                }
                let arg = self.apply(store, arg)?;
                let not_end = store.make_not_end();
                let next = store.make_next(formula);
                let now = store.make_and(vec![arg, not_end]);
                Ok(store.make_or(vec![now, next]))
            }
            Formula::Always(arg) => {
                if store.is_end(formula) {
                    return Ok(formula);
                }
                let arg = self.apply(store, arg)?;
                let end = store.make_end();
                let weak_next = store.make_weak_next(formula);
                let now = store.make_or(vec![arg, end]);
                Ok(store.make_and(vec![now, weak_next]))
            }
        }
    }

    fn apply_all(&mut self, store: &mut Store, args: &[FormulaId]) -> Result<Vec<FormulaId>, SynthesisError> {
        args.iter().map(|arg| self.apply(store, *arg)).collect()
    }
}

/// One-shot next normal form without a shared cache.
pub fn xnf(store: &mut Store, formula: FormulaId) -> Result<FormulaId, SynthesisError> {
    XnfRewriter::new().apply(store, formula)
}

/// True when `formula` is a leaf of the next normal form: a literal, a
/// constant, a next-step obligation or one of the two trace-end sentinels.
pub fn is_xnf_leaf(store: &mut Store, formula: FormulaId) -> bool {
    match store.get(formula) {
        Formula::True
        | Formula::False
        | Formula::PropTrue
        | Formula::PropFalse
        | Formula::Atom(_)
        | Formula::PropNot(_)
        | Formula::Next(_)
        | Formula::WeakNext(_) => true,
        Formula::Eventually(_) => store.is_not_end(formula),
        Formula::Always(_) => store.is_end(formula),
        _ => false,
    }
}
