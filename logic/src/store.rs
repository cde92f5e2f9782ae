use indexmap::IndexSet;

use crate::definitions::{Formula, FormulaId, Pl, PlId, PlSymbol};
use crate::eval::node_accepts_empty;

/// Arena that owns every formula of a synthesis run.
///
/// Nodes are interned: building a formula that already exists returns the
/// existing handle. The constructors normalise commutative operators (flatten,
/// sort, dedup) and fold constants before interning, so structural equality and
/// handle equality coincide.
#[derive(Debug, Default)]
pub struct Store {
    formulas: IndexSet<Formula>,
    // accepts_empty[i] is whether formula i holds on the empty trace
    accepts_empty: Vec<bool>,
    pls: IndexSet<Pl>,
}

impl Store {
    pub fn new() -> Store {
        Store::default()
    }

    /// Returns the canonical handle for `node`, inserting it if it is new.
    ///
    /// This does not simplify; use the `make_*` constructors for that.
    pub fn intern(&mut self, node: Formula) -> FormulaId {
        if let Some(index) = self.formulas.get_index_of(&node) {
            return FormulaId(index as u32);
        }
        let empty = node_accepts_empty(&node, |id| self.accepts_empty[id.index()]);
        let (index, _) = self.formulas.insert_full(node);
        self.accepts_empty.push(empty);
        FormulaId(index as u32)
    }

    pub fn intern_pl(&mut self, node: Pl) -> PlId {
        let (index, _) = self.pls.insert_full(node);
        PlId(index as u32)
    }

    /// # Panics
    /// If `id` was not produced by this store.
    pub fn get(&self, id: FormulaId) -> &Formula {
        &self.formulas[id.index()]
    }

    /// # Panics
    /// If `id` was not produced by this store.
    pub fn get_pl(&self, id: PlId) -> &Pl {
        &self.pls[id.index()]
    }

    /// Number of distinct LTLf formulas interned so far.
    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }

    pub(crate) fn accepts_empty(&self, id: FormulaId) -> bool {
        self.accepts_empty[id.index()]
    }

    // ----- LTLf constructors -----

    pub fn make_tt(&mut self) -> FormulaId {
        self.intern(Formula::True)
    }

    pub fn make_ff(&mut self) -> FormulaId {
        self.intern(Formula::False)
    }

    pub fn make_prop_true(&mut self) -> FormulaId {
        self.intern(Formula::PropTrue)
    }

    pub fn make_prop_false(&mut self) -> FormulaId {
        self.intern(Formula::PropFalse)
    }

    pub fn make_atom(&mut self, name: &str) -> FormulaId {
        self.intern(Formula::Atom(name.to_owned()))
    }

    /// `end`, i.e. `G ff`: the trace has no further step.
    pub fn make_end(&mut self) -> FormulaId {
        let ff = self.make_ff();
        self.intern(Formula::Always(ff))
    }

    /// `not_end`, i.e. `F tt`: the trace has at least one more step.
    pub fn make_not_end(&mut self) -> FormulaId {
        let tt = self.make_tt();
        self.intern(Formula::Eventually(tt))
    }

    pub fn make_not(&mut self, arg: FormulaId) -> FormulaId {
        match self.get(arg) {
            Formula::True => self.make_ff(),
            Formula::False => self.make_tt(),
            Formula::Not(inner) => *inner,
            _ => self.intern(Formula::Not(arg)),
        }
    }

    /// Propositional negation of an atom.
    pub fn make_prop_not(&mut self, atom: FormulaId) -> FormulaId {
        debug_assert!(matches!(self.get(atom), Formula::Atom(_)));
        self.intern(Formula::PropNot(atom))
    }

    pub fn make_and(&mut self, args: Vec<FormulaId>) -> FormulaId {
        self.make_and_or(args, true)
    }

    pub fn make_or(&mut self, args: Vec<FormulaId>) -> FormulaId {
        self.make_and_or(args, false)
    }

    fn make_and_or(&mut self, args: Vec<FormulaId>, is_and: bool) -> FormulaId {
        let tt = self.make_tt();
        let ff = self.make_ff();
        let (absorbing, neutral) = if is_and { (ff, tt) } else { (tt, ff) };

        let mut flat = Vec::with_capacity(args.len());
        for arg in args {
            if arg == absorbing {
                return absorbing;
            }
            if arg == neutral {
                continue;
            }
            match (self.get(arg), is_and) {
                (Formula::And(children), true) | (Formula::Or(children), false) => {
                    flat.extend(children.iter().copied())
                }
                _ => flat.push(arg),
            }
        }
        flat.sort_unstable();
        flat.dedup();

        let end = self.make_end();
        let not_end = self.make_not_end();
        let has_end = flat.contains(&end);
        let has_not_end = flat.contains(&not_end);
        if has_end && has_not_end {
            return absorbing;
        }
        if has_end || has_not_end {
            let sentinel = if has_end { end } else { not_end };
            flat.retain(|arg| *arg != sentinel);
            let others_accept = if is_and {
                flat.iter().all(|arg| self.accepts_empty(*arg))
            } else {
                flat.iter().any(|arg| self.accepts_empty(*arg))
            };
            match (is_and, has_end, others_accept) {
                // not_end | phi, phi accepts empty: always true
                (false, false, true) => return tt,
                // not_end | phi, phi already needs a step
                (false, false, false) => return not_end,
                // not_end & phi, phi already needs a step
                (true, false, false) => {}
                // end | phi, phi already accepts empty
                (false, true, true) => {}
                // end & phi
                (true, true, true) => return end,
                (true, true, false) => return ff,
                _ => {
                    flat.push(sentinel);
                    flat.sort_unstable();
                }
            }
        }

        match flat.len() {
            0 => neutral,
            1 => flat[0],
            _ if is_and => self.intern(Formula::And(flat)),
            _ => self.intern(Formula::Or(flat)),
        }
    }

    pub fn make_implies(&mut self, args: Vec<FormulaId>) -> FormulaId {
        match args.len() {
            0 => self.make_tt(),
            1 => args[0],
            _ => self.intern(Formula::Implies(args)),
        }
    }

    pub fn make_equivalent(&mut self, mut args: Vec<FormulaId>) -> FormulaId {
        args.sort_unstable();
        args.dedup();
        match args.len() {
            0 | 1 => self.make_tt(),
            _ => self.intern(Formula::Equivalent(args)),
        }
    }

    pub fn make_xor(&mut self, mut args: Vec<FormulaId>) -> FormulaId {
        args.sort_unstable();
        match args.len() {
            0 => self.make_ff(),
            1 => args[0],
            _ => self.intern(Formula::Xor(args)),
        }
    }

    pub fn make_next(&mut self, arg: FormulaId) -> FormulaId {
        self.intern(Formula::Next(arg))
    }

    pub fn make_weak_next(&mut self, arg: FormulaId) -> FormulaId {
        self.intern(Formula::WeakNext(arg))
    }

    /// `a U b U c` is read as `a U (b U c)`; a trailing until chain is merged.
    pub fn make_until(&mut self, args: Vec<FormulaId>) -> FormulaId {
        self.make_chain(args, true)
    }

    pub fn make_release(&mut self, args: Vec<FormulaId>) -> FormulaId {
        self.make_chain(args, false)
    }

    fn make_chain(&mut self, mut args: Vec<FormulaId>, is_until: bool) -> FormulaId {
        if let Some(last) = args.last().copied() {
            match (self.get(last), is_until) {
                (Formula::Until(tail), true) | (Formula::Release(tail), false) => {
                    let tail = tail.clone();
                    args.pop();
                    args.extend(tail);
                }
                _ => {}
            }
        }
        match args.len() {
            0 if is_until => self.make_ff(),
            0 => self.make_tt(),
            1 => args[0],
            _ if is_until => self.intern(Formula::Until(args)),
            _ => self.intern(Formula::Release(args)),
        }
    }

    pub fn make_eventually(&mut self, arg: FormulaId) -> FormulaId {
        self.intern(Formula::Eventually(arg))
    }

    pub fn make_always(&mut self, arg: FormulaId) -> FormulaId {
        self.intern(Formula::Always(arg))
    }

    pub fn is_end(&mut self, id: FormulaId) -> bool {
        id == self.make_end()
    }

    pub fn is_not_end(&mut self, id: FormulaId) -> bool {
        id == self.make_not_end()
    }

    // ----- propositional constructors -----

    pub fn make_pl_true(&mut self) -> PlId {
        self.intern_pl(Pl::True)
    }

    pub fn make_pl_false(&mut self) -> PlId {
        self.intern_pl(Pl::False)
    }

    pub fn make_literal(&mut self, symbol: PlSymbol, negated: bool) -> PlId {
        self.intern_pl(Pl::Literal { symbol, negated })
    }

    pub fn make_pl_and(&mut self, args: Vec<PlId>) -> PlId {
        self.make_pl_and_or(args, true)
    }

    pub fn make_pl_or(&mut self, args: Vec<PlId>) -> PlId {
        self.make_pl_and_or(args, false)
    }

    fn make_pl_and_or(&mut self, args: Vec<PlId>, is_and: bool) -> PlId {
        let t = self.make_pl_true();
        let f = self.make_pl_false();
        let (absorbing, neutral) = if is_and { (f, t) } else { (t, f) };
        let mut flat = Vec::with_capacity(args.len());
        for arg in args {
            if arg == absorbing {
                return absorbing;
            }
            if arg == neutral {
                continue;
            }
            match (self.get_pl(arg), is_and) {
                (Pl::And(children), true) | (Pl::Or(children), false) => {
                    flat.extend(children.iter().copied())
                }
                _ => flat.push(arg),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => neutral,
            1 => flat[0],
            _ if is_and => self.intern_pl(Pl::And(flat)),
            _ => self.intern_pl(Pl::Or(flat)),
        }
    }
}
