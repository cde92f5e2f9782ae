// ***************** Definitions *****************

/// Proposition names.
pub type Symbol = String;

/// Handle to an interned LTLf formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FormulaId(pub(crate) u32);

/// Handle to an interned propositional formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlId(pub(crate) u32);

impl FormulaId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl PlId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An LTLf formula node. Children are handles into the owning store.
///
/// `Not`, `Implies`, `Equivalent` and `Xor` only occur before the
/// negation normal form is computed. `PropNot` always wraps an `Atom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    True,
    False,
    PropTrue,
    PropFalse,
    Atom(Symbol),
    Not(FormulaId),
    PropNot(FormulaId),
    And(Vec<FormulaId>),
    Or(Vec<FormulaId>),
    Implies(Vec<FormulaId>),
    Equivalent(Vec<FormulaId>),
    Xor(Vec<FormulaId>),
    Next(FormulaId),
    WeakNext(FormulaId),
    Until(Vec<FormulaId>),
    Release(Vec<FormulaId>),
    Eventually(FormulaId),
    Always(FormulaId),
}

impl Formula {
    /// Direct children, in argument order.
    pub fn children(&self) -> &[FormulaId] {
        match self {
            Formula::True
            | Formula::False
            | Formula::PropTrue
            | Formula::PropFalse
            | Formula::Atom(_) => &[],
            Formula::Not(arg)
            | Formula::PropNot(arg)
            | Formula::Next(arg)
            | Formula::WeakNext(arg)
            | Formula::Eventually(arg)
            | Formula::Always(arg) => std::slice::from_ref(arg),
            Formula::And(args)
            | Formula::Or(args)
            | Formula::Implies(args)
            | Formula::Equivalent(args)
            | Formula::Xor(args)
            | Formula::Until(args)
            | Formula::Release(args) => args,
        }
    }
}

/// The proposition behind a propositional literal: either a plain name or an
/// LTLf formula standing for "true at the next step".
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlSymbol {
    Name(Symbol),
    Formula(FormulaId),
}

/// A propositional formula node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pl {
    True,
    False,
    Literal { symbol: PlSymbol, negated: bool },
    And(Vec<PlId>),
    Or(Vec<PlId>),
}

pub const TT_SYM:         &str = "tt";
pub const FF_SYM:         &str = "ff";
pub const PROP_TRUE_SYM:  &str = "true";
pub const PROP_FALSE_SYM: &str = "false";
pub const NOT_SYM:        &str = "~";
pub const PROP_NOT_SYM:   &str = "!";
pub const AND_SYM:        &str = "&";
pub const OR_SYM:         &str = "|";
pub const IMPL_SYM:       &str = "->";
pub const IFF_SYM:        &str = "<->";
pub const XOR_SYM:        &str = "^";
pub const NEXT_SYM:       &str = "X[!]";
pub const WEAK_NEXT_SYM:  &str = "X";
pub const UNTIL_SYM:      &str = "U";
pub const RELEASE_SYM:    &str = "R";
pub const EVENTUALLY_SYM: &str = "F";
pub const ALWAYS_SYM:     &str = "G";
pub const PL_TRUE_SYM:    &str = "ptrue";
pub const PL_FALSE_SYM:   &str = "pfalse";
