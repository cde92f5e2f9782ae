use crate::definitions::*;
use crate::store::Store;

/// Renders an LTLf formula. Every operand is parenthesised.
pub fn to_string(store: &Store, formula: FormulaId) -> String {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || match store.get(formula) {
        Formula::True => TT_SYM.to_string(),
        Formula::False => FF_SYM.to_string(),
        Formula::PropTrue => PROP_TRUE_SYM.to_string(),
        Formula::PropFalse => PROP_FALSE_SYM.to_string(),
        Formula::Atom(name) => name.clone(),
        Formula::Not(arg) => unary(store, NOT_SYM, *arg),
        Formula::PropNot(atom) => format!("{}{}", PROP_NOT_SYM, to_string(store, *atom)),
        Formula::And(args) => binary(store, AND_SYM, args),
        Formula::Or(args) => binary(store, OR_SYM, args),
        Formula::Implies(args) => binary(store, IMPL_SYM, args),
        Formula::Equivalent(args) => binary(store, IFF_SYM, args),
        Formula::Xor(args) => binary(store, XOR_SYM, args),
        Formula::Next(arg) => unary(store, NEXT_SYM, *arg),
        Formula::WeakNext(arg) => unary(store, WEAK_NEXT_SYM, *arg),
        Formula::Until(args) => binary(store, UNTIL_SYM, args),
        Formula::Release(args) => binary(store, RELEASE_SYM, args),
        Formula::Eventually(arg) => unary(store, EVENTUALLY_SYM, *arg),
        Formula::Always(arg) => unary(store, ALWAYS_SYM, *arg),
    })
}

fn unary(store: &Store, op: &str, arg: FormulaId) -> String {
    format!("{}({})", op, to_string(store, arg))
}

fn binary(store: &Store, op: &str, args: &[FormulaId]) -> String {
    args.iter()
        .map(|arg| format!("({})", to_string(store, *arg)))
        .collect::<Vec<_>>()
        .join(&format!(" {} ", op))
}

pub fn pl_to_string(store: &Store, formula: PlId) -> String {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || match store.get_pl(formula) {
        Pl::True => PL_TRUE_SYM.to_string(),
        Pl::False => PL_FALSE_SYM.to_string(),
        Pl::Literal { symbol, negated } => {
            let name = match symbol {
                PlSymbol::Name(name) => name.clone(),
                PlSymbol::Formula(f) => to_string(store, *f),
            };
            if *negated { format!("!({})", name) } else { name }
        }
        Pl::And(args) | Pl::Or(args) => {
            let op = if matches!(store.get_pl(formula), Pl::And(_)) { AND_SYM } else { OR_SYM };
            args.iter()
                .map(|arg| format!("({})", pl_to_string(store, *arg)))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", op))
        }
    })
}
