use std::collections::HashMap;

use log::debug;
use logic::{to_string, Formula, FormulaId, LogicError, Store};
use z3::ast::{forall_const, Ast, Bool};
use z3::{Config, Context, SatResult, Solver};

use super::{OneStepOracle, OracleOutcome};
use crate::error::SynthesisError;
use crate::partition::InputOutputPartition;

/// One-step realizability decided by z3: `forall inputs. f` is asserted and a
/// model for the outputs is the winning move. Solver `unknown` stays unknown.
pub struct SmtRealizability {
    context: Context,
    partition: InputOutputPartition,
}

impl SmtRealizability {
    pub fn new(partition: &InputOutputPartition) -> SmtRealizability {
        let cfg = Config::new();
        SmtRealizability {
            context: Context::new(&cfg),
            partition: partition.clone(),
        }
    }
}

fn encode<'ctx>(
    ctx: &'ctx Context,
    store: &Store,
    variables: &HashMap<String, Bool<'ctx>>,
    formula: FormulaId,
) -> Result<Bool<'ctx>, SynthesisError> {
    stacker::maybe_grow(32 * 1024, 1024 * 1024, || encode_node(ctx, store, variables, formula))
}

fn encode_node<'ctx>(
    ctx: &'ctx Context,
    store: &Store,
    variables: &HashMap<String, Bool<'ctx>>,
    formula: FormulaId,
) -> Result<Bool<'ctx>, SynthesisError> {
    let var = |atom: FormulaId| match store.get(atom) {
        Formula::Atom(name) => variables.get(name).cloned().ok_or_else(|| {
            SynthesisError::Invariant(format!("{} is not a partition variable", name))
        }),
        _ => Err(SynthesisError::Invariant(to_string(store, atom))),
    };
    let encode_all = |args: &[FormulaId]| {
        args.iter()
            .map(|arg| encode(ctx, store, variables, *arg))
            .collect::<Result<Vec<_>, _>>()
    };
    Ok(match store.get(formula) {
        Formula::True | Formula::PropTrue | Formula::WeakNext(_) => Bool::from_bool(ctx, true),
        Formula::False | Formula::PropFalse | Formula::Next(_) => Bool::from_bool(ctx, false),
        Formula::Atom(_) => var(formula)?,
        Formula::PropNot(atom) => var(*atom)?.not(),
        Formula::And(args) => {
            let args = encode_all(args)?;
            Bool::and(ctx, &args.iter().collect::<Vec<_>>())
        }
        Formula::Or(args) => {
            let args = encode_all(args)?;
            Bool::or(ctx, &args.iter().collect::<Vec<_>>())
        }
        Formula::Until(args) | Formula::Release(args) => match args.last() {
            Some(last) => encode(ctx, store, variables, *last)?,
            None => Bool::from_bool(ctx, false),
        },
        Formula::Eventually(arg) | Formula::Always(arg) => encode(ctx, store, variables, *arg)?,
        Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
            return Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
        }
    })
}

impl OneStepOracle for SmtRealizability {
    fn check(&mut self, store: &mut Store, formula: FormulaId) -> Result<OracleOutcome, SynthesisError> {
        let ctx = &self.context;
        let variables: HashMap<String, Bool> = self
            .partition
            .output_variables
            .iter()
            .chain(self.partition.input_variables.iter())
            .map(|name| (name.clone(), Bool::new_const(ctx, name.as_str())))
            .collect();
        let body = encode(ctx, store, &variables, formula)?;
        let inputs: Vec<&Bool> = self
            .partition
            .input_variables
            .iter()
            .filter_map(|name| variables.get(name))
            .collect();
        let bounds: Vec<&dyn Ast> = inputs.iter().map(|v| *v as &dyn Ast).collect();
        let query = forall_const(ctx, &bounds, &[], &body);

        let solver = Solver::new(ctx);
        solver.assert(&query);
        match solver.check() {
            SatResult::Sat => {
                let assignment = solver.get_model().map(|model| {
                    self.partition
                        .output_variables
                        .iter()
                        .filter_map(|name| {
                            variables
                                .get(name)
                                .and_then(|var| model.eval(var, false))
                                .and_then(|value| value.as_bool())
                                .map(|value| (name.clone(), value))
                        })
                        .collect()
                });
                Ok(OracleOutcome::Winning(assignment))
            }
            SatResult::Unsat => Ok(OracleOutcome::Unknown),
            SatResult::Unknown => {
                debug!("z3 returned unknown: {:?}", solver.get_reason_unknown());
                Ok(OracleOutcome::Unknown)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smt_realizability() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let partition = InputOutputPartition::new(["b"], ["a"]);
        let mut oracle = SmtRealizability::new(&partition);
        assert!(matches!(oracle.check(&mut store, a).unwrap(), OracleOutcome::Winning(_)));
        assert_eq!(oracle.check(&mut store, b).unwrap(), OracleOutcome::Unknown);
    }
}
