use std::collections::{BTreeSet, HashMap};

use logic::{to_string, Formula, FormulaId, LogicError, Store};

use super::{OneStepOracle, OracleOutcome};
use crate::bdd::{BddManager, BddNode};
use crate::error::SynthesisError;
use crate::partition::InputOutputPartition;
use crate::strategy::Assignment;

/// Proposition variables shared by both BDD oracles. Outputs take the
/// indices `0..outputs.len()`, inputs follow.
#[derive(Debug)]
struct PropositionEncoding {
    manager: BddManager,
    variables: HashMap<String, u32>,
    inputs: BTreeSet<u32>,
    outputs: BTreeSet<u32>,
    output_names: Vec<String>,
    cache: HashMap<FormulaId, BddNode>,
}

impl PropositionEncoding {
    fn new(partition: &InputOutputPartition) -> PropositionEncoding {
        let mut variables = HashMap::new();
        let names = partition.output_variables.iter().chain(partition.input_variables.iter());
        for (index, name) in names.enumerate() {
            variables.entry(name.clone()).or_insert(index as u32);
        }
        let nb_outputs = partition.output_variables.len();
        let (outputs, inputs): (BTreeSet<u32>, BTreeSet<u32>) =
            variables.values().partition(|index| (**index as usize) < nb_outputs);
        PropositionEncoding {
            manager: BddManager::new(),
            variables,
            inputs,
            outputs,
            output_names: partition.output_variables.clone(),
            cache: HashMap::new(),
        }
    }

    fn var(&mut self, store: &Store, atom: FormulaId) -> Result<BddNode, SynthesisError> {
        let index = match store.get(atom) {
            Formula::Atom(name) => self.variables.get(name).copied(),
            _ => None,
        };
        match index {
            Some(index) => Ok(self.manager.mk_var(index)),
            None => Err(SynthesisError::Invariant(format!(
                "{} is not a partition variable",
                to_string(store, atom)
            ))),
        }
    }

    /// `exists outputs. forall inputs. f`, and the inner `forall inputs. f`.
    fn exists_forall(&mut self, f: BddNode) -> (BddNode, BddNode) {
        let inner = self.manager.forall(f, &self.inputs);
        let outer = self.manager.exists(inner, &self.outputs);
        (outer, inner)
    }

    fn witness(&self, f: BddNode) -> Option<Assignment> {
        let cube = self.manager.pick_cube(f)?;
        let assignment = cube
            .into_iter()
            .filter_map(|(variable, value)| {
                self.output_names
                    .get(variable as usize)
                    .map(|name| (name.clone(), value))
            })
            .collect();
        Some(assignment)
    }
}

/// Under-approximates "the system wins after exactly this step": pending
/// strong obligations fail, weak ones hold because the trace may stop.
#[derive(Debug)]
pub struct BddRealizability {
    encoding: PropositionEncoding,
}

impl BddRealizability {
    pub fn new(partition: &InputOutputPartition) -> BddRealizability {
        BddRealizability {
            encoding: PropositionEncoding::new(partition),
        }
    }

    fn encode(&mut self, store: &Store, formula: FormulaId) -> Result<BddNode, SynthesisError> {
        if let Some(node) = self.encoding.cache.get(&formula) {
            return Ok(*node);
        }
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.encode_node(store, formula))
    }

    fn encode_node(&mut self, store: &Store, formula: FormulaId) -> Result<BddNode, SynthesisError> {
        let node = store.get(formula).clone();
        let result = match node {
            Formula::True | Formula::PropTrue | Formula::WeakNext(_) => self.encoding.manager.one(),
            Formula::False | Formula::PropFalse | Formula::Next(_) => self.encoding.manager.zero(),
            Formula::Atom(_) => self.encoding.var(store, formula)?,
            Formula::PropNot(atom) => {
                let var = self.encoding.var(store, atom)?;
                self.encoding.manager.apply_not(var)
            }
            Formula::And(args) => {
                let args = args.iter().map(|arg| self.encode(store, *arg)).collect::<Result<Vec<_>, _>>()?;
                self.encoding.manager.apply_and_many(args)
            }
            Formula::Or(args) => {
                let args = args.iter().map(|arg| self.encode(store, *arg)).collect::<Result<Vec<_>, _>>()?;
                self.encoding.manager.apply_or_many(args)
            }
            Formula::Until(args) | Formula::Release(args) => match args.last() {
                Some(last) => self.encode(store, *last)?,
                None => self.encoding.manager.zero(),
            },
            Formula::Eventually(arg) | Formula::Always(arg) => self.encode(store, arg)?,
            Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
                return Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
            }
        };
        self.encoding.cache.insert(formula, result);
        Ok(result)
    }
}

impl OneStepOracle for BddRealizability {
    fn check(&mut self, store: &mut Store, formula: FormulaId) -> Result<OracleOutcome, SynthesisError> {
        let f = self.encode(store, formula)?;
        let (outer, inner) = self.encoding.exists_forall(f);
        if self.encoding.manager.is_one(outer) {
            return Ok(OracleOutcome::Winning(self.encoding.witness(inner)));
        }
        Ok(OracleOutcome::Unknown)
    }
}

/// Over-approximates "the system can still win after this step": every
/// pending obligation is assumed satisfiable later.
#[derive(Debug)]
pub struct BddUnrealizability {
    encoding: PropositionEncoding,
}

impl BddUnrealizability {
    pub fn new(partition: &InputOutputPartition) -> BddUnrealizability {
        BddUnrealizability {
            encoding: PropositionEncoding::new(partition),
        }
    }

    fn encode(&mut self, store: &Store, formula: FormulaId) -> Result<BddNode, SynthesisError> {
        if let Some(node) = self.encoding.cache.get(&formula) {
            return Ok(*node);
        }
        stacker::maybe_grow(32 * 1024, 1024 * 1024, || self.encode_node(store, formula))
    }

    fn encode_node(&mut self, store: &Store, formula: FormulaId) -> Result<BddNode, SynthesisError> {
        let node = store.get(formula).clone();
        let result = match node {
            Formula::True
            | Formula::PropTrue
            | Formula::Next(_)
            | Formula::WeakNext(_)
            | Formula::Eventually(_) => self.encoding.manager.one(),
            Formula::False | Formula::PropFalse => self.encoding.manager.zero(),
            Formula::Atom(_) => self.encoding.var(store, formula)?,
            Formula::PropNot(atom) => {
                let var = self.encoding.var(store, atom)?;
                self.encoding.manager.apply_not(var)
            }
            Formula::And(args) => {
                let args = args.iter().map(|arg| self.encode(store, *arg)).collect::<Result<Vec<_>, _>>()?;
                self.encoding.manager.apply_and_many(args)
            }
            Formula::Or(args) | Formula::Until(args) => {
                let args = args.iter().map(|arg| self.encode(store, *arg)).collect::<Result<Vec<_>, _>>()?;
                self.encoding.manager.apply_or_many(args)
            }
            Formula::Release(args) => match args.last() {
                Some(last) => self.encode(store, *last)?,
                None => self.encoding.manager.one(),
            },
            Formula::Always(arg) => self.encode(store, arg)?,
            Formula::Not(_) | Formula::Implies(_) | Formula::Equivalent(_) | Formula::Xor(_) => {
                return Err(LogicError::ExpectedNnf(to_string(store, formula)).into())
            }
        };
        self.encoding.cache.insert(formula, result);
        Ok(result)
    }
}

impl OneStepOracle for BddUnrealizability {
    fn check(&mut self, store: &mut Store, formula: FormulaId) -> Result<OracleOutcome, SynthesisError> {
        let f = self.encode(store, formula)?;
        if self.encoding.manager.is_zero(f) {
            return Ok(OracleOutcome::Losing);
        }
        let (outer, _) = self.encoding.exists_forall(f);
        if !self.encoding.manager.is_one(outer) {
            return Ok(OracleOutcome::Losing);
        }
        Ok(OracleOutcome::Unknown)
    }
}
