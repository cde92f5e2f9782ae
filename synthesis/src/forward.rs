//! Forward synthesis: an AND-OR search over XNF formulas.
//!
//! Every visited formula is a state of a game in which the system first fixes
//! its outputs and the environment then answers with the inputs. After both
//! moves the remaining obligations are stepped with `strip_next` and the search
//! recurses. States are memoized under a [`StateKey`]; a state met again on
//! the current path is a loop, provisionally losing. When a loop-tagged state
//! turns out winning, the result is propagated backwards through the explored
//! [`Graph`].
use std::collections::{HashMap, HashSet, VecDeque};

use log::{debug, info, warn};
use logic::{eval, find_atoms, find_pl_atoms, replace, to_nnf, to_string, FormulaId, PlId, PlSymbol, Store};

use crate::branching::Brancher;
use crate::closure::Closure;
use crate::config::Config;
use crate::error::SynthesisError;
use crate::graph::{Graph, GraphNode};
use crate::oracle::{BddRealizability, BddUnrealizability, OneStepOracle, OracleBackend, OracleOutcome};
use crate::partition::InputOutputPartition;
use crate::path::Path;
use crate::state::{StateEncoder, StateEquivalenceMode, StateKey};
use crate::statistics::Statistics;
use crate::strategy::{Move, Strategy, VarValue};
use crate::strip_next::strip_next;
use crate::to_ltlf::to_ltlf;
use crate::to_pl::to_pl;
use crate::xnf::XnfRewriter;

/// Polled once per visited state; returning `true` aborts the search.
pub type StopCallback = Box<dyn Fn() -> bool + Send>;

pub struct ForwardSynthesis<'a> {
    store: &'a mut Store,
    root: FormulaId,
    partition: InputOutputPartition,
    xnf: XnfRewriter,
    encoder: StateEncoder,
    realizability: Box<dyn OneStepOracle>,
    unrealizability: Box<dyn OneStepOracle>,
    discovered: HashMap<StateKey, bool>,
    // losing verdicts that depended on an unresolved loop
    provisional: HashSet<StateKey>,
    loop_tags: HashSet<StateKey>,
    complete_choices: HashSet<GraphNode>,
    path: Path,
    graph: Graph,
    strategy: Strategy,
    statistics: Statistics,
    brancher: Brancher,
    taint: usize,
    stop: Option<StopCallback>,
}

impl<'a> ForwardSynthesis<'a> {
    /// Prepares a search for `formula`, which may be in any form.
    ///
    /// Atoms of the formula that the partition does not mention are handed to
    /// the environment.
    pub fn new(
        store: &'a mut Store,
        formula: FormulaId,
        partition: &InputOutputPartition,
        config: &Config,
    ) -> Result<ForwardSynthesis<'a>, SynthesisError> {
        let mut xnf = XnfRewriter::new();
        let nnf = to_nnf(store, formula);
        let root = xnf.apply(store, nnf)?;

        let mut partition = partition.clone();
        for atom in find_atoms(store, root) {
            if !partition.is_input(&atom) && !partition.is_output(&atom) {
                warn!("{} is not in the partition, treating it as an input", atom);
                partition.input_variables.push(atom);
            }
        }

        let encoder = match config.mode {
            StateEquivalenceMode::Hash => StateEncoder::hash(config.size_budget),
            StateEquivalenceMode::Bdd => {
                let closure = Closure::new(store, &mut xnf, root)?;
                debug!(
                    "closure has {} formulas over {} atoms",
                    closure.nb_formulas(),
                    closure.nb_atoms()
                );
                StateEncoder::bdd(closure)
            }
        };
        let realizability = realizability_oracle(config.oracle, &partition)?;
        let unrealizability: Box<dyn OneStepOracle> = Box::new(BddUnrealizability::new(&partition));

        Ok(ForwardSynthesis {
            store,
            root,
            strategy: Strategy::new(partition.output_variables.clone()),
            partition,
            xnf,
            encoder,
            realizability,
            unrealizability,
            discovered: HashMap::new(),
            provisional: HashSet::new(),
            loop_tags: HashSet::new(),
            complete_choices: HashSet::new(),
            path: Path::new(),
            graph: Graph::new(),
            statistics: Statistics::default(),
            brancher: Brancher::new(config.branch),
            taint: 0,
            stop: None,
        })
    }

    pub fn set_stop_callback(&mut self, stop: StopCallback) {
        self.stop = Some(stop);
    }

    /// Runs the search from the root. True iff the system has a winning
    /// strategy.
    pub fn solve(&mut self) -> Result<bool, SynthesisError> {
        info!(
            "forward synthesis in {} mode ({:?}), {} inputs, {} outputs",
            self.encoder.mode(),
            self.brancher.policy(),
            self.partition.input_variables.len(),
            self.partition.output_variables.len()
        );
        let result = self.system_move(self.root);
        self.statistics.visited_states = self.discovered.len();
        let result = result?;
        info!(
            "{} ({}, {} graph transitions)",
            if result { "realizable" } else { "unrealizable" },
            self.statistics,
            self.graph.nb_transitions()
        );
        Ok(result)
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    pub fn mode(&self) -> StateEquivalenceMode {
        self.encoder.mode()
    }

    fn indentation(&self) -> String {
        "  ".repeat(self.path.len())
    }

    fn system_move(&mut self, formula: FormulaId) -> Result<bool, SynthesisError> {
        stacker::maybe_grow(64 * 1024, 4 * 1024 * 1024, || self.visit(formula))
    }

    fn visit(&mut self, formula: FormulaId) -> Result<bool, SynthesisError> {
        if let Some(stop) = &self.stop {
            if stop() {
                return Err(SynthesisError::Interrupted);
            }
        }
        self.statistics.visits += 1;
        let key = self.encoder.key(self.store, formula)?;
        debug!("{}visit {}", self.indentation(), to_string(self.store, formula));

        if let Some(&result) = self.discovered.get(&key) {
            if !result && self.provisional.contains(&key) {
                self.taint += 1;
            }
            debug!("{}known: {}", self.indentation(), result);
            return Ok(result);
        }
        if self.path.contains(&key) {
            debug!("{}loop", self.indentation());
            self.statistics.loops += 1;
            self.loop_tags.insert(key);
            self.discovered.insert(key, false);
            self.provisional.insert(key);
            self.taint += 1;
            return Ok(false);
        }

        if eval(self.store, formula) {
            debug!("{}accepts the empty trace", self.indentation());
            self.discovered.insert(key, true);
            return Ok(true);
        }
        if let OracleOutcome::Winning(assignment) = self.realizability.check(self.store, formula)? {
            debug!("{}won in one step", self.indentation());
            self.statistics.realizability_hits += 1;
            self.discovered.insert(key, true);
            if let Some(assignment) = assignment {
                if !self.strategy.contains(&key) {
                    self.strategy.add_named_move(key, &assignment)?;
                }
            }
            return Ok(true);
        }
        if let OracleOutcome::Losing = self.unrealizability.check(self.store, formula)? {
            debug!("{}lost in one step", self.indentation());
            self.statistics.unrealizability_hits += 1;
            self.discovered.insert(key, false);
            return Ok(false);
        }

        let taint = self.taint;
        self.path.push(key);
        self.statistics.max_depth = self.statistics.max_depth.max(self.path.len());
        let result = to_pl(self.store, formula).and_then(|pl| {
            let mut mv = vec![VarValue::DontCare; self.partition.output_variables.len()];
            self.system_split(key, pl, &mut mv)
        });
        self.path.pop();

        match result? {
            Some(mv) => {
                debug!("{}winning", self.indentation());
                self.discovered.insert(key, true);
                self.provisional.remove(&key);
                if !self.strategy.contains(&key) {
                    self.strategy.add_move(key, mv)?;
                }
                if self.loop_tags.contains(&key) {
                    self.backpropagate(key)?;
                }
                Ok(true)
            }
            None => {
                // a loop below may already have proven this state
                if self.discovered.get(&key) == Some(&true) {
                    return Ok(true);
                }
                debug!("{}losing", self.indentation());
                self.discovered.insert(key, false);
                if self.taint > taint {
                    self.provisional.insert(key);
                } else {
                    self.provisional.remove(&key);
                }
                Ok(false)
            }
        }
    }

    /// Disjunctive split over the outputs still occurring in `pl`.
    fn system_split(&mut self, key: StateKey, pl: PlId, mv: &mut Move) -> Result<Option<Move>, SynthesisError> {
        let atoms = find_pl_atoms(self.store, pl);
        let Some(index) = self.partition.output_variables.iter().position(|name| atoms.contains(name)) else {
            let choice = GraphNode::Choice(key, mv.clone());
            self.graph.add_transition(GraphNode::State(key), mv.clone(), choice.clone())?;
            let mut env_move = vec![VarValue::DontCare; self.partition.input_variables.len()];
            let mut complete = true;
            let won = self.env_split(&choice, pl, &mut env_move, &mut complete)?;
            if complete {
                self.complete_choices.insert(choice);
            }
            return Ok(if won { Some(mv.clone()) } else { None });
        };

        let symbol = PlSymbol::Name(self.partition.output_variables[index].clone());
        for value in self.brancher.order() {
            let assignment = HashMap::from([(symbol.clone(), value)]);
            let reduced = replace(self.store, &assignment, pl);
            mv[index] = value.into();
            if let Some(found) = self.system_split(key, reduced, mv)? {
                return Ok(Some(found));
            }
        }
        mv[index] = VarValue::DontCare;
        Ok(None)
    }

    /// Conjunctive split over the inputs still occurring in `pl`. A failure
    /// that read a provisional result does not stop the split, so the choice
    /// node gets all its successors recorded for backpropagation.
    fn env_split(
        &mut self,
        choice: &GraphNode,
        pl: PlId,
        mv: &mut Move,
        complete: &mut bool,
    ) -> Result<bool, SynthesisError> {
        let atoms = find_pl_atoms(self.store, pl);
        let Some(index) = self.partition.input_variables.iter().position(|name| atoms.contains(name)) else {
            let formula = to_ltlf(self.store, pl)?;
            let stepped = strip_next(self.store, formula)?;
            let next = self.xnf.apply(self.store, stepped)?;
            let next_key = self.encoder.key(self.store, next)?;
            self.graph.add_transition(choice.clone(), mv.clone(), GraphNode::State(next_key))?;
            return self.system_move(next);
        };

        let symbol = PlSymbol::Name(self.partition.input_variables[index].clone());
        let mut won = true;
        for value in self.brancher.order() {
            let taint = self.taint;
            let assignment = HashMap::from([(symbol.clone(), value)]);
            let reduced = replace(self.store, &assignment, pl);
            mv[index] = value.into();
            if !self.env_split(choice, reduced, mv, complete)? {
                won = false;
                if self.taint == taint {
                    *complete = false;
                    break;
                }
            }
        }
        mv[index] = VarValue::DontCare;
        Ok(won)
    }

    /// Breadth-first flip of losing predecessors of a newly winning state.
    /// A state flips on one winning choice; a choice wins only once it was
    /// fully explored and every successor is winning.
    fn backpropagate(&mut self, origin: StateKey) -> Result<(), SynthesisError> {
        let mut queue = VecDeque::from([GraphNode::State(origin)]);
        let mut won_choices = HashSet::new();
        while let Some(node) = queue.pop_front() {
            let predecessors: Vec<(Move, GraphNode)> = self.graph.predecessors(&node).cloned().collect();
            for (label, predecessor) in predecessors {
                match &predecessor {
                    GraphNode::Choice(..) => {
                        if !won_choices.contains(&predecessor) && self.choice_is_winning(&predecessor) {
                            won_choices.insert(predecessor.clone());
                            queue.push_back(predecessor);
                        }
                    }
                    GraphNode::State(key) => {
                        if self.discovered.get(key) != Some(&false) {
                            continue;
                        }
                        debug!("backpropagated to {:?}", key);
                        self.discovered.insert(*key, true);
                        self.provisional.remove(key);
                        if !self.strategy.contains(key) {
                            self.strategy.add_move(*key, label)?;
                        }
                        self.statistics.backpropagated += 1;
                        queue.push_back(predecessor);
                    }
                }
            }
        }
        Ok(())
    }

    fn choice_is_winning(&self, choice: &GraphNode) -> bool {
        self.complete_choices.contains(choice)
            && self.graph.successors(choice).all(|(_, successor)| match successor {
                GraphNode::State(key) => self.discovered.get(key) == Some(&true),
                GraphNode::Choice(..) => false,
            })
    }
}

fn realizability_oracle(
    backend: OracleBackend,
    partition: &InputOutputPartition,
) -> Result<Box<dyn OneStepOracle>, SynthesisError> {
    match backend {
        OracleBackend::Bdd => Ok(Box::new(BddRealizability::new(partition))),
        #[cfg(feature = "smt")]
        OracleBackend::Smt => Ok(Box::new(crate::oracle::SmtRealizability::new(partition))),
        #[cfg(not(feature = "smt"))]
        OracleBackend::Smt => Err(SynthesisError::Unsupported("the smt oracle")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::branching::BranchPolicy;
    use parser::parse_formula;

    fn partition(inputs: &[&str], outputs: &[&str]) -> InputOutputPartition {
        InputOutputPartition::new(inputs.iter().copied(), outputs.iter().copied())
    }

    fn configs() -> Vec<Config> {
        let mut configs = Vec::new();
        for mode in [StateEquivalenceMode::Hash, StateEquivalenceMode::Bdd] {
            for branch in [
                BranchPolicy::TrueFirst,
                BranchPolicy::FalseFirst,
                BranchPolicy::Random { seed: 7 },
            ] {
                configs.push(Config {
                    mode,
                    branch,
                    ..Config::default()
                });
            }
        }
        configs
    }

    /// Verdict under every mode and branching policy, which must agree.
    fn realizable(source: &str, no_empty: bool, inputs: &[&str], outputs: &[&str]) -> bool {
        let verdicts: Vec<bool> = configs()
            .iter()
            .map(|config| {
                let mut store = Store::new();
                let mut formula = parse_formula(&mut store, source).unwrap();
                if no_empty {
                    let not_end = store.make_not_end();
                    formula = store.make_and(vec![formula, not_end]);
                }
                let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(inputs, outputs), config).unwrap();
                engine.solve().unwrap()
            })
            .collect();
        assert!(verdicts.iter().all(|v| *v == verdicts[0]), "{}: {:?}", source, verdicts);
        verdicts[0]
    }

    #[test]
    fn test_constants() {
        assert!(realizable("tt", false, &["a"], &["b"]));
        assert!(!realizable("ff", false, &["a"], &["b"]));
        assert!(realizable("true", false, &[], &[]));
        assert!(!realizable("false", false, &[], &[]));
    }

    #[test]
    fn test_atoms() {
        assert!(realizable("a", false, &[], &["a"]));
        assert!(!realizable("a", false, &["a"], &[]));
        assert!(!realizable("a & b", false, &["a"], &["b"]));
        assert!(realizable("a | b", false, &["a"], &["b"]));
    }

    #[test]
    fn test_next() {
        assert!(realizable("X[!] a", false, &[], &["a"]));
        assert!(!realizable("X[!] a", false, &["a"], &[]));
        assert!(realizable("X a", false, &[], &["a"]));
        assert!(realizable("X a", false, &["a"], &[]));
    }

    #[test]
    fn test_until_and_release() {
        assert!(realizable("a U b", false, &["a"], &["b"]));
        assert!(!realizable("a U b", false, &["b"], &["a"]));
        assert!(realizable("a R b", false, &["a"], &["b"]));
        assert!(realizable("a R b", false, &["b"], &["a"]));
    }

    #[test]
    fn test_eventually_and_always() {
        assert!(realizable("F a", false, &[], &["a"]));
        assert!(!realizable("F a", false, &["a"], &[]));
        assert!(realizable("G a", false, &["a"], &[]));
        assert!(realizable("G a", true, &[], &["a"]));
        assert!(!realizable("G a", true, &["a"], &[]));
    }

    #[test]
    fn test_complex_formulas() {
        let formula = "(((p0) | (G(F(p5)))) & (F(p4))) U (((p3) & ((~(p1)) | (F(~(p4))))) | ((p1) & (~(p3)) & (G(p4))))";
        assert!(realizable(formula, true, &["p5"], &["p0", "p1", "p3", "p4"]));
        assert!(!realizable("(~(X[!](ff))) -> (F(p0))", true, &["p0"], &["dummy"]));
    }

    #[test]
    fn test_loop_is_detected() {
        // the environment can keep `a` false forever
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "G(F(a))").unwrap();
        let not_end = store.make_not_end();
        let formula = store.make_and(vec![formula, not_end]);
        let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(&["a"], &[]), &Config::default()).unwrap();
        assert!(!engine.solve().unwrap());
        assert!(engine.statistics().loops > 0);
        assert!(engine.statistics().visited_states > 1);
    }

    #[test]
    fn test_loop_result_is_flipped_by_backpropagation() {
        let source = "(~((G(((d) & (!b)) | ((!b) R (!d)))) U ((((b) U (!b)) R ((!d) U (d))) U ((X(!d)) | (X[!](!d)))))) & (!b)";
        let config = Config {
            mode: StateEquivalenceMode::Bdd,
            branch: BranchPolicy::FalseFirst,
            ..Config::default()
        };
        let mut store = Store::new();
        let formula = parse_formula(&mut store, source).unwrap();
        let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(&["a"], &["b", "c", "d"]), &config).unwrap();
        assert!(engine.solve().unwrap());
        assert!(engine.statistics().backpropagated > 0);
        assert!(realizable(source, false, &["a"], &["b", "c", "d"]));
    }

    #[test]
    fn test_unknown_atoms_become_inputs() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "a & b").unwrap();
        let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(&[], &["a"]), &Config::default()).unwrap();
        assert!(!engine.solve().unwrap());
    }

    #[test]
    fn test_winning_move_is_recorded() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "a & !b").unwrap();
        let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(&[], &["a", "b"]), &Config::default()).unwrap();
        assert!(engine.solve().unwrap());
        let (_, mv) = engine.strategy().iter().next().unwrap();
        assert_eq!(mv, &vec![VarValue::True, VarValue::False]);
    }

    #[test]
    fn test_stop_callback_interrupts() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "F a").unwrap();
        let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(&[], &["a"]), &Config::default()).unwrap();
        engine.set_stop_callback(Box::new(|| true));
        assert!(matches!(engine.solve(), Err(SynthesisError::Interrupted)));
    }

    #[test]
    fn test_budget_exceeded() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "(a U b) & (c R d)").unwrap();
        let config = Config {
            size_budget: 2,
            ..Config::default()
        };
        let mut engine = ForwardSynthesis::new(&mut store, formula, &partition(&["a", "c"], &["b", "d"]), &config).unwrap();
        assert!(matches!(engine.solve(), Err(SynthesisError::BudgetExceeded { budget: 2, .. })));
    }

    #[cfg(not(feature = "smt"))]
    #[test]
    fn test_smt_backend_needs_feature() {
        let mut store = Store::new();
        let a = store.make_atom("a");
        let config = Config {
            oracle: OracleBackend::Smt,
            ..Config::default()
        };
        let result = ForwardSynthesis::new(&mut store, a, &partition(&[], &["a"]), &config);
        assert!(matches!(result, Err(SynthesisError::Unsupported(_))));
    }

    fn engine_with_graph(store: &mut Store) -> (ForwardSynthesis<'_>, StateKey, StateKey, GraphNode) {
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let engine = ForwardSynthesis::new(store, a, &partition(&[], &["a"]), &Config::default()).unwrap();
        let (origin, state) = (StateKey::Formula(a), StateKey::Formula(b));
        let mv = vec![VarValue::True];
        let choice = GraphNode::Choice(state, mv.clone());
        (engine, origin, state, choice)
    }

    #[test]
    fn test_backpropagation_flips_losing_predecessor() {
        let mut store = Store::new();
        let (mut engine, origin, state, choice) = engine_with_graph(&mut store);
        engine.graph.add_transition(GraphNode::State(state), vec![VarValue::True], choice.clone()).unwrap();
        engine.graph.add_transition(choice.clone(), vec![], GraphNode::State(origin)).unwrap();
        engine.complete_choices.insert(choice);
        engine.discovered.insert(origin, true);
        engine.discovered.insert(state, false);
        engine.provisional.insert(state);

        engine.backpropagate(origin).unwrap();
        assert_eq!(engine.discovered.get(&state), Some(&true));
        assert!(!engine.provisional.contains(&state));
        assert_eq!(engine.strategy.get(&state), Some(&vec![VarValue::True]));
        assert_eq!(engine.statistics.backpropagated, 1);
    }

    #[test]
    fn test_backpropagation_needs_complete_choice() {
        let mut store = Store::new();
        let (mut engine, origin, state, choice) = engine_with_graph(&mut store);
        engine.graph.add_transition(GraphNode::State(state), vec![VarValue::True], choice.clone()).unwrap();
        engine.graph.add_transition(choice.clone(), vec![], GraphNode::State(origin)).unwrap();
        engine.discovered.insert(origin, true);
        engine.discovered.insert(state, false);

        engine.backpropagate(origin).unwrap();
        assert_eq!(engine.discovered.get(&state), Some(&false));
        assert!(engine.strategy.is_empty());
    }

    #[test]
    fn test_backpropagation_needs_every_successor() {
        let mut store = Store::new();
        let c = store.make_atom("c");
        let (mut engine, origin, state, choice) = engine_with_graph(&mut store);
        let other = StateKey::Formula(c);
        engine.graph.add_transition(GraphNode::State(state), vec![VarValue::True], choice.clone()).unwrap();
        engine.graph.add_transition(choice.clone(), vec![], GraphNode::State(origin)).unwrap();
        engine.graph.add_transition(choice.clone(), vec![VarValue::False], GraphNode::State(other)).unwrap();
        engine.complete_choices.insert(choice);
        engine.discovered.insert(origin, true);
        engine.discovered.insert(other, false);
        engine.discovered.insert(state, false);

        engine.backpropagate(origin).unwrap();
        assert_eq!(engine.discovered.get(&state), Some(&false));
    }
}
