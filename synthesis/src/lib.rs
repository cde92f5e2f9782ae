//! Realizability of LTLf specifications by forward search.
use log::warn;
use logic::{FormulaId, Store};

mod bdd;
mod branching;
mod closure;
mod config;
mod error;
mod forward;
mod graph;
mod oracle;
mod partition;
mod path;
mod race;
mod shared_queue;
mod state;
mod statistics;
mod strategy;
mod strip_next;
mod to_ltlf;
mod to_pl;
mod xnf;

pub use bdd::{BddManager, BddNode};
pub use branching::{BranchPolicy, Brancher};
pub use closure::Closure;
pub use config::{Config, DEFAULT_SIZE_BUDGET};
pub use error::{PartitionError, SynthesisError};
pub use forward::{ForwardSynthesis, StopCallback};
pub use graph::{Graph, GraphNode};
pub use oracle::{BddRealizability, BddUnrealizability, OneStepOracle, OracleBackend, OracleOutcome};
#[cfg(feature = "smt")]
pub use oracle::SmtRealizability;
pub use partition::InputOutputPartition;
pub use path::Path;
pub use race::{participants, race};
pub use shared_queue::SharedQueue;
pub use state::{StateEncoder, StateEquivalenceMode, StateKey};
pub use statistics::Statistics;
pub use strategy::{move_to_string, Assignment, Move, Strategy, VarValue};
pub use strip_next::strip_next;
pub use to_ltlf::to_ltlf;
pub use to_pl::to_pl;
pub use xnf::{is_xnf_leaf, xnf, XnfRewriter};

pub fn is_realizable(
    store: &mut Store,
    formula: FormulaId,
    partition: &InputOutputPartition,
    config: &Config,
) -> Result<bool, SynthesisError> {
    is_realizable_with_stats(store, formula, partition, config).map(|(verdict, _)| verdict)
}

/// Decides realizability and reports the statistics of the search that
/// answered.
///
/// In hash mode a state over the size budget restarts the whole search once
/// in BDD mode. With `multithreaded` set, every mode and branching policy race
/// and the first verdict wins.
pub fn is_realizable_with_stats(
    store: &mut Store,
    formula: FormulaId,
    partition: &InputOutputPartition,
    config: &Config,
) -> Result<(bool, Statistics), SynthesisError> {
    if config.multithreaded {
        return race(store, formula, partition, participants(config));
    }
    match solve_once(store, formula, partition, config) {
        Err(SynthesisError::BudgetExceeded { size, budget }) => {
            warn!("state of size {} exceeds the budget of {}, restarting in bdd mode", size, budget);
            let config = Config {
                mode: StateEquivalenceMode::Bdd,
                ..config.clone()
            };
            solve_once(store, formula, partition, &config)
        }
        result => result,
    }
}

fn solve_once(
    store: &mut Store,
    formula: FormulaId,
    partition: &InputOutputPartition,
    config: &Config,
) -> Result<(bool, Statistics), SynthesisError> {
    let mut engine = ForwardSynthesis::new(store, formula, partition, config)?;
    let verdict = engine.solve()?;
    Ok((verdict, engine.statistics().clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse_formula;

    #[test]
    fn test_budget_restart_in_bdd_mode() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "(a U b) & (c R d)").unwrap();
        let partition = InputOutputPartition::new(["a", "c"], ["b", "d"]);
        let config = Config {
            size_budget: 2,
            ..Config::default()
        };
        let (verdict, statistics) = is_realizable_with_stats(&mut store, formula, &partition, &config).unwrap();
        let expected = is_realizable(&mut store, formula, &partition, &Config::default()).unwrap();
        assert_eq!(verdict, expected);
        assert!(statistics.visited_states > 0);
    }

    #[test]
    fn test_budget_restart_on_a_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let mut store = Store::new();
                let formula = parse_formula(&mut store, "(X(G((!c) & (!c)))) U (F(X[!](X[!](a))))").unwrap();
                let partition = InputOutputPartition::new(["a", "b"], ["c", "d"]);
                is_realizable_with_stats(&mut store, formula, &partition, &Config::default())
            })
            .unwrap();
        let (verdict, _) = handle.join().unwrap().unwrap();
        assert!(!verdict);
    }

    #[test]
    fn test_multithreaded() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "F a & G b").unwrap();
        let partition = InputOutputPartition::new(Vec::<String>::new(), ["a", "b"]);
        let config = Config {
            multithreaded: true,
            ..Config::default()
        };
        assert!(is_realizable(&mut store, formula, &partition, &config).unwrap());
    }

    #[test]
    fn test_scenarios() {
        let mut store = Store::new();
        let tt = store.make_tt();
        let a = store.make_atom("a");
        let b = store.make_atom("b");
        let a_and_b = store.make_and(vec![a, b]);
        let always_a = store.make_always(a);
        let not_end = store.make_not_end();
        let always_a = store.make_and(vec![always_a, not_end]);
        let config = Config::default();

        let any = InputOutputPartition::new(["x"], ["y"]);
        assert!(is_realizable(&mut store, tt, &any, &config).unwrap());
        let controlled = InputOutputPartition::new(Vec::<String>::new(), ["a"]);
        assert!(is_realizable(&mut store, a, &controlled, &config).unwrap());
        let uncontrolled = InputOutputPartition::new(["a"], Vec::<String>::new());
        assert!(!is_realizable(&mut store, a, &uncontrolled, &config).unwrap());
        let mixed = InputOutputPartition::new(["a"], ["b"]);
        assert!(!is_realizable(&mut store, a_and_b, &mixed, &config).unwrap());
        assert!(is_realizable(&mut store, always_a, &controlled, &config).unwrap());
    }
}
