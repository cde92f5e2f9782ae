use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use log::{debug, info, warn};
use logic::{copy, FormulaId, Store};

use crate::branching::BranchPolicy;
use crate::config::Config;
use crate::error::SynthesisError;
use crate::forward::ForwardSynthesis;
use crate::partition::InputOutputPartition;
use crate::shared_queue::SharedQueue;
use crate::state::StateEquivalenceMode;
use crate::statistics::Statistics;

type RaceResult = Result<(bool, Statistics), SynthesisError>;

const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Every state mode crossed with every branching policy.
pub fn participants(config: &Config) -> Vec<Config> {
    let seed = match config.branch {
        BranchPolicy::Random { seed } => seed,
        _ => 0,
    };
    let mut participants = Vec::new();
    for mode in [StateEquivalenceMode::Hash, StateEquivalenceMode::Bdd] {
        for branch in [
            BranchPolicy::TrueFirst,
            BranchPolicy::FalseFirst,
            BranchPolicy::Random { seed },
        ] {
            participants.push(Config {
                mode,
                branch,
                multithreaded: false,
                ..config.clone()
            });
        }
    }
    participants
}

/// Runs one search per participant, each on its own copy of the formula, and
/// returns the first verdict. The others are stopped and joined before
/// returning. If every participant fails, the first error is returned.
pub fn race(
    store: &Store,
    formula: FormulaId,
    partition: &InputOutputPartition,
    participants: Vec<Config>,
) -> RaceResult {
    let queue: Arc<SharedQueue<(usize, RaceResult)>> = Arc::new(SharedQueue::new());
    let mut stop_flags = Vec::new();
    let mut handles = Vec::new();
    let mut first_error = None;

    for (id, config) in participants.into_iter().enumerate() {
        let mut local = Store::new();
        let local_formula = copy(store, &mut local, formula);
        let partition = partition.clone();
        let stop = Arc::new(AtomicBool::new(false));
        stop_flags.push(Arc::clone(&stop));
        let queue = Arc::clone(&queue);

        let spawned = thread::Builder::new()
            .name(format!("race-{}", id))
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || {
                debug!("participant {} starts ({} mode, {:?})", id, config.mode, config.branch);
                // a panicking participant still has to answer, or the driver waits forever
                let result = panic::catch_unwind(AssertUnwindSafe(|| -> RaceResult {
                    let mut engine = ForwardSynthesis::new(&mut local, local_formula, &partition, &config)?;
                    engine.set_stop_callback(Box::new(move || stop.load(Ordering::Relaxed)));
                    let verdict = engine.solve()?;
                    Ok((verdict, engine.statistics().clone()))
                }))
                .unwrap_or_else(|_| Err(SynthesisError::Invariant(format!("race participant {} panicked", id))));
                queue.push_back((id, result));
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(error) => {
                warn!("participant {} could not be started: {}", id, error);
                first_error.get_or_insert(SynthesisError::Invariant(format!(
                    "race participant {} could not be started",
                    id
                )));
            }
        }
    }

    let mut outcome = None;
    for _ in 0..handles.len() {
        let (id, result) = queue.pop_front();
        match result {
            Ok(verdict) => {
                info!("participant {} finished first", id);
                outcome = Some(verdict);
                break;
            }
            Err(error) => {
                debug!("participant {} failed: {}", id, error);
                first_error.get_or_insert(error);
            }
        }
    }

    for flag in &stop_flags {
        flag.store(true, Ordering::Relaxed);
    }
    for handle in handles {
        if handle.join().is_err() {
            return Err(SynthesisError::Invariant("a race participant panicked".to_string()));
        }
    }

    match (outcome, first_error) {
        (Some(verdict), _) => Ok(verdict),
        (None, Some(error)) => Err(error),
        (None, None) => Err(SynthesisError::Invariant("race without participants".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse_formula;

    fn partition(inputs: &[&str], outputs: &[&str]) -> InputOutputPartition {
        InputOutputPartition::new(inputs.iter().copied(), outputs.iter().copied())
    }

    #[test]
    fn test_participants() {
        let config = Config {
            branch: BranchPolicy::Random { seed: 3 },
            multithreaded: true,
            ..Config::default()
        };
        let participants = participants(&config);
        assert_eq!(participants.len(), 6);
        assert!(participants.iter().all(|p| !p.multithreaded));
        assert!(participants.contains(&Config {
            mode: StateEquivalenceMode::Bdd,
            branch: BranchPolicy::Random { seed: 3 },
            multithreaded: false,
            ..Config::default()
        }));
    }

    #[test]
    fn test_race_agrees_with_single_modes() {
        let cases = [
            ("a U b", vec!["a"], vec!["b"]),
            ("a U b", vec!["b"], vec!["a"]),
            ("G(F(a)) & F tt", vec!["a"], vec![]),
            ("(~(X[!](ff))) -> (F(p0))", vec!["p0"], vec!["dummy"]),
        ];
        for (source, inputs, outputs) in cases {
            let mut store = Store::new();
            let formula = parse_formula(&mut store, source).unwrap();
            let partition = partition(&inputs, &outputs);

            let hash = Config::default();
            let bdd = Config {
                mode: StateEquivalenceMode::Bdd,
                ..Config::default()
            };
            let (raced, _) = race(&store, formula, &partition, vec![hash.clone(), bdd.clone()]).unwrap();

            let mut local = Store::new();
            let copied = copy(&store, &mut local, formula);
            let hash_verdict = ForwardSynthesis::new(&mut local, copied, &partition, &hash).unwrap().solve().unwrap();
            let mut local = Store::new();
            let copied = copy(&store, &mut local, formula);
            let bdd_verdict = ForwardSynthesis::new(&mut local, copied, &partition, &bdd).unwrap().solve().unwrap();

            assert_eq!(hash_verdict, bdd_verdict, "{}", source);
            assert_eq!(raced, hash_verdict, "{}", source);
        }
    }

    #[test]
    fn test_race_reports_error_when_all_fail() {
        let mut store = Store::new();
        let formula = parse_formula(&mut store, "(a U b) & (c R d)").unwrap();
        let config = Config {
            size_budget: 1,
            ..Config::default()
        };
        let result = race(&store, formula, &partition(&["a", "c"], &["b", "d"]), vec![config]);
        assert!(matches!(result, Err(SynthesisError::BudgetExceeded { .. })));
    }

    #[test]
    fn test_deep_states_on_a_small_stack() {
        let handle = thread::Builder::new()
            .stack_size(2 * 1024 * 1024)
            .spawn(|| {
                let mut store = Store::new();
                let formula = parse_formula(&mut store, "(X(G((!c) & (!c)))) U (F(X[!](X[!](a))))").unwrap();
                race(&store, formula, &partition(&["a", "b"], &["c", "d"]), vec![Config::default()])
            })
            .unwrap();
        let result = handle.join().unwrap();
        assert!(matches!(
            result,
            Ok((false, _)) | Err(SynthesisError::BudgetExceeded { .. })
        ));
    }
}
