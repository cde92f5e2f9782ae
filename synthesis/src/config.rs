use crate::branching::BranchPolicy;
use crate::oracle::OracleBackend;
use crate::state::StateEquivalenceMode;

/// Formula size above which the identity-keyed mode gives up and the search
/// restarts with BDD keys.
pub const DEFAULT_SIZE_BUDGET: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub mode: StateEquivalenceMode,
    pub branch: BranchPolicy,
    /// Race every mode and branching policy in parallel.
    pub multithreaded: bool,
    pub size_budget: usize,
    pub oracle: OracleBackend,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            mode: StateEquivalenceMode::Hash,
            branch: BranchPolicy::TrueFirst,
            multithreaded: false,
            size_budget: DEFAULT_SIZE_BUDGET,
            oracle: OracleBackend::Bdd,
        }
    }
}
