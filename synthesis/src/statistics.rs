use std::fmt;

/// Counters collected by one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// Distinct state keys discovered.
    pub visited_states: usize,
    /// Calls of the per-state visit, memo hits included.
    pub visits: usize,
    pub loops: usize,
    pub realizability_hits: usize,
    pub unrealizability_hits: usize,
    /// States turned winning by backpropagation.
    pub backpropagated: usize,
    pub max_depth: usize,
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visited states: {}, visits: {}, loops: {}, one-step wins: {}, one-step losses: {}, backpropagated: {}, max depth: {}",
            self.visited_states,
            self.visits,
            self.loops,
            self.realizability_hits,
            self.unrealizability_hits,
            self.backpropagated,
            self.max_depth
        )
    }
}
