use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Order in which the two values of a variable are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchPolicy {
    TrueFirst,
    FalseFirst,
    /// Fair coin per split, reproducible from the seed.
    Random { seed: u64 },
}

impl Default for BranchPolicy {
    fn default() -> Self {
        BranchPolicy::TrueFirst
    }
}

#[derive(Debug)]
pub struct Brancher {
    policy: BranchPolicy,
    rng: StdRng,
}

impl Brancher {
    pub fn new(policy: BranchPolicy) -> Brancher {
        let seed = match policy {
            BranchPolicy::Random { seed } => seed,
            _ => 0,
        };
        Brancher {
            policy,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn policy(&self) -> BranchPolicy {
        self.policy
    }

    pub fn order(&mut self) -> [bool; 2] {
        match self.policy {
            BranchPolicy::TrueFirst => [true, false],
            BranchPolicy::FalseFirst => [false, true],
            BranchPolicy::Random { .. } => {
                if self.rng.gen::<bool>() {
                    [true, false]
                } else {
                    [false, true]
                }
            }
        }
    }
}
