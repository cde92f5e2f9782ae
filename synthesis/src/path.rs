use indexmap::IndexSet;

use crate::state::StateKey;

/// States on the current recursion stack, for loop detection.
#[derive(Debug, Default)]
pub struct Path {
    states: IndexSet<StateKey>,
}

impl Path {
    pub fn new() -> Path {
        Path::default()
    }

    /// Returns false if `state` is already on the path.
    pub fn push(&mut self, state: StateKey) -> bool {
        self.states.insert(state)
    }

    pub fn pop(&mut self) -> Option<StateKey> {
        self.states.pop()
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.states.contains(state)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last(&self) -> Option<&StateKey> {
        self.states.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bdd::BddNode;

    #[test]
    fn test_push_pop() {
        let first = StateKey::Bdd(BddNode::ZERO);
        let second = StateKey::Bdd(BddNode::ONE);
        let mut path = Path::new();
        assert!(path.push(first));
        assert!(path.push(second));
        assert!(!path.push(first));
        assert_eq!(path.len(), 2);
        assert_eq!(path.last(), Some(&second));
        assert_eq!(path.pop(), Some(second));
        assert!(!path.contains(&second));
        assert!(path.contains(&first));
        path.pop();
        assert!(path.is_empty());
    }
}
