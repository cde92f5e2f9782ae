use std::collections::HashMap;

use indexmap::IndexSet;

use crate::error::SynthesisError;
use crate::state::StateKey;
use crate::strategy::{move_to_string, Move};

/// Node of the explored game graph.
///
/// A `State` is where the system picks a move (an OR node). A `Choice` is a
/// state together with the system move just made, where the environment
/// answers (an AND node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GraphNode {
    State(StateKey),
    Choice(StateKey, Move),
}

/// Explored transitions, labelled by the move taken. Each `(start, label)`
/// has exactly one end.
#[derive(Debug, Default)]
pub struct Graph {
    transitions: HashMap<(GraphNode, Move), GraphNode>,
    successors: HashMap<GraphNode, IndexSet<(Move, GraphNode)>>,
    predecessors: HashMap<GraphNode, IndexSet<(Move, GraphNode)>>,
}

impl Graph {
    pub fn new() -> Graph {
        Graph::default()
    }

    /// # Errors
    /// `Invariant` if `(start, label)` already leads somewhere else.
    pub fn add_transition(&mut self, start: GraphNode, label: Move, end: GraphNode) -> Result<(), SynthesisError> {
        let key = (start.clone(), label.clone());
        if let Some(existing) = self.transitions.get(&key) {
            if *existing != end {
                return Err(SynthesisError::Invariant(format!(
                    "transition {:?} --{}--> relabelled from {:?} to {:?}",
                    start,
                    move_to_string(&label),
                    existing,
                    end
                )));
            }
            return Ok(());
        }
        self.transitions.insert(key, end.clone());
        self.successors
            .entry(start.clone())
            .or_default()
            .insert((label.clone(), end.clone()));
        self.predecessors.entry(end).or_default().insert((label, start));
        Ok(())
    }

    pub fn successors(&self, node: &GraphNode) -> impl Iterator<Item = &(Move, GraphNode)> {
        self.successors.get(node).into_iter().flatten()
    }

    pub fn predecessors(&self, node: &GraphNode) -> impl Iterator<Item = &(Move, GraphNode)> {
        self.predecessors.get(node).into_iter().flatten()
    }

    pub fn nb_transitions(&self) -> usize {
        self.transitions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bdd::BddNode;
    use crate::strategy::VarValue;

    #[test]
    fn test_adjacency() {
        let s0 = StateKey::Bdd(BddNode::ZERO);
        let s1 = StateKey::Bdd(BddNode::ONE);
        let mv = vec![VarValue::True];
        let choice = GraphNode::Choice(s0, mv.clone());
        let mut graph = Graph::new();
        graph.add_transition(GraphNode::State(s0), mv.clone(), choice.clone()).unwrap();
        graph.add_transition(choice.clone(), vec![VarValue::False], GraphNode::State(s1)).unwrap();
        // same edge twice is fine
        graph.add_transition(choice.clone(), vec![VarValue::False], GraphNode::State(s1)).unwrap();
        assert_eq!(graph.nb_transitions(), 2);

        let preds: Vec<_> = graph.predecessors(&GraphNode::State(s1)).collect();
        assert_eq!(preds, vec![&(vec![VarValue::False], choice.clone())]);
        assert_eq!(graph.successors(&GraphNode::State(s0)).count(), 1);
        assert_eq!(graph.successors(&GraphNode::State(s1)).count(), 0);
    }

    #[test]
    fn test_conflicting_relabel() {
        let s0 = StateKey::Bdd(BddNode::ZERO);
        let s1 = StateKey::Bdd(BddNode::ONE);
        let choice = GraphNode::Choice(s0, vec![]);
        let mut graph = Graph::new();
        graph.add_transition(choice.clone(), vec![VarValue::True], GraphNode::State(s0)).unwrap();
        let result = graph.add_transition(choice, vec![VarValue::True], GraphNode::State(s1));
        assert!(matches!(result, Err(SynthesisError::Invariant(_))));
    }
}
