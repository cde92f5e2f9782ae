use std::collections::HashMap;
use std::fmt;

use crate::error::SynthesisError;
use crate::state::StateKey;

/// Value chosen for one output variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarValue {
    True,
    False,
    DontCare,
}

impl From<bool> for VarValue {
    fn from(value: bool) -> Self {
        if value { VarValue::True } else { VarValue::False }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::True => write!(f, "1"),
            VarValue::False => write!(f, "0"),
            VarValue::DontCare => write!(f, "-"),
        }
    }
}

/// One value per variable, aligned with a variable list of the partition.
pub type Move = Vec<VarValue>;

/// Values of some output variables by name. Missing variables are don't-care.
pub type Assignment = Vec<(String, bool)>;

pub fn move_to_string(mv: &[VarValue]) -> String {
    mv.iter().map(|value| value.to_string()).collect()
}

/// Winning moves of the system, one per winning state. Entries are never
/// replaced.
#[derive(Debug, Clone, Default)]
pub struct Strategy {
    variables: Vec<String>,
    moves: HashMap<StateKey, Move>,
}

impl Strategy {
    pub fn new(output_variables: Vec<String>) -> Strategy {
        Strategy {
            variables: output_variables,
            moves: HashMap::new(),
        }
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Records the move for `state`.
    ///
    /// # Errors
    /// `Invariant` if the state already has a move or the move does not have
    /// one value per output variable.
    pub fn add_move(&mut self, state: StateKey, mv: Move) -> Result<(), SynthesisError> {
        if mv.len() != self.variables.len() {
            return Err(SynthesisError::Invariant(format!(
                "move {} does not match the {} output variables",
                move_to_string(&mv),
                self.variables.len()
            )));
        }
        if self.moves.contains_key(&state) {
            return Err(SynthesisError::Invariant(format!(
                "state {:?} already has a move",
                state
            )));
        }
        self.moves.insert(state, mv);
        Ok(())
    }

    /// Records a move given as named values; unnamed variables are don't-care.
    pub fn add_named_move(&mut self, state: StateKey, assignment: &[(String, bool)]) -> Result<(), SynthesisError> {
        let mut mv = vec![VarValue::DontCare; self.variables.len()];
        for (name, value) in assignment {
            let Some(index) = self.variables.iter().position(|v| v == name) else {
                return Err(SynthesisError::Invariant(format!("{} is not an output variable", name)));
            };
            mv[index] = (*value).into();
        }
        self.add_move(state, mv)
    }

    pub fn get(&self, state: &StateKey) -> Option<&Move> {
        self.moves.get(state)
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.moves.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, &Move)> {
        self.moves.iter()
    }
}
