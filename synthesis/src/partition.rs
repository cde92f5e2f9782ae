use std::fs;
use std::path::Path;

use crate::error::PartitionError;

const INPUTS_PREFIX: &str = ".inputs:";
const OUTPUTS_PREFIX: &str = ".outputs:";

/// Split of the propositions between the environment (inputs) and the
/// system (outputs). Both lists keep their given order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputOutputPartition {
    pub input_variables: Vec<String>,
    pub output_variables: Vec<String>,
}

impl InputOutputPartition {
    pub fn new<I, O>(inputs: I, outputs: O) -> InputOutputPartition
    where
        I: IntoIterator,
        I::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        InputOutputPartition {
            input_variables: inputs.into_iter().map(Into::into).collect(),
            output_variables: outputs.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads a partition file of the form
    ///
    /// ```text
    /// .inputs: a b
    /// .outputs: c d
    /// ```
    ///
    /// Blank lines are skipped; a missing line means an empty list.
    pub fn read_from_file(path: &Path) -> Result<InputOutputPartition, PartitionError> {
        let content = fs::read_to_string(path)?;
        InputOutputPartition::parse(&content)
    }

    pub fn parse(content: &str) -> Result<InputOutputPartition, PartitionError> {
        let mut partition = InputOutputPartition::default();
        for line in content.lines().map(str::trim).filter(|line| !line.is_empty()) {
            let names = |rest: &str| rest.split_whitespace().map(str::to_string).collect::<Vec<_>>();
            if let Some(rest) = line.strip_prefix(INPUTS_PREFIX) {
                partition.input_variables.extend(names(rest));
            } else if let Some(rest) = line.strip_prefix(OUTPUTS_PREFIX) {
                partition.output_variables.extend(names(rest));
            } else {
                return Err(PartitionError::Malformed(line.to_string()));
            }
        }
        Ok(partition)
    }

    pub fn is_input(&self, name: &str) -> bool {
        self.input_variables.iter().any(|v| v == name)
    }

    pub fn is_output(&self, name: &str) -> bool {
        self.output_variables.iter().any(|v| v == name)
    }
}
