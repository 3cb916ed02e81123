use std::fmt;

use itertools::Itertools;

use crate::catalog::ColumnId;

/// Physical data distribution produced by a physical operator. Requirements
/// beyond this (ordering, partition pruning) belong to the fragment planner.
#[derive(Debug, Clone, PartialEq)]
pub enum Distribution {
    /// any distribution satisfies the operator
    Any,
    /// all rows funneled into a single worker
    Gather,
    /// rows shuffled by hash over the given columns
    HashShuffled(Vec<ColumnId>),
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Distribution::Any => write!(f, "Any"),
            Distribution::Gather => write!(f, "Gather"),
            Distribution::HashShuffled(columns) => {
                write!(f, "HashShuffled({})", columns.iter().join(", "))
            }
        }
    }
}
