use super::core::RuleType;
use super::plan_node::PlanNodeType;
use crate::session::ConfigurationError;

#[derive(thiserror::Error, Debug)]
pub enum OptimizerError {
    /// a matched rule cannot legally produce a replacement
    #[error("rule {rule} cannot apply to {node}: {reason}")]
    RuleApplication {
        rule: String,
        node: String,
        reason: String,
    },
    /// registration defect: two single-implementation rules convert the same
    /// logical node kind
    #[error("ambiguous rule set: {first:?} and {second:?} both implement {target:?}")]
    AmbiguousRule {
        first: RuleType,
        second: RuleType,
        target: PlanNodeType,
    },
    /// registration defect: the identity is already taken
    #[error("rule {0:?} is already registered")]
    DuplicateRule(RuleType),
    /// a logical node survived the implementation stage
    #[error("no implementation rule matched logical node: {0}")]
    NoImplementationRule(String),
    #[error("configuration error: {0}")]
    ConfigurationError(
        #[source]
        #[from]
        ConfigurationError,
    ),
    #[error("internal error: {0}")]
    Internal(String),
}
