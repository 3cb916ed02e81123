use enum_dispatch::enum_dispatch;
use strum_macros::{AsRefStr, EnumIter};

use super::{OptExpr, Pattern};
use crate::optimizer::{OptimizerError, PlanNodeType};
use crate::planner::StatementContext;

/// Unique identity of every rule the engine knows. Registration rejects a
/// second rule with the same identity, so bookkeeping and diagnostics can key
/// on it safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
pub enum RuleType {
    EliminateIdentityProject,
    ImplementTableScan,
    ImplementProject,
    ImplementTableSink,
    ImplementExternalTableSink,
}

/// The transformation stage a rule takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStage {
    /// logical-to-logical normalization
    Rewrite,
    /// logical-to-physical conversion
    Implementation,
}

impl RuleType {
    pub fn stage(&self) -> RuleStage {
        match self {
            RuleType::EliminateIdentityProject => RuleStage::Rewrite,
            RuleType::ImplementTableScan
            | RuleType::ImplementProject
            | RuleType::ImplementTableSink
            | RuleType::ImplementExternalTableSink => RuleStage::Implementation,
        }
    }

    /// The logical node kind this rule converts to its physical counterpart,
    /// None for rewrite rules. The registry allows at most one registered
    /// rule per converted kind, so a logical node never has two competing
    /// single-implementation conversions.
    pub fn implements(&self) -> Option<PlanNodeType> {
        match self {
            RuleType::EliminateIdentityProject => None,
            RuleType::ImplementTableScan => Some(PlanNodeType::LogicalTableScan),
            RuleType::ImplementProject => Some(PlanNodeType::LogicalProject),
            RuleType::ImplementTableSink | RuleType::ImplementExternalTableSink => {
                Some(PlanNodeType::LogicalTableSink)
            }
        }
    }

    pub fn is_single_implementation(&self) -> bool {
        self.implements().is_some()
    }
}

/// A rule is to transform logically equivalent expression. There are two kinds of rules:
///
/// - Rewrite Rule: Logical to Logical
/// - Implementation Rule: Logical to Physical
#[enum_dispatch]
pub trait Rule {
    /// The unique identity of the rule.
    fn rule_type(&self) -> RuleType;

    /// The pattern to determine whether the rule can be applied.
    fn pattern(&self) -> &Pattern;

    /// Apply the rule and write the transformation result to `Substitute`.
    /// The pattern tree determines the opt_expr tree internal nodes type.
    ///
    /// An empty substitute means the rule declined under the current context;
    /// the input node is left as it was. An error means no semantically valid
    /// replacement exists and aborts the statement's compilation. The rule
    /// may read session configuration through the context and memoize derived
    /// values in its cache, nothing more.
    fn apply(
        &self,
        opt_expr: OptExpr,
        context: &mut StatementContext,
        result: &mut Substitute,
    ) -> Result<(), OptimizerError>;
}

/// Define the transformed plans
#[derive(Default, Debug)]
pub struct Substitute {
    pub opt_exprs: Vec<OptExpr>,
}
