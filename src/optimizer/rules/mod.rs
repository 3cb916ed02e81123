mod implementation;
mod simplification;

use std::fmt::Debug;

use enum_dispatch::enum_dispatch;
pub use implementation::*;
pub use simplification::*;
use strum_macros::AsRefStr;

use crate::optimizer::core::{OptExpr, Pattern, Rule, RuleStage, RuleType, Substitute};
use crate::optimizer::OptimizerError;
use crate::planner::StatementContext;

#[enum_dispatch(Rule)]
#[derive(Clone, AsRefStr)]
pub enum RuleImpl {
    EliminateIdentityProject,
    LogicalTableScanToPhysicalTableScan,
    LogicalProjectToPhysicalProject,
    LogicalTableSinkToPhysicalTableSink,
    LogicalExternalSinkToPhysicalTableSink,
}

impl Debug for RuleImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// The rule registry: every rule keyed by its unique [`RuleType`]. External
/// rule catalogs register here; validation happens at registration, before
/// any statement runs.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<RuleImpl>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The validated built-in catalog used by statement compilation.
    pub fn compiler_default() -> Result<Self, OptimizerError> {
        let mut set = Self::new();
        set.register(EliminateIdentityProject::create())?;
        set.register(LogicalTableScanToPhysicalTableScan::create())?;
        set.register(LogicalProjectToPhysicalProject::create())?;
        set.register(LogicalTableSinkToPhysicalTableSink::create())?;
        Ok(set)
    }

    /// Register one rule. Fails, never overwrites, when the identity is
    /// already taken, and when a second single-implementation rule would
    /// convert the same logical node kind as a registered one.
    pub fn register(&mut self, rule: RuleImpl) -> Result<(), OptimizerError> {
        let rule_type = rule.rule_type();
        if self.rules.iter().any(|r| r.rule_type() == rule_type) {
            return Err(OptimizerError::DuplicateRule(rule_type));
        }
        if let Some(target) = rule_type.implements() {
            if let Some(existing) = self
                .rules
                .iter()
                .map(|r| r.rule_type())
                .find(|t| t.implements().as_ref() == Some(&target))
            {
                return Err(OptimizerError::AmbiguousRule {
                    first: existing,
                    second: rule_type,
                    target,
                });
            }
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Rules taking part in the given stage, in registration order.
    pub fn rules_for_stage(&self, stage: RuleStage) -> Vec<RuleImpl> {
        self.rules
            .iter()
            .filter(|r| r.rule_type().stage() == stage)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_compiler_default_is_valid() {
        let set = RuleSet::compiler_default().unwrap();
        assert_eq!(set.rules_for_stage(RuleStage::Rewrite).len(), 1);
        assert_eq!(set.rules_for_stage(RuleStage::Implementation).len(), 3);
    }

    #[test]
    fn test_register_rejects_duplicate_rule_type() {
        let mut set = RuleSet::compiler_default().unwrap();
        let err = set
            .register(LogicalTableSinkToPhysicalTableSink::create())
            .unwrap_err();
        assert!(matches!(
            err,
            OptimizerError::DuplicateRule(RuleType::ImplementTableSink)
        ));
        // the registry kept the original registration
        assert_eq!(set.rules_for_stage(RuleStage::Implementation).len(), 3);
    }

    #[test]
    fn test_register_rejects_ambiguous_implementations() {
        // both sink rules convert LogicalTableSink, registering the second is
        // a configuration defect
        let mut set = RuleSet::compiler_default().unwrap();
        let err = set
            .register(LogicalExternalSinkToPhysicalTableSink::create())
            .unwrap_err();
        match err {
            OptimizerError::AmbiguousRule { first, second, .. } => {
                assert_eq!(first, RuleType::ImplementTableSink);
                assert_eq!(second, RuleType::ImplementExternalTableSink);
            }
            other => panic!("expected AmbiguousRule, got {:?}", other),
        }
    }

    #[test]
    fn test_every_rule_type_has_a_stage() {
        for rule_type in RuleType::iter() {
            // implementation rules name their converted kind, rewrite rules do not
            match rule_type.stage() {
                RuleStage::Implementation => assert!(rule_type.implements().is_some()),
                RuleStage::Rewrite => assert!(rule_type.implements().is_none()),
            }
        }
    }
}
