use lazy_static::lazy_static;

use super::RuleImpl;
use crate::binder::BoundExpr;
use crate::optimizer::core::*;
use crate::optimizer::{OptimizerError, PlanNode, PlanNodeType};
use crate::planner::StatementContext;

lazy_static! {
    static ref PATTERN: Pattern = {
        Pattern {
            predicate: |p| matches!(p.node_type(), PlanNodeType::LogicalProject),
            children: PatternChildrenPredicate::Predicate(vec![Pattern {
                predicate: |_| true,
                children: PatternChildrenPredicate::None,
            }]),
        }
    };
}

/// Removes a projection that only reproduces its child's output columns in
/// the same order. The parent keeps referencing identical column identities.
#[derive(Clone)]
pub struct EliminateIdentityProject;

impl EliminateIdentityProject {
    pub fn create() -> RuleImpl {
        Self {}.into()
    }
}

impl Rule for EliminateIdentityProject {
    fn rule_type(&self) -> RuleType {
        RuleType::EliminateIdentityProject
    }

    fn pattern(&self) -> &Pattern {
        &PATTERN
    }

    fn apply(
        &self,
        opt_expr: OptExpr,
        _context: &mut StatementContext,
        result: &mut Substitute,
    ) -> Result<(), OptimizerError> {
        let project_plan = opt_expr.root.get_plan_ref();
        let project = project_plan.as_logical_project().map_err(|_| {
            OptimizerError::Internal(format!("pattern matched non-project node: {}", project_plan))
        })?;

        let child_expr = &opt_expr.children[0];
        let child_plan = child_expr.root.get_plan_ref();

        let plain_column_refs = project
            .exprs()
            .iter()
            .all(|e| matches!(e, BoundExpr::ColumnRef(_)));
        if plain_column_refs && project.output_columns() == child_plan.output_columns() {
            result.opt_exprs.push(child_expr.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::binder::test_util::*;
    use crate::optimizer::{HepGraph, HepMatcher, HepNodeId, LogicalProject, LogicalTableScan};
    use crate::session::SessionVariables;

    fn build_context() -> StatementContext {
        StatementContext::new(Arc::new(Mutex::new(SessionVariables::new())))
    }

    fn build_scan_project(exprs: Vec<crate::binder::BoundExpr>) -> HepGraph {
        let scan = Arc::new(LogicalTableScan::new(
            "t".to_string(),
            vec![
                build_column_catalog("t", "c1"),
                build_column_catalog("t", "c2"),
            ],
        ));
        HepGraph::new(Arc::new(LogicalProject::new(exprs, scan)))
    }

    #[test]
    fn test_identity_project_is_eliminated() {
        let graph = build_scan_project(vec![
            build_bound_column_ref("t", "c1"),
            build_bound_column_ref("t", "c2"),
        ]);
        let rule = EliminateIdentityProject;
        let opt_expr = HepMatcher::new(rule.pattern(), HepNodeId::new(0), &graph)
            .match_opt_expr()
            .unwrap();

        let mut substitute = Substitute::default();
        rule.apply(opt_expr, &mut build_context(), &mut substitute)
            .unwrap();
        assert_eq!(substitute.opt_exprs.len(), 1);
    }

    #[test]
    fn test_narrowing_project_is_kept() {
        let graph = build_scan_project(vec![build_bound_column_ref("t", "c2")]);
        let rule = EliminateIdentityProject;
        let opt_expr = HepMatcher::new(rule.pattern(), HepNodeId::new(0), &graph)
            .match_opt_expr()
            .unwrap();

        let mut substitute = Substitute::default();
        rule.apply(opt_expr, &mut build_context(), &mut substitute)
            .unwrap();
        assert!(substitute.opt_exprs.is_empty());
    }
}
