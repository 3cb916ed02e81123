use std::sync::Arc;

use lazy_static::lazy_static;

use super::RuleImpl;
use crate::catalog::TableKind;
use crate::optimizer::core::*;
use crate::optimizer::{
    OptimizerError, PhysicalProject, PhysicalTableScan, PhysicalTableSink, PlanNodeType, PlanRef,
    SinkTarget,
};
use crate::planner::StatementContext;
use crate::session::ENABLE_EXTERNAL_SINK;

lazy_static! {
    static ref SCAN_PATTERN: Pattern = {
        Pattern {
            predicate: |p| matches!(p.node_type(), PlanNodeType::LogicalTableScan),
            children: PatternChildrenPredicate::None,
        }
    };
    static ref PROJECT_PATTERN: Pattern = {
        Pattern {
            predicate: |p| matches!(p.node_type(), PlanNodeType::LogicalProject),
            children: PatternChildrenPredicate::None,
        }
    };
    static ref SINK_PATTERN: Pattern = {
        Pattern {
            predicate: |p| matches!(p.node_type(), PlanNodeType::LogicalTableSink),
            children: PatternChildrenPredicate::None,
        }
    };
}

fn rule_application_error(
    rule_type: RuleType,
    node: &PlanRef,
    reason: impl Into<String>,
) -> OptimizerError {
    OptimizerError::RuleApplication {
        rule: rule_type.as_ref().to_string(),
        node: node.to_string().trim_end().to_string(),
        reason: reason.into(),
    }
}

/// Implementation rule that convert logical table scan to physical table scan.
#[derive(Clone)]
pub struct LogicalTableScanToPhysicalTableScan;

impl LogicalTableScanToPhysicalTableScan {
    pub fn create() -> RuleImpl {
        Self {}.into()
    }
}

impl Rule for LogicalTableScanToPhysicalTableScan {
    fn rule_type(&self) -> RuleType {
        RuleType::ImplementTableScan
    }

    fn pattern(&self) -> &Pattern {
        &SCAN_PATTERN
    }

    fn apply(
        &self,
        opt_expr: OptExpr,
        _context: &mut StatementContext,
        result: &mut Substitute,
    ) -> Result<(), OptimizerError> {
        let node = opt_expr.root.get_plan_ref();
        let scan = node.as_logical_table_scan().map_err(|_| {
            OptimizerError::Internal(format!("pattern matched non-scan node: {}", node))
        })?;

        result.opt_exprs.push(OptExpr {
            root: OptExprNode::PlanRef(Arc::new(PhysicalTableScan::new(scan.clone()))),
            children: vec![],
        });
        Ok(())
    }
}

/// Implementation rule that convert logical project to physical project.
#[derive(Clone)]
pub struct LogicalProjectToPhysicalProject;

impl LogicalProjectToPhysicalProject {
    pub fn create() -> RuleImpl {
        Self {}.into()
    }
}

impl Rule for LogicalProjectToPhysicalProject {
    fn rule_type(&self) -> RuleType {
        RuleType::ImplementProject
    }

    fn pattern(&self) -> &Pattern {
        &PROJECT_PATTERN
    }

    fn apply(
        &self,
        opt_expr: OptExpr,
        _context: &mut StatementContext,
        result: &mut Substitute,
    ) -> Result<(), OptimizerError> {
        let node = opt_expr.root.get_plan_ref();
        let project = node.as_logical_project().map_err(|_| {
            OptimizerError::Internal(format!("pattern matched non-project node: {}", node))
        })?;

        result.opt_exprs.push(OptExpr {
            root: OptExprNode::PlanRef(Arc::new(PhysicalProject::new(project.clone()))),
            children: opt_expr.children.clone(),
        });
        Ok(())
    }
}

/// Implementation rule that convert logical table sink to physical table sink.
///
/// The physical sink inherits the target identity, insert columns and output
/// expressions unchanged; execution-only bindings stay unresolved for the
/// fragment planner. External targets honor the `enable_external_sink`
/// session variable, so a statement-level hint can veto the conversion.
#[derive(Clone)]
pub struct LogicalTableSinkToPhysicalTableSink;

impl LogicalTableSinkToPhysicalTableSink {
    pub fn create() -> RuleImpl {
        Self {}.into()
    }
}

impl Rule for LogicalTableSinkToPhysicalTableSink {
    fn rule_type(&self) -> RuleType {
        RuleType::ImplementTableSink
    }

    fn pattern(&self) -> &Pattern {
        &SINK_PATTERN
    }

    fn apply(
        &self,
        opt_expr: OptExpr,
        context: &mut StatementContext,
        result: &mut Substitute,
    ) -> Result<(), OptimizerError> {
        let node = opt_expr.root.get_plan_ref();
        let sink = node.as_logical_table_sink().map_err(|_| {
            OptimizerError::Internal(format!("pattern matched non-sink node: {}", node))
        })?;

        match sink.table().kind {
            TableKind::View => {
                return Err(rule_application_error(
                    self.rule_type(),
                    node,
                    "cannot write into a view",
                ))
            }
            TableKind::External => {
                if !context.get_bool_var(ENABLE_EXTERNAL_SINK)? {
                    // disabled under the current configuration: leave the
                    // node logical and let the caller report it
                    return Ok(());
                }
            }
            TableKind::Olap => {}
        }

        if sink.cols().len() != sink.output_exprs().len() {
            return Err(rule_application_error(
                self.rule_type(),
                node,
                format!(
                    "sink expects {} columns but produces {} expressions",
                    sink.cols().len(),
                    sink.output_exprs().len()
                ),
            ));
        }

        // resolve the write target once per statement and table
        let cache_key = SinkTarget::cache_key(sink.database(), &sink.table().name);
        let target = context.get_or_cache(&cache_key, || sink.resolve_target());
        for col in sink.cols() {
            if !target
                .writable_columns
                .iter()
                .any(|c| c.column_id == col.column_id)
            {
                return Err(rule_application_error(
                    self.rule_type(),
                    node,
                    format!(
                        "column '{}' is not writable on {}.{}",
                        col.column_id,
                        sink.database(),
                        sink.table().name
                    ),
                ));
            }
        }

        result.opt_exprs.push(OptExpr {
            root: OptExprNode::PlanRef(Arc::new(PhysicalTableSink::new(sink.clone()))),
            children: opt_expr.children.clone(),
        });
        Ok(())
    }
}

/// External-target-only sink conversion for catalogs that route native sinks
/// through a different stage. Not part of the default set: registering it
/// next to [`LogicalTableSinkToPhysicalTableSink`] is rejected as ambiguous.
#[derive(Clone)]
pub struct LogicalExternalSinkToPhysicalTableSink;

impl LogicalExternalSinkToPhysicalTableSink {
    pub fn create() -> RuleImpl {
        Self {}.into()
    }
}

impl Rule for LogicalExternalSinkToPhysicalTableSink {
    fn rule_type(&self) -> RuleType {
        RuleType::ImplementExternalTableSink
    }

    fn pattern(&self) -> &Pattern {
        &SINK_PATTERN
    }

    fn apply(
        &self,
        opt_expr: OptExpr,
        _context: &mut StatementContext,
        result: &mut Substitute,
    ) -> Result<(), OptimizerError> {
        let node = opt_expr.root.get_plan_ref();
        let sink = node.as_logical_table_sink().map_err(|_| {
            OptimizerError::Internal(format!("pattern matched non-sink node: {}", node))
        })?;

        if sink.table().kind != TableKind::External {
            // structural match, but this rule only owns external targets
            return Ok(());
        }

        result.opt_exprs.push(OptExpr {
            root: OptExprNode::PlanRef(Arc::new(PhysicalTableSink::new(sink.clone()))),
            children: opt_expr.children.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::binder::test_util::*;
    use crate::optimizer::{
        HepGraph, HepMatcher, HepNodeId, LogicalTableScan, LogicalTableSink, PlanNode,
    };
    use crate::session::SessionVariables;

    fn build_context() -> StatementContext {
        StatementContext::new(Arc::new(Mutex::new(SessionVariables::new())))
    }

    fn build_sink_graph(kind: TableKind) -> HepGraph {
        let scan = Arc::new(LogicalTableScan::new(
            "src".to_string(),
            vec![
                build_column_catalog("src", "id"),
                build_column_catalog("src", "name"),
            ],
        ));
        let sink = Arc::new(LogicalTableSink::new(
            "db".to_string(),
            build_table_catalog("events", kind, &["id", "name"]),
            vec![
                build_column_catalog("events", "id"),
                build_column_catalog("events", "name"),
            ],
            vec![
                build_bound_column_ref("src", "id"),
                build_bound_column_ref("src", "name"),
            ],
            scan,
        ));
        HepGraph::new(sink)
    }

    fn apply_sink_rule(
        graph: &HepGraph,
        context: &mut StatementContext,
    ) -> Result<Substitute, OptimizerError> {
        let rule = LogicalTableSinkToPhysicalTableSink;
        let opt_expr = HepMatcher::new(rule.pattern(), HepNodeId::new(0), graph)
            .match_opt_expr()
            .unwrap();
        let mut substitute = Substitute::default();
        rule.apply(opt_expr, context, &mut substitute)?;
        Ok(substitute)
    }

    #[test]
    fn test_sink_conversion_preserves_output_contract() {
        // an external-table sink over columns [id, name] converts to exactly
        // one physical sink with identical identity, columns and expressions
        let graph = build_sink_graph(TableKind::External);
        let substitute = apply_sink_rule(&graph, &mut build_context()).unwrap();

        assert_eq!(substitute.opt_exprs.len(), 1);
        let physical = substitute.opt_exprs[0].root.get_plan_ref();
        let physical = physical.as_physical_table_sink().unwrap();
        let logical_plan = graph.node_plan(HepNodeId::new(0));
        let logical = logical_plan.as_logical_table_sink().unwrap();

        assert_eq!(physical.logical().database(), logical.database());
        assert_eq!(physical.logical().table(), logical.table());
        assert_eq!(physical.logical().cols(), logical.cols());
        assert_eq!(physical.logical().output_exprs(), logical.output_exprs());
        assert_eq!(physical.output_columns(), logical.output_columns());
        // execution-only bindings stay unresolved at planning time
        assert_eq!(physical.target_partition(), None);
    }

    #[test]
    fn test_sink_conversion_memoizes_resolved_target() {
        let graph = build_sink_graph(TableKind::Olap);
        let mut context = build_context();
        apply_sink_rule(&graph, &mut context).unwrap();

        let cache_key = SinkTarget::cache_key("db", "events");
        let target = context.cache_get::<SinkTarget>(&cache_key).unwrap();
        assert_eq!(target.database, "db");
        assert_eq!(target.writable_columns.len(), 2);
    }

    #[test]
    fn test_sink_into_view_fails() {
        let graph = build_sink_graph(TableKind::View);
        let err = apply_sink_rule(&graph, &mut build_context()).unwrap_err();
        match err {
            OptimizerError::RuleApplication { rule, reason, .. } => {
                assert_eq!(rule, "ImplementTableSink");
                assert!(reason.contains("view"));
            }
            other => panic!("expected RuleApplication, got {:?}", other),
        }
    }

    #[test]
    fn test_external_sink_declined_when_disabled() {
        let graph = build_sink_graph(TableKind::External);
        let mut context = build_context();
        context
            .set_var_once(ENABLE_EXTERNAL_SINK, "false")
            .unwrap();

        let substitute = apply_sink_rule(&graph, &mut context).unwrap();
        // declined, not failed: the node stays logical
        assert!(substitute.opt_exprs.is_empty());
    }

    #[test]
    fn test_external_only_rule_declines_native_targets() {
        let graph = build_sink_graph(TableKind::Olap);
        let rule = LogicalExternalSinkToPhysicalTableSink;
        let opt_expr = HepMatcher::new(rule.pattern(), HepNodeId::new(0), &graph)
            .match_opt_expr()
            .unwrap();
        let mut substitute = Substitute::default();
        rule.apply(opt_expr, &mut build_context(), &mut substitute)
            .unwrap();
        assert!(substitute.opt_exprs.is_empty());
    }

    #[test]
    fn test_scan_conversion_keeps_columns() {
        let scan = Arc::new(LogicalTableScan::new(
            "src".to_string(),
            vec![build_column_catalog("src", "id")],
        ));
        let graph = HepGraph::new(scan);
        let rule = LogicalTableScanToPhysicalTableScan;
        let opt_expr = HepMatcher::new(rule.pattern(), HepNodeId::new(0), &graph)
            .match_opt_expr()
            .unwrap();
        let mut substitute = Substitute::default();
        rule.apply(opt_expr, &mut build_context(), &mut substitute)
            .unwrap();

        assert_eq!(substitute.opt_exprs.len(), 1);
        let physical = substitute.opt_exprs[0].root.get_plan_ref();
        assert_eq!(
            physical.output_columns(),
            graph.node_plan(HepNodeId::new(0)).output_columns()
        );
    }
}
