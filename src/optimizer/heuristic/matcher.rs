use super::graph::{HepGraph, HepNodeId};
use crate::optimizer::core::{
    OptExpr, OptExprNode, Pattern, PatternChildrenPredicate, PatternMatcher,
};

/// Use pattern to determines which rule can be applied
pub struct HepMatcher<'a, 'b> {
    pub pattern: &'a Pattern,
    pub start_id: HepNodeId,
    pub graph: &'b HepGraph,
}

impl<'a, 'b> HepMatcher<'a, 'b> {
    pub fn new(pattern: &'a Pattern, start_id: HepNodeId, graph: &'b HepGraph) -> Self {
        Self {
            pattern,
            start_id,
            graph,
        }
    }
}

impl PatternMatcher for HepMatcher<'_, '_> {
    fn match_opt_expr(&self) -> Option<OptExpr> {
        let start_node = self.graph.node_plan(self.start_id);
        // check the root node predicate
        if !(self.pattern.predicate)(start_node) {
            return None;
        }
        // check the children's predicate
        let opt_expr = match &self.pattern.children {
            PatternChildrenPredicate::MatchedRecursive => self.graph.to_opt_expr(self.start_id),
            PatternChildrenPredicate::Predicate(children_patterns) => {
                let child_ids = self.graph.children_at(self.start_id);
                // arity mismatch is a non-match
                if child_ids.len() != children_patterns.len() {
                    return None;
                }
                let mut children_opt_exprs = vec![];
                for (idx, child_pattern) in children_patterns.iter().enumerate() {
                    // the predicates order should match the graph nodes order
                    let m = HepMatcher::new(child_pattern, child_ids[idx], self.graph);
                    if let Some(opt_expr) = m.match_opt_expr() {
                        children_opt_exprs.push(opt_expr);
                    } else {
                        // if one of the children doesn't match, the whole pattern doesn't match
                        return None;
                    }
                }
                OptExpr {
                    // root need to regenerate due to rule may change its children
                    root: OptExprNode::PlanRef(self.graph.to_plan_start_from(self.start_id)),
                    children: children_opt_exprs,
                }
            }
            PatternChildrenPredicate::None => {
                // we don't care the children in rule logic, so it will collected as
                // OptExprNode::OptExpr in OptExpr tree.
                let children_opt_exprs = self
                    .graph
                    .children_at(self.start_id)
                    .into_iter()
                    .map(|id| OptExpr {
                        root: OptExprNode::OptExpr(id.index()),
                        children: vec![],
                    })
                    .collect::<Vec<_>>();
                OptExpr {
                    // root need to regenerate due to rule may change its children
                    root: OptExprNode::PlanRef(self.graph.to_plan_start_from(self.start_id)),
                    children: children_opt_exprs,
                }
            }
        };
        Some(opt_expr)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::binder::test_util::*;
    use crate::catalog::TableKind;
    use crate::optimizer::{
        LogicalProject, LogicalTableScan, LogicalTableSink, PlanNodeType, PlanRef,
    };

    fn build_logical_table_scan(table_id: &str) -> LogicalTableScan {
        LogicalTableScan::new(
            table_id.to_string(),
            vec![
                build_column_catalog(table_id, "c1"),
                build_column_catalog(table_id, "c2"),
            ],
        )
    }

    fn build_graph() -> HepGraph {
        // graph:
        //  0 <---------TableSink {
        //     1 <--------Project {
        //       2 <----------TableScan
        //                }
        //              }
        let scan = Arc::new(build_logical_table_scan("t"));
        let project: PlanRef = Arc::new(LogicalProject::new(
            vec![
                build_bound_column_ref("t", "c1"),
                build_bound_column_ref("t", "c2"),
            ],
            scan,
        ));
        let sink = Arc::new(LogicalTableSink::new(
            "db".to_string(),
            build_table_catalog("sink_t", TableKind::Olap, &["c1", "c2"]),
            vec![
                build_column_catalog("sink_t", "c1"),
                build_column_catalog("sink_t", "c2"),
            ],
            vec![
                build_bound_column_ref("t", "c1"),
                build_bound_column_ref("t", "c2"),
            ],
            project,
        ));
        HepGraph::new(sink)
    }

    #[test]
    fn test_match_opt_expr_with_children_predicate() {
        let graph = build_graph();

        // pattern: TableSink -> Project
        let pattern = Pattern {
            predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalTableSink),
            children: PatternChildrenPredicate::Predicate(vec![Pattern {
                predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalProject),
                children: PatternChildrenPredicate::None,
            }]),
        };

        let m = HepMatcher::new(&pattern, HepNodeId::new(0), &graph);
        let matched_opt_expr = m.match_opt_expr().unwrap();

        let sink_opt_expr = matched_opt_expr.root;
        assert!(matches!(sink_opt_expr, OptExprNode::PlanRef(_)));
        if let OptExprNode::PlanRef(p) = sink_opt_expr {
            assert_eq!(p.node_type(), PlanNodeType::LogicalTableSink);
        }

        let project_opt_expr = matched_opt_expr.children[0].root.clone();
        assert!(matches!(project_opt_expr, OptExprNode::PlanRef(_)));
        if let OptExprNode::PlanRef(p) = project_opt_expr {
            assert_eq!(p.node_type(), PlanNodeType::LogicalProject);
        }

        // the scan below the open child pattern stays an existing-node placeholder
        let scan_opt_expr = matched_opt_expr.children[0].children[0].root.clone();
        assert!(matches!(scan_opt_expr, OptExprNode::OptExpr(2)));
    }

    #[test]
    fn test_match_opt_expr_with_unmatched_children_predicate() {
        let graph = build_graph();

        // pattern: TableSink -> TableSink never matches the project child
        let pattern = Pattern {
            predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalTableSink),
            children: PatternChildrenPredicate::Predicate(vec![Pattern {
                predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalTableSink),
                children: PatternChildrenPredicate::None,
            }]),
        };

        let m = HepMatcher::new(&pattern, HepNodeId::new(0), &graph);
        assert!(m.match_opt_expr().is_none());
    }

    #[test]
    fn test_match_opt_expr_with_arity_mismatch() {
        let graph = build_graph();

        // the scan at node 2 has no children, but the pattern declares one
        let pattern = Pattern {
            predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalTableScan),
            children: PatternChildrenPredicate::Predicate(vec![Pattern {
                predicate: |_| true,
                children: PatternChildrenPredicate::None,
            }]),
        };

        let m = HepMatcher::new(&pattern, HepNodeId::new(2), &graph);
        assert!(m.match_opt_expr().is_none());

        // a declared-empty child list only matches leaves
        let pattern = Pattern {
            predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalProject),
            children: PatternChildrenPredicate::Predicate(vec![]),
        };
        let m = HepMatcher::new(&pattern, HepNodeId::new(1), &graph);
        assert!(m.match_opt_expr().is_none());
    }

    #[test]
    fn test_match_opt_expr_with_children_predicate_matched_recursive() {
        let graph = build_graph();

        let pattern = Pattern {
            predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalTableSink),
            children: PatternChildrenPredicate::MatchedRecursive,
        };

        let m = HepMatcher::new(&pattern, HepNodeId::new(0), &graph);
        let matched_opt_expr = m.match_opt_expr().unwrap();
        assert!(matches!(matched_opt_expr.root, OptExprNode::PlanRef(_)));
        let project = matched_opt_expr.children[0].root.clone();
        assert!(matches!(project, OptExprNode::PlanRef(_)));
        let scan = matched_opt_expr.children[0].children[0].root.clone();
        assert!(matches!(scan, OptExprNode::PlanRef(_)));
    }

    #[test]
    fn test_match_opt_expr_with_children_predicate_none() {
        let graph = build_graph();

        // the open pattern matches the sink whatever its children are
        let pattern = Pattern {
            predicate: |plan| matches!(plan.node_type(), PlanNodeType::LogicalTableSink),
            children: PatternChildrenPredicate::None,
        };

        let m = HepMatcher::new(&pattern, HepNodeId::new(0), &graph);
        let matched_opt_expr = m.match_opt_expr().unwrap();
        assert!(matches!(matched_opt_expr.root, OptExprNode::PlanRef(_)));
        let project = matched_opt_expr.children[0].root.clone();
        assert!(matches!(project, OptExprNode::OptExpr(1)));
    }
}
