use log::debug;

use super::batch::HepBatch;
use super::graph::{HepGraph, HepNodeId};
use super::matcher::HepMatcher;
use crate::optimizer::core::{PatternMatcher, Rule, Substitute};
use crate::optimizer::rules::RuleImpl;
use crate::optimizer::{OptimizerError, PlanRef};
use crate::planner::StatementContext;
use crate::util::pretty_plan_tree_string;

static LOGGING_TARGET: &str = "optrs::optimizer";

/// The rule engine driver. Walks the plan graph batch by batch, matching each
/// rule's pattern and splicing in the substitutes, until a batch stops
/// changing the plan or hits its iteration cap. Rule errors abort the whole
/// compilation; a partially transformed plan is never returned.
pub struct HepOptimizer {
    batches: Vec<HepBatch>,
    graph: HepGraph,
}

impl HepOptimizer {
    pub fn new(batches: Vec<HepBatch>, root: PlanRef) -> Self {
        let graph = HepGraph::new(root);
        Self { batches, graph }
    }

    pub fn find_best(
        &mut self,
        context: &mut StatementContext,
    ) -> Result<PlanRef, OptimizerError> {
        let batches = self.batches.clone().into_iter();
        for batch in batches {
            let mut iteration = 1_usize;
            // fixed_point means plan tree not changed after applying all rules.
            let mut fixed_point = false;
            // run until fix point or reach the max number of iterations as specified in the
            // strategy.
            while !fixed_point {
                debug!(
                    target: LOGGING_TARGET,
                    "start batch: {}, iteration: {}", batch.name, iteration
                );

                fixed_point = self.apply_batch(&batch, context)?;

                // max_iteration check priority is higher than fixed_point.
                iteration += 1;
                if iteration > batch.strategy.max_iteration {
                    debug!(
                        target: LOGGING_TARGET,
                        "max iteration {} reached for batch: {}",
                        iteration - 1,
                        batch.name
                    );
                    break;
                }
            }
        }
        Ok(self.graph.to_plan())
    }

    fn apply_batch(
        &mut self,
        batch: &HepBatch,
        context: &mut StatementContext,
    ) -> Result<bool, OptimizerError> {
        let original_plan = self.graph.to_plan();

        // for each rule will apply each node in graph.
        for rule in batch.rules.iter() {
            for node_id in self.graph.nodes_iter(batch.strategy.match_order) {
                if !self.apply_rule(rule.clone(), node_id, context)? {
                    // not matched, will try next node
                    continue;
                }

                debug!(
                    target: LOGGING_TARGET,
                    "after applying {:?}:\n{}",
                    rule,
                    pretty_plan_tree_string(&*self.graph.to_plan())
                );

                // the graph changed, so the node ids snapshot is stale: move
                // on to the next rule and let the fixed-point loop re-run this
                // batch until nothing matches anymore.
                break;
            }
        }

        // Compare the two plan trees, if they are the same, it means the plan tree not changed
        let new_plan = self.graph.to_plan();
        Ok(original_plan == new_plan)
    }

    /// return true if the rule is applied which means the rule matched and the plan tree changed.
    fn apply_rule(
        &mut self,
        rule: RuleImpl,
        node_id: HepNodeId,
        context: &mut StatementContext,
    ) -> Result<bool, OptimizerError> {
        let matcher = HepMatcher::new(rule.pattern(), node_id, &self.graph);

        let opt_expr = match matcher.match_opt_expr() {
            Some(opt_expr) => opt_expr,
            None => return Ok(false),
        };

        let mut substitute = Substitute::default();
        rule.apply(opt_expr, context, &mut substitute)?;

        match substitute.opt_exprs.len() {
            // the rule declined under the current context
            0 => Ok(false),
            1 => {
                let new_opt_expr = substitute.opt_exprs.into_iter().next().unwrap();
                self.graph.replace_node(node_id, new_opt_expr);
                debug!(target: LOGGING_TARGET, "applied {:?} at node {:?}", rule, node_id);
                Ok(true)
            }
            n => Err(OptimizerError::Internal(format!(
                "rule {:?} produced {} substitutes, the heuristic driver replaces one node with one sub-tree",
                rule, n
            ))),
        }
    }
}
