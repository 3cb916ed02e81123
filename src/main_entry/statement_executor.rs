use std::sync::{Arc, Mutex};

use log::debug;

use super::CompilerError;
use crate::optimizer::{
    HepBatch, HepBatchStrategy, HepOptimizer, OptimizerError, PlanRef, RuleSet, RuleStage,
};
use crate::planner::{SelectHint, StatementContext};
use crate::session::SessionVariables;
use crate::util::pretty_plan_tree_string;

static LOGGING_TARGET: &str = "optrs::main_entry";

/// Compiles statements one at a time against a session. Per-statement hints
/// are applied before the rule engine runs, and the session configuration is
/// restored however compilation ends, so an override never leaks into the
/// next statement.
pub struct StatementExecutor {
    session_vars: Arc<Mutex<SessionVariables>>,
}

impl StatementExecutor {
    pub fn new(session_vars: Arc<Mutex<SessionVariables>>) -> Self {
        Self { session_vars }
    }

    /// Compile one analyzed logical plan into a physical plan.
    pub fn compile(
        &self,
        plan: PlanRef,
        hints: &[SelectHint],
    ) -> Result<PlanRef, CompilerError> {
        let mut context = StatementContext::new(self.session_vars.clone());
        let result = Self::compile_with_context(&mut context, plan, hints);
        // the context's Drop also restores, covering panics and cancellation;
        // the explicit call keeps the normal path deterministic
        context.restore_session_vars();
        result
    }

    fn compile_with_context(
        context: &mut StatementContext,
        plan: PlanRef,
        hints: &[SelectHint],
    ) -> Result<PlanRef, CompilerError> {
        for hint in hints {
            debug!(target: LOGGING_TARGET, "applying hint {}", hint);
            match hint {
                SelectHint::SetVar(set_var) => set_var.set_var_once_in_sql(context)?,
            }
        }

        let rule_set = RuleSet::compiler_default()?;
        let batches = vec![
            HepBatch::new(
                "Rewrite".to_string(),
                HepBatchStrategy::fix_point_topdown(10),
                rule_set.rules_for_stage(RuleStage::Rewrite),
            ),
            HepBatch::new(
                "Implementation".to_string(),
                HepBatchStrategy::fix_point_bottomup(100),
                rule_set.rules_for_stage(RuleStage::Implementation),
            ),
        ];
        let mut optimizer = HepOptimizer::new(batches, plan);
        let physical_plan = optimizer.find_best(context)?;

        Self::check_fully_physical(&physical_plan)?;
        debug!(
            target: LOGGING_TARGET,
            "physical plan:\n{}",
            pretty_plan_tree_string(&*physical_plan)
        );
        Ok(physical_plan)
    }

    /// A logical node left over after the implementation stage means no rule
    /// converted it; the statement fails rather than hand a partial plan to
    /// the execution runtime.
    fn check_fully_physical(plan: &PlanRef) -> Result<(), OptimizerError> {
        if plan.is_logical_plan() {
            return Err(OptimizerError::NoImplementationRule(
                plan.to_string().trim_end().to_string(),
            ));
        }
        for child in plan.children() {
            Self::check_fully_physical(&child)?;
        }
        Ok(())
    }
}
