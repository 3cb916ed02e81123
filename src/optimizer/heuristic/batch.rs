use derive_new::new;

use crate::optimizer::rules::RuleImpl;

#[derive(Clone, Copy)]
pub enum HepMatchOrder {
    /// Match from root down. A match attempt at an ancestor always precedes all match attempts at
    /// its descendants.
    TopDown,
    /// Match from leaves up. A match attempt at a descendant precedes all match attempts at its
    /// ancestors, so conversions may rely on already-converted children.
    BottomUp,
}

/// One group of rules driven together over the plan until it stops changing
/// or the iteration cap is hit.
#[derive(Clone, new)]
pub struct HepBatch {
    pub name: String,
    pub strategy: HepBatchStrategy,
    pub rules: Vec<RuleImpl>,
}

#[derive(Clone)]
pub struct HepBatchStrategy {
    /// An execution_strategy includes a strategy to indicate the maximum number of executions
    pub max_iteration: usize,
    pub match_order: HepMatchOrder,
}

impl HepBatchStrategy {
    pub fn once_topdown() -> Self {
        Self {
            max_iteration: 1,
            match_order: HepMatchOrder::TopDown,
        }
    }

    pub fn fix_point_topdown(max_iteration: usize) -> Self {
        Self {
            max_iteration,
            match_order: HepMatchOrder::TopDown,
        }
    }

    pub fn fix_point_bottomup(max_iteration: usize) -> Self {
        Self {
            max_iteration,
            match_order: HepMatchOrder::BottomUp,
        }
    }
}
