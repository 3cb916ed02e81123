use super::OptExpr;
use crate::optimizer::PlanRef;

/// Structural predicate over one plan node, tested against the node's kind
/// only, never its physical properties.
pub type PlanNodePredicate = fn(&PlanRef) -> bool;

/// A declarative shape-matcher over plan-node kind and child structure.
/// Stateless and reusable across rule invocations.
pub struct Pattern {
    /// matched against the node the pattern is rooted at
    pub predicate: PlanNodePredicate,
    pub children: PatternChildrenPredicate,
}

pub enum PatternChildrenPredicate {
    /// match the node's children, and their descendants, with the root
    /// predicate recursively; the whole sub-tree is captured
    MatchedRecursive,
    /// match each child against its positional pattern; a child-count
    /// mismatch is a non-match, not an error
    Predicate(Vec<Pattern>),
    /// the open pattern: child structure is deliberately unconstrained, a
    /// node of the right kind matches whatever its children are. Children
    /// are captured as existing-node placeholders for the rule to keep.
    None,
}

/// Matches a [`Pattern`] against a plan and yields the matched sub-tree.
pub trait PatternMatcher {
    fn match_opt_expr(&self) -> Option<OptExpr>;
}
