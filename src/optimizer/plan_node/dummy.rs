use std::fmt;
use std::sync::Arc;

use super::{PlanNode, PlanRef, PlanTreeNode};
use crate::catalog::ColumnCatalog;

/// Placeholder node standing in for children a rule does not care about.
#[derive(Debug, Clone, PartialEq)]
pub struct Dummy;

impl Dummy {
    pub fn new_ref() -> PlanRef {
        Arc::new(Self)
    }
}

impl PlanNode for Dummy {
    fn referenced_columns(&self) -> Vec<ColumnCatalog> {
        vec![]
    }

    fn output_columns(&self) -> Vec<ColumnCatalog> {
        vec![]
    }
}

impl PlanTreeNode for Dummy {
    fn children(&self) -> Vec<PlanRef> {
        vec![]
    }

    fn clone_with_children(&self, _children: Vec<PlanRef>) -> PlanRef {
        Dummy::new_ref()
    }
}

impl fmt::Display for Dummy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Dummy:")
    }
}
