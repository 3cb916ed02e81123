use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use super::{Distribution, LogicalProject, PlanNode, PlanRef, PlanTreeNode};
use crate::catalog::ColumnCatalog;

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalProject {
    logical: LogicalProject,
    distribution: Distribution,
}

impl PhysicalProject {
    pub fn new(logical: LogicalProject) -> Self {
        Self {
            logical,
            distribution: Distribution::Any,
        }
    }

    pub fn logical(&self) -> &LogicalProject {
        &self.logical
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }
}

impl PlanNode for PhysicalProject {
    fn referenced_columns(&self) -> Vec<ColumnCatalog> {
        self.logical.referenced_columns()
    }

    fn output_columns(&self) -> Vec<ColumnCatalog> {
        self.logical.output_columns()
    }
}

impl PlanTreeNode for PhysicalProject {
    fn children(&self) -> Vec<PlanRef> {
        self.logical.children()
    }

    fn clone_with_children(&self, children: Vec<PlanRef>) -> PlanRef {
        assert_eq!(children.len(), 1);
        let logical = LogicalProject::new(self.logical.exprs().to_vec(), children[0].clone());
        Arc::new(Self::new(logical))
    }
}

impl fmt::Display for PhysicalProject {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "PhysicalProject: exprs: [{}], dist: {}",
            self.logical.exprs().iter().join(", "),
            self.distribution,
        )
    }
}
