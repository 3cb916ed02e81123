use std::fmt;
use std::sync::Arc;

use super::{Distribution, LogicalTableScan, PlanNode, PlanRef, PlanTreeNode};
use crate::catalog::ColumnCatalog;

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalTableScan {
    logical: LogicalTableScan,
    distribution: Distribution,
}

impl PhysicalTableScan {
    pub fn new(logical: LogicalTableScan) -> Self {
        Self {
            logical,
            distribution: Distribution::Any,
        }
    }

    pub fn logical(&self) -> &LogicalTableScan {
        &self.logical
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }
}

impl PlanNode for PhysicalTableScan {
    fn referenced_columns(&self) -> Vec<ColumnCatalog> {
        self.logical.referenced_columns()
    }

    fn output_columns(&self) -> Vec<ColumnCatalog> {
        self.logical.output_columns()
    }
}

impl PlanTreeNode for PhysicalTableScan {
    fn children(&self) -> Vec<PlanRef> {
        vec![]
    }

    fn clone_with_children(&self, children: Vec<PlanRef>) -> PlanRef {
        assert_eq!(children.len(), 0);
        Arc::new(self.clone())
    }
}

impl fmt::Display for PhysicalTableScan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "PhysicalTableScan: table: #{}, columns: [{}], dist: {}",
            self.logical.table_id(),
            self.logical.column_ids().join(", "),
            self.distribution,
        )
    }
}
