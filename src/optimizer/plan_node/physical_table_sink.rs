use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use super::{Distribution, LogicalTableSink, PlanNode, PlanRef, PlanTreeNode};
use crate::catalog::ColumnCatalog;

/// Physical counterpart of [`LogicalTableSink`]. Writes go through a single
/// worker, so the required distribution is a gather.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalTableSink {
    logical: LogicalTableSink,
    distribution: Distribution,
    /// execution-only binding, resolved by the fragment planner after
    /// optimization finishes
    target_partition: Option<String>,
}

impl PhysicalTableSink {
    pub fn new(logical: LogicalTableSink) -> Self {
        Self {
            logical,
            distribution: Distribution::Gather,
            target_partition: None,
        }
    }

    pub fn logical(&self) -> &LogicalTableSink {
        &self.logical
    }

    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn target_partition(&self) -> Option<&String> {
        self.target_partition.as_ref()
    }
}

impl PlanNode for PhysicalTableSink {
    fn referenced_columns(&self) -> Vec<ColumnCatalog> {
        self.logical.referenced_columns()
    }

    fn output_columns(&self) -> Vec<ColumnCatalog> {
        self.logical.output_columns()
    }
}

impl PlanTreeNode for PhysicalTableSink {
    fn children(&self) -> Vec<PlanRef> {
        self.logical.children()
    }

    fn clone_with_children(&self, children: Vec<PlanRef>) -> PlanRef {
        assert_eq!(children.len(), 1);
        let logical = LogicalTableSink::new(
            self.logical.database().clone(),
            self.logical.table().clone(),
            self.logical.cols().to_vec(),
            self.logical.output_exprs().to_vec(),
            children[0].clone(),
        );
        Arc::new(Self {
            logical,
            distribution: self.distribution.clone(),
            target_partition: self.target_partition.clone(),
        })
    }
}

impl fmt::Display for PhysicalTableSink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "PhysicalTableSink: table: #{}.{}, columns: [{}], dist: {}",
            self.logical.database(),
            self.logical.table().name,
            self.logical
                .cols()
                .iter()
                .map(|c| c.column_id.clone())
                .join(", "),
            self.distribution,
        )
    }
}
