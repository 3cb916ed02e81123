use std::fmt;
use std::sync::Arc;

use itertools::Itertools;

use super::{PlanNode, PlanRef, PlanTreeNode};
use crate::binder::BoundExpr;
use crate::catalog::{ColumnCatalog, DatabaseId, TableCatalog};

/// Writes its input into a target table bound during analysis. The target may
/// be native or external; which physical form it takes is decided by the
/// implementation rules.
#[derive(Debug, Clone)]
pub struct LogicalTableSink {
    database: DatabaseId,
    table: TableCatalog,
    /// insert column list, in insert order
    cols: Vec<ColumnCatalog>,
    /// expressions producing the rows to write, aligned with `cols`
    output_exprs: Vec<BoundExpr>,
    input: PlanRef,
}

impl LogicalTableSink {
    pub fn new(
        database: DatabaseId,
        table: TableCatalog,
        cols: Vec<ColumnCatalog>,
        output_exprs: Vec<BoundExpr>,
        input: PlanRef,
    ) -> Self {
        Self {
            database,
            table,
            cols,
            output_exprs,
            input,
        }
    }

    pub fn database(&self) -> &DatabaseId {
        &self.database
    }

    pub fn table(&self) -> &TableCatalog {
        &self.table
    }

    pub fn cols(&self) -> &[ColumnCatalog] {
        &self.cols
    }

    pub fn output_exprs(&self) -> &[BoundExpr] {
        &self.output_exprs
    }

    /// Resolve the write target. Cheap here, but statement compilation
    /// memoizes it through the context cache keyed by the qualified name, so
    /// repeated sinks into one table resolve once.
    pub fn resolve_target(&self) -> SinkTarget {
        SinkTarget {
            database: self.database.clone(),
            table: self.table.clone(),
            writable_columns: self.table.get_all_columns(),
        }
    }
}

impl PartialEq for LogicalTableSink {
    fn eq(&self, other: &Self) -> bool {
        self.database == other.database
            && self.table == other.table
            && self.cols == other.cols
            && self.output_exprs == other.output_exprs
            && self.input == other.input.clone()
    }
}

/// Resolved write target of a table sink.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkTarget {
    pub database: DatabaseId,
    pub table: TableCatalog,
    pub writable_columns: Vec<ColumnCatalog>,
}

impl SinkTarget {
    pub fn cache_key(database: &str, table: &str) -> String {
        format!("sink_target:{}.{}", database, table)
    }
}

impl PlanNode for LogicalTableSink {
    fn referenced_columns(&self) -> Vec<ColumnCatalog> {
        self.cols.clone()
    }

    fn output_columns(&self) -> Vec<ColumnCatalog> {
        self.output_exprs.iter().map(|e| e.output_column()).collect()
    }
}

impl PlanTreeNode for LogicalTableSink {
    fn children(&self) -> Vec<PlanRef> {
        vec![self.input.clone()]
    }

    fn clone_with_children(&self, children: Vec<PlanRef>) -> PlanRef {
        assert_eq!(children.len(), 1);
        Arc::new(Self::new(
            self.database.clone(),
            self.table.clone(),
            self.cols.clone(),
            self.output_exprs.clone(),
            children[0].clone(),
        ))
    }
}

impl fmt::Display for LogicalTableSink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(
            f,
            "LogicalTableSink: table: #{}.{}, columns: [{}], exprs: [{}]",
            self.database,
            self.table.name,
            self.cols.iter().map(|c| c.column_id.clone()).join(", "),
            self.output_exprs.iter().join(", "),
        )
    }
}
