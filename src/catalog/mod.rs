use std::collections::BTreeMap;
use std::fmt;

use arrow::datatypes::DataType;
use derive_new::new;

/// use database name as id for simplicity
pub type DatabaseId = String;
/// use table name as id for simplicity
pub type TableId = String;
/// use column name as id for simplicity
pub type ColumnId = String;

/// How a table is backed, which decides what a sink may write into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// table managed by the native storage engine
    Olap,
    /// table backed by an external connector, e.g. a jdbc source
    External,
    /// a logical view, never writable
    View,
}

#[derive(Clone, PartialEq)]
pub struct TableCatalog {
    pub id: TableId,
    pub name: String,
    pub kind: TableKind,
    /// column_ids to keep the order of inferred columns
    pub column_ids: Vec<ColumnId>,
    pub columns: BTreeMap<ColumnId, ColumnCatalog>,
}

impl TableCatalog {
    pub fn new(id: TableId, kind: TableKind, columns: Vec<ColumnCatalog>) -> Self {
        let column_ids = columns.iter().map(|c| c.column_id.clone()).collect();
        let columns = columns
            .into_iter()
            .map(|c| (c.column_id.clone(), c))
            .collect();
        Self {
            name: id.clone(),
            id,
            kind,
            column_ids,
            columns,
        }
    }

    pub fn get_column_by_name(&self, name: &str) -> Option<ColumnCatalog> {
        self.columns.get(name).cloned()
    }

    pub fn get_all_columns(&self) -> Vec<ColumnCatalog> {
        self.column_ids
            .iter()
            .map(|id| self.columns.get(id).cloned().unwrap())
            .collect()
    }
}

#[derive(Clone, PartialEq)]
pub struct ColumnCatalog {
    pub table_id: TableId,
    pub column_id: ColumnId,
    pub nullable: bool,
    pub desc: ColumnDesc,
}

#[derive(Debug, Clone, PartialEq, new)]
pub struct ColumnDesc {
    pub name: String,
    pub data_type: DataType,
}

impl fmt::Debug for ColumnCatalog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}.{}:{:?}",
            self.table_id, self.column_id, self.desc.data_type
        )
    }
}

impl fmt::Debug for TableCatalog {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            r#"{} ({:?}) {{
    columns: {:?}
}}"#,
            self.id,
            self.kind,
            self.get_all_columns()
        )
    }
}
