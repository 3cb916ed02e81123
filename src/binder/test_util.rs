use arrow::datatypes::DataType;

use super::{BoundColumnRef, BoundExpr};
use crate::catalog::{ColumnCatalog, ColumnDesc, TableCatalog, TableKind};
use crate::types::ScalarValue;

pub fn build_column_catalog(table_id: &str, column_id: &str) -> ColumnCatalog {
    ColumnCatalog {
        table_id: table_id.to_string(),
        column_id: column_id.to_string(),
        nullable: false,
        desc: ColumnDesc::new(column_id.to_string(), DataType::Int32),
    }
}

pub fn build_bound_column_ref(table_id: &str, column_id: &str) -> BoundExpr {
    BoundExpr::ColumnRef(BoundColumnRef {
        column_catalog: build_column_catalog(table_id, column_id),
    })
}

pub fn build_bound_constant(value: i32) -> BoundExpr {
    BoundExpr::Constant(ScalarValue::from(value))
}

pub fn build_table_catalog(table_id: &str, kind: TableKind, column_ids: &[&str]) -> TableCatalog {
    TableCatalog::new(
        table_id.to_string(),
        kind,
        column_ids
            .iter()
            .map(|c| build_column_catalog(table_id, c))
            .collect(),
    )
}
