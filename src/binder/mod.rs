#[cfg(test)]
pub mod test_util;

use arrow::datatypes::DataType;

use crate::catalog::ColumnCatalog;
use crate::types::ScalarValue;

/// An analyzed expression carried by plan nodes. Binding happened during
/// analysis, so every column reference already resolved to its catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpr {
    Constant(ScalarValue),
    ColumnRef(BoundColumnRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundColumnRef {
    pub column_catalog: ColumnCatalog,
}

impl BoundExpr {
    pub fn return_type(&self) -> DataType {
        match self {
            BoundExpr::Constant(value) => value.data_type(),
            BoundExpr::ColumnRef(column_ref) => {
                column_ref.column_catalog.desc.data_type.clone()
            }
        }
    }

    /// The output column identity this expression produces. Constants get an
    /// anonymous column named after their rendered value.
    pub fn output_column(&self) -> ColumnCatalog {
        match self {
            BoundExpr::ColumnRef(column_ref) => column_ref.column_catalog.clone(),
            BoundExpr::Constant(value) => ColumnCatalog {
                table_id: "".to_string(),
                column_id: value.to_string(),
                nullable: true,
                desc: crate::catalog::ColumnDesc::new(value.to_string(), value.data_type()),
            },
        }
    }

    /// Catalog columns referenced by this expression, empty for constants.
    pub fn referenced_columns(&self) -> Vec<ColumnCatalog> {
        match self {
            BoundExpr::ColumnRef(column_ref) => vec![column_ref.column_catalog.clone()],
            BoundExpr::Constant(_) => vec![],
        }
    }
}

impl std::fmt::Display for BoundExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundExpr::Constant(value) => write!(f, "{}", value),
            BoundExpr::ColumnRef(column_ref) => write!(
                f,
                "{}.{}",
                column_ref.column_catalog.table_id, column_ref.column_catalog.column_id
            ),
        }
    }
}
