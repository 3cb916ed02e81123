use std::sync::{Arc, Mutex};

use anyhow::Result;
use arrow::datatypes::DataType;
use optrs::binder::{BoundColumnRef, BoundExpr};
use optrs::catalog::{ColumnCatalog, ColumnDesc, TableCatalog, TableKind};
use optrs::optimizer::{LogicalProject, LogicalTableScan, LogicalTableSink, PlanRef};
use optrs::planner::{SelectHint, SetVarHint};
use optrs::session::{SessionVariables, QUERY_TIMEOUT};
use optrs::util::pretty_plan_tree;
use optrs::StatementExecutor;

fn build_column(table_id: &str, name: &str, data_type: DataType) -> ColumnCatalog {
    ColumnCatalog {
        table_id: table_id.to_string(),
        column_id: name.to_string(),
        nullable: false,
        desc: ColumnDesc::new(name.to_string(), data_type),
    }
}

fn build_column_ref(table_id: &str, name: &str, data_type: DataType) -> BoundExpr {
    BoundExpr::ColumnRef(BoundColumnRef {
        column_catalog: build_column(table_id, name, data_type),
    })
}

/// insert into ext_db.events(id, name) select id, name from src
fn build_insert_plan() -> PlanRef {
    let scan = Arc::new(LogicalTableScan::new(
        "src".to_string(),
        vec![
            build_column("src", "id", DataType::Int64),
            build_column("src", "name", DataType::Utf8),
        ],
    ));
    let project = Arc::new(LogicalProject::new(
        vec![
            build_column_ref("src", "id", DataType::Int64),
            build_column_ref("src", "name", DataType::Utf8),
        ],
        scan,
    ));
    let target = TableCatalog::new(
        "events".to_string(),
        TableKind::External,
        vec![
            build_column("events", "id", DataType::Int64),
            build_column("events", "name", DataType::Utf8),
        ],
    );
    Arc::new(LogicalTableSink::new(
        "ext_db".to_string(),
        target,
        vec![
            build_column("events", "id", DataType::Int64),
            build_column("events", "name", DataType::Utf8),
        ],
        vec![
            build_column_ref("src", "id", DataType::Int64),
            build_column_ref("src", "name", DataType::Utf8),
        ],
        project,
    ))
}

fn main() -> Result<()> {
    env_logger::init();

    // 1. session configuration shared by the statements on this session
    let session_vars = Arc::new(Mutex::new(SessionVariables::new()));
    let before = session_vars.lock().unwrap().get(QUERY_TIMEOUT)?;
    println!("query_timeout before statement = {}", before);

    // 2. the analyzed statement: an insert into an external table
    let plan = build_insert_plan();
    println!("logical plan:");
    pretty_plan_tree(&*plan);

    // 3. per-statement directive overriding session configuration
    let hint = SetVarHint::parse("set_var(query_timeout='1800', exec_mem_limit='8589934592')")?;
    println!("hint: {}", hint);

    // 4. compile the logical plan into a physical plan
    let executor = StatementExecutor::new(session_vars.clone());
    let physical_plan = executor.compile(plan, &[SelectHint::SetVar(hint)])?;
    println!("physical plan:");
    pretty_plan_tree(&*physical_plan);

    // 5. the override was scoped to the statement
    let after = session_vars.lock().unwrap().get(QUERY_TIMEOUT)?;
    println!("query_timeout after statement = {}", after);

    Ok(())
}
