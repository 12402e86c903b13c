pub mod datasets;
pub mod error;
pub mod join;
pub mod model;
pub mod related;
pub mod selection;
pub mod sql;
pub mod table_text;

use wasm_bindgen::prelude::*;

use datasets::Dataset;
use error::JoinlabError;
use join::{compute_join, JoinType};
use model::{DatabaseSchema, Table};
use related::find_all_related_rows;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn parse_table(json: &str) -> Result<Table, JoinlabError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_schema(json: &str) -> Result<DatabaseSchema, JoinlabError> {
    Ok(serde_json::from_str(json)?)
}

/// Join two JSON tables and return the JSON join result
#[wasm_bindgen(js_name = "computeJoin")]
pub fn compute_join_json(
    left: &str,
    right: &str,
    left_column_id: &str,
    right_column_id: &str,
    join_type: &str,
) -> Result<String, String> {
    let run = || -> Result<String, JoinlabError> {
        let join_type: JoinType = join_type.parse()?;
        let result = compute_join(
            &parse_table(left)?,
            &parse_table(right)?,
            left_column_id,
            right_column_id,
            join_type,
        );
        Ok(serde_json::to_string(&result)?)
    };
    run().map_err(|e| e.to_string())
}

/// Related rows of one row as a JSON object of table id -> row ids
#[wasm_bindgen(js_name = "findAllRelatedRows")]
pub fn find_all_related_rows_json(schema: &str, table_id: &str, row_id: &str) -> Result<String, String> {
    let run = || -> Result<String, JoinlabError> {
        let schema = parse_schema(schema)?;
        let (table, row) = schema.locate(table_id, row_id)?;
        let related = find_all_related_rows(row, table, &schema);
        Ok(serde_json::to_string(&related)?)
    };
    run().map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "createTableSql")]
pub fn create_table_sql(table: &str) -> Result<String, String> {
    parse_table(table)
        .map(|t| sql::generate_create_table_sql(&t))
        .map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "schemaSql")]
pub fn schema_sql(schema: &str) -> Result<String, String> {
    parse_schema(schema)
        .map(|s| sql::generate_schema_sql(&s))
        .map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "joinSql")]
pub fn join_sql(
    left: &str,
    right: &str,
    left_column_id: &str,
    right_column_id: &str,
    join_type: &str,
) -> Result<String, String> {
    let run = || -> Result<String, JoinlabError> {
        Ok(sql::generate_join_sql(
            &parse_table(left)?,
            &parse_table(right)?,
            left_column_id,
            right_column_id,
            join_type.parse::<JoinType>()?,
        ))
    };
    run().map_err(|e| e.to_string())
}

/// Built-in sample schema as JSON
#[wasm_bindgen(js_name = "datasetJson")]
pub fn dataset_json(name: &str) -> Result<String, String> {
    let run = || -> Result<String, JoinlabError> {
        let dataset: Dataset = name.parse()?;
        Ok(serde_json::to_string(&dataset.schema())?)
    };
    run().map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "datasetNames")]
pub fn dataset_names() -> js_sys::Array {
    Dataset::ALL
        .iter()
        .map(|d| JsValue::from_str(d.name()))
        .collect()
}

/// The normalization walkthrough (UNF to 3NF snapshots and anomalies) as JSON
#[wasm_bindgen(js_name = "normalizationScenario")]
pub fn normalization_scenario() -> Result<String, String> {
    serde_json::to_string(&datasets::student_enrollment()).map_err(|e| e.to_string())
}
