//! CREATE TABLE statement text.

use crate::model::{Column, DatabaseSchema, Table};
use std::collections::HashMap;

/// `CREATE TABLE` for `table`, with foreign keys referencing raw table and
/// column ids.
pub fn generate_create_table_sql(table: &Table) -> String {
    render_create_table(table, |column| {
        let fk = column.foreign_key_ref.as_ref()?;
        Some((fk.table_id.clone(), fk.column_id.clone()))
    })
}

/// Like [`generate_create_table_sql`], but referenced ids are mapped to
/// display names through the lookups. Ids missing from a lookup are written
/// as-is.
pub fn generate_create_table_sql_with_names(
    table: &Table,
    table_names: &HashMap<String, String>,
    column_names: &HashMap<String, String>,
) -> String {
    render_create_table(table, |column| {
        let fk = column.foreign_key_ref.as_ref()?;
        let t = table_names.get(&fk.table_id).unwrap_or(&fk.table_id);
        let c = column_names.get(&fk.column_id).unwrap_or(&fk.column_id);
        Some((t.clone(), c.clone()))
    })
}

/// DDL for one table of `schema`, with references resolved to the names of
/// the schema's tables and columns.
///
/// Column ids are only unique per table, so each reference is resolved
/// against the table it points at. Unknown ids are written as-is.
pub fn generate_create_table_sql_in(schema: &DatabaseSchema, table: &Table) -> String {
    render_create_table(table, |column| {
        let fk = column.foreign_key_ref.as_ref()?;
        let Some(target) = schema.table(&fk.table_id) else {
            return Some((fk.table_id.clone(), fk.column_id.clone()));
        };
        let target_column = target
            .find_column(&fk.column_id)
            .map_or(&fk.column_id, |c| &c.name);
        Some((target.name.clone(), target_column.clone()))
    })
}

/// DDL for every table of the schema, separated by blank lines.
pub fn generate_schema_sql(schema: &DatabaseSchema) -> String {
    schema
        .tables
        .iter()
        .map(|t| generate_create_table_sql_in(schema, t))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_create_table<F>(table: &Table, mut reference: F) -> String
where
    F: FnMut(&Column) -> Option<(String, String)>,
{
    let mut defs: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("  {} {}", c.name, c.typ))
        .collect();

    let pk: Vec<&str> = table.primary_key_columns().map(|c| c.name.as_str()).collect();
    if !pk.is_empty() {
        defs.push(format!("  PRIMARY KEY ({})", pk.join(", ")));
    }

    for column in table.columns.iter().filter(|c| c.is_foreign_key) {
        if let Some((target_table, target_column)) = reference(column) {
            defs.push(format!(
                "  FOREIGN KEY ({}) REFERENCES {}({})",
                column.name, target_table, target_column
            ));
        }
    }

    format!("CREATE TABLE {} (\n{}\n);", table.name, defs.join(",\n"))
}
