//! SQL text for the tables and joins being visualized.
//!
//! Output is plain templated text; nothing here is ever executed.

mod ddl;
mod select;

pub use ddl::{
    generate_create_table_sql, generate_create_table_sql_in, generate_create_table_sql_with_names,
    generate_schema_sql,
};
pub use select::generate_join_sql;
