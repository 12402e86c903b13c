//! Tables, rows and foreign-key relationships shared by the join and
//! traversal engines.
//!
//! Field names serialize in camelCase so the same JSON the browser UI holds
//! can be handed to the engines unchanged.

use crate::error::JoinlabError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Integer,
    Text,
    Date,
    Boolean,
    Decimal,
}

impl ColumnType {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Date => "DATE",
            Self::Boolean => "BOOLEAN",
            Self::Decimal => "DECIMAL",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRef {
    pub table_id: String,
    pub column_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub id: String,
    /// Cell lookup key within a row.
    pub name: String,
    #[serde(rename = "type")]
    pub typ: ColumnType,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreign_key_ref: Option<ForeignKeyRef>,
    pub is_nullable: bool,
}

impl Column {
    /// Column whose id and name are the same, which is how every sample
    /// dataset is authored.
    pub fn new(name: impl Into<String>, typ: ColumnType) -> Self {
        let name = name.into();
        Self::with_id(name.clone(), name, typ)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>, typ: ColumnType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            typ,
            is_primary_key: false,
            is_foreign_key: false,
            foreign_key_ref: None,
            is_nullable: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn references(mut self, table_id: impl Into<String>, column_id: impl Into<String>) -> Self {
        self.is_foreign_key = true;
        self.foreign_key_ref = Some(ForeignKeyRef {
            table_id: table_id.into(),
            column_id: column_id.into(),
        });
        self
    }

    pub fn nullable(mut self) -> Self {
        self.is_nullable = true;
        self
    }
}

/// A single cell. JSON `null` and a missing key both read as [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

static NULL: CellValue = CellValue::Null;

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value as a browser would stringify it with `String(v)`.
    ///
    /// Keys are compared through this rendering, so `1`, `1.0` and `"1"`
    /// are all the same key.
    pub fn coerced(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed("null"),
            Self::Bool(true) => Cow::Borrowed("true"),
            Self::Bool(false) => Cow::Borrowed("false"),
            Self::Number(n) => Cow::Owned(format_number(*n)),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }

    /// Loose key equality: neither side null and both coerce to the same
    /// string. Null never matches, not even another null.
    pub fn matches(&self, other: &CellValue) -> bool {
        if self.is_null() || other.is_null() {
            return false;
        }
        self.coerced() == other.coerced()
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // covers -0.0
        return "0".to_string();
    }

    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return format!("{}", n);
    }

    // Exponent form, with an explicit sign on positive exponents.
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            other => f.write_str(&other.coerced()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Unique within its table.
    pub id: String,
    #[serde(default)]
    pub cells: BTreeMap<String, CellValue>,
}

impl Row {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Value under a column name, null when the key is absent.
    pub fn cell(&self, name: &str) -> &CellValue {
        self.cells.get(name).unwrap_or(&NULL)
    }
}

/// Build a [`Row`] from `column: value` pairs.
///
/// ```
/// use joinlab::row;
/// let r = row!("cust-1", { customer_id: 1, name: "Alice" });
/// assert_eq!(r.cell("name").coerced(), "Alice");
/// ```
#[macro_export]
macro_rules! row {
    ($id:expr, { $($col:ident : $val:expr),* $(,)? }) => {
        $crate::model::Row::new($id)$(.with(stringify!($col), $val))*
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Table {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            position: None,
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn rows(mut self, rows: impl IntoIterator<Item = Row>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn find_column(&self, column_id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    pub fn find_row(&self, row_id: &str) -> Option<&Row> {
        self.rows.iter().find(|r| r.id == row_id)
    }

    /// Cell key for a column id: the column's name, or the id itself when
    /// the table has no such column.
    pub fn cell_key<'a>(&'a self, column_id: &'a str) -> &'a str {
        self.find_column(column_id)
            .map(|c| c.name.as_str())
            .unwrap_or(column_id)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    #[serde(rename = "1:1")]
    OneToOne,
    #[serde(rename = "1:N")]
    OneToMany,
    #[serde(rename = "M:N")]
    ManyToMany,
}

/// `source_table.source_column` values reference
/// `target_table.target_column` values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyRelationship {
    pub id: String,
    pub source_table_id: String,
    pub source_column_id: String,
    pub target_table_id: String,
    pub target_column_id: String,
    #[serde(rename = "type")]
    pub typ: RelationshipType,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DatabaseSchema {
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<ForeignKeyRelationship>,
}

impl DatabaseSchema {
    pub fn table(&self, table_id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == table_id)
    }

    /// Resolve caller-supplied ids, reporting which one is unknown.
    pub fn locate(&self, table_id: &str, row_id: &str) -> Result<(&Table, &Row), JoinlabError> {
        let table = self
            .table(table_id)
            .ok_or_else(|| JoinlabError::UnknownTable(table_id.to_string()))?;
        let row = table.find_row(row_id).ok_or_else(|| JoinlabError::UnknownRow {
            table: table_id.to_string(),
            row: row_id.to_string(),
        })?;
        Ok((table, row))
    }

    pub fn require_table(&self, table_id: &str) -> Result<&Table, JoinlabError> {
        self.table(table_id)
            .ok_or_else(|| JoinlabError::UnknownTable(table_id.to_string()))
    }

    /// Schema whose relationships are read off the tables' own
    /// `foreign_key_ref` declarations.
    pub fn from_tables(tables: Vec<Table>) -> Self {
        let relationships = Self::relationships_from_columns(&tables);
        Self {
            tables,
            relationships,
        }
    }

    pub fn relationships_from_columns(tables: &[Table]) -> Vec<ForeignKeyRelationship> {
        tables
            .iter()
            .flat_map(|t| {
                t.columns.iter().filter_map(move |c| {
                    let fk = c.foreign_key_ref.as_ref().filter(|_| c.is_foreign_key)?;
                    Some(ForeignKeyRelationship {
                        id: format!("fk-{}-{}", t.id, c.id),
                        source_table_id: t.id.clone(),
                        source_column_id: c.id.clone(),
                        target_table_id: fk.table_id.clone(),
                        target_column_id: fk.column_id.clone(),
                        typ: RelationshipType::OneToMany,
                    })
                })
            })
            .collect()
    }
}
