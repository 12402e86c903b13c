//! Row-click highlighting as an explicit state value.
//!
//! A view keeps a [`Selection`] and replaces it with the one returned by
//! [`Selection::click_row`]; nothing is stored globally.

use crate::model::DatabaseSchema;
use crate::related::{find_all_related_rows, RelatedRows};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedRow {
    pub table_id: String,
    pub row_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    pub selected: Option<SelectedRow>,
    /// Rows to highlight, including the selected row itself.
    pub highlighted: RelatedRows,
}

impl Selection {
    /// State after clicking `row_id` in `table_id`.
    ///
    /// Clicking the selected row again clears the selection. A click on a
    /// table or row the schema does not have changes nothing.
    pub fn click_row(&self, schema: &DatabaseSchema, table_id: &str, row_id: &str) -> Selection {
        if let Some(sel) = &self.selected {
            if sel.table_id == table_id && sel.row_id == row_id {
                return Selection::default();
            }
        }

        let Some(table) = schema.table(table_id) else {
            return self.clone();
        };
        let Some(row) = table.find_row(row_id) else {
            return self.clone();
        };

        let mut highlighted = find_all_related_rows(row, table, schema);
        highlighted
            .entry(table_id.to_string())
            .or_default()
            .insert(row_id.to_string());

        Selection {
            selected: Some(SelectedRow {
                table_id: table_id.to_string(),
                row_id: row_id.to_string(),
            }),
            highlighted,
        }
    }

    pub fn is_highlighted(&self, table_id: &str, row_id: &str) -> bool {
        self.highlighted
            .get(table_id)
            .is_some_and(|rows| rows.contains(row_id))
    }

    pub fn is_selected(&self, table_id: &str, row_id: &str) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|s| s.table_id == table_id && s.row_id == row_id)
    }
}
