//! Plain-text grids for terminal output.

use crate::join::JoinResult;
use crate::model::{CellValue, Row, Table};
use crate::related::RelatedRows;
use unicode_width::UnicodeWidthStr;

pub struct TextGrid {
    headers: Vec<String>,
    lines: Vec<Vec<String>>,
}

impl TextGrid {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            lines: Vec::new(),
        }
    }

    pub fn push(&mut self, cells: Vec<String>) {
        self.lines.push(cells);
    }

    fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.width()).collect();
        for line in &self.lines {
            for (i, cell) in line.iter().enumerate() {
                if let Some(w) = widths.get_mut(i) {
                    *w = (*w).max(cell.width());
                }
            }
        }
        widths
    }

    pub fn render(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();

        write_line(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_line(&mut out, &rule, &widths);
        for line in &self.lines {
            write_line(&mut out, line, &widths);
        }
        out
    }
}

/// Pad by display width so wide characters keep columns aligned.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

fn write_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| pad(cells.get(i).map(String::as_str).unwrap_or(""), *w))
        .collect();
    out.push_str("| ");
    out.push_str(&padded.join(" | "));
    out.push_str(" |\n");
}

fn cell_text(row: Option<&Row>, column: &str) -> String {
    match row {
        Some(r) => r.cell(column).to_string(),
        None => CellValue::Null.to_string(),
    }
}

pub fn render_table(table: &Table) -> String {
    let names: Vec<String> = table.columns.iter().map(|c| c.name.clone()).collect();
    let mut grid = TextGrid::new(names.clone());
    for row in &table.rows {
        grid.push(names.iter().map(|n| cell_text(Some(row), n)).collect());
    }
    format!("{}\n{}", table.name, grid.render())
}

/// Join result with every column of both tables, prefixed by table name.
pub fn render_join(result: &JoinResult, left: &Table, right: &Table) -> String {
    let mut headers = vec![String::new()];
    headers.extend(left.columns.iter().map(|c| format!("{}.{}", left.name, c.name)));
    headers.extend(right.columns.iter().map(|c| format!("{}.{}", right.name, c.name)));

    let mut grid = TextGrid::new(headers);
    for row in &result.rows {
        let marker = if row.is_matched { "=" } else { " " };
        let mut cells = vec![marker.to_string()];
        cells.extend(left.columns.iter().map(|c| cell_text(row.left_row.as_ref(), &c.name)));
        cells.extend(right.columns.iter().map(|c| cell_text(row.right_row.as_ref(), &c.name)));
        grid.push(cells);
    }

    let counts = result.counts();
    format!(
        "{}\n\n{}\n{} row(s): {} matched, {} left only, {} right only\n",
        result.sql,
        grid.render(),
        result.rows.len(),
        counts.matched,
        counts.unmatched_left,
        counts.unmatched_right
    )
}

pub fn render_related(related: &RelatedRows) -> String {
    let mut grid = TextGrid::new(vec!["table".to_string(), "rows".to_string()]);
    for (table, rows) in related {
        grid.push(vec![
            table.clone(),
            rows.iter().map(String::as_str).collect::<Vec<_>>().join(", "),
        ]);
    }
    grid.render()
}
