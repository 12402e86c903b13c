//! Row-level join computation over two in-memory tables.

use crate::error::JoinlabError;
use crate::model::{Row, Table};
use crate::sql::generate_join_sql;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Step between consecutive result rows' animation delays, in seconds.
pub const ANIMATION_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinType {
    Inner,
    Left,
    Right,
    FullOuter,
    Cross,
}

impl JoinType {
    pub const ALL: [JoinType; 5] = [
        Self::Inner,
        Self::Left,
        Self::Right,
        Self::FullOuter,
        Self::Cross,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::FullOuter => "FULL OUTER JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }

    fn keeps_unmatched_left(self) -> bool {
        matches!(self, Self::Left | Self::FullOuter)
    }

    fn keeps_unmatched_right(self) -> bool {
        matches!(self, Self::Right | Self::FullOuter)
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Inner => "INNER",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::FullOuter => "FULL_OUTER",
            Self::Cross => "CROSS",
        };
        f.write_str(tag)
    }
}

impl FromStr for JoinType {
    type Err = JoinlabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inner" => Ok(Self::Inner),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            "full_outer" | "full-outer" | "full outer" | "full" => Ok(Self::FullOuter),
            "cross" => Ok(Self::Cross),
            _ => Err(JoinlabError::UnknownJoinType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResultRow {
    pub left_row: Option<Row>,
    pub right_row: Option<Row>,
    pub is_matched: bool,
    /// Presentation hint; increases with emission order.
    pub animation_delay: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResult {
    pub rows: Vec<JoinResultRow>,
    pub matched_left_ids: BTreeSet<String>,
    pub matched_right_ids: BTreeSet<String>,
    pub sql: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinCounts {
    pub matched: usize,
    pub unmatched_left: usize,
    pub unmatched_right: usize,
}

impl JoinResult {
    pub fn counts(&self) -> JoinCounts {
        self.rows
            .iter()
            .fold(JoinCounts::default(), |mut acc, row| {
                match (row.is_matched, &row.left_row, &row.right_row) {
                    (true, _, _) => acc.matched += 1,
                    (false, Some(_), None) => acc.unmatched_left += 1,
                    (false, None, Some(_)) => acc.unmatched_right += 1,
                    _ => {}
                }
                acc
            })
    }
}

/// Accumulates result rows, numbering them as they are emitted.
struct Emitter {
    rows: Vec<JoinResultRow>,
}

impl Emitter {
    fn push(&mut self, left_row: Option<&Row>, right_row: Option<&Row>, is_matched: bool) {
        let animation_delay = self.rows.len() as f64 * ANIMATION_STEP;
        self.rows.push(JoinResultRow {
            left_row: left_row.cloned(),
            right_row: right_row.cloned(),
            is_matched,
            animation_delay,
        });
    }
}

/// Join `left` and `right` on the given column ids.
///
/// Column ids that do not exist in their table are used directly as cell
/// keys. Result order: left rows outer, right rows inner; unmatched left rows
/// (LEFT, FULL_OUTER) follow their own scan, unmatched right rows (RIGHT,
/// FULL_OUTER) trail in a second pass.
pub fn compute_join(
    left: &Table,
    right: &Table,
    left_column_id: &str,
    right_column_id: &str,
    join_type: JoinType,
) -> JoinResult {
    let mut matched_left_ids = BTreeSet::new();
    let mut matched_right_ids = BTreeSet::new();
    let mut out = Emitter { rows: Vec::new() };

    let left_key = left.cell_key(left_column_id);
    let right_key = right.cell_key(right_column_id);

    if join_type == JoinType::Cross {
        for l in &left.rows {
            for r in &right.rows {
                matched_left_ids.insert(l.id.clone());
                matched_right_ids.insert(r.id.clone());
                out.push(Some(l), Some(r), true);
            }
        }
    } else {
        for l in &left.rows {
            let left_val = l.cell(left_key);
            let mut has_match = false;

            for r in &right.rows {
                if left_val.matches(r.cell(right_key)) {
                    matched_left_ids.insert(l.id.clone());
                    matched_right_ids.insert(r.id.clone());
                    out.push(Some(l), Some(r), true);
                    has_match = true;
                }
            }

            if !has_match && join_type.keeps_unmatched_left() {
                out.push(Some(l), None, false);
            }
        }

        if join_type.keeps_unmatched_right() {
            for r in &right.rows {
                if !matched_right_ids.contains(&r.id) {
                    out.push(None, Some(r), false);
                }
            }
        }
    }

    debug!(
        "{} {}.{} = {}.{}: {} rows",
        join_type,
        left.id,
        left_key,
        right.id,
        right_key,
        out.rows.len()
    );

    JoinResult {
        rows: out.rows,
        matched_left_ids,
        matched_right_ids,
        sql: generate_join_sql(left, right, left_column_id, right_column_id, join_type),
    }
}
