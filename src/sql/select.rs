//! SELECT ... JOIN statement text.

use crate::join::JoinType;
use crate::model::Table;

/// `SELECT *` joining `left` to `right` on the given column ids.
///
/// CROSS joins carry no `ON` clause. Unknown column ids are written as-is.
pub fn generate_join_sql(
    left: &Table,
    right: &Table,
    left_column_id: &str,
    right_column_id: &str,
    join_type: JoinType,
) -> String {
    let keyword = join_type.keyword();

    if join_type == JoinType::Cross {
        return format!("SELECT *\nFROM {}\n{} {};", left.name, keyword, right.name);
    }

    format!(
        "SELECT *\nFROM {left}\n{keyword} {right}\n  ON {left}.{lc} = {right}.{rc};",
        left = left.name,
        right = right.name,
        keyword = keyword,
        lc = left.cell_key(left_column_id),
        rc = right.cell_key(right_column_id),
    )
}
