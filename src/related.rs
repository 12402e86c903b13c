//! Related-row discovery across foreign-key relationships.
//!
//! Relationships are followed in both directions, so it does not matter
//! whether the starting row sits on the referencing or the referenced side.

use crate::model::{DatabaseSchema, ForeignKeyRelationship, Row, Table};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// Table id -> ids of related rows in that table.
pub type RelatedRows = BTreeMap<String, BTreeSet<String>>;

/// Ids of rows in `target` related to `source_row` by a single hop over any
/// of `relationships`.
///
/// The same row may be listed more than once when several relationships link
/// the two tables.
pub fn find_related_rows(
    source_row: &Row,
    source: &Table,
    target: &Table,
    relationships: &[ForeignKeyRelationship],
) -> Vec<String> {
    let mut related = Vec::new();

    for rel in relationships {
        // source holds the foreign key, target is referenced
        if rel.source_table_id == source.id && rel.target_table_id == target.id {
            collect_matches(
                source_row,
                source,
                &rel.source_column_id,
                target,
                &rel.target_column_id,
                &mut related,
            );
        }

        // target holds the foreign key, source is referenced
        if rel.source_table_id == target.id && rel.target_table_id == source.id {
            collect_matches(
                source_row,
                source,
                &rel.target_column_id,
                target,
                &rel.source_column_id,
                &mut related,
            );
        }
    }

    related
}

/// Push every row of `target` whose `target_column` value matches
/// `source_row`'s `source_column` value.
fn collect_matches(
    source_row: &Row,
    source: &Table,
    source_column: &str,
    target: &Table,
    target_column: &str,
    out: &mut Vec<String>,
) {
    let (Some(sc), Some(tc)) = (source.find_column(source_column), target.find_column(target_column))
    else {
        return;
    };

    let value = source_row.cell(&sc.name);
    if value.is_null() {
        return;
    }

    out.extend(
        target
            .rows
            .iter()
            .filter(|r| value.matches(r.cell(&tc.name)))
            .map(|r| r.id.clone()),
    );
}

/// Every row in every other table reachable from `source_row` through any
/// chain of relationships.
///
/// Breadth-first; each (table, row) pair is expanded at most once, so cyclic
/// schemas terminate. The source row itself is not part of the result, and
/// only tables with at least one related row appear.
pub fn find_all_related_rows(source_row: &Row, source: &Table, schema: &DatabaseSchema) -> RelatedRows {
    let mut result = RelatedRows::new();
    let mut visited: HashSet<(&str, String)> = HashSet::new();
    visited.insert((source.id.as_str(), source_row.id.clone()));

    let mut queue: VecDeque<(&Table, Vec<String>)> = VecDeque::new();
    queue.push_back((source, vec![source_row.id.clone()]));

    while let Some((current, row_ids)) = queue.pop_front() {
        trace!("expanding {} row(s) of {}", row_ids.len(), current.id);

        for other in &schema.tables {
            if other.id == current.id {
                continue;
            }

            for row_id in &row_ids {
                let Some(row) = current.find_row(row_id) else {
                    continue;
                };

                let mut fresh = Vec::new();
                for id in find_related_rows(row, current, other, &schema.relationships) {
                    if visited.insert((other.id.as_str(), id.clone())) {
                        fresh.push(id);
                    }
                }

                if !fresh.is_empty() {
                    result
                        .entry(other.id.clone())
                        .or_default()
                        .extend(fresh.iter().cloned());
                    queue.push_back((other, fresh));
                }
            }
        }
    }

    debug!(
        "{}:{} relates to {} row(s) across {} table(s)",
        source.id,
        source_row.id,
        visited.len() - 1,
        result.len()
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnType, RelationshipType};
    use crate::row;

    fn rel(id: &str, src: (&str, &str), dst: (&str, &str)) -> ForeignKeyRelationship {
        ForeignKeyRelationship {
            id: id.to_string(),
            source_table_id: src.0.to_string(),
            source_column_id: src.1.to_string(),
            target_table_id: dst.0.to_string(),
            target_column_id: dst.1.to_string(),
            typ: RelationshipType::OneToMany,
        }
    }

    fn parents() -> Table {
        Table::new("parents", "Parents")
            .column(Column::new("id", ColumnType::Integer).primary_key())
            .rows([row!("p1", { id: 1 }), row!("p2", { id: 2 })])
    }

    fn children() -> Table {
        Table::new("children", "Children")
            .column(Column::new("id", ColumnType::Integer).primary_key())
            .column(Column::new("parent_id", ColumnType::Integer).references("parents", "id").nullable())
            .rows([
                row!("c1", { id: 1, parent_id: 1 }),
                row!("c2", { id: 2, parent_id: "1" }),
                row!("c3", { id: 3, parent_id: 2 }),
                row!("c4", { id: 4 }),
            ])
    }

    fn family() -> DatabaseSchema {
        DatabaseSchema {
            tables: vec![parents(), children()],
            relationships: vec![rel("r", ("children", "parent_id"), ("parents", "id"))],
        }
    }

    #[test]
    fn test_single_hop_both_directions() {
        let s = family();
        let (p, c) = (&s.tables[0], &s.tables[1]);

        let kids = find_related_rows(&p.rows[0], p, c, &s.relationships);
        assert_eq!(kids, vec!["c1", "c2"]);

        let parent = find_related_rows(&c.rows[2], c, p, &s.relationships);
        assert_eq!(parent, vec!["p2"]);
    }

    #[test]
    fn test_null_foreign_key_relates_to_nothing() {
        let s = family();
        let (p, c) = (&s.tables[0], &s.tables[1]);
        assert!(find_related_rows(&c.rows[3], c, p, &s.relationships).is_empty());
        assert!(find_all_related_rows(&c.rows[3], c, &s).is_empty());
    }

    #[test]
    fn test_child_reaches_siblings_through_parent() {
        let s = family();
        let c = &s.tables[1];
        let related = find_all_related_rows(&c.rows[0], c, &s);

        assert_eq!(related["parents"], BTreeSet::from(["p1".to_string()]));
        // c2 shares p1; c1 itself is never reported
        assert_eq!(related["children"], BTreeSet::from(["c2".to_string()]));
    }

    #[test]
    fn test_no_relationships_is_empty() {
        let s = DatabaseSchema {
            tables: vec![parents(), children()],
            relationships: vec![],
        };
        assert!(find_all_related_rows(&s.tables[0].rows[0], &s.tables[0], &s).is_empty());
    }

    #[test]
    fn test_dangling_relationship_ids_are_skipped() {
        let mut s = family();
        s.relationships.push(rel("x", ("ghosts", "id"), ("parents", "id")));
        s.relationships.push(rel("y", ("children", "missing"), ("parents", "id")));
        let p = &s.tables[0];
        let related = find_all_related_rows(&p.rows[0], p, &s);
        assert_eq!(related.len(), 1);
        assert_eq!(related["children"].len(), 2);
    }

    #[test]
    fn test_cycle_terminates() {
        // a -> b -> c -> a, all keyed on the same value
        let table = |id: &str| {
            Table::new(id, id)
                .column(Column::new("k", ColumnType::Integer))
                .rows([row!(format!("{id}-1"), { k: 1 }), row!(format!("{id}-2"), { k: 1 })])
        };
        let s = DatabaseSchema {
            tables: vec![table("a"), table("b"), table("c")],
            relationships: vec![
                rel("ab", ("a", "k"), ("b", "k")),
                rel("bc", ("b", "k"), ("c", "k")),
                rel("ca", ("c", "k"), ("a", "k")),
            ],
        };
        let a = &s.tables[0];
        let related = find_all_related_rows(&a.rows[0], a, &s);
        assert_eq!(related["a"], BTreeSet::from(["a-2".to_string()]));
        assert_eq!(related["b"].len(), 2);
        assert_eq!(related["c"].len(), 2);
    }

    #[test]
    fn test_self_reference_stays_out_of_the_loop() {
        // Same-table hops are never probed directly.
        let staff = Table::new("staff", "Staff")
            .column(Column::new("id", ColumnType::Integer).primary_key())
            .column(Column::new("manager_id", ColumnType::Integer).references("staff", "id"))
            .rows([row!("s1", { id: 1 }), row!("s2", { id: 2, manager_id: 1 })]);
        let s = DatabaseSchema::from_tables(vec![staff]);
        let related = find_all_related_rows(&s.tables[0].rows[1], &s.tables[0], &s);
        assert!(related.is_empty());
    }
}
