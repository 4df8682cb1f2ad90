//! SELECT / LEFT JOIN / WHERE / LIMIT text from a join plan and a sample row.

use exemplar_core::constants::TABLE_ALIAS_PREFIX;
use exemplar_core::models::{Row, SqlValue, Table};

use crate::planner::JoinPlan;

/// Build the candidate statement for `plan`, whose root is `root`.
///
/// Aliases follow plan positions (`t0` is the root). The WHERE clause uses
/// only the root's non-null sample values, in root column order.
pub fn synthesize_sql(plan: &JoinPlan, root: &Table, sample: &Row, row_limit: usize) -> String {
    let root_alias = alias(0);

    let mut select = vec![format!("{root_alias}.*")];
    select.extend(plan.joins.iter().map(|j| format!("{}.*", alias(j.index))));

    let mut lines = vec![
        format!("SELECT {}", select.join(", ")),
        format!("FROM {} {root_alias}", ident(&root.name)),
    ];

    for join in &plan.joins {
        lines.push(format!(
            "LEFT JOIN {table} {alias} ON {parent}.{parent_col} = {alias}.{col}",
            table = ident(&join.table),
            alias = alias(join.index),
            parent = alias(join.parent_index),
            parent_col = ident(&join.parent_column),
            col = ident(&join.column),
        ));
    }

    if let Some(clause) = where_clause(root, sample) {
        lines.push(clause);
    }
    lines.push(format!("LIMIT {row_limit};"));
    lines.join("\n")
}

/// `WHERE ...` over the root alias, or `None` when every value is null.
pub fn where_clause(root: &Table, sample: &Row) -> Option<String> {
    let root_alias = alias(0);
    let predicates: Vec<String> = root
        .columns
        .iter()
        .filter_map(|col| {
            let value = sample.get(&col.name)?;
            let column = ident(&col.name);
            match value {
                SqlValue::Null => None,
                SqlValue::Text(text) => Some(format!(
                    "{root_alias}.{column} LIKE '%{}%'",
                    text.replace('\'', "''")
                )),
                other => Some(format!("{root_alias}.{column} = {other}")),
            }
        })
        .collect();

    if predicates.is_empty() {
        None
    } else {
        Some(format!("WHERE {}", predicates.join(" AND ")))
    }
}

pub fn alias(index: usize) -> String {
    format!("{TABLE_ALIAS_PREFIX}{index}")
}

/// Identifiers are emitted bare when they are plain words, double-quoted
/// otherwise.
pub fn ident(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::JoinGraph;
    use exemplar_core::models::{Column, ForeignKey, SchemaSnapshot};

    fn column(ordinal: i64, name: &str, declared: &str) -> Column {
        Column {
            ordinal,
            name: name.to_string(),
            declared_type: declared.to_string(),
            not_null: false,
            default_value: None,
            is_primary_key: ordinal == 0,
        }
    }

    fn people() -> Table {
        Table {
            name: "people".into(),
            columns: vec![
                column(0, "id", "INTEGER"),
                column(1, "name", "TEXT"),
                column(2, "note", "TEXT"),
            ],
            foreign_keys: Vec::new(),
        }
    }

    #[test]
    fn where_skips_nulls_and_escapes_quotes() {
        let row = Row::new(vec![
            ("id".into(), SqlValue::Integer(1)),
            ("name".into(), SqlValue::Text("A'B".into())),
            ("note".into(), SqlValue::Null),
        ]);
        assert_eq!(
            where_clause(&people(), &row).unwrap(),
            "WHERE t0.id = 1 AND t0.name LIKE '%A''B%'"
        );
    }

    #[test]
    fn all_null_row_omits_where() {
        let row = Row::new(vec![
            ("id".into(), SqlValue::Null),
            ("name".into(), SqlValue::Null),
        ]);
        assert_eq!(where_clause(&people(), &row), None);
        let graph = JoinGraph::build(&SchemaSnapshot {
            tables: vec![people()],
        });
        let sql = synthesize_sql(&JoinPlan::new("people", &graph), &people(), &row, 200);
        assert_eq!(sql, "SELECT t0.*\nFROM people t0\nLIMIT 200;");
    }

    #[test]
    fn joins_follow_plan_with_left_join() {
        let orders = Table {
            name: "orders".into(),
            columns: vec![column(0, "id", "INTEGER"), column(1, "people_id", "INTEGER")],
            foreign_keys: vec![ForeignKey {
                from_column: "people_id".into(),
                to_table: "people".into(),
                to_column: "id".into(),
            }],
        };
        let schema = SchemaSnapshot {
            tables: vec![people(), orders],
        };
        let graph = JoinGraph::build(&schema);
        let plan = JoinPlan::new("people", &graph);
        let row = Row::new(vec![("id".into(), SqlValue::Integer(7))]);
        let sql = synthesize_sql(&plan, &people(), &row, 200);
        assert_eq!(
            sql,
            "SELECT t0.*, t1.*\nFROM people t0\nLEFT JOIN orders t1 ON t0.id = t1.people_id\nWHERE t0.id = 7\nLIMIT 200;"
        );
    }

    #[test]
    fn real_and_blob_literals() {
        let table = Table {
            name: "m".into(),
            columns: vec![column(0, "x", "REAL"), column(1, "b", "BLOB")],
            foreign_keys: Vec::new(),
        };
        let row = Row::new(vec![
            ("x".into(), SqlValue::Real(2.5)),
            ("b".into(), SqlValue::Blob(vec![1, 2])),
        ]);
        assert_eq!(where_clause(&table, &row).unwrap(), "WHERE t0.x = 2.5 AND t0.b = X'0102'");
    }

    #[test]
    fn odd_identifiers_are_quoted() {
        assert_eq!(ident("plain_name1"), "plain_name1");
        assert_eq!(ident("order items"), "\"order items\"");
        assert_eq!(ident("1st"), "\"1st\"");
        assert_eq!(ident("we\"ird"), "\"we\"\"ird\"");
    }
}
