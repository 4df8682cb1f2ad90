//! Textual schema description embedded in every synthesized prompt.

use exemplar_core::models::{answer_block, SchemaSnapshot};

const HEADER: &str = "/* Given the following database schema: */\n";

/// `CREATE TABLE`-style listing of every table, followed by a
/// `FOREIGN KEYS` comment block for tables that declare any.
pub fn describe_schema(schema: &SchemaSnapshot) -> String {
    let mut lines = vec![HEADER.to_string()];
    for table in &schema.tables {
        lines.push(format!("-- {}", table.name));
        lines.push(format!("CREATE TABLE {} (", table.name));
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("  {} {}", c.name, c.declared_type))
            .collect();
        lines.push(columns.join(",\n"));
        lines.push(");\n".to_string());

        if !table.foreign_keys.is_empty() {
            lines.push("/* FOREIGN KEYS:".to_string());
            for fk in &table.foreign_keys {
                lines.push(format!(
                    " * {}.{} -> {}.{}",
                    table.name, fk.from_column, fk.to_table, fk.to_column
                ));
            }
            lines.push(" */\n".to_string());
        }
    }
    lines.join("\n")
}

/// Schema description, question header and SQL in one prompt.
pub fn assemble_prompt(description: &str, question: &str, sql: &str) -> String {
    format!("{description}\n\n{}", answer_block(question, sql))
}

#[cfg(test)]
mod tests {
    use super::*;
    use exemplar_core::models::{Column, ForeignKey, Table};

    fn col(name: &str, ty: &str) -> Column {
        Column {
            ordinal: 0,
            name: name.into(),
            declared_type: ty.into(),
            not_null: false,
            default_value: None,
            is_primary_key: false,
        }
    }

    #[test]
    fn lists_columns_and_foreign_keys() {
        let schema = SchemaSnapshot {
            tables: vec![Table {
                name: "orders".into(),
                columns: vec![col("id", "INTEGER"), col("customer_id", "INTEGER")],
                foreign_keys: vec![ForeignKey {
                    from_column: "customer_id".into(),
                    to_table: "customer".into(),
                    to_column: "id".into(),
                }],
            }],
        };
        let text = describe_schema(&schema);
        assert!(text.starts_with("/* Given the following database schema: */\n"));
        assert!(text.contains("-- orders\nCREATE TABLE orders (\n  id INTEGER,\n  customer_id INTEGER\n);\n"));
        assert!(text.contains("/* FOREIGN KEYS:\n * orders.customer_id -> customer.id\n */\n"));
    }

    #[test]
    fn prompt_ends_with_sql() {
        let prompt = assemble_prompt("DESC", "Which rows?", "SELECT 1;");
        assert_eq!(prompt, "DESC\n\n/* Answer the following question: Which rows? */\nSELECT 1;");
    }
}
