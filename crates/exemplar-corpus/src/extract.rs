//! SQL recovery from combined prompts.

use exemplar_core::models::Example;

const SQL_LEADERS: [&str; 4] = ["SELECT", "INSERT", "UPDATE", "DELETE"];

/// The prompt from its first line that starts with a SQL verb to the end,
/// trimmed. `None` when no such line exists.
pub fn extract_sql(prompt: &str) -> Option<String> {
    let lines: Vec<&str> = prompt.lines().collect();
    let start = lines
        .iter()
        .position(|line| SQL_LEADERS.iter().any(|verb| line.starts_with(verb)))?;
    let sql = lines[start..].join("\n").trim().to_string();
    (!sql.is_empty()).then_some(sql)
}

/// The explicit `SQL` field when present, otherwise the SQL embedded in the prompt.
pub fn sql_of(example: &Example) -> Option<String> {
    example
        .sql
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .or_else(|| extract_sql(&example.prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_everything_from_first_sql_line() {
        let prompt = "/* schema */\n-- t\n\n/* Answer the following question: q */\nSELECT *\nFROM t\nLIMIT 200;\n";
        assert_eq!(extract_sql(prompt).unwrap(), "SELECT *\nFROM t\nLIMIT 200;");
    }

    #[test]
    fn indented_or_lowercase_lines_do_not_start_sql() {
        assert_eq!(extract_sql("  SELECT 1\nselect 2"), None);
        assert_eq!(extract_sql("no sql here"), None);
    }

    #[test]
    fn explicit_field_wins() {
        let mut ex = Example::new("q", "d", "SELECT 2");
        assert_eq!(sql_of(&ex).unwrap(), "SELECT 2");
        ex.sql = Some("SELECT 1".into());
        assert_eq!(sql_of(&ex).unwrap(), "SELECT 1");
        ex.sql = Some("   ".into());
        assert_eq!(sql_of(&ex).unwrap(), "SELECT 2");
    }
}
