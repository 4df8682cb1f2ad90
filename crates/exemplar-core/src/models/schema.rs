//! Read-only snapshot of a relational schema: tables, columns, foreign keys.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse semantic type derived from a column's declared type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Number,
    Text,
    Time,
    Boolean,
    Other,
}

impl SemanticType {
    /// Map a declared type by case-insensitive substring match.
    /// Earlier families win, so `POINT` lands in `Number` via `INT`.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        let has = |needles: &[&str]| needles.iter().any(|n| upper.contains(n));

        if has(&["INT", "REAL", "FLOAT", "DOUBLE", "NUMERIC"]) {
            Self::Number
        } else if has(&["TEXT", "CHAR", "CLOB"]) {
            Self::Text
        } else if has(&["DATE", "TIME"]) {
            Self::Time
        } else if has(&["BOOL"]) {
            Self::Boolean
        } else {
            Self::Other
        }
    }
}

/// One column as reported by the catalog, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub ordinal: i64,
    pub name: String,
    pub declared_type: String,
    pub not_null: bool,
    pub default_value: Option<String>,
    pub is_primary_key: bool,
}

impl Column {
    pub fn semantic_type(&self) -> SemanticType {
        SemanticType::from_declared(&self.declared_type)
    }
}

/// A declared reference `from_column -> to_table.to_column`. Never inferred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// All user tables, in catalog enumeration order.
///
/// The position of a table in `tables` is a stable index for the
/// lifetime of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    pub tables: Vec<Table>,
}

impl SchemaSnapshot {
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// A single SQL value as returned by the driver.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for SqlValue {
    /// Renders the value as a SQL literal body. Text is NOT quoted here;
    /// callers that embed text in SQL must escape it themselves.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Blob(bytes) => {
                f.write_str("X'")?;
                for b in bytes {
                    write!(f, "{b:02X}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// One result row: column names paired with values, in result order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub values: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn new(values: Vec<(String, SqlValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_types_map_to_semantic_families() {
        assert_eq!(SemanticType::from_declared("INTEGER"), SemanticType::Number);
        assert_eq!(SemanticType::from_declared("double precision"), SemanticType::Number);
        assert_eq!(SemanticType::from_declared("NUMERIC(10,2)"), SemanticType::Number);
        assert_eq!(SemanticType::from_declared("VARCHAR(20)"), SemanticType::Text);
        assert_eq!(SemanticType::from_declared("clob"), SemanticType::Text);
        assert_eq!(SemanticType::from_declared("DATETIME"), SemanticType::Time);
        assert_eq!(SemanticType::from_declared("BOOLEAN"), SemanticType::Boolean);
        assert_eq!(SemanticType::from_declared("BLOB"), SemanticType::Other);
        assert_eq!(SemanticType::from_declared(""), SemanticType::Other);
    }

    #[test]
    fn blob_renders_as_hex_literal() {
        assert_eq!(SqlValue::Blob(vec![0x0a, 0xff]).to_string(), "X'0AFF'");
    }

    #[test]
    fn row_lookup_by_name() {
        let row = Row::new(vec![
            ("id".into(), SqlValue::Integer(1)),
            ("name".into(), SqlValue::Text("a".into())),
        ]);
        assert_eq!(row.get("name"), Some(&SqlValue::Text("a".into())));
        assert_eq!(row.get("missing"), None);
    }
}
