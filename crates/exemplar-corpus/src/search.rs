//! Keyword search and difficulty statistics.

use std::collections::BTreeMap;

use exemplar_core::models::Example;

/// Label used for examples without a difficulty.
pub const UNKNOWN_DIFFICULTY: &str = "unknown";

/// Examples whose question, SQL or evidence contains `keyword`,
/// case-insensitively, with their ids.
pub fn search<'a>(examples: &'a [Example], keyword: &str) -> Vec<(usize, &'a Example)> {
    let needle = keyword.to_lowercase();
    examples
        .iter()
        .enumerate()
        .filter(|(_, ex)| {
            [
                Some(ex.question.as_str()),
                ex.sql.as_deref(),
                ex.evidence.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Example count per difficulty label.
pub fn difficulty_distribution(examples: &[Example]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for ex in examples {
        let label = ex.difficulty.as_deref().unwrap_or(UNKNOWN_DIFFICULTY);
        *counts.entry(label.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(question: &str, sql: Option<&str>, difficulty: Option<&str>) -> Example {
        let mut e = Example::new(question, "db", "");
        e.sql = sql.map(str::to_string);
        e.difficulty = difficulty.map(str::to_string);
        e
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let examples = vec![
            ex("Total sales", None, None),
            ex("Customers", Some("SELECT * FROM Orders"), None),
            ex("Other", None, None),
        ];
        let hits: Vec<usize> = search(&examples, "ORDERS").into_iter().map(|(i, _)| i).collect();
        assert_eq!(hits, vec![1]);
        assert_eq!(search(&examples, "sales")[0].0, 0);
        assert!(search(&examples, "missing").is_empty());
    }

    #[test]
    fn distribution_counts_unknown() {
        let examples = vec![
            ex("a", None, Some("simple")),
            ex("b", None, Some("simple")),
            ex("c", None, None),
        ];
        let dist = difficulty_distribution(&examples);
        assert_eq!(dist["simple"], 2);
        assert_eq!(dist[UNKNOWN_DIFFICULTY], 1);
    }
}
