//! Natural-language question for a validated statement.

use exemplar_core::traits::IQuestionGenerator;
use tracing::warn;

/// Generation runs greedy so the same SQL phrases the same way.
pub const QUESTION_TEMPERATURE: f64 = 0.0;

const INSTRUCTION: &str = "Describe the following SQL query as a natural-language question. \
Describe only what the SQL literally does: do not infer intent, do not elaborate, \
and do not add meaning that is not in the query.";

pub fn question_prompt(sql: &str) -> String {
    format!("{INSTRUCTION}\n\nSQL:\n{sql}\n\nOutput only the question:")
}

/// The generated question, or `fallback` when generation fails or returns
/// nothing. The flag reports whether the fallback was used.
pub fn generate_question(
    generator: Option<&dyn IQuestionGenerator>,
    sql: &str,
    fallback: &str,
) -> (String, bool) {
    let Some(generator) = generator else {
        return (fallback.to_string(), true);
    };
    match generator.generate(&question_prompt(sql), QUESTION_TEMPERATURE) {
        Ok(text) if !text.trim().is_empty() => (text.trim().to_string(), false),
        Ok(_) => {
            warn!(generator = generator.name(), "empty question generated, using fallback");
            (fallback.to_string(), true)
        }
        Err(e) => {
            warn!(generator = generator.name(), error = %e, "question generation failed, using fallback");
            (fallback.to_string(), true)
        }
    }
}
