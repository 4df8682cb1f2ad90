use crate::errors::ExemplarResult;

/// Text to text: the language-generation model used to phrase questions.
pub trait IQuestionGenerator: Send + Sync {
    /// Complete `prompt` at the given sampling temperature.
    fn generate(&self, prompt: &str, temperature: f64) -> ExemplarResult<String>;

    fn name(&self) -> &str;
}
