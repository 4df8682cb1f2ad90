//! Top-level exemplar configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{defaults, EmbeddingConfig, GenerationConfig, RetrievalConfig, SynthesisConfig};
use crate::constants::CONFIG_FILE_NAME;
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`EXEMPLAR_*`)
/// 3. Project config (`exemplar.toml` in project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExemplarConfig {
    pub synthesis: SynthesisConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub corpus_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub collection: Option<String>,
    pub backend: Option<String>,
    pub embedding_provider: Option<String>,
    pub generation_model: Option<String>,
    pub db_id: Option<String>,
}

impl ExemplarConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let project_config_path = root.join(CONFIG_FILE_NAME);
        let mut config = if project_config_path.exists() {
            Self::from_file(&project_config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides();

        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Read one TOML file. Missing keys take their compiled defaults;
    /// unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.synthesis.row_limit == 0 {
            return Err(invalid("synthesis.row_limit", "must be greater than 0"));
        }
        if !defaults::EMBEDDING_PROVIDERS.contains(&self.embedding.provider.as_str()) {
            return Err(invalid(
                "embedding.provider",
                &format!("unknown provider '{}'", self.embedding.provider),
            ));
        }
        if self.embedding.dimensions == 0 {
            return Err(invalid("embedding.dimensions", "must be greater than 0"));
        }
        if !defaults::RETRIEVAL_BACKENDS.contains(&self.retrieval.backend.as_str()) {
            return Err(invalid(
                "retrieval.backend",
                &format!("unknown backend '{}'", self.retrieval.backend),
            ));
        }
        if self.retrieval.default_k == 0 {
            return Err(invalid("retrieval.default_k", "must be greater than 0"));
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err(invalid("generation.temperature", "must be between 0.0 and 2.0"));
        }
        if !(0.0..=1.0).contains(&self.generation.top_p) {
            return Err(invalid("generation.top_p", "must be between 0.0 and 1.0"));
        }
        if self.generation.max_retries == 0 {
            return Err(invalid("generation.max_retries", "must be greater than 0"));
        }
        Ok(())
    }

    /// Apply environment variable overrides.
    /// Pattern: `EXEMPLAR_<SECTION>_<KEY>`. Unparseable values are ignored.
    fn apply_env_overrides(&mut self) {
        let var = |name: &str| std::env::var(name).ok();

        if let Some(v) = var("EXEMPLAR_SYNTHESIS_DB_ID") {
            self.synthesis.db_id = Some(v);
        }
        if let Some(v) = var("EXEMPLAR_SYNTHESIS_FALLBACK_QUESTION") {
            self.synthesis.fallback_question = v;
        }
        if let Some(v) = var("EXEMPLAR_EMBEDDING_PROVIDER") {
            self.embedding.provider = v;
        }
        if let Some(v) = var("EXEMPLAR_EMBEDDING_MODEL") {
            self.embedding.model = v;
        }
        if let Some(v) = var("EXEMPLAR_EMBEDDING_ENDPOINT") {
            self.embedding.endpoint = Some(v);
        }
        if let Some(v) = var("EXEMPLAR_EMBEDDING_DIMENSIONS").and_then(|v| v.parse().ok()) {
            self.embedding.dimensions = v;
        }
        if let Some(v) = var("EXEMPLAR_RETRIEVAL_BACKEND") {
            self.retrieval.backend = v;
        }
        if let Some(v) = var("EXEMPLAR_RETRIEVAL_CORPUS_PATH") {
            self.retrieval.corpus_path = PathBuf::from(v);
        }
        if let Some(v) = var("EXEMPLAR_RETRIEVAL_STORE_PATH") {
            self.retrieval.store_path = PathBuf::from(v);
        }
        if let Some(v) = var("EXEMPLAR_RETRIEVAL_COLLECTION") {
            self.retrieval.collection = v;
        }
        if let Some(v) = var("EXEMPLAR_GENERATION_ENDPOINT") {
            self.generation.endpoint = v;
        }
        if let Some(v) = var("EXEMPLAR_GENERATION_MODEL") {
            self.generation.model = v;
        }
        if let Some(v) = var("EXEMPLAR_GENERATION_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.generation.max_retries = v;
        }
        if let Some(v) = var("EXEMPLAR_GENERATION_RETRY_DELAY_MS").and_then(|v| v.parse().ok()) {
            self.generation.retry_delay_ms = v;
        }
    }

    /// Anchor relative corpus and store paths at `root`.
    pub fn resolve_paths(&mut self, root: &Path) {
        for path in [&mut self.retrieval.corpus_path, &mut self.retrieval.store_path] {
            if path.is_relative() {
                *path = root.join(&*path);
            }
        }
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(ref v) = cli.corpus_path {
            self.retrieval.corpus_path = v.clone();
        }
        if let Some(ref v) = cli.store_path {
            self.retrieval.store_path = v.clone();
        }
        if let Some(ref v) = cli.collection {
            self.retrieval.collection = v.clone();
        }
        if let Some(ref v) = cli.backend {
            self.retrieval.backend = v.clone();
        }
        if let Some(ref v) = cli.embedding_provider {
            self.embedding.provider = v.clone();
        }
        if let Some(ref v) = cli.generation_model {
            self.generation.model = v.clone();
        }
        if let Some(ref v) = cli.db_id {
            self.synthesis.db_id = Some(v.clone());
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
