//! Provider selection.
//!
//! "api" is used only when its key is configured; everything else
//! resolves to the hashed TF-IDF provider.

pub mod api_provider;
pub mod tfidf_fallback;

pub use api_provider::ApiProvider;
pub use tfidf_fallback::TfIdfFallback;

use exemplar_core::config::EmbeddingConfig;
use exemplar_core::errors::{EmbeddingError, ExemplarResult};
use exemplar_core::traits::IEmbeddingProvider;
use tracing::{info, warn};

/// Reject a vector whose width differs from what the provider declares.
pub(crate) fn ensure_dimensions(v: &[f32], expected: usize) -> ExemplarResult<()> {
    if v.len() != expected {
        return Err(EmbeddingError::DimensionMismatch {
            expected,
            actual: v.len(),
        }
        .into());
    }
    Ok(())
}

/// Build the configured provider, falling back to TF-IDF when it cannot be used.
pub fn create_provider(config: &EmbeddingConfig) -> Box<dyn IEmbeddingProvider> {
    match config.provider.as_str() {
        "api" => match std::env::var(&config.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                info!(provider = "api", model = %config.model, "embedding provider configured");
                Box::new(ApiProvider::new(
                    config.model.clone(),
                    key,
                    config.endpoint.clone(),
                    config.dimensions,
                ))
            }
            _ => {
                warn!(
                    env = %config.api_key_env,
                    "API key not set; using TF-IDF fallback"
                );
                Box::new(TfIdfFallback::new(config.dimensions))
            }
        },
        "tfidf" => {
            info!(provider = "tfidf", "using TF-IDF embedding provider");
            Box::new(TfIdfFallback::new(config.dimensions))
        }
        other => {
            info!(provider = other, "unknown provider, using TF-IDF fallback");
            Box::new(TfIdfFallback::new(config.dimensions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tfidf_is_selected_by_default() {
        let p = create_provider(&EmbeddingConfig::default());
        assert_eq!(p.name(), "tfidf-384");
        assert!(p.is_available());
    }

    #[test]
    fn api_without_key_falls_back() {
        let config = EmbeddingConfig {
            provider: "api".into(),
            api_key_env: "EXEMPLAR_TEST_KEY_THAT_IS_NEVER_SET".into(),
            dimensions: 32,
            ..EmbeddingConfig::default()
        };
        let p = create_provider(&config);
        assert_eq!(p.name(), "tfidf-32");
    }

}
