//! OpenAI-compatible HTTP embedding provider.
//!
//! POSTs `{model, input}` to an `/embeddings` endpoint and reads
//! `data[].embedding`. Failed requests are retried with exponential backoff;
//! once retries are exhausted the provider marks itself unavailable.
//! Empty texts never reach the API (it rejects them) and embed to the zero
//! vector. A response of the wrong width is an error, never resized.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use exemplar_core::config::defaults::DEFAULT_EMBEDDING_API_ENDPOINT;
use exemplar_core::errors::{EmbeddingError, ExemplarResult};
use exemplar_core::traits::IEmbeddingProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::ensure_dimensions;

const DEFAULT_MAX_RETRIES: u32 = 3;

pub struct ApiProvider {
    model: String,
    api_key: String,
    endpoint: String,
    dimensions: usize,
    available: AtomicBool,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl ApiProvider {
    pub fn new(model: String, api_key: String, endpoint: Option<String>, dimensions: usize) -> Self {
        Self {
            endpoint: endpoint.unwrap_or_else(|| DEFAULT_EMBEDDING_API_ENDPOINT.to_string()),
            model,
            api_key,
            dimensions,
            available: AtomicBool::new(true),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request_body(&self, texts: Vec<String>) -> ExemplarResult<String> {
        serde_json::to_string(&EmbedRequest {
            model: &self.model,
            input: texts,
        })
        .map_err(|e| {
            EmbeddingError::InferenceFailed {
                reason: format!("JSON serialization error: {e}"),
            }
            .into()
        })
    }

    fn request_embeddings(&self, texts: &[String]) -> ExemplarResult<Vec<Vec<f32>>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.model.clone(),
            }
            .into());
        }
        let pending: Vec<usize> = (0..texts.len()).filter(|&i| !texts[i].is_empty()).collect();
        let fetched = if pending.is_empty() {
            Vec::new()
        } else {
            self.fetch(pending.iter().map(|&i| texts[i].clone()).collect())?
        };
        place_embeddings(self.dimensions, texts.len(), &pending, fetched)
    }

    fn fetch(&self, texts: Vec<String>) -> ExemplarResult<Vec<Vec<f32>>> {
        let expected = texts.len();
        let body = self.request_body(texts)?;

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                std::thread::sleep(Duration::from_millis(100 * 2u64.pow(attempt - 1)));
                debug!(attempt, "retrying API embedding request");
            }

            match self.send_request(&body) {
                Ok(embeddings) if embeddings.len() == expected => return Ok(embeddings),
                Ok(embeddings) => {
                    let e: exemplar_core::ExemplarError = EmbeddingError::InferenceFailed {
                        reason: format!(
                            "API returned {} embeddings for {expected} inputs",
                            embeddings.len()
                        ),
                    }
                    .into();
                    warn!(attempt, error = %e, "API embedding request failed");
                    last_err = Some(e);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "API embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        self.available.store(false, Ordering::Relaxed);
        Err(last_err.unwrap_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "all retries exhausted".to_string(),
            }
            .into()
        }))
    }

    /// One blocking HTTP round trip on a current-thread runtime.
    fn send_request(&self, body: &str) -> ExemplarResult<Vec<Vec<f32>>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("runtime error: {e}"),
            })?;

        let client = reqwest::Client::new();

        rt.block_on(async {
            let response = client
                .post(&self.endpoint)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .body(body.to_string())
                .send()
                .await
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("HTTP error: {e}"),
                })?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!("API returned {status}: {body}"),
                }
                .into());
            }

            let resp: EmbedResponse =
                response
                    .json()
                    .await
                    .map_err(|e| EmbeddingError::InferenceFailed {
                        reason: format!("JSON parse error: {e}"),
                    })?;

            Ok(resp.data.into_iter().map(|d| d.embedding).collect())
        })
    }

    pub fn reset_availability(&self) {
        self.available.store(true, Ordering::Relaxed);
    }
}

/// Slot fetched vectors into a `len`-long output at the `pending` positions;
/// every other slot is the zero vector.
fn place_embeddings(
    dimensions: usize,
    len: usize,
    pending: &[usize],
    fetched: Vec<Vec<f32>>,
) -> ExemplarResult<Vec<Vec<f32>>> {
    let mut out = vec![vec![0.0; dimensions]; len];
    for (&i, v) in pending.iter().zip(fetched) {
        ensure_dimensions(&v, dimensions)?;
        out[i] = v;
    }
    Ok(out)
}

impl IEmbeddingProvider for ApiProvider {
    fn embed(&self, text: &str) -> ExemplarResult<Vec<f32>> {
        let results = self.request_embeddings(&[text.to_string()])?;
        results.into_iter().next().ok_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            }
            .into()
        })
    }

    fn embed_batch(&self, texts: &[String]) -> ExemplarResult<Vec<Vec<f32>>> {
        self.request_embeddings(texts)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_model_and_inputs() {
        let p = ApiProvider::new("text-embedding-3-small".into(), "k".into(), None, 8);
        let body = p.request_body(vec!["a".into(), "b".into()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(v["model"], "text-embedding-3-small");
        assert_eq!(v["input"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn default_endpoint_applies() {
        let p = ApiProvider::new("m".into(), "k".into(), None, 8);
        assert_eq!(p.endpoint(), DEFAULT_EMBEDDING_API_ENDPOINT);
        let p = ApiProvider::new("m".into(), "k".into(), Some("http://x/v1/embeddings".into()), 8);
        assert_eq!(p.endpoint(), "http://x/v1/embeddings");
    }

    #[test]
    fn unreachable_endpoint_marks_unavailable() {
        let p = ApiProvider::new("m".into(), "k".into(), Some("http://127.0.0.1:9/v1".into()), 8)
            .with_max_retries(0);
        assert!(p.embed("hello").is_err());
        assert!(!p.is_available());
        let err = p.embed("hello").unwrap_err();
        assert!(err.to_string().contains("unavailable"));
        p.reset_availability();
        assert!(p.is_available());
    }

    #[test]
    fn empty_texts_embed_to_zero_without_a_request() {
        let p = ApiProvider::new("m".into(), "k".into(), Some("http://127.0.0.1:9/v1".into()), 4)
            .with_max_retries(0);
        assert_eq!(p.embed("").unwrap(), vec![0.0; 4]);
        let batch = p.embed_batch(&["".into(), "".into()]).unwrap();
        assert_eq!(batch, vec![vec![0.0; 4]; 2]);
        assert!(p.is_available());
    }

    #[test]
    fn fetched_vectors_fill_their_slots() {
        let out = place_embeddings(2, 3, &[0, 2], vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(out, vec![vec![1.0, 2.0], vec![0.0, 0.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn wrong_width_is_rejected_not_resized() {
        let err = place_embeddings(384, 1, &[0], vec![vec![0.5; 1536]]).unwrap_err();
        assert!(matches!(
            err,
            exemplar_core::ExemplarError::Embedding(EmbeddingError::DimensionMismatch {
                expected: 384,
                actual: 1536,
            })
        ));
    }

    #[test]
    fn empty_batch_skips_the_network() {
        let p = ApiProvider::new("m".into(), "k".into(), Some("http://127.0.0.1:9/v1".into()), 8);
        assert!(p.embed_batch(&[]).unwrap().is_empty());
        assert!(p.is_available());
    }
}
