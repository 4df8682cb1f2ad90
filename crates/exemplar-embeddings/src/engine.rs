//! EmbeddingEngine: the selected provider behind an L1 cache.
//!
//! One provider per engine. Every vector it hands out comes from the same
//! model, so indices built with it stay comparable.

use exemplar_core::config::EmbeddingConfig;
use exemplar_core::errors::{EmbeddingError, ExemplarResult};
use exemplar_core::traits::IEmbeddingProvider;
use tracing::{debug, info};

use crate::cache::L1MemoryCache;
use crate::providers;

/// L1 cache statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub l1_count: u64,
}

pub struct EmbeddingEngine {
    provider: Box<dyn IEmbeddingProvider>,
    cache: L1MemoryCache,
}

impl EmbeddingEngine {
    pub fn new(config: &EmbeddingConfig) -> Self {
        Self::with_provider(providers::create_provider(config), config.l1_cache_size)
    }

    pub fn with_provider(provider: Box<dyn IEmbeddingProvider>, l1_cache_size: u64) -> Self {
        info!(
            provider = provider.name(),
            dims = provider.dimensions(),
            "EmbeddingEngine initialized"
        );
        Self {
            provider,
            cache: L1MemoryCache::new(l1_cache_size),
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            l1_count: self.cache.len(),
        }
    }

    fn check_dimensions(&self, v: &[f32]) -> ExemplarResult<()> {
        providers::ensure_dimensions(v, self.provider.dimensions())
    }
}

impl IEmbeddingProvider for EmbeddingEngine {
    fn embed(&self, text: &str) -> ExemplarResult<Vec<f32>> {
        let key = L1MemoryCache::key(text);
        if let Some(v) = self.cache.get(&key) {
            debug!(key = %&key[..12], "L1 cache hit");
            return Ok(v);
        }
        let v = self.provider.embed(text)?;
        self.check_dimensions(&v)?;
        self.cache.insert(key, v.clone());
        Ok(v)
    }

    /// Cached texts are served from L1; the misses go to the provider in one batch.
    fn embed_batch(&self, texts: &[String]) -> ExemplarResult<Vec<Vec<f32>>> {
        let keys: Vec<String> = texts.iter().map(|t| L1MemoryCache::key(t)).collect();
        let mut out: Vec<Option<Vec<f32>>> = keys.iter().map(|k| self.cache.get(k)).collect();

        let missing: Vec<usize> = (0..texts.len()).filter(|&i| out[i].is_none()).collect();
        if !missing.is_empty() {
            let batch: Vec<String> = missing.iter().map(|&i| texts[i].clone()).collect();
            let fresh = self.provider.embed_batch(&batch)?;
            if fresh.len() != batch.len() {
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!(
                        "provider returned {} embeddings for {} texts",
                        fresh.len(),
                        batch.len()
                    ),
                }
                .into());
            }
            for (&i, v) in missing.iter().zip(fresh) {
                self.check_dimensions(&v)?;
                self.cache.insert(keys[i].clone(), v.clone());
                out[i] = Some(v);
            }
            debug!(hits = texts.len() - missing.len(), misses = missing.len(), "embedded batch");
        }

        Ok(out.into_iter().flatten().collect())
    }

    fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    fn name(&self) -> &str {
        self.provider.name()
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::providers::TfIdfFallback;

    struct Counting {
        inner: TfIdfFallback,
        calls: Arc<AtomicUsize>,
    }

    impl IEmbeddingProvider for Counting {
        fn embed(&self, text: &str) -> ExemplarResult<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.embed(text)
        }
        fn embed_batch(&self, texts: &[String]) -> ExemplarResult<Vec<Vec<f32>>> {
            self.calls.fetch_add(texts.len(), Ordering::SeqCst);
            self.inner.embed_batch(texts)
        }
        fn dimensions(&self) -> usize {
            self.inner.dimensions()
        }
        fn name(&self) -> &str {
            "counting"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    struct WrongDims;

    impl IEmbeddingProvider for WrongDims {
        fn embed(&self, _text: &str) -> ExemplarResult<Vec<f32>> {
            Ok(vec![1.0; 3])
        }
        fn embed_batch(&self, texts: &[String]) -> ExemplarResult<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0; 3]).collect())
        }
        fn dimensions(&self) -> usize {
            8
        }
        fn name(&self) -> &str {
            "wrong"
        }
        fn is_available(&self) -> bool {
            true
        }
    }

    fn counting_engine() -> (EmbeddingEngine, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = Counting {
            inner: TfIdfFallback::new(64),
            calls: Arc::clone(&calls),
        };
        (EmbeddingEngine::with_provider(Box::new(provider), 100), calls)
    }

    #[test]
    fn repeated_text_hits_cache() {
        let (engine, calls) = counting_engine();
        let a = engine.embed("orders per customer").unwrap();
        let b = engine.embed("orders per customer").unwrap();
        assert_eq!(a, b);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn batch_only_embeds_misses_and_keeps_order() {
        let (engine, calls) = counting_engine();
        engine.embed("b").unwrap();
        let texts = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let out = engine.embed_batch(&texts).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        for (text, v) in texts.iter().zip(&out) {
            assert_eq!(v, &TfIdfFallback::new(64).embed(text).unwrap());
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let engine = EmbeddingEngine::with_provider(Box::new(WrongDims), 10);
        let err = engine.embed("x").unwrap_err();
        assert!(err.to_string().contains("dimension mismatch"));
        assert!(engine.embed_batch(&["y".to_string()]).is_err());
    }

    #[test]
    fn default_engine_is_deterministic() {
        let a = EmbeddingEngine::new(&EmbeddingConfig::default());
        let b = EmbeddingEngine::new(&EmbeddingConfig::default());
        assert_eq!(a.embed("list products").unwrap(), b.embed("list products").unwrap());
        assert_eq!(a.name(), "tfidf-384");
        assert_eq!(a.dimensions(), 384);
    }
}
