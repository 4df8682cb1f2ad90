//! Hashed TF-IDF provider: deterministic, offline, always available.

use exemplar_core::errors::ExemplarResult;
use exemplar_core::traits::IEmbeddingProvider;
use rustc_hash::FxHashMap;

/// Produces dense vectors by hashing terms into fixed-dimension buckets
/// weighted by term frequency, then L2-normalising.
///
/// ASCII words are lowercased terms of two or more bytes. Runs of other
/// scripts (e.g. CJK, which has no spaces) are split into character bigrams.
pub struct TfIdfFallback {
    dimensions: usize,
    name: String,
}

impl TfIdfFallback {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            name: format!("tfidf-{dimensions}"),
        }
    }

    /// FNV-1a bucket index.
    fn hash_term(term: &str, dims: usize) -> usize {
        let mut h: u64 = 0xcbf29ce484222325;
        for b in term.as_bytes() {
            h ^= *b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        (h as usize) % dims
    }

    fn tokenize(text: &str) -> Vec<String> {
        let mut terms = Vec::new();
        for word in text.split(|c: char| !c.is_alphanumeric() && c != '_') {
            if word.is_empty() {
                continue;
            }
            if word.is_ascii() {
                if word.len() >= 2 {
                    terms.push(word.to_lowercase());
                }
                continue;
            }
            let chars: Vec<char> = word.to_lowercase().chars().collect();
            if chars.len() == 1 {
                terms.push(chars[0].to_string());
            } else {
                terms.extend(chars.windows(2).map(|w| w.iter().collect::<String>()));
            }
        }
        terms
    }

    fn tfidf_vector(&self, text: &str) -> Vec<f32> {
        let tokens = Self::tokenize(text);
        let mut vec = vec![0.0f32; self.dimensions];
        if tokens.is_empty() || self.dimensions == 0 {
            return vec;
        }

        // Insertion order is fixed by the text, so bucket sums are reproducible.
        let mut tf: FxHashMap<&str, f32> = FxHashMap::default();
        for tok in &tokens {
            *tf.entry(tok.as_str()).or_default() += 1.0;
        }

        let total = tokens.len() as f32;
        for (term, count) in &tf {
            let freq = count / total;
            // Longer terms are rarer; short ones behave like stopwords.
            let idf = 1.0 + (term.chars().count() as f32).ln();
            vec[Self::hash_term(term, self.dimensions)] += freq * idf;
        }

        let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > f32::EPSILON {
            for v in &mut vec {
                *v /= norm;
            }
        }
        vec
    }
}

impl IEmbeddingProvider for TfIdfFallback {
    fn embed(&self, text: &str) -> ExemplarResult<Vec<f32>> {
        Ok(self.tfidf_vector(text))
    }

    fn embed_batch(&self, texts: &[String]) -> ExemplarResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.tfidf_vector(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::cosine_similarity;

    #[test]
    fn empty_text_returns_zero_vector() {
        let v = TfIdfFallback::new(128).embed("").unwrap();
        assert_eq!(v.len(), 128);
        assert!(v.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn output_is_normalized() {
        let v = TfIdfFallback::new(256).embed("total revenue per customer").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "expected unit norm, got {norm}");
    }

    #[test]
    fn deterministic_across_instances() {
        let a = TfIdfFallback::new(256).embed("list all orders").unwrap();
        let b = TfIdfFallback::new(256).embed("list all orders").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn batch_matches_individual() {
        let p = TfIdfFallback::new(128);
        let texts = vec!["hello world".to_string(), "foo bar baz".to_string()];
        let batch = p.embed_batch(&texts).unwrap();
        for (i, text) in texts.iter().enumerate() {
            assert_eq!(batch[i], p.embed(text).unwrap());
        }
    }

    #[test]
    fn similar_questions_score_higher() {
        let p = TfIdfFallback::new(384);
        let a = p.embed("How many orders did each customer place?").unwrap();
        let b = p.embed("Count the orders for each customer").unwrap();
        let c = p.embed("Which products are out of stock?").unwrap();
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn cjk_text_is_split_into_bigrams() {
        assert_eq!(TfIdfFallback::tokenize("查詢資料"), vec!["查詢", "詢資", "資料"]);
        let p = TfIdfFallback::new(384);
        let a = p.embed("查詢訂單資料").unwrap();
        let b = p.embed("查詢訂單").unwrap();
        let c = p.embed("商品庫存").unwrap();
        assert!(cosine_similarity(&a, &b) > cosine_similarity(&a, &c));
    }

    #[test]
    fn name_encodes_dimensions() {
        assert_eq!(TfIdfFallback::new(64).name(), "tfidf-64");
    }
}
