//! Text similarity capability used by the semantic dimension and the
//! embedding fallback of skill matching.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::matching::error::MatchError;

/// Returns a similarity score in [0, 100] for two text blobs.
///
/// Implementations backed by an embedding service map cosine similarity
/// onto this range; see `LexicalSimilarity` for the in-process default.
#[async_trait]
pub trait SemanticSimilarity: Send + Sync {
    async fn similarity(&self, text_a: &str, text_b: &str) -> Result<f64, MatchError>;
}

/// Term-frequency cosine similarity over lowercased tokens.
///
/// Tokens keep inner `.`, `+` and `#` so that `node.js`, `c++` and `c#`
/// survive tokenization intact.
#[derive(Debug, Default, Clone)]
pub struct LexicalSimilarity;

#[async_trait]
impl SemanticSimilarity for LexicalSimilarity {
    async fn similarity(&self, text_a: &str, text_b: &str) -> Result<f64, MatchError> {
        Ok(cosine_similarity(&term_frequencies(text_a), &term_frequencies(text_b)) * 100.0)
    }
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let mut tf = HashMap::new();
    for token in tokenize(text) {
        *tf.entry(token).or_insert(0.0) += 1.0;
    }
    tf
}

pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '.' || c == '+' || c == '#'))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .filter_map(|(term, wa)| b.get(term).map(|wb| wa * wb))
        .sum();
    let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
    let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Per-analysis memo around a similarity provider.
///
/// Created fresh for every call so repeated skill pairs inside one analysis
/// are computed once; nothing is shared between analyses.
pub struct CachedSimilarity<'a> {
    inner: &'a dyn SemanticSimilarity,
    cache: HashMap<(String, String), f64>,
}

impl<'a> CachedSimilarity<'a> {
    pub fn new(inner: &'a dyn SemanticSimilarity) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
        }
    }

    /// Similarity in [0, 100]. The pair is order-insensitive. A non-finite
    /// score from the backend is an error rather than a cached value.
    pub async fn similarity(&mut self, text_a: &str, text_b: &str) -> Result<f64, MatchError> {
        let key = if text_a <= text_b {
            (text_a.to_string(), text_b.to_string())
        } else {
            (text_b.to_string(), text_a.to_string())
        };

        if let Some(score) = self.cache.get(&key) {
            return Ok(*score);
        }

        let score = self.inner.similarity(text_a, text_b).await?;
        if !score.is_finite() {
            return Err(MatchError::Similarity(format!(
                "similarity backend returned non-finite score {score}"
            )));
        }
        let score = score.clamp(0.0, 100.0);
        self.cache.insert(key, score);
        Ok(score)
    }

    pub fn cached_pairs(&self) -> usize {
        self.cache.len()
    }
}
