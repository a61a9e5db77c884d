//! Brute-force cosine similarity ranking.
//!
//! Every query scores every record; there is no index. Cost grows linearly
//! with the collection, which is the scaling limit of this store.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{EmbeddingRecord, SearchResult};

/// `dot(a, b) / (|a| * |b|)`, accumulated in f64.
///
/// Vectors of different lengths are compared on their common prefix. This
/// keeps records from another provider searchable, but the score is only a
/// rough signal. A zero-magnitude vector scores 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let len = a.len().min(b.len());
    if a.len() != b.len() {
        tracing::warn!(
            left = a.len(),
            right = b.len(),
            "embedding dimension mismatch, comparing truncated vectors"
        );
    }
    let (a, b) = (&a[..len], &b[..len]);

    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    let mag_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let mag_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        tracing::warn!("zero-magnitude embedding, similarity is 0");
        return 0.0;
    }

    (dot / (mag_a * mag_b)).clamp(-1.0, 1.0) as f32
}

/// Score `records` against `query` and keep the best `k`.
///
/// Sorting is stable, so equal scores keep scan order. Records whose score
/// is not finite are skipped.
pub fn rank(records: Vec<EmbeddingRecord>, query: &[f32], k: usize) -> Vec<SearchResult> {
    if k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<SearchResult> = records
        .into_iter()
        .filter_map(|record| {
            let similarity = cosine_similarity(query, &record.embedding);
            if !similarity.is_finite() {
                tracing::warn!(id = %record.id, "similarity not finite, skipping record");
                return None;
            }
            Some(SearchResult {
                id: record.id,
                content: record.content,
                metadata: record.metadata,
                similarity,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(k);
    scored
}

/// Convert a caller-supplied k, rejecting negatives.
pub fn checked_k(k: i64) -> DomainResult<usize> {
    usize::try_from(k).map_err(|_| DomainError::Validation(format!("k must be non-negative, got {k}")))
}
