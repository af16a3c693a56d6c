//! Embedding similarity and its effect on the overall score

use crate::config::OverallPolicy;
use crate::error::{MatcherError, Result};

/// Cosine similarity of two equal-length vectors. Zero-norm vectors give 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(MatcherError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    if a.is_empty() {
        return Ok(0.0);
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Similarity mapped onto the 0..=100 score scale.
pub fn semantic_score(candidate: &[f32], job: &[f32]) -> Result<u8> {
    let similarity = cosine_similarity(candidate, job)?;
    Ok(to_percent(similarity as f64))
}

fn to_percent(similarity: f64) -> u8 {
    if !similarity.is_finite() {
        return 0;
    }
    (similarity * 100.0).round().clamp(0.0, 100.0) as u8
}

impl OverallPolicy {
    /// Overall score once a semantic score is available.
    pub fn apply(&self, heuristic: u8, semantic: u8) -> u8 {
        match *self {
            OverallPolicy::Replace => semantic,
            OverallPolicy::Blend { semantic_weight } => {
                let w = semantic_weight.clamp(0.0, 1.0);
                let blended = semantic as f64 * w + heuristic as f64 * (1.0 - w);
                blended.round().clamp(0.0, 100.0) as u8
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(dim: usize, index: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[index] = 1.0;
        v
    }

    #[test]
    fn test_cosine_similarity_basics() {
        let a = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);

        let opposite: Vec<f32> = a.iter().map(|x| -x).collect();
        assert!((cosine_similarity(&a, &opposite).unwrap() + 1.0).abs() < 1e-6);

        assert_eq!(cosine_similarity(&unit(3, 0), &unit(3, 1)).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_semantic_score_of_known_similarity() {
        let candidate = unit(1024, 0);
        let mut job = vec![0.0f32; 1024];
        job[0] = 0.82;
        job[1] = (1.0f32 - 0.82 * 0.82).sqrt();

        assert_eq!(semantic_score(&candidate, &job).unwrap(), 82);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = semantic_score(&vec![0.1; 768], &vec![0.1; 1024]).unwrap_err();
        assert!(matches!(err, MatcherError::DimensionMismatch { left: 768, right: 1024 }));
    }

    #[test]
    fn test_negative_similarity_clamps_to_zero() {
        assert_eq!(semantic_score(&[1.0, 0.0], &[-1.0, 0.0]).unwrap(), 0);
    }

    #[test]
    fn test_policies() {
        assert_eq!(OverallPolicy::Replace.apply(40, 90), 90);
        assert_eq!(OverallPolicy::Blend { semantic_weight: 0.5 }.apply(40, 90), 65);
        assert_eq!(OverallPolicy::Blend { semantic_weight: 0.0 }.apply(40, 90), 40);
        assert_eq!(OverallPolicy::Blend { semantic_weight: 3.0 }.apply(40, 90), 90);
    }
}
