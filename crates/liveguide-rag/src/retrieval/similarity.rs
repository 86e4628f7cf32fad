//! Vector similarity helpers.

use crate::error::{RagError, Result};

/// Dot product of two equal-length vectors.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean norm.
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity in [-1, 1].
///
/// Vectors of different lengths are a dimension mismatch. If either vector has
/// zero norm the angle is undefined and the similarity is reported as `0.0`.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(RagError::dimension_mismatch(a.len(), b.len()));
    }

    let norm_a = norm(a);
    let norm_b = norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    // Clamp to absorb floating point drift past the bounds
    Ok((dot(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_cosine_similarity_basic() {
        let x = vec![1.0, 0.0, 0.0];
        let y = vec![0.0, 1.0, 0.0];
        let neg_x = vec![-1.0, 0.0, 0.0];

        assert!(approx(cosine_similarity(&x, &x).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&x, &y).unwrap(), 0.0));
        assert!(approx(cosine_similarity(&x, &neg_x).unwrap(), -1.0));
    }

    #[test]
    fn test_cosine_similarity_is_magnitude_invariant() {
        let a = vec![2.0, 0.0];
        let b = vec![40.0, 0.0];
        assert!(approx(cosine_similarity(&a, &b).unwrap(), 1.0));
    }

    #[test]
    fn test_self_and_opposite_similarity() {
        let v = vec![0.3, -1.2, 4.5, 0.01, 7.0];
        let neg: Vec<f32> = v.iter().map(|x| -x).collect();
        assert!(approx(cosine_similarity(&v, &v).unwrap(), 1.0));
        assert!(approx(cosine_similarity(&v, &neg).unwrap(), -1.0));
    }

    #[test]
    fn test_symmetry() {
        let a = vec![0.9, 0.1, 0.4];
        let b = vec![0.2, 0.7, -0.3];
        assert_eq!(
            cosine_similarity(&a, &b).unwrap(),
            cosine_similarity(&b, &a).unwrap()
        );
    }

    #[test]
    fn test_zero_vector_is_zero_similarity() {
        let zero = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&v, &zero).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = cosine_similarity(&vec![0.5; 1536], &vec![0.5; 768]).unwrap_err();
        assert!(matches!(
            err,
            RagError::DimensionMismatch {
                expected: 1536,
                actual: 768
            }
        ));
    }

    #[test]
    fn test_near_identical_vector() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.9, 0.1, 0.0]).unwrap();
        assert!((sim - 0.9939).abs() < 1e-3);
    }
}
