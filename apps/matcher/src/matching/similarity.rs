use crate::matching::MatchError;

/// Cosine of the angle between two embeddings, in `[-1, 1]`.
/// A zero vector has no direction and scores 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot_product: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|y| y * y).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Maps `[-1, 1]` onto `[0, 100]`: `round((s + 1) * 50)`, clamped.
pub fn to_match_score(similarity: f32) -> u8 {
    if similarity.is_nan() {
        return 0;
    }
    ((similarity as f64 + 1.0) * 50.0).round().clamp(0.0, 100.0) as u8
}
