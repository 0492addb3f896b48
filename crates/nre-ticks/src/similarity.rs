//! Cosine similarity.

/// Cosine similarity between two vectors: `(a · b) / (‖a‖ ‖b‖)`.
///
/// Returns `0.0` when either vector has zero magnitude. Vectors are expected to
/// share a dimension; extra trailing components of the longer one are ignored.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "embedding dimensions differ");

    let mut dot = 0.0_f32;
    let mut norm_a = 0.0_f32;
    let mut norm_b = 0.0_f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Round to 4 decimal places.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn round4(value: f32) -> f32 {
    ((f64::from(value) * 10_000.0).round() / 10_000.0) as f32
}
