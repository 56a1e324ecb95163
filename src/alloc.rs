//! Allocation helpers (probabilities, softmax).
//!
//! Deterministic utilities for turning index-aligned scores into a probability
//! distribution in a stable (reproducible) way.

/// Compute a stable softmax distribution over `scores`.
///
/// - `temperature` controls sharpness (must be finite and > 0; otherwise 1.0).
/// - Uses the standard max-trick for numerical stability.
/// - Returns a distribution that sums to 1 (or empty if input is empty).
pub fn softmax(scores: &[f64], temperature: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let t = if temperature.is_finite() && temperature > 0.0 {
        temperature
    } else {
        1.0
    };

    let max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut out: Vec<f64> = Vec::with_capacity(scores.len());
    let mut denom = 0.0;
    for &v in scores {
        let x = ((v - max_score) / t).exp();
        denom += x;
        out.push(x);
    }
    if denom <= 0.0 || !denom.is_finite() {
        // Degenerate fallback: uniform.
        return uniform(scores.len());
    }

    for v in out.iter_mut() {
        *v /= denom;
    }
    out
}

/// Uniform distribution over `n` entries.
pub fn uniform(n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    vec![1.0 / n as f64; n]
}

/// Draw an index from `probs` given a uniform variate `u` in `[0, 1)`.
///
/// Falls through to the last index on numerical shortfall.
pub(crate) fn pick_from_cdf(probs: &[f64], u: f64) -> usize {
    let mut acc = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        acc += p;
        if u < acc {
            return i;
        }
    }
    probs.len().saturating_sub(1)
}
