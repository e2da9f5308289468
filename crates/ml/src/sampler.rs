//! Discrete action sampling

/// Draws an index from `probs` using one uniform draw in `[0, 1)`.
///
/// # Panics
///
/// If `probs` is empty.
pub fn sample(probs: &[f64], rng: &mut fastrand::Rng) -> usize {
    sample_with(probs, rng.f64())
}

/// Walks the cumulative mass and returns the first index whose running sum
/// exceeds `draw`. If rounding leaves the total short of `draw`, the last
/// index is returned.
///
/// # Panics
///
/// If `probs` is empty.
#[must_use]
pub fn sample_with(probs: &[f64], draw: f64) -> usize {
    assert!(
        !probs.is_empty(),
        "cannot sample from an empty distribution"
    );
    let mut cumulative = 0.0;
    for (i, p) in probs.iter().enumerate() {
        cumulative += p;
        if cumulative > draw {
            return i;
        }
    }
    probs.len() - 1
}
