/// Fade used when speed or trail length gives no meaningful step count.
pub const FALLBACK_TRAIL_ALPHA: f64 = 0.08;

/// Per-step fade coefficient that keeps the visible trail about `trail_rows`
/// long whatever the fall speed.
///
/// A drop needs `k = trail_rows / speed` steps to cover the trail; after `k`
/// overpaints at opacity `alpha` the residue must be down to `epsilon`, so
/// `(1 - alpha)^k = epsilon`.
pub fn trail_alpha(speed: f64, trail_rows: f64, epsilon: f64) -> f64 {
    if speed <= 0.0 || trail_rows <= 0.0 {
        return FALLBACK_TRAIL_ALPHA;
    }
    let k = trail_rows / speed;
    1.0 - epsilon.powf(1.0 / k)
}
