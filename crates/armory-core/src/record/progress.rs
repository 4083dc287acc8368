/// Overall completion percentage from (progress, threshold) pairs.
///
/// Clamped to `0.0..=100.0`. With a zero threshold sum the result is 100
/// for a complete record and 0 otherwise.
pub fn overall_progress(pairs: impl IntoIterator<Item = (i64, i64)>, complete: bool) -> f64 {
    let (progress, threshold) = pairs
        .into_iter()
        .fold((0i64, 0i64), |(p, t), (progress, threshold)| {
            (p.saturating_add(progress), t.saturating_add(threshold))
        });

    if threshold <= 0 {
        return if complete { 100.0 } else { 0.0 };
    }
    (progress as f64 / threshold as f64 * 100.0).clamp(0.0, 100.0)
}
