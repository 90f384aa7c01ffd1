//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * value[t] + (1 - alpha) * EMA[t-1]
//! Seed: EMA[0] = value[0].
//!
//! The first-value seed keeps the output the same length as the input, so an
//! EMA series stays aligned index-for-index with its candle series. Early
//! values are biased toward the seed and settle after roughly one period.

/// Compute a full EMA series over raw values.
///
/// Returns an empty vector for empty input or `period == 0`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    if values.is_empty() || period == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut result = Vec::with_capacity(values.len());

    let mut prev = values[0];
    result.push(prev);
    for &v in &values[1..] {
        let ema = alpha * v + (1.0 - alpha) * prev;
        result.push(ema);
        prev = ema;
    }

    result
}

/// Latest EMA over the tail of a series, using the same first-value seed.
///
/// The volume analyzer uses this for its smoothed baseline over the most
/// recent samples.
pub fn ema_latest(values: &[f64], period: usize) -> f64 {
    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = match values.first() {
        Some(&v) => v,
        None => return f64::NAN,
    };
    for &v in &values[1..] {
        ema = v * k + ema * (1.0 - k);
    }
    ema
}
