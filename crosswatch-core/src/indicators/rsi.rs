//! Relative Strength Index (RSI), Wilder's smoothing.
//!
//! First average gain/loss: SMA of the first `period` deltas. After that the
//! recursive update avg = (avg * (period - 1) + delta) / period. Only the
//! latest value is needed by the gate, so intermediate values are not kept.

/// Latest RSI of a close series.
///
/// Returns `None` when there are fewer than `period + 1` closes (not enough
/// deltas to seed the averages).
pub fn latest_rsi(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let gains: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let losses: Vec<f64> = closes
        .windows(2)
        .map(|w| (w[0] - w[1]).max(0.0))
        .collect();

    let mut avg_gain = gains[..period].iter().sum::<f64>() / period as f64;
    let mut avg_loss = losses[..period].iter().sum::<f64>() / period as f64;

    for i in period..gains.len() {
        avg_gain = (avg_gain * (period as f64 - 1.0) + gains[i]) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + losses[i]) / period as f64;
    }

    if avg_loss == 0.0 {
        // No losses in the window: RS is unbounded, RSI saturates at 100.
        return Some(100.0);
    }

    let rs = avg_gain / avg_loss;
    Some(100.0 - (100.0 / (1.0 + rs)))
}
