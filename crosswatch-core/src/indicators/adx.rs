//! Average Directional Index (ADX), TradingView-style Wilder smoothing.
//!
//! True range and directional movement are smoothed with Wilder's RMA
//! (seed = SMA of the first `period` values, then
//! rma = (prev * (period - 1) + value) / period). DX is kept as a 0..1 ratio,
//! smoothed with a second RMA, then scaled by 100. Pre-seed DX slots count as
//! zero in the ADX seed window. The latest value is rounded to 2 decimals.

use crate::domain::Candle;

/// Wilder's RMA over a clean (NaN-free) series. Slots before `period - 1`
/// are NaN.
fn wilder_rma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period {
        return result;
    }

    let seed = values[..period].iter().sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let rma = (prev * (period as f64 - 1.0) + values[i]) / period as f64;
        result[i] = rma;
        prev = rma;
    }
    result
}

/// Latest ADX of a candle series.
///
/// Returns `None` when the series is too short to seed both smoothing
/// passes.
pub fn latest_adx(candles: &[Candle], di_period: usize, adx_period: usize) -> Option<f64> {
    let n = candles.len();
    if di_period == 0 || adx_period == 0 || n < di_period.max(adx_period).max(2) {
        return None;
    }

    let mut tr = Vec::with_capacity(n);
    let mut plus_dm = Vec::with_capacity(n);
    let mut minus_dm = Vec::with_capacity(n);

    tr.push(candles[0].high - candles[0].low);
    plus_dm.push(0.0);
    minus_dm.push(0.0);

    for w in candles.windows(2) {
        let (prev, cur) = (&w[0], &w[1]);
        let up = cur.high - prev.high;
        let down = prev.low - cur.low;
        plus_dm.push(if up > down && up > 0.0 { up } else { 0.0 });
        minus_dm.push(if down > up && down > 0.0 { down } else { 0.0 });

        let range = (cur.high - cur.low)
            .max((cur.high - prev.close).abs())
            .max((cur.low - prev.close).abs());
        tr.push(range);
    }

    let tr_rma = wilder_rma(&tr, di_period);
    let plus_rma = wilder_rma(&plus_dm, di_period);
    let minus_rma = wilder_rma(&minus_dm, di_period);

    // DX as a 0..1 ratio; undefined slots count as zero toward the ADX seed.
    let mut dx = vec![0.0; n];
    for i in (di_period - 1)..n {
        if tr_rma[i] == 0.0 {
            continue;
        }
        let plus_di = 100.0 * plus_rma[i] / tr_rma[i];
        let minus_di = 100.0 * minus_rma[i] / tr_rma[i];
        let di_sum = plus_di + minus_di;
        if di_sum > 0.0 {
            dx[i] = (plus_di - minus_di).abs() / di_sum;
        }
    }

    let adx = wilder_rma(&dx, adx_period);
    let latest = adx.iter().rev().find(|v| !v.is_nan())?;
    Some((latest * 100.0 * 100.0).round() / 100.0)
}
