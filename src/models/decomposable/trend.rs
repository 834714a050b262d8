//! Piecewise-linear trend with changepoints.

/// Place changepoints evenly over the first `range` fraction of the history.
///
/// `t` is the scaled time of each observation. The number of changepoints is
/// capped so that each one sits on a distinct observation after the first;
/// the first observation itself is never a changepoint.
pub fn place_changepoints(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let n = t.len();
    let hist_size = ((n as f64) * range).floor() as usize;
    if hist_size < 2 || n_changepoints == 0 {
        return Vec::new();
    }

    let count = n_changepoints.min(hist_size - 1);
    let last = (hist_size - 1) as f64;

    let mut points: Vec<f64> = (1..=count)
        .map(|i| {
            let idx = (last * i as f64 / count as f64).round() as usize;
            t[idx.min(n - 1)]
        })
        .collect();
    points.dedup();
    points
}

/// Design columns of the trend: intercept, slope and one hinge per changepoint.
pub fn trend_columns(t: &[f64], changepoints: &[f64]) -> Vec<Vec<f64>> {
    let mut columns = Vec::with_capacity(2 + changepoints.len());
    columns.push(vec![1.0; t.len()]);
    columns.push(t.to_vec());
    for &s in changepoints {
        columns.push(t.iter().map(|&ti| (ti - s).max(0.0)).collect());
    }
    columns
}

/// Evaluate the trend at scaled time `t`.
pub fn trend_at(t: f64, changepoints: &[f64], coefficients: &[f64]) -> f64 {
    let mut value = coefficients[0] + coefficients[1] * t;
    for (s, delta) in changepoints.iter().zip(&coefficients[2..]) {
        value += delta * (t - s).max(0.0);
    }
    value
}
