//! Small numeric helpers for the chart builders.

use crate::chart::FiveNum;
use plotters::data::Quartiles;

/// Distinct values in first-appearance order. Grouping a table column
/// this way keeps series colors stable across runs of the same data.
pub fn unique_in_order<T: PartialEq + Clone>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen: Vec<T> = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Mean of the values, `None` when there are none.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Least-squares line through the points as `(slope, intercept)`.
/// `None` for fewer than two points or zero x spread.
pub fn linear_fit(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|p| (p.0 - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return None;
    }
    let sxy: f64 = points.iter().map(|p| (p.0 - mean_x) * (p.1 - mean_y)).sum();
    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

/// Box statistics: whisker fences, quartiles, and median.
pub fn five_number_summary(values: &[f64]) -> Option<FiveNum> {
    if values.is_empty() {
        return None;
    }
    let [lower, q1, median, q3, upper] = Quartiles::new(values).values();
    Some(FiveNum {
        lower:  f64::from(lower),
        q1:     f64::from(q1),
        median: f64::from(median),
        q3:     f64::from(q3),
        upper:  f64::from(upper),
    })
}
