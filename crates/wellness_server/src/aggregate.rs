//! Point-sequence reduction: collapse a day of samples into one number.

use google_fit_client::Dataset;

/// Policy for collapsing multiple timestamped values into one summary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceMode {
    /// Arithmetic sum, rounded to the nearest integer with ties going to
    /// even (steps, calories).
    Sum,
    /// Last value in provider-returned order (heart rate, weight,
    /// blood pressure). Provider order is authoritative; no re-sorting.
    Last,
}

/// All present values across a dataset, in provider order. Slots carrying
/// neither an integer nor a float contribute nothing.
pub fn extract_values(dataset: &Dataset) -> Vec<f64> {
    dataset
        .point
        .iter()
        .flat_map(|p| p.value.iter())
        .filter_map(|v| v.as_f64())
        .collect()
}

/// Reduce a dataset to a single number, or `None` when no value is present.
pub fn reduce(dataset: &Dataset, mode: ReduceMode) -> Option<f64> {
    let values = extract_values(dataset);
    if values.is_empty() {
        return None;
    }
    match mode {
        ReduceMode::Sum => Some(values.iter().sum::<f64>().round_ties_even()),
        ReduceMode::Last => values.last().copied(),
    }
}

/// Sleep stage codes counted as asleep. Light, deep, REM and the generic
/// sleep code are not distinguished; only total time asleep matters here.
const ASLEEP_STAGES: [i64; 4] = [1, 2, 3, 4];

/// Total minutes asleep across a day of sleep-segment points, rounded.
///
/// Each interval whose stage code is an asleep code contributes its
/// `end - start` duration. Zero total (no asleep-coded interval, or no
/// points at all) is reported as `None`.
pub fn sleep_minutes(dataset: &Dataset) -> Option<i64> {
    let mut total_ms: i64 = 0;
    for point in &dataset.point {
        let (Some(start_ns), Some(end_ns)) = (point.start_time_nanos, point.end_time_nanos) else {
            continue;
        };
        let duration_ms = end_ns / 1_000_000 - start_ns / 1_000_000;
        for value in &point.value {
            if value.int_val.is_some_and(|code| ASLEEP_STAGES.contains(&code)) {
                total_ms += duration_ms;
            }
        }
    }
    if total_ms > 0 {
        Some((total_ms as f64 / 60_000.0).round() as i64)
    } else {
        None
    }
}
