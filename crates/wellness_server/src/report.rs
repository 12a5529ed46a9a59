//! Per-request assembly of the daily health report.

use crate::aggregate::{self, ReduceMode};
use crate::bmr::{self, Demographics};
use crate::fallback::fallback;
use crate::window;
use google_fit_client::retry::RetryPolicy;
use google_fit_client::{Dataset, DayWindow, GoogleFitClient};
use serde::Serialize;
use serde_json::{Value, json};

pub const STEPS_SRC: &str =
    "raw:com.google.step_count.delta:com.coveiot.android.boat:GoogleFitDataManager - step count";
pub const CALORIES_SRC: &str =
    "raw:com.google.calories.expended:com.coveiot.android.boat:GoogleFitDataManager - calories";
pub const HEART_RATE_SRC: &str =
    "derived:com.google.heart_rate.bpm:com.coveiot.android.boat:GoogleFitDataManager - heart rate";
pub const WEIGHT_SRC: &str = "derived:com.google.weight:com.google.android.gms:merge_weight";
pub const BLOOD_PRESSURE_SRC: &str =
    "derived:com.google.blood_pressure:com.google.android.gms:merged";
pub const SLEEP_SRC: &str =
    "raw:com.google.sleep.segment:com.coveiot.android.boat:GoogleFitDataManager - sleep session";

/// The JSON document served on `/health-data`. Each metric is a number, or
/// a composed string for blood pressure, or the `"No data"` sentinel for
/// `bmr` when no usable weight exists.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub steps: Value,
    pub calories: Value,
    pub heart_rate: Value,
    pub weight: Value,
    pub blood_pressure: Value,
    pub sleep: Value,
    pub bmr: Value,
}

/// Build today's report: one day window, six sequential metric queries,
/// fallback substitution per metric, derived BMR at the end.
pub async fn build_report(client: &dyn GoogleFitClient, demographics: &Demographics) -> HealthReport {
    build_report_in_window(client, demographics, window::today()).await
}

/// Window-parameterized variant so tests can pin the day.
pub async fn build_report_in_window(
    client: &dyn GoogleFitClient,
    demographics: &Demographics,
    window: DayWindow,
) -> HealthReport {
    let steps = resolve(
        "steps",
        aggregate::reduce(&query(client, STEPS_SRC, &window).await, ReduceMode::Sum),
    );
    let calories = resolve(
        "calories",
        aggregate::reduce(&query(client, CALORIES_SRC, &window).await, ReduceMode::Sum),
    );
    let heart_rate = resolve(
        "heart_rate",
        aggregate::reduce(
            &query(client, HEART_RATE_SRC, &window).await,
            ReduceMode::Last,
        ),
    );
    let weight = resolve(
        "weight",
        aggregate::reduce(&query(client, WEIGHT_SRC, &window).await, ReduceMode::Last),
    );
    let blood_pressure = resolve_blood_pressure(client, &window).await;
    let sleep = match aggregate::sleep_minutes(&query(client, SLEEP_SRC, &window).await) {
        Some(minutes) => json!(minutes),
        None => substitute("sleep"),
    };

    // BMR derives from the resolved weight, real or synthetic.
    let bmr = match weight.as_f64() {
        Some(kg) => json!(bmr::resting_metabolic_rate(kg, demographics)),
        None => json!("No data"),
    };

    let report = HealthReport {
        steps,
        calories,
        heart_rate,
        weight,
        blood_pressure,
        sleep,
        bmr,
    };
    tracing::info!(
        steps = %report.steps,
        calories = %report.calories,
        heart_rate = %report.heart_rate,
        weight = %report.weight,
        blood_pressure = %report.blood_pressure,
        sleep = %report.sleep,
        bmr = %report.bmr,
        "health data served"
    );
    report
}

/// Blood pressure: last value of the merged stream is systolic. The
/// diastolic reading repeats the identical query against the same stream
/// (the merged source interleaves both components), defaulting to 80 when
/// that second read comes back empty.
async fn resolve_blood_pressure(client: &dyn GoogleFitClient, window: &DayWindow) -> Value {
    let systolic = aggregate::reduce(
        &query(client, BLOOD_PRESSURE_SRC, window).await,
        ReduceMode::Last,
    );
    match systolic {
        Some(sys) => {
            let dia = aggregate::reduce(
                &query(client, BLOOD_PRESSURE_SRC, window).await,
                ReduceMode::Last,
            )
            .unwrap_or(80.0);
            json!(format!("{}/{}", display_number(sys), display_number(dia)))
        }
        None => substitute("blood_pressure"),
    }
}

/// Query one data source, degrading every failure to an empty dataset so a
/// broken stream never takes down the whole report.
async fn query(client: &dyn GoogleFitClient, source: &str, window: &DayWindow) -> Dataset {
    let retry = RetryPolicy::default();
    match retry.retry_async(|| client.dataset(source, window)).await {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::warn!(source, error = %e, "dataset query failed, treating as empty");
            metrics::counter!("fit_query_errors_total").increment(1);
            Dataset::default()
        }
    }
}

fn resolve(metric: &str, reduced: Option<f64>) -> Value {
    match reduced {
        Some(v) => number(v),
        None => substitute(metric),
    }
}

fn substitute(metric: &str) -> Value {
    metrics::counter!("fallback_substitutions_total").increment(1);
    fallback(metric)
}

/// Whole-valued floats serialize as integers so summed counts stay counts.
fn number(v: f64) -> Value {
    if v.fract() == 0.0 {
        json!(v as i64)
    } else {
        json!(v)
    }
}

fn display_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}
