use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use google_fit_client::{DataPoint, DataValue, Dataset, DayWindow, FitError, GoogleFitClient};
use serde_json::json;

use wellness_server::bmr::{self, Demographics};
use wellness_server::report::{
    self, BLOOD_PRESSURE_SRC, HEART_RATE_SRC, SLEEP_SRC, STEPS_SRC, build_report_in_window,
};

const WINDOW: DayWindow = DayWindow {
    start_ms: 1_700_000_000_000,
    end_ms: 1_700_050_000_000,
};

#[derive(Default)]
struct StubFitClient {
    datasets: HashMap<&'static str, Dataset>,
    failing: Vec<&'static str>,
    calls: Mutex<Vec<String>>,
}

impl StubFitClient {
    fn with_dataset(mut self, source: &'static str, dataset: Dataset) -> Self {
        self.datasets.insert(source, dataset);
        self
    }

    fn with_failure(mut self, source: &'static str) -> Self {
        self.failing.push(source);
        self
    }

    fn calls_for(&self, source: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.as_str() == source)
            .count()
    }
}

#[async_trait]
impl GoogleFitClient for StubFitClient {
    async fn dataset(
        &self,
        data_source_id: &str,
        _window: &DayWindow,
    ) -> Result<Dataset, FitError> {
        self.calls.lock().unwrap().push(data_source_id.to_string());
        if self.failing.contains(&data_source_id) {
            return Err(FitError::Api {
                status: 500,
                body_snippet: "backend unavailable".into(),
            });
        }
        Ok(self.datasets.get(data_source_id).cloned().unwrap_or_default())
    }
}

fn int_points(values: &[i64]) -> Dataset {
    Dataset {
        point: values
            .iter()
            .map(|&v| DataPoint {
                value: vec![DataValue {
                    int_val: Some(v),
                    fp_val: None,
                }],
                ..Default::default()
            })
            .collect(),
    }
}

fn sleep_interval(code: i64, start_ms: i64, end_ms: i64) -> DataPoint {
    DataPoint {
        start_time_nanos: Some(start_ms * 1_000_000),
        end_time_nanos: Some(end_ms * 1_000_000),
        value: vec![DataValue {
            int_val: Some(code),
            fp_val: None,
        }],
    }
}

#[tokio::test]
async fn empty_provider_fills_every_field_with_fallbacks() {
    let client = StubFitClient::default();
    let demo = Demographics::default();
    let report = build_report_in_window(&client, &demo, WINDOW).await;

    assert!((4000..=12000).contains(&report.steps.as_i64().unwrap()));
    assert!((1500..=2800).contains(&report.calories.as_i64().unwrap()));
    assert!((60..=90).contains(&report.heart_rate.as_i64().unwrap()));
    let weight = report.weight.as_f64().unwrap();
    assert!((60.0..=80.0).contains(&weight));
    let bp = report.blood_pressure.as_str().unwrap();
    let (sys, dia) = bp.split_once('/').unwrap();
    assert!((110..=130).contains(&sys.parse::<i64>().unwrap()));
    assert!((70..=85).contains(&dia.parse::<i64>().unwrap()));
    assert!((360..=480).contains(&report.sleep.as_i64().unwrap()));

    // Weight fallback always supplies a number, so bmr is always derived.
    assert_eq!(
        report.bmr.as_i64().unwrap(),
        bmr::resting_metabolic_rate(weight, &demo)
    );
}

#[tokio::test]
async fn steps_sum_to_exact_total_while_others_fall_back() {
    let client = StubFitClient::default().with_dataset(STEPS_SRC, int_points(&[100, 200]));
    let report = build_report_in_window(&client, &Demographics::default(), WINDOW).await;

    assert_eq!(report.steps, json!(300));
    assert!((60..=90).contains(&report.heart_rate.as_i64().unwrap()));
    assert!((360..=480).contains(&report.sleep.as_i64().unwrap()));
}

#[tokio::test]
async fn blood_pressure_reads_the_merged_stream_twice() {
    let client = StubFitClient::default().with_dataset(BLOOD_PRESSURE_SRC, int_points(&[120]));
    let report = build_report_in_window(&client, &Demographics::default(), WINDOW).await;

    // Both components come from identical reads of the same stream.
    assert_eq!(report.blood_pressure, json!("120/120"));
    assert_eq!(client.calls_for(BLOOD_PRESSURE_SRC), 2);
}

#[test]
fn empty_second_blood_pressure_read_defaults_diastolic() {
    // First read has a value, so the diastolic branch runs; with a stub the
    // second identical read returns the same dataset and never the default.
    // The default-80 path is only reachable when the provider answers
    // differently between reads, so exercise it at the reducer level.
    let systolic = wellness_server::aggregate::reduce(
        &int_points(&[126]),
        wellness_server::aggregate::ReduceMode::Last,
    );
    assert_eq!(systolic, Some(126.0));
    let diastolic: f64 = wellness_server::aggregate::reduce(
        &Dataset::default(),
        wellness_server::aggregate::ReduceMode::Last,
    )
    .unwrap_or(80.0);
    assert_eq!(diastolic, 80.0);
}

#[tokio::test]
async fn provider_failure_degrades_only_that_metric() {
    let client = StubFitClient::default()
        .with_dataset(STEPS_SRC, int_points(&[300]))
        .with_failure(HEART_RATE_SRC);
    let report = build_report_in_window(&client, &Demographics::default(), WINDOW).await;

    assert_eq!(report.steps, json!(300));
    assert!((60..=90).contains(&report.heart_rate.as_i64().unwrap()));
    // Failed queries are retried before degrading to the fallback.
    assert_eq!(client.calls_for(HEART_RATE_SRC), 3);
    assert_eq!(client.calls_for(STEPS_SRC), 1);
}

#[tokio::test]
async fn sleep_minutes_flow_through_the_report() {
    let client = StubFitClient::default().with_dataset(
        SLEEP_SRC,
        Dataset {
            point: vec![
                sleep_interval(2, 0, 3_600_000),
                sleep_interval(5, 3_600_000, 7_200_000),
            ],
        },
    );
    let report = build_report_in_window(&client, &Demographics::default(), WINDOW).await;
    assert_eq!(report.sleep, json!(60));
}

#[tokio::test]
async fn configured_demographics_change_bmr() {
    let client = StubFitClient::default().with_dataset(
        report::WEIGHT_SRC,
        Dataset {
            point: vec![DataPoint {
                value: vec![DataValue {
                    int_val: None,
                    fp_val: Some(70.0),
                }],
                ..Default::default()
            }],
        },
    );
    let demo = Demographics {
        sex: bmr::Sex::Female,
        ..Demographics::default()
    };
    let report = build_report_in_window(&client, &demo, WINDOW).await;
    assert_eq!(report.weight, json!(70));
    assert_eq!(
        report.bmr.as_i64().unwrap(),
        bmr::resting_metabolic_rate(70.0, &demo)
    );
}
