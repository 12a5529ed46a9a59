//! Day-window computation for dataset queries.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use google_fit_client::DayWindow;

/// Reference timezone for day boundaries: IST (UTC+05:30). The offset is
/// fixed because the zone observes no daylight saving; anchoring here keeps
/// "today" stable regardless of where the server runs.
pub fn reference_tz() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600 + 30 * 60).expect("IST offset is valid")
}

/// Window from local midnight (reference timezone) up to now, in epoch ms.
/// Recomputed on every request; the window grows through the day.
pub fn today() -> DayWindow {
    at(Utc::now())
}

pub fn at(now: DateTime<Utc>) -> DayWindow {
    let tz = reference_tz();
    let midnight = now
        .with_timezone(&tz)
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .expect("midnight exists");
    let start = tz
        .from_local_datetime(&midnight)
        .single()
        .expect("fixed offset maps local times uniquely");
    DayWindow {
        start_ms: start.timestamp_millis(),
        end_ms: now.timestamp_millis(),
    }
}
