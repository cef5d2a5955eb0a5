//! Time Formatting Module

use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;

// == Time Formatting ==
/// Renders a timestamp as `HH:MM:SS` in 24-hour form.
///
/// # Arguments
/// * `timestamp` - Instant to render
/// * `timezone` - IANA zone name (e.g. `America/New_York`); `None` uses the
///   host's local zone
///
/// # Returns
/// * `String` - Formatted time, or an empty string for an unrecognized zone
pub fn format_time(timestamp: DateTime<Utc>, timezone: Option<&str>) -> String {
    match timezone {
        Some(zone) => match zone.parse::<Tz>() {
            Ok(tz) => timestamp.with_timezone(&tz).format("%H:%M:%S").to_string(),
            Err(_) => String::new(),
        },
        None => timestamp.with_timezone(&Local).format("%H:%M:%S").to_string(),
    }
}
