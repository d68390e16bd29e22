use std::time::Duration;

use crate::types::TimeFormat;

/// Rounds seconds to millisecond precision.
pub fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}

fn whole_millis(duration: Duration) -> u128 {
    (duration.as_nanos() + 500_000) / 1_000_000
}

/// Renders a duration as `MM:SS.sss` or `HH:MM:SS.sss`.
///
/// In minutes mode the minutes are not folded into hours, so an hour and a
/// half reads `90:00.000`.
pub fn format_duration(duration: Duration, format: TimeFormat) -> String {
    let millis = whole_millis(duration);
    let ms = millis % 1000;
    let seconds = (millis / 1000) % 60;
    match format {
        TimeFormat::MinutesSeconds => {
            let minutes = millis / 60_000;
            format!("{minutes:02}:{seconds:02}.{ms:03}")
        }
        TimeFormat::HoursMinutesSeconds => {
            let hours = millis / 3_600_000;
            let minutes = (millis / 60_000) % 60;
            format!("{hours:02}:{minutes:02}:{seconds:02}.{ms:03}")
        }
    }
}

/// Formats a seconds value. Negative and NaN read as zero, anything too
/// large for a `Duration` clamps to `Duration::MAX`.
pub fn format_secs(secs: f64, format: TimeFormat) -> String {
    let duration = if secs.is_nan() || secs <= 0.0 {
        Duration::ZERO
    } else {
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    };
    format_duration(duration, format)
}
