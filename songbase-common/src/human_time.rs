//! Human-readable durations
//!
//! Track lengths are shown as `M:SS`, or `H:MM:SS` from one hour up.

use crate::song::NSEC_PER_SEC;

/// Format whole seconds as `M:SS` or `H:MM:SS`
///
/// # Examples
///
/// ```
/// use songbase_common::human_time::pretty_time;
///
/// assert_eq!(pretty_time(0), "0:00");
/// assert_eq!(pretty_time(354), "5:54");
/// assert_eq!(pretty_time(3661), "1:01:01");
/// ```
pub fn pretty_time(seconds: i64) -> String {
    let is_negative = seconds < 0;
    let abs_seconds = seconds.abs();

    let hours = abs_seconds / 3600;
    let mins = (abs_seconds % 3600) / 60;
    let secs = abs_seconds % 60;

    let formatted = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format a nanosecond duration, rounding to the nearest second
pub fn pretty_time_nanosec(nanoseconds: i64) -> String {
    let rounded = (nanoseconds + NSEC_PER_SEC / 2).div_euclid(NSEC_PER_SEC);
    pretty_time(rounded)
}
