//! Timestamp parsing for ffmpeg-style `HH:MM:SS(.fraction)` strings.
//!
//! Two flavours are provided:
//! - [`parse_duration`] never fails and falls back to `0` for anything that
//!   is not three colon-separated parts. Progress computation relies on this.
//! - [`try_parse_duration`] is strict and is used where a malformed value must
//!   surface as an error (duration probing).

/// Convert `HH:MM:SS(.fraction)` to whole seconds.
///
/// Returns `hours * 3600 + minutes * 60 + floor(seconds)`. Input that does not
/// split into exactly three colon-separated parts yields `0`. A component that
/// fails to parse counts as `0`. A negative or overflowing total yields `0`.
///
/// # Examples
/// ```
/// use clipper_models::timestamp::parse_duration;
/// assert_eq!(parse_duration("01:02:03"), 3723);
/// assert_eq!(parse_duration("00:00:12.99"), 12);
/// assert_eq!(parse_duration("bad"), 0);
/// ```
pub fn parse_duration(ts: &str) -> u64 {
    let parts: Vec<&str> = ts.trim().split(':').collect();
    if parts.len() != 3 {
        return 0;
    }

    let hours: i64 = parts[0].trim().parse().unwrap_or(0);
    let minutes: i64 = parts[1].trim().parse().unwrap_or(0);
    let seconds = whole_seconds(parts[2])
        .and_then(|s| i64::try_from(s).ok())
        .unwrap_or(0);

    hours
        .checked_mul(3600)
        .zip(minutes.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(seconds))
        .map_or(0, |total| total.max(0) as u64)
}

/// Strict variant of [`parse_duration`].
///
/// Returns `None` unless the input is exactly three non-negative numeric
/// components whose total fits in a `u64`.
pub fn try_parse_duration(ts: &str) -> Option<u64> {
    let mut parts = ts.trim().split(':');
    let (h, m, s) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let hours: u64 = h.trim().parse().ok()?;
    let minutes: u64 = m.trim().parse().ok()?;
    let seconds = whole_seconds(s)?;

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Integer part of a plain decimal seconds field (`SS` or `SS.ff`).
///
/// Signs, exponents and `inf`/`NaN` are rejected.
fn whole_seconds(field: &str) -> Option<u64> {
    let field = field.trim();
    let valid = field.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && field.bytes().filter(|&b| b == b'.').count() <= 1
        && field.bytes().any(|b| b.is_ascii_digit());
    if !valid {
        return None;
    }

    match field.split_once('.') {
        Some(("", _)) => Some(0),
        Some((whole, _)) => whole.parse().ok(),
        None => field.parse().ok(),
    }
}

/// Format whole seconds as `HH:MM:SS`.
pub fn format_seconds(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, mins, secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_hh_mm_ss() {
        assert_eq!(parse_duration("00:00:00"), 0);
        assert_eq!(parse_duration("00:01:00"), 60);
        assert_eq!(parse_duration("01:02:03"), 3723);
        assert_eq!(parse_duration("10:00:00"), 36000);
    }

    #[test]
    fn test_parse_duration_floors_fraction() {
        assert_eq!(parse_duration("00:00:12.34"), 12);
        assert_eq!(parse_duration("00:01:59.99"), 119);
    }

    #[test]
    fn test_parse_duration_malformed_is_zero() {
        assert_eq!(parse_duration("bad"), 0);
        assert_eq!(parse_duration("1:2"), 0);
        assert_eq!(parse_duration(""), 0);
        assert_eq!(parse_duration("1:2:3:4"), 0);
    }

    #[test]
    fn test_parse_duration_bad_component_counts_as_zero() {
        assert_eq!(parse_duration("xx:01:05"), 65);
        assert_eq!(parse_duration("01:xx:05"), 3605);
        assert_eq!(parse_duration("-00:00:00.50"), 0);
    }

    #[test]
    fn test_try_parse_duration() {
        assert_eq!(try_parse_duration("00:10:05.50"), Some(605));
        assert_eq!(try_parse_duration("N/A"), None);
        assert_eq!(try_parse_duration("00:10"), None);
        assert_eq!(try_parse_duration("aa:10:00"), None);
        assert_eq!(try_parse_duration("00:-1:00"), None);
    }

    #[test]
    fn test_parse_duration_out_of_range_input() {
        assert_eq!(parse_duration("00:01:1e300"), 60);
        assert_eq!(parse_duration("00:00:inf"), 0);
        assert_eq!(parse_duration("9000000000000000:00:00"), 0);
        assert_eq!(parse_duration("00:9223372036854775807:00"), 0);
        assert_eq!(parse_duration("00:00:99999999999999999999"), 0);
    }

    #[test]
    fn test_try_parse_duration_out_of_range_input() {
        assert_eq!(try_parse_duration("00:01:1e300"), None);
        assert_eq!(try_parse_duration("00:00:NaN"), None);
        assert_eq!(try_parse_duration("00:00:1.2.3"), None);
        assert_eq!(try_parse_duration("00:00:."), None);
        assert_eq!(try_parse_duration("9000000000000000:00:00"), None);
        assert_eq!(try_parse_duration("00:00:.5"), Some(0));
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00:00");
        assert_eq!(format_seconds(90), "00:01:30");
        assert_eq!(format_seconds(3723), "01:02:03");
    }
}
