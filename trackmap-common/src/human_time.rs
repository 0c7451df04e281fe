//! Human-readable track duration formatting

/// Format a track duration as `M:SS`
///
/// Rounds to the nearest second; minutes are not wrapped into hours.
///
/// # Examples
///
/// ```
/// use trackmap_common::human_time::format_track_duration;
///
/// assert_eq!(format_track_duration(200_000), "3:20");
/// assert_eq!(format_track_duration(59_500), "1:00");
/// assert_eq!(format_track_duration(0), "0:00");
/// assert_eq!(format_track_duration(3_723_000), "62:03");
/// ```
pub fn format_track_duration(duration_ms: u64) -> String {
    let total_seconds = duration_ms.saturating_add(500) / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}
