//! Platform duration parsing and verification

use once_cell::sync::Lazy;
use regex::Regex;

static ISO8601_DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("Invalid regex"));

/// Parse an ISO-8601 `PT#H#M#S` duration into milliseconds
///
/// Absent components count as zero. Malformed or overflowing input yields 0.
///
/// # Examples
///
/// ```
/// use trackmap_mx::matching::duration::parse_iso8601_duration_ms;
///
/// assert_eq!(parse_iso8601_duration_ms("PT3M20S"), 200_000);
/// assert_eq!(parse_iso8601_duration_ms("garbage"), 0);
/// ```
pub fn parse_iso8601_duration_ms(encoded: &str) -> u64 {
    let Some(caps) = ISO8601_DURATION.captures(encoded) else {
        return 0;
    };

    let component = |i: usize| -> Option<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(0),
        }
    };

    let total_secs = (|| {
        let hours = component(1)?;
        let minutes = component(2)?;
        let seconds = component(3)?;
        hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?
            .checked_mul(1000)
    })();

    total_secs.unwrap_or(0)
}

/// `|candidate - track| <= tolerance`
pub fn within_tolerance(candidate_ms: u64, track_ms: u64, tolerance_ms: u64) -> bool {
    candidate_ms.abs_diff(track_ms) <= tolerance_ms
}
