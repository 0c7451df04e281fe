//! Video title clean-up and "Artist - Track" parsing

use crate::models::TitleGuess;
use once_cell::sync::Lazy;
use regex::Regex;

/// Parenthesised noise suffix such as "(Official Audio)" or "(Lyrics)"
pub const NOISE_SUFFIX_PATTERN: &str =
    r"(?i)\s*\((official\s+audio|official\s+video|lyrics?|lyric\s+video|visualizer|audio)\)\s*$";

/// Dashes left dangling at the end of a title
pub const TRAILING_DASHES_PATTERN: &str = r"(?:\s*[-–—]\s*)+$";

static NOISE_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(NOISE_SUFFIX_PATTERN).expect("Invalid regex"));

static TRAILING_DASHES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(TRAILING_DASHES_PATTERN).expect("Invalid regex"));

static ARTIST_TRACK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^-]{1,100})\s*-\s*(.+)$").expect("Invalid regex"));

/// Strip one noise suffix, then any trailing dashes
pub fn clean_title_suffix(title: &str) -> String {
    let without_suffix = NOISE_SUFFIX_RE.replace(title, "");
    let without_dashes = TRAILING_DASHES_RE.replace(&without_suffix, "");
    without_dashes.trim().to_string()
}

/// Split a title into artist and track
///
/// The artist part is 1-100 characters without a hyphen. Titles that do not split
/// yield only a track (the cleaned title).
pub fn parse_artist_track(raw_title: &str) -> TitleGuess {
    let title = clean_title_suffix(raw_title);

    if let Some(caps) = ARTIST_TRACK_RE.captures(&title) {
        let artist = caps[1].trim().to_string();
        let track = caps[2].trim().to_string();
        return TitleGuess {
            artist: Some(artist),
            track: Some(track),
        };
    }

    TitleGuess {
        artist: None,
        track: Some(title),
    }
}
