//! Canonical output file names

use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\\/:*?"<>|]+"#).expect("Invalid regex"));

/// Replace each run of path-unsafe characters with `_` and trim
pub fn sanitize_component(value: &str) -> String {
    UNSAFE_CHARS_RE.replace_all(value, "_").trim().to_string()
}

/// `"<artist> - <title> [<id>].mp3"` with unsafe characters replaced
///
/// The video id keeps two uploads of the same song apart.
pub fn canonical_file_name(artist: &str, title: &str, id: &str) -> String {
    let artist = sanitize_component(artist);
    let title = sanitize_component(title);
    let id = sanitize_component(id);
    let artist = if artist.is_empty() { "Unknown Artist" } else { artist.as_str() };
    let title = if title.is_empty() { "Unknown Title" } else { title.as_str() };
    if id.is_empty() {
        format!("{} - {}.mp3", artist, title)
    } else {
        format!("{} - {} [{}].mp3", artist, title, id)
    }
}
