//! Search query construction

use crate::models::Track;
use serde::{Deserialize, Serialize};

/// Query shape sent to video search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryProfile {
    /// `"<artists> - <name>"`
    #[default]
    Basic,
    /// `"<artists> - <name> official audio <album>"`
    Extended,
}

/// Build the search string for a track
pub fn build_query(track: &Track, profile: QueryProfile) -> String {
    let base = format!("{} - {}", track.joined_artists(" "), track.name);
    let query = match profile {
        QueryProfile::Basic => base,
        QueryProfile::Extended => format!("{} official audio {}", base, track.album_name()),
    };
    query.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Album;

    fn track(artists: &[&str], album: Option<&str>) -> Track {
        Track {
            id: "t".into(),
            name: "Song".into(),
            duration_ms: 0,
            artists: artists.iter().map(|a| a.to_string()).collect(),
            album: Album {
                name: album.map(str::to_string),
                release_date: None,
            },
            isrc: None,
        }
    }

    #[test]
    fn test_basic_joins_artists_with_space() {
        let q = build_query(&track(&["A", "B"], None), QueryProfile::Basic);
        assert_eq!(q, "A B - Song");
    }

    #[test]
    fn test_basic_without_artists_is_trimmed() {
        let q = build_query(&track(&[], None), QueryProfile::Basic);
        assert_eq!(q, "- Song");
    }

    #[test]
    fn test_extended_appends_qualifier_and_album() {
        let q = build_query(&track(&["A"], Some("Record")), QueryProfile::Extended);
        assert_eq!(q, "A - Song official audio Record");

        let q = build_query(&track(&["A"], None), QueryProfile::Extended);
        assert_eq!(q, "A - Song official audio");
    }
}
