//! Tag value resolution
//!
//! Each tag is an ordered chain of sources; the first source with a non-blank value
//! wins, otherwise the chain falls through to the next.

use crate::models::{RegistryMatch, ResolvedTags, TitleGuess, VideoInfo};

const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Everything known about one video when tags are resolved
#[derive(Debug, Clone, Copy)]
pub struct TagSources<'a> {
    pub info: &'a VideoInfo,
    /// Title with noise suffixes removed
    pub cleaned_title: &'a str,
    pub guess: &'a TitleGuess,
    pub registry: Option<&'a RegistryMatch>,
    /// Batch-wide album override
    pub forced_album: Option<&'a str>,
}

/// First non-blank candidate, trimmed
pub fn first_present<'a, I>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

impl<'a> TagSources<'a> {
    fn registry_field(&self, field: fn(&RegistryMatch) -> Option<&str>) -> Option<&'a str> {
        self.registry.and_then(field)
    }

    /// registry → parsed artist → uploader → "Unknown Artist"
    pub fn artist(&self) -> String {
        first_present([
            self.registry_field(|r| r.artist.as_deref()),
            self.guess.artist.as_deref(),
            self.info.uploader.as_deref(),
        ])
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string())
    }

    /// registry → parsed track → cleaned title → raw title
    pub fn title(&self) -> String {
        first_present([
            self.registry_field(|r| r.title.as_deref()),
            self.guess.track.as_deref(),
            Some(self.cleaned_title),
        ])
        .unwrap_or_else(|| self.info.title.clone())
    }

    /// forced album → registry → playlist title
    pub fn album(&self) -> Option<String> {
        first_present([
            self.forced_album,
            self.registry_field(|r| r.album.as_deref()),
            self.info.playlist_title.as_deref(),
        ])
    }

    /// registry only
    pub fn date(&self) -> Option<String> {
        first_present([self.registry_field(|r| r.date.as_deref())])
    }

    pub fn resolve(&self) -> ResolvedTags {
        let date = self.date();
        let year = date.as_deref().and_then(year_of);
        ResolvedTags {
            artist: self.artist(),
            title: self.title(),
            album: self.album(),
            date,
            year,
        }
    }
}

/// First four characters of a date ("2001-03-12" → "2001")
pub fn year_of(date: &str) -> Option<String> {
    let year: String = date.chars().take(4).collect();
    (!year.is_empty()).then_some(year)
}
