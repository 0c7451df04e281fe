//! ID3v2 tag writing
//!
//! Replaces the file's ID3v2 tag with the resolved values and, when available,
//! a front-cover picture.

use crate::models::{CoverArt, ResolvedTags};
use lofty::config::WriteOptions;
use lofty::picture::{MimeType, Picture, PictureType};
use lofty::prelude::{Accessor, TagExt};
use lofty::tag::{ItemKey, Tag, TagType};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Tag writing errors
#[derive(Debug, Error)]
pub enum TagError {
    #[error("Failed to write tags to {path}: {message}")]
    Write { path: String, message: String },
}

/// Writes resolved tags into an audio file (blocking)
pub trait TagWriter: Send + Sync {
    fn write_tags(
        &self,
        path: &Path,
        tags: &ResolvedTags,
        cover: Option<&CoverArt>,
    ) -> Result<(), TagError>;
}

/// Sniff the image type from its leading bytes
pub fn cover_mime_type(data: &[u8]) -> MimeType {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        MimeType::Png
    } else if data.starts_with(b"GIF8") {
        MimeType::Gif
    } else {
        MimeType::Jpeg
    }
}

/// Build the ID3v2 tag for `tags`
pub fn build_tag(tags: &ResolvedTags, cover: Option<&CoverArt>) -> Tag {
    let mut tag = Tag::new(TagType::Id3v2);
    tag.set_artist(tags.artist.clone());
    tag.set_title(tags.title.clone());
    if let Some(album) = &tags.album {
        tag.set_album(album.clone());
    }
    if let Some(date) = &tags.date {
        tag.insert_text(ItemKey::RecordingDate, date.clone());
    }
    if let Some(year) = &tags.year {
        tag.insert_text(ItemKey::Year, year.clone());
    }
    if let Some(cover) = cover {
        tag.push_picture(Picture::new_unchecked(
            PictureType::CoverFront,
            Some(cover_mime_type(&cover.data)),
            None,
            cover.data.clone(),
        ));
    }
    tag
}

/// [`TagWriter`] backed by lofty
#[derive(Debug, Default, Clone, Copy)]
pub struct LoftyTagWriter;

impl TagWriter for LoftyTagWriter {
    fn write_tags(
        &self,
        path: &Path,
        tags: &ResolvedTags,
        cover: Option<&CoverArt>,
    ) -> Result<(), TagError> {
        let tag = build_tag(tags, cover);
        tag.save_to_path(path, WriteOptions::default())
            .map_err(|e| TagError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(path = %path.display(), with_cover = cover.is_some(), "Tags written");
        Ok(())
    }
}
