//! Mapping file writer

use crate::models::ResultRow;
use std::path::{Path, PathBuf};
use trackmap_common::{Error, Result};

pub const JSON_FILE_NAME: &str = "spotify_to_youtube.json";
pub const CSV_FILE_NAME: &str = "spotify_to_youtube.csv";

const CSV_HEADER: [&str; 6] = ["Track", "Artists", "Duration", "Album", "ISRC", "YouTube URL"];

/// Written file locations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            json: dir.join(JSON_FILE_NAME),
            csv: dir.join(CSV_FILE_NAME),
        }
    }
}

/// Write the JSON array and the flattened CSV into `dir`, creating it if missing
pub async fn write_outputs(rows: &[ResultRow], dir: &Path) -> Result<OutputPaths> {
    tokio::fs::create_dir_all(dir).await?;
    let paths = OutputPaths::in_dir(dir);

    let json = serde_json::to_string_pretty(rows)
        .map_err(|e| Error::Internal(format!("Failed to serialize result rows: {}", e)))?;
    tokio::fs::write(&paths.json, json).await?;
    tokio::fs::write(&paths.csv, rows_to_csv(rows)).await?;

    tracing::info!(
        rows = rows.len(),
        json = %paths.json.display(),
        csv = %paths.csv.display(),
        "Wrote mapping files"
    );
    Ok(paths)
}

/// Flatten rows into CSV with RFC 4180 field quoting
pub fn rows_to_csv(rows: &[ResultRow]) -> String {
    let mut out = String::new();
    push_record(&mut out, CSV_HEADER.iter().copied());

    for row in rows {
        push_record(
            &mut out,
            [
                row.spotify_track.as_str(),
                row.artists.as_str(),
                row.duration.as_str(),
                row.album.as_str(),
                row.isrc.as_deref().unwrap_or(""),
                row.youtube_url.as_deref().unwrap_or(""),
            ],
        );
    }
    out
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let line: Vec<String> = fields.into_iter().map(escape_field).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
