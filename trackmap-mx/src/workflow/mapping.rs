//! Full mapping run: catalog fetch → batch match → output files

use super::batch::run_batch;
use crate::matching::TrackMatcher;
use crate::models::{MatchOptions, ResultRow};
use crate::output::{write_outputs, OutputPaths};
use crate::services::{CatalogAccess, CatalogError, CatalogSelector, CatalogSource};
use std::path::Path;
use thiserror::Error;

/// Failures outside the per-track boundary
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Catalog fetch failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Writing outputs failed: {0}")]
    Output(#[from] trackmap_common::Error),
}

/// Rows of a completed run and where they were written
#[derive(Debug, Clone)]
pub struct MappingReport {
    pub rows: Vec<ResultRow>,
    pub paths: OutputPaths,
}

/// Fetch the selected collection, match every track and write the mapping files
pub async fn run_mapping(
    catalog: &dyn CatalogSource,
    access: &CatalogAccess,
    selector: &CatalogSelector,
    matcher: &TrackMatcher,
    options: &MatchOptions,
    output_dir: &Path,
) -> Result<MappingReport, MappingError> {
    let tracks = catalog.fetch_tracks(selector, access).await?;
    tracing::info!(selector = ?selector, tracks = tracks.len(), "Fetched tracks for mapping");

    let rows = run_batch(matcher, tracks, options).await;
    let paths = write_outputs(&rows, output_dir).await?;

    Ok(MappingReport { rows, paths })
}
