//! Extract the Livewire `wire:snapshot` state embedded in saved HTML pages.
//!
//! The attribute holds entity-escaped JSON. [`SnapshotExtractor`] finds the
//! first occurrence, unescapes it and writes either pretty JSON or, when the
//! payload does not parse, the raw decoded text.

pub mod attribute;
pub mod config;
pub mod entities;
pub mod extractor;
pub mod links;
pub mod snapshot;
pub mod types;

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::ExtractorConfig;
    pub use crate::extractor::{Extraction, SnapshotExtractor};
    pub use crate::links::{video_links, LinkFinder};
    pub use crate::snapshot::ParsedSnapshot;
    pub use crate::types::Outcome;
}

pub use extractor::SnapshotExtractor;

use anyhow::Result;
use std::path::Path;

/// One-call extraction: read `input`, write into `output_dir` with the default file names.
pub fn extract_snapshot(input: &Path, output_dir: &Path) -> Result<types::Outcome> {
    let config = config::ExtractorConfig { output_dir: output_dir.to_path_buf(), ..Default::default() };
    SnapshotExtractor::new(config)?.extract(input)
}
