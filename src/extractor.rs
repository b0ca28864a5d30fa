use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::attribute::AttributeLocator;
use crate::config::ExtractorConfig;
use crate::entities::EntityDecoder;
use crate::snapshot::ParsedSnapshot;
use crate::types::Outcome;

/// In-memory result of pulling the snapshot out of a document.
#[derive(Debug)]
pub enum Extraction {
    NotFound,
    Parsed(ParsedSnapshot),
    /// Decoded text that is not JSON, with the parser's complaint.
    Invalid { decoded: String, error: serde_json::Error },
}

/// Reads a saved page, decodes its `wire:snapshot` payload and persists it.
pub struct SnapshotExtractor {
    config: ExtractorConfig,
    locator: AttributeLocator,
    decoder: EntityDecoder,
}

impl SnapshotExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, locator: AttributeLocator::new()?, decoder: EntityDecoder::new()? })
    }

    pub fn config(&self) -> &ExtractorConfig { &self.config }

    /// Locate, unescape and parse without touching the filesystem.
    pub fn extract_from_str(&self, document: &str) -> Extraction {
        let Some(encoded) = self.locator.find(document) else { return Extraction::NotFound; };
        let decoded = self.decoder.decode(encoded);
        debug!(encoded_len = encoded.len(), decoded_len = decoded.len(), "decoded snapshot attribute");
        match ParsedSnapshot::parse(&decoded) {
            Ok(snapshot) => Extraction::Parsed(snapshot),
            Err(error) => Extraction::Invalid { decoded: decoded.into_owned(), error },
        }
    }

    /// Read `input` and decode its snapshot, writing nothing.
    pub fn inspect(&self, input: &Path) -> Result<Extraction> {
        let document = read_document(input)?;
        Ok(self.extract_from_str(&document))
    }

    /// Full run: read `input`, then write either the pretty JSON or the raw
    /// decoded text into the output directory. A missing attribute writes nothing.
    pub fn extract(&self, input: &Path) -> Result<Outcome> {
        match self.inspect(input)? {
            Extraction::NotFound => {
                debug!(input = %input.display(), "no snapshot attribute");
                Ok(Outcome::NotFound)
            }
            Extraction::Parsed(snapshot) => {
                let path = self.config.json_path();
                let pretty = snapshot
                    .to_pretty_json()
                    .context("failed to serialize snapshot")?;
                self.write_output(&path, &pretty)?;
                info!(path = %path.display(), "wrote snapshot json");
                let has_videos = snapshot.has_videos();
                Ok(Outcome::Parsed { path, has_videos, snapshot })
            }
            Extraction::Invalid { decoded, error } => {
                let path = self.config.raw_path();
                self.write_output(&path, &decoded)?;
                info!(path = %path.display(), "wrote raw snapshot text");
                Ok(Outcome::Raw { path, detail: error.to_string() })
            }
        }
    }

    fn write_output(&self, path: &Path, contents: &str) -> Result<()> {
        let dir = &self.config.output_dir;
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory: {}", dir.display()))?;
        }
        fs::write(path, contents)
            .with_context(|| format!("failed to write output: {}", path.display()))
    }
}

fn read_document(input: &Path) -> Result<String> {
    let document = fs::read_to_string(input)
        .with_context(|| format!("failed to read input: {}", input.display()))?;
    debug!(input = %input.display(), bytes = document.len(), "read source document");
    Ok(document)
}
