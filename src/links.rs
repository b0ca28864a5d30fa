//! Stream link discovery inside a decoded snapshot.
//!
//! Episode pages carry their playable sources as presigned Cloudflare R2 URLs
//! somewhere under the component state (usually `data.videos`). The nesting
//! differs between pages, so every string in the tree is scanned.

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use url::Url;

use crate::snapshot::ParsedSnapshot;

/// Host suffix of Cloudflare R2 object storage endpoints.
pub const R2_HOST_SUFFIX: &str = ".r2.cloudflarestorage.com";

pub struct LinkFinder {
    pattern: Regex,
}

impl LinkFinder {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r#"https://[^"\s]+?\.r2\.cloudflarestorage\.com/[^"\s]+?\.mp4\?[^"\s]+"#)
            .context("failed to compile video link pattern")?;
        Ok(Self { pattern })
    }

    /// Distinct R2 `.mp4` links. Those under `data.videos` come first, then
    /// the rest of the tree, each in document order.
    pub fn find(&self, snapshot: &ParsedSnapshot) -> Vec<Url> {
        let mut out = Vec::new();
        if let Some(videos) = snapshot.videos() {
            self.walk(videos, &mut out);
        }
        self.walk(snapshot.value(), &mut out);
        out
    }

    fn walk(&self, v: &Value, out: &mut Vec<Url>) {
        match v {
            Value::String(s) => {
                for m in self.pattern.find_iter(s) {
                    if let Some(url) = parse_r2_link(m.as_str()) {
                        if !out.contains(&url) { out.push(url); }
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|item| self.walk(item, out)),
            Value::Object(map) => map.values().for_each(|item| self.walk(item, out)),
            _ => {}
        }
    }
}

/// Accept only https URLs whose host really is an R2 endpoint.
fn parse_r2_link(candidate: &str) -> Option<Url> {
    let parsed = Url::parse(candidate).ok()?;
    if parsed.scheme() != "https" { return None; }
    let host = parsed.host_str()?.to_ascii_lowercase();
    host.ends_with(R2_HOST_SUFFIX).then_some(parsed)
}

pub fn video_links(snapshot: &ParsedSnapshot) -> Result<Vec<Url>> {
    Ok(LinkFinder::new()?.find(snapshot))
}
