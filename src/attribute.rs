use anyhow::{Context, Result};
use regex::Regex;

/// Attribute Livewire uses to embed component state in rendered markup.
pub const SNAPSHOT_ATTRIBUTE: &str = "wire:snapshot";

/// Locates the first `wire:snapshot="..."` value in an HTML document.
///
/// The value is captured up to the first double quote. Livewire escapes its
/// JSON with entities, so a literal `"` never appears inside the attribute.
#[derive(Debug, Clone)]
pub struct AttributeLocator {
    pattern: Regex,
}

impl AttributeLocator {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(&format!(r#"{}="([^"]+)""#, regex::escape(SNAPSHOT_ATTRIBUTE)))
            .context("failed to compile snapshot attribute pattern")?;
        Ok(Self { pattern })
    }

    /// Returns the still-encoded value of the first match, borrowed from `document`.
    pub fn find<'a>(&self, document: &'a str) -> Option<&'a str> {
        self.pattern
            .captures(document)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// One-shot helper for callers that do not keep a locator around.
pub fn find_snapshot_attribute(document: &str) -> Result<Option<&str>> {
    Ok(AttributeLocator::new()?.find(document))
}
