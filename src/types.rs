use std::fmt::Display;
use std::path::PathBuf;

use crate::snapshot::ParsedSnapshot;

/// Result of one extraction run. `Parsed` and `Raw` each write exactly one
/// file and are never both produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Payload was valid JSON and was pretty-printed to `path`.
    Parsed {
        path: PathBuf,
        has_videos: bool,
        snapshot: ParsedSnapshot,
    },
    /// Payload did not parse; the decoded text was saved verbatim to `path`.
    Raw { path: PathBuf, detail: String },
    /// No `wire:snapshot` attribute in the document. Nothing was written.
    NotFound,
}

impl Outcome {
    /// Path of the file this run wrote, if any.
    pub fn written(&self) -> Option<&PathBuf> {
        match self {
            Outcome::Parsed { path, .. } | Outcome::Raw { path, .. } => Some(path),
            Outcome::NotFound => None,
        }
    }

    pub fn snapshot(&self) -> Option<&ParsedSnapshot> {
        match self {
            Outcome::Parsed { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    /// Console lines for this outcome, in print order.
    pub fn report_lines(&self) -> Vec<String> {
        match self {
            Outcome::Parsed { has_videos, .. } => vec![
                "Successfully parsed JSON".to_string(),
                if *has_videos {
                    "Found 'videos' in snapshot data".to_string()
                } else {
                    "'videos' not found in snapshot data".to_string()
                },
            ],
            Outcome::Raw { detail, .. } => vec![decode_error_line(detail)],
            Outcome::NotFound => vec!["Could not find wire:snapshot attribute".to_string()],
        }
    }
}

/// Console line for a payload that is not valid JSON.
pub fn decode_error_line(detail: impl Display) -> String {
    format!("JSON Decode Error: {}", detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parsed_lines() {
        let o = Outcome::Parsed { path: "snapshot.json".into(), has_videos: true, snapshot: json!({}).into() };
        assert_eq!(o.report_lines(), vec!["Successfully parsed JSON", "Found 'videos' in snapshot data"]);
        let o = Outcome::Parsed { path: "snapshot.json".into(), has_videos: false, snapshot: json!({}).into() };
        assert_eq!(o.report_lines()[1], "'videos' not found in snapshot data");
    }

    #[test]
    fn raw_and_missing_lines() {
        let o = Outcome::Raw { path: "snapshot_raw.txt".into(), detail: "expected value at line 1 column 1".into() };
        assert_eq!(o.report_lines(), vec!["JSON Decode Error: expected value at line 1 column 1"]);
        assert_eq!(o.written(), Some(&PathBuf::from("snapshot_raw.txt")));
        assert_eq!(Outcome::NotFound.report_lines(), vec!["Could not find wire:snapshot attribute"]);
        assert!(Outcome::NotFound.written().is_none());
    }

    #[test]
    fn decode_error_line_matches_raw_report() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let o = Outcome::Raw { path: "snapshot_raw.txt".into(), detail: err.to_string() };
        assert_eq!(o.report_lines(), vec![decode_error_line(&err)]);
    }
}
