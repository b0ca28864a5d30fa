use serde::Serialize;
use serde_json::Value;

/// A decoded `wire:snapshot` payload. No schema is imposed on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedSnapshot(Value);

impl ParsedSnapshot {
    pub fn parse(decoded: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(decoded).map(Self)
    }

    pub fn value(&self) -> &Value { &self.0 }

    /// Two-space indented JSON, key order preserved, no trailing newline.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.0)
    }

    /// True when `data` is an object that carries a `videos` key.
    /// Any other shape is simply `false`.
    pub fn has_videos(&self) -> bool {
        self.0
            .get("data")
            .and_then(Value::as_object)
            .is_some_and(|data| data.contains_key("videos"))
    }

    /// The `data.videos` value, when present.
    pub fn videos(&self) -> Option<&Value> {
        self.0.get("data")?.as_object()?.get("videos")
    }
}

impl From<Value> for ParsedSnapshot {
    fn from(v: Value) -> Self { Self(v) }
}
