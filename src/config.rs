use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_JSON_FILE: &str = "snapshot.json";
pub const DEFAULT_RAW_FILE: &str = "snapshot_raw.txt";

pub const ENV_INPUT: &str = "WIRESNAP_INPUT";
pub const ENV_OUTPUT_DIR: &str = "WIRESNAP_OUTPUT_DIR";

/// On-disk shape of `config.toml`; every key is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct FileConfig {
    #[serde(default)]
    pub(crate) input: Option<PathBuf>,
    #[serde(default)]
    pub(crate) output_dir: Option<PathBuf>,
    #[serde(default)]
    pub(crate) json_file: Option<String>,
    #[serde(default)]
    pub(crate) raw_file: Option<String>,
}

/// Where the extractor reads from and writes to.
///
/// Layers, lowest first: defaults, TOML file, `WIRESNAP_*` env, CLI flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub input: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub json_file: String,
    pub raw_file: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: PathBuf::from("."),
            json_file: DEFAULT_JSON_FILE.to_string(),
            raw_file: DEFAULT_RAW_FILE.to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Load defaults plus a config file. An explicit path must exist and parse;
    /// the per-user default file is optional and skipped with a warning if broken.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::default();
        match explicit {
            Some(path) => cfg.merge_file(read_file_config(path)?),
            None => {
                if let Some(path) = default_config_path().filter(|p| p.exists()) {
                    match read_file_config(&path) {
                        Ok(fc) => cfg.merge_file(fc),
                        Err(e) => warn!("ignoring default config {}: {:#}", path.display(), e),
                    }
                }
            }
        }
        Ok(cfg)
    }

    pub(crate) fn merge_file(&mut self, fc: FileConfig) {
        if let Some(v) = fc.input { self.input = Some(v); }
        if let Some(v) = fc.output_dir { self.output_dir = v; }
        if let Some(v) = fc.json_file { self.json_file = v; }
        if let Some(v) = fc.raw_file { self.raw_file = v; }
    }

    /// Overlay `WIRESNAP_INPUT` / `WIRESNAP_OUTPUT_DIR` from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    pub fn apply_env_from<F>(&mut self, lookup: F)
    where F: Fn(&str) -> Option<String> {
        if let Some(v) = lookup(ENV_INPUT).filter(|s| !s.trim().is_empty()) {
            self.input = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup(ENV_OUTPUT_DIR).filter(|s| !s.trim().is_empty()) {
            self.output_dir = PathBuf::from(v);
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (key, name) in [("json_file", &self.json_file), ("raw_file", &self.raw_file)] {
            if !is_plain_file_name(name) {
                return Err(anyhow!("{key} must be a plain file name (got `{name}`)"));
            }
        }
        if self.json_file == self.raw_file {
            return Err(anyhow!("json_file and raw_file must differ (both `{}`)", self.json_file));
        }
        Ok(())
    }

    pub fn json_path(&self) -> PathBuf { self.output_dir.join(&self.json_file) }

    pub fn raw_path(&self) -> PathBuf { self.output_dir.join(&self.raw_file) }

    /// The configured input, or an error naming every way to supply one.
    pub fn require_input(&self) -> Result<&Path> {
        self.input.as_deref().ok_or_else(|| {
            anyhow!("no input file given (pass INPUT, set {ENV_INPUT}, or set `input` in the config file)")
        })
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    debug!(path = %path.display(), "reading config");
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config: {}", path.display()))
}

/// `<config dir>/config.toml` for the current user, if a home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "wiresnap", "wiresnap").map(|p| p.config_dir().join("config.toml"))
}

fn is_plain_file_name(name: &str) -> bool {
    let p = Path::new(name);
    !name.trim().is_empty()
        && p.file_name().and_then(|s| s.to_str()) == Some(name)
        && !name.contains(&['/', '\\'][..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_legacy_file_names() {
        let cfg = ExtractorConfig::default();
        assert_eq!(cfg.json_path(), PathBuf::from("./snapshot.json"));
        assert_eq!(cfg.raw_path(), PathBuf::from("./snapshot_raw.txt"));
        assert!(cfg.input.is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("wiresnap.toml");
        fs::write(&path, "input = \"page.html\"\noutput_dir = \"out\"\njson_file = \"state.json\"\n").unwrap();
        let cfg = ExtractorConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.input, Some(PathBuf::from("page.html")));
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.json_file, "state.json");
        assert_eq!(cfg.raw_file, DEFAULT_RAW_FILE);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = ExtractorConfig::load(Some(&tmp.path().join("nope.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read config"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "outptu_dir = \"typo\"\n").unwrap();
        assert!(ExtractorConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = ExtractorConfig::default();
        cfg.merge_file(FileConfig { input: Some("a.html".into()), output_dir: Some("file-out".into()), ..Default::default() });
        let env: HashMap<&str, &str> = [(ENV_INPUT, "b.html"), (ENV_OUTPUT_DIR, "")].into_iter().collect();
        cfg.apply_env_from(|k| env.get(k).map(|s| s.to_string()));
        assert_eq!(cfg.input, Some(PathBuf::from("b.html")));
        // blank env values do not clobber
        assert_eq!(cfg.output_dir, PathBuf::from("file-out"));
    }

    #[test]
    fn rejects_path_like_output_names() {
        for bad in ["", "  ", "../snapshot.json", "out/snapshot.json", "..", "a\\b.json"] {
            let cfg = ExtractorConfig { json_file: bad.to_string(), ..Default::default() };
            assert!(cfg.validate().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn rejects_identical_output_names() {
        let cfg = ExtractorConfig { raw_file: DEFAULT_JSON_FILE.to_string(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_input_error_mentions_env_var() {
        let err = ExtractorConfig::default().require_input().unwrap_err();
        assert!(err.to_string().contains(ENV_INPUT));
    }
}
