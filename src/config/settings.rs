//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// AsrConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper ASR stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsrConfig {
    /// Whether the ASR stage is active at all.  When `false` every
    /// submission takes the manual-transcript path.
    pub enabled: bool,
    /// GGML model name / file stem (e.g. `"whisper-small"`).
    pub model: String,
    /// Expected speech language as an ISO-639-1 code, or `"auto"` for
    /// Whisper's built-in language detection.
    pub language: String,
    /// Beam-search width.  `1` selects greedy decoding.
    pub beam_size: i32,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "whisper-small".into(),
            language: "auto".into(),
            beam_size: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

/// Settings for the corpus store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Explicit path to the corpus JSON document.  `None` means the
    /// platform data directory resolved by [`AppPaths`].
    pub corpus_file: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { corpus_file: None }
    }
}

impl StoreConfig {
    /// Resolve the corpus document path, preferring the explicit override.
    pub fn corpus_path(&self, paths: &AppPaths) -> PathBuf {
        self.corpus_file
            .clone()
            .unwrap_or_else(|| paths.corpus_file.clone())
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use lokgeet::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// ASR stage settings.
    pub asr: AsrConfig,
    /// Corpus store settings.
    pub store: StoreConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");
        assert_eq!(original, loaded);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert!(cfg.asr.enabled);
        assert_eq!(cfg.asr.model, "whisper-small");
        assert_eq!(cfg.asr.language, "auto");
        assert_eq!(cfg.asr.beam_size, 5);
        assert!(cfg.store.corpus_file.is_none());
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.asr.enabled = false;
        cfg.asr.model = "whisper-tiny".into();
        cfg.asr.language = "hi".into();
        cfg.asr.beam_size = 1;
        cfg.store.corpus_file = Some(PathBuf::from("/tmp/corpus.json"));

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn corpus_path_prefers_override() {
        let paths = AppPaths::new();

        let default_store = StoreConfig::default();
        assert_eq!(default_store.corpus_path(&paths), paths.corpus_file);

        let overridden = StoreConfig {
            corpus_file: Some(PathBuf::from("/data/songs.json")),
        };
        assert_eq!(
            overridden.corpus_path(&paths),
            PathBuf::from("/data/songs.json")
        );
    }
}
