//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\lokgeet\
//!   macOS:   ~/Library/Application Support/lokgeet/
//!   Linux:   ~/.config/lokgeet/
//!
//! Data dir (corpus document, uploaded audio, GGML models):
//!   Windows: %LOCALAPPDATA%\lokgeet\
//!   macOS:   ~/Library/Application Support/lokgeet/
//!   Linux:   ~/.local/share/lokgeet/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory for the corpus document and uploads.
    pub data_dir: PathBuf,
    /// Full path to the corpus JSON document.
    pub corpus_file: PathBuf,
    /// Directory where uploaded audio assets are stored.
    pub uploads_dir: PathBuf,
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "lokgeet";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");
        let corpus_file = data_dir.join("corpus.json");
        let uploads_dir = data_dir.join("uploads");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            data_dir,
            corpus_file,
            uploads_dir,
            models_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
