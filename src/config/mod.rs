//! Configuration module for LokGeet.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the ASR and
//! store subsystems, `AppPaths` for cross-platform data directories, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, AsrConfig, StoreConfig};
