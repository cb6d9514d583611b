//! Startup-time ASR capability selection.
//!
//! Whether ASR works at all depends on the deployment: the model file may
//! not be downloaded, or the operator may have disabled the stage.  That
//! decision is made exactly once, at startup, and carried through the run as
//! an [`AsrCapability`] value — the ingestion pipeline never re-probes the
//! model per call.

use std::sync::Arc;

use crate::config::{AppPaths, AsrConfig};

use super::engine::{AsrEngine, AsrParams, WhisperAsr};

/// The ASR stage as seen by the ingestion pipeline.
#[derive(Clone)]
pub enum AsrCapability {
    /// An engine is loaded and ready; audio submissions get a draft
    /// transcript.
    Available(Arc<dyn AsrEngine>),
    /// No engine; every submission takes the manual-transcript path.
    Unavailable,
}

impl std::fmt::Debug for AsrCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(_) => f.write_str("AsrCapability::Available"),
            Self::Unavailable => f.write_str("AsrCapability::Unavailable"),
        }
    }
}

impl AsrCapability {
    /// Resolve the capability from configuration.
    ///
    /// Never fails: a disabled stage, a missing model file, or a model that
    /// whisper-rs refuses to load all degrade to `Unavailable` with a log
    /// line, and the collection flow continues on manual transcripts.
    pub fn from_config(config: &AsrConfig, paths: &AppPaths) -> Self {
        if !config.enabled {
            log::info!("asr: disabled in settings — manual transcripts only");
            return Self::Unavailable;
        }

        let model_path = paths.models_dir.join(format!("{}.bin", config.model));
        let params = AsrParams {
            language: config.language.clone(),
            beam_size: config.beam_size,
            ..AsrParams::default()
        };

        match WhisperAsr::load(&model_path, params) {
            Ok(engine) => {
                log::info!("asr: Whisper model loaded: {}", model_path.display());
                Self::Available(Arc::new(engine))
            }
            Err(e) => {
                log::warn!(
                    "asr: could not load model ({}): {e} — manual transcripts only",
                    model_path.display()
                );
                Self::Unavailable
            }
        }
    }

    /// Wrap an already-built engine (useful for tests and embedders).
    pub fn available(engine: Arc<dyn AsrEngine>) -> Self {
        Self::Available(engine)
    }

    /// Whether an engine is loaded.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
