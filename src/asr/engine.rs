//! Core ASR engine trait and implementations.
//!
//! [`AsrEngine`] is the interface the ingestion pipeline sees.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn AsrEngine>` inside [`AsrCapability`](crate::asr::AsrCapability).
//!
//! [`WhisperAsr`] is the production implementation wrapping a
//! `whisper_rs::WhisperContext`.  [`MockAsr`] (under `#[cfg(test)]`) returns
//! a pre-configured response so the pipeline can be tested without a GGML
//! model file.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::record::Segment;

// ---------------------------------------------------------------------------
// AsrError
// ---------------------------------------------------------------------------

/// All errors that can arise from the ASR subsystem.
///
/// The ingestion pipeline treats every variant the same way: log it and fall
/// back to the manual-transcript path.
#[derive(Debug, Clone, Error)]
pub enum AsrError {
    /// The GGML model file was not found at the given path.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a context or state.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// The supplied PCM buffer was empty.
    #[error("Audio contains no samples")]
    EmptyAudio,
}

// ---------------------------------------------------------------------------
// AsrParams
// ---------------------------------------------------------------------------

/// All parameters for a single transcription run.
#[derive(Debug, Clone)]
pub struct AsrParams {
    /// ISO-639-1 language code, or `"auto"` to let Whisper detect the
    /// language — field recordings often arrive unlabelled.
    pub language: String,

    /// Beam-search width.  `1` selects greedy (single-pass) decoding.
    pub beam_size: i32,

    /// Number of CPU threads handed to Whisper.  Defaults to
    /// [`optimal_threads()`], capped at 8.
    pub n_threads: i32,

    /// Suppress Whisper's progress output to stderr.
    pub suppress_progress: bool,
}

impl Default for AsrParams {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            beam_size: 5,
            n_threads: optimal_threads(),
            suppress_progress: true,
        }
    }
}

/// Returns the number of CPU threads to use for inference, capped at 8 to
/// avoid diminishing returns on Whisper.
pub(crate) fn optimal_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}

// ---------------------------------------------------------------------------
// Transcription
// ---------------------------------------------------------------------------

/// The output of a successful transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    /// Full concatenated transcript text, trimmed of surrounding whitespace.
    pub text: String,
    /// Time-aligned segments, in playback order.
    pub segments: Vec<Segment>,
    /// ISO-639-1 code of the language the engine decoded with — the
    /// autodetection result when [`AsrParams::language`] is `"auto"`.
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// AsrEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - `pcm` must be **16 kHz, mono, f32** samples
///   (see [`to_whisper_pcm`](crate::audio::to_whisper_pcm)).
/// - Returns `Err(AsrError::EmptyAudio)` when `pcm` is empty.
pub trait AsrEngine: Send + Sync {
    /// Transcribe `pcm` into text plus segment timings.
    fn transcribe(&self, pcm: &[f32]) -> Result<Transcription, AsrError>;
}

// Compile-time assertion: Box<dyn AsrEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn AsrEngine>) {}
};

// ---------------------------------------------------------------------------
// WhisperAsr
// ---------------------------------------------------------------------------

/// Production ASR engine that wraps a `whisper_rs::WhisperContext`.
///
/// A new `WhisperState` is created for every [`transcribe`] call so the
/// engine can be shared without locking.
///
/// [`transcribe`]: AsrEngine::transcribe
pub struct WhisperAsr {
    ctx: WhisperContext,
    params: AsrParams,
}

impl std::fmt::Debug for WhisperAsr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperAsr")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send` and `unsafe impl Sync` in whisper-rs — the model
// weights are read-only after loading.  `AsrParams` is fully owned.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperAsr {}
unsafe impl Sync for WhisperAsr {}

impl WhisperAsr {
    /// Load a GGML model from `model_path` and prepare it for inference.
    ///
    /// # Errors
    ///
    /// - [`AsrError::ModelNotFound`] — `model_path` does not exist.
    /// - [`AsrError::ContextInit`]  — whisper-rs failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, params: AsrParams) -> Result<Self, AsrError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(AsrError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            AsrError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| AsrError::ContextInit(e.to_string()))?;

        Ok(Self { ctx, params })
    }
}

impl AsrEngine for WhisperAsr {
    fn transcribe(&self, pcm: &[f32]) -> Result<Transcription, AsrError> {
        if pcm.is_empty() {
            return Err(AsrError::EmptyAudio);
        }

        // ── Build FullParams ──────────────────────────────────────────────
        let strategy = if self.params.beam_size > 1 {
            SamplingStrategy::BeamSearch {
                beam_size: self.params.beam_size,
                patience: 1.0,
            }
        } else {
            SamplingStrategy::Greedy { best_of: 1 }
        };

        let mut fp = FullParams::new(strategy);

        // set_language takes an Option<&str> whose lifetime is tied to fp.
        // Both remain alive until state.full() returns.
        let lang: Option<&str> = if self.params.language == "auto" {
            None
        } else {
            Some(self.params.language.as_str())
        };
        fp.set_language(lang);
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        // ── Create per-call state and run inference ───────────────────────
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| AsrError::ContextInit(e.to_string()))?;

        state
            .full(fp, pcm)
            .map_err(|e| AsrError::Transcription(e.to_string()))?;

        // ── Collect segments ──────────────────────────────────────────────
        let n_segments = state
            .full_n_segments()
            .map_err(|e| AsrError::Transcription(e.to_string()))?;

        let mut text = String::new();
        let mut segments: Vec<Segment> = Vec::with_capacity(n_segments as usize);

        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| AsrError::Transcription(format!("segment {i}: {e}")))?;

            // Timestamps are centiseconds; the record stores seconds.
            let start = state.full_get_segment_t0(i).unwrap_or(0).max(0) as f64 / 100.0;
            let end = state.full_get_segment_t1(i).unwrap_or(0).max(0) as f64 / 100.0;

            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(seg_text.trim());

            segments.push(Segment {
                start,
                end,
                text: seg_text.trim().to_string(),
            });
        }

        // Field recordings often arrive unlabelled, so report which
        // language the decoder settled on.
        let language = state
            .full_lang_id_from_state()
            .ok()
            .and_then(whisper_rs::get_lang_str)
            .map(str::to_string);

        Ok(Transcription {
            text: text.trim().to_string(),
            segments,
            language,
        })
    }
}

// ---------------------------------------------------------------------------
// MockAsr  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without loading any
/// model file.
#[cfg(test)]
pub struct MockAsr {
    response: Result<Transcription, AsrError>,
}

#[cfg(test)]
impl MockAsr {
    /// Create a mock that always succeeds with `text` and no segments.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(Transcription {
                text: text.into(),
                segments: Vec::new(),
                language: None,
            }),
        }
    }

    /// Create a mock that succeeds with `text` and the given segments.
    pub fn ok_with_segments(text: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            response: Ok(Transcription {
                text: text.into(),
                segments,
                language: None,
            }),
        }
    }

    /// Create a mock that succeeds with `text` and a detected language.
    pub fn ok_with_language(text: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            response: Ok(Transcription {
                text: text.into(),
                segments: Vec::new(),
                language: Some(language.into()),
            }),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: AsrError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl AsrEngine for MockAsr {
    fn transcribe(&self, pcm: &[f32]) -> Result<Transcription, AsrError> {
        // Enforce the empty-audio contract even in the mock so callers are
        // tested against it.
        if pcm.is_empty() {
            return Err(AsrError::EmptyAudio);
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
