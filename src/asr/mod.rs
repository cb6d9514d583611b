//! ASR (Automatic Speech Recognition) module.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               AsrCapability (enum)                   │
//! │                                                     │
//! │   Available(Arc<dyn AsrEngine>) ──▶ WhisperAsr      │
//! │   Unavailable ─────────────────▶ manual transcript  │
//! │                                                     │
//! │   resolved ONCE at startup from AsrConfig,          │
//! │   never probed per call                             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use lokgeet::asr::{AsrEngine, AsrParams, WhisperAsr};
//!
//! let params = AsrParams::default(); // language = "auto", beam_size = 5
//! let engine = WhisperAsr::load("models/whisper-small.bin", params)
//!     .expect("model not found");
//!
//! // pcm: 16 kHz, mono, f32 from the audio module
//! let pcm: Vec<f32> = vec![0.0; 16_000]; // 1 s of silence
//! let result = engine.transcribe(&pcm).unwrap();
//! println!("{} ({} segments)", result.text, result.segments.len());
//! ```

pub mod capability;
pub mod engine;

pub use capability::AsrCapability;
pub use engine::{AsrEngine, AsrError, AsrParams, Transcription, WhisperAsr};

// test-only re-export so pipeline tests can import MockAsr without the
// full `crate::asr::engine::MockAsr` path.
#[cfg(test)]
pub use engine::MockAsr;
