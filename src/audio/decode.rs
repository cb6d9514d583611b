//! WAV decoding via `hound`.
//!
//! Uploads are field recordings of unpredictable provenance, so the decoder
//! accepts any channel count, rate and common sample format and normalises
//! everything to interleaved f32 in [-1.0, 1.0].

use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use thiserror::Error;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors that can arise while decoding an uploaded audio asset.
#[derive(Debug, Error)]
pub enum AudioError {
    /// The bytes are not a readable WAV file.
    #[error("Unreadable WAV data: {0}")]
    BadWav(#[from] hound::Error),

    /// The file decoded to zero samples.
    #[error("Audio contains no samples")]
    Empty,

    /// Sample format/bit depth combination we do not handle.
    #[error("Unsupported sample format: {0}-bit {1:?}")]
    UnsupportedFormat(u16, SampleFormat),
}

// ---------------------------------------------------------------------------
// DecodedAudio
// ---------------------------------------------------------------------------

/// Raw decoded audio, still at the source rate and channel count.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Interleaved samples normalised to [-1.0, 1.0].
    pub samples: Vec<f32>,
    /// Source sample rate in Hz.
    pub sample_rate: u32,
    /// Interleaved channel count.
    pub channels: u16,
}

impl DecodedAudio {
    /// Duration of the audio in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.channels as f64 / self.sample_rate as f64
    }
}

// ---------------------------------------------------------------------------
// decode_wav
// ---------------------------------------------------------------------------

/// Decode WAV `bytes` into normalised f32 samples.
///
/// Handles 8/16/24/32-bit integer PCM and 32-bit float PCM.
///
/// # Errors
///
/// - [`AudioError::BadWav`] — the bytes are not valid WAV.
/// - [`AudioError::Empty`] — the file has a header but no samples.
/// - [`AudioError::UnsupportedFormat`] — an exotic bit depth.
pub fn decode_wav(bytes: &[u8]) -> Result<DecodedAudio, AudioError> {
    let mut reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()?,
        (SampleFormat::Int, bits @ 1..=32) => {
            // Normalise by the maximum magnitude for the bit depth.
            let scale = (1i64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        (fmt, bits) => return Err(AudioError::UnsupportedFormat(bits, fmt)),
    };

    if samples.is_empty() {
        return Err(AudioError::Empty);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
