//! Audio decoding — uploaded WAV bytes → 16 kHz mono f32 PCM for Whisper.
//!
//! ```text
//! upload bytes → decode_wav → DecodedAudio → downmix_mono → resample → PCM
//! ```
//!
//! Live microphone capture happens in the front end; this crate only sees
//! the bytes of an already-stored asset.

pub mod decode;
pub mod resample;

pub use decode::{decode_wav, AudioError, DecodedAudio};
pub use resample::{downmix_mono, resample};

/// Sample rate Whisper inference expects.
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Convert decoded audio into the 16 kHz mono f32 PCM Whisper expects.
pub fn to_whisper_pcm(audio: &DecodedAudio) -> Vec<f32> {
    let mono = downmix_mono(&audio.samples, audio.channels);
    resample(&mono, audio.sample_rate, WHISPER_SAMPLE_RATE)
}
