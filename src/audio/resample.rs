//! Channel downmix and sample-rate conversion.
//!
//! Whisper requires **16 kHz mono `f32`** input.  Field recordings arrive at
//! whatever rate and channel layout the contributor's device produced, so
//! decoded audio passes through two conversion steps:
//!
//! 1. [`downmix_mono`] — average interleaved channels down to one.
//! 2. [`resample`] — linear-interpolation rate conversion.
//!
//! Linear interpolation is adequate for speech-recognition input; a
//! windowed-sinc resampler would only matter for archival playback, which
//! serves the stored original anyway.

// ---------------------------------------------------------------------------
// downmix_mono
// ---------------------------------------------------------------------------

/// Mix interleaved multi-channel audio down to mono by averaging all
/// channels.  The output length is `samples.len() / channels`.
///
/// * `channels == 1` returns the input as an owned `Vec` unchanged.
/// * `channels == 0` returns an empty vector.
///
/// # Example
///
/// ```rust
/// use lokgeet::audio::downmix_mono;
///
/// let stereo = vec![0.5_f32, -0.5, 0.2, -0.2]; // L R L R
/// let mono = downmix_mono(&stereo, 2);
/// assert_eq!(mono.len(), 2);
/// assert!(mono[0].abs() < 1e-6);
/// ```
pub fn downmix_mono(samples: &[f32], channels: u16) -> Vec<f32> {
    match channels {
        0 => Vec::new(),
        1 => samples.to_vec(),
        n => {
            let n = n as usize;
            samples
                .chunks_exact(n)
                .map(|frame| frame.iter().sum::<f32>() / n as f32)
                .collect()
        }
    }
}

// ---------------------------------------------------------------------------
// resample
// ---------------------------------------------------------------------------

/// Resample mono `samples` from `source_rate` Hz to `target_rate` Hz using
/// linear interpolation.
///
/// * Equal rates return the input unchanged (no-op fast path).
/// * Empty input returns an empty vector.
///
/// The output length is approximately
/// `samples.len() * target_rate / source_rate`.
///
/// # Example
///
/// ```rust
/// use lokgeet::audio::resample;
///
/// // Downsample 10 ms of 48 kHz audio to 16 kHz
/// let hi = vec![0.5_f32; 480];
/// let lo = resample(&hi, 48_000, 16_000);
/// assert_eq!(lo.len(), 160);
/// ```
pub fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Vec<f32> {
    if source_rate == target_rate {
        return samples.to_vec();
    }

    if samples.is_empty() || source_rate == 0 {
        return Vec::new();
    }

    let ratio = target_rate as f64 / source_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = src_pos - idx as f64;

        let sample = if idx + 1 < samples.len() {
            samples[idx] * (1.0 - frac as f32) + samples[idx + 1] * frac as f32
        } else if idx < samples.len() {
            samples[idx]
        } else {
            0.0
        };

        output.push(sample);
    }

    output
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- downmix_mono ------------------------------------------------------

    #[test]
    fn downmix_already_mono() {
        let input = vec![0.1_f32, 0.2, 0.3];
        let out = downmix_mono(&input, 1);
        assert_eq!(out, input);
    }

    #[test]
    fn downmix_two_channel() {
        let input = vec![1.0_f32, -1.0, 0.5, 0.5];
        let out = downmix_mono(&input, 2);
        assert_eq!(out.len(), 2);
        assert!((out[0] - 0.0).abs() < 1e-6); // (1.0 + -1.0) / 2
        assert!((out[1] - 0.5).abs() < 1e-6); // (0.5 + 0.5) / 2
    }

    #[test]
    fn downmix_zero_channels() {
        let out = downmix_mono(&[1.0_f32, 2.0], 0);
        assert!(out.is_empty());
    }

    // ---- resample ----------------------------------------------------------

    #[test]
    fn equal_rates_is_noop() {
        let input: Vec<f32> = (0..160).map(|i| i as f32 / 160.0).collect();
        let out = resample(&input, 16_000, 16_000);
        assert_eq!(out, input);
    }

    #[test]
    fn empty_input() {
        let out = resample(&[], 48_000, 16_000);
        assert!(out.is_empty());
    }

    #[test]
    fn downsample_48k_to_16k_length() {
        // 480 samples @ 48 kHz = 10 ms → 160 samples @ 16 kHz
        let input = vec![0.5_f32; 480];
        let out = resample(&input, 48_000, 16_000);
        assert_eq!(out.len(), 160);
    }

    #[test]
    fn downsample_44100_to_16k_length() {
        // 1 second @ 44.1 kHz → ~16000 output samples (±1 rounding)
        let input = vec![0.0_f32; 44_100];
        let out = resample(&input, 44_100, 16_000);
        assert!(out.len().abs_diff(16_000) <= 1, "got {}", out.len());
    }

    #[test]
    fn constant_signal_preserves_amplitude() {
        let input = vec![0.5_f32; 480];
        let out = resample(&input, 48_000, 16_000);
        for &s in &out {
            assert!((s - 0.5).abs() < 1e-5, "amplitude drift: {s}");
        }
    }

    #[test]
    fn upsample_8k_to_16k_doubles_length() {
        let input = vec![0.0_f32; 80]; // 10 ms @ 8 kHz
        let out = resample(&input, 8_000, 16_000);
        assert_eq!(out.len(), 160);
    }

    // ---- combined pipeline -------------------------------------------------

    #[test]
    fn to_whisper_pcm_stereo_48k() {
        use crate::audio::{to_whisper_pcm, DecodedAudio};

        // 10 ms of stereo 48 kHz → 160 mono samples at 16 kHz
        let audio = DecodedAudio {
            samples: vec![0.5_f32; 960],
            sample_rate: 48_000,
            channels: 2,
        };
        let pcm = to_whisper_pcm(&audio);
        assert_eq!(pcm.len(), 160);
        assert!((pcm[0] - 0.5).abs() < 1e-5);
    }
}
