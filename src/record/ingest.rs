//! The ingestion pipeline — raw submission → validated [`Record`].
//!
//! # Flow
//!
//! ```text
//! RawSubmission
//!   ├─ validate: consent flag present, transcript or audio present
//!   ├─ audio + AsrCapability::Available
//!   │     └─▶ read file → decode → transcribe     [source = asr]
//!   │           └─ any failure → manual fallback  [source = manual]
//!   └─ no audio / Unavailable ──▶ manual transcript [source = manual]
//! ```
//!
//! The ASR fallback is a supported path, not an error state: a failed or
//! absent engine yields a record whose `transcript_source` is `manual`
//! (transcript possibly empty, pending manual entry), and the failure is
//! logged rather than surfaced.
//!
//! `ingest` has no persistence side effect — the caller appends the record
//! to the [`CorpusStore`](crate::store::CorpusStore) explicitly.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::asr::{AsrCapability, AsrEngine, Transcription};
use crate::audio::{decode_wav, to_whisper_pcm};
use crate::config::AppPaths;

use super::model::{Record, Segment, TranscriptSource};

// ---------------------------------------------------------------------------
// IngestError
// ---------------------------------------------------------------------------

/// Validation failures on a raw submission.
///
/// These are surfaced to the contributor for correction; nothing is retried
/// automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Neither a non-empty manual transcript nor an audio reference was
    /// supplied.
    #[error("Submission needs an audio recording or a transcript")]
    MissingContent,

    /// The consent flag was not answered.  Consent is never defaulted.
    #[error("Consent must be explicitly answered before a song can be collected")]
    MissingConsent,
}

// ---------------------------------------------------------------------------
// RawSubmission
// ---------------------------------------------------------------------------

/// What the collection form hands to the pipeline.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    /// Path to the stored audio asset (see [`save_upload`]), if any.
    pub audio_reference: Option<String>,
    /// Transcript typed by the contributor, if any.
    pub manual_transcript: Option<String>,
    /// ISO-639-1 language code of the song.  May be left empty when the
    /// contributor does not know it; the ASR-detected language is used then.
    pub language: String,
    /// Title / short description.
    pub title: Option<String>,
    /// Performer name; `None` when the contributor asked to stay anonymous.
    pub performer: Option<String>,
    /// Recording location.
    pub location: Option<String>,
    /// Performance context (e.g. "lullaby", "wedding song").
    pub context: Option<String>,
    /// Date the performance was recorded, when the contributor knows it.
    pub date_of_recording: Option<NaiveDate>,
    /// The consent checkbox.  `None` means the question was never answered,
    /// which fails validation — there is no implicit default.
    pub consent_given: Option<bool>,
}

impl RawSubmission {
    fn has_manual_transcript(&self) -> bool {
        self.manual_transcript
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// ingest
// ---------------------------------------------------------------------------

/// Turn a raw submission into a [`Record`].
///
/// # Errors
///
/// - [`IngestError::MissingContent`] — no audio reference and no non-empty
///   manual transcript.
/// - [`IngestError::MissingConsent`] — `consent_given` was `None`.
///
/// ASR failures never error; they fall back to the manual path.
pub fn ingest(submission: RawSubmission, asr: &AsrCapability) -> Result<Record, IngestError> {
    // ── Validation ──────────────────────────────────────────────────────
    let consent_given = submission.consent_given.ok_or(IngestError::MissingConsent)?;

    if !submission.has_manual_transcript() && submission.audio_reference.is_none() {
        return Err(IngestError::MissingContent);
    }

    // ── Transcript resolution ───────────────────────────────────────────
    let draft = match (&submission.audio_reference, asr) {
        (Some(reference), AsrCapability::Available(engine)) => {
            match asr_draft(reference, engine.as_ref()) {
                Ok(t) => {
                    log::info!(
                        "ingest: ASR produced {} segments for {reference}",
                        t.segments.len()
                    );
                    Some(t)
                }
                Err(e) => {
                    log::warn!("ingest: ASR failed for {reference} ({e:#}), using manual path");
                    None
                }
            }
        }
        (Some(reference), AsrCapability::Unavailable) => {
            log::debug!("ingest: ASR unavailable, manual path for {reference}");
            None
        }
        (None, _) => None,
    };

    let (transcript, segments, transcript_source, detected_language) = match draft {
        Some(t) => (t.text, t.segments, TranscriptSource::Asr, t.language),
        None => (
            submission.manual_transcript.unwrap_or_default(),
            Vec::<Segment>::new(),
            TranscriptSource::Manual,
            None,
        ),
    };

    // The form's language wins; an unlabelled submission takes whatever the
    // engine detected.
    let language = if submission.language.trim().is_empty() {
        match detected_language {
            Some(detected) => {
                log::info!("ingest: using ASR-detected language {detected}");
                detected
            }
            None => submission.language,
        }
    } else {
        submission.language
    };

    Ok(Record {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        audio_reference: submission.audio_reference,
        language,
        performer: submission.performer,
        location: submission.location,
        consent_given,
        transcript,
        transcript_source,
        segments,
        title: submission.title,
        context: submission.context,
        date_of_recording: submission.date_of_recording,
        transliteration: None,
        translation: None,
    })
}

/// Read, decode and transcribe the referenced audio asset.
///
/// Every failure in this chain (unreadable file, bad WAV, engine error) is
/// recovered by the caller's manual fallback, so errors are collapsed into
/// one reportable chain.
fn asr_draft(reference: &str, engine: &dyn AsrEngine) -> anyhow::Result<Transcription> {
    let bytes = std::fs::read(reference)
        .with_context(|| format!("reading audio asset {reference}"))?;
    let decoded = decode_wav(&bytes).context("decoding WAV")?;

    log::debug!(
        "ingest: decoded {:.1}s @ {} Hz, {} ch",
        decoded.duration_secs(),
        decoded.sample_rate,
        decoded.channels
    );

    let pcm = to_whisper_pcm(&decoded);
    let transcription = engine.transcribe(&pcm).context("transcribing")?;
    Ok(transcription)
}

// ---------------------------------------------------------------------------
// save_upload
// ---------------------------------------------------------------------------

/// Store uploaded audio bytes under the uploads directory and return the
/// reference string for the submission.
///
/// Files are named by UTC upload time (`20250825T101500Z.wav`), keeping the
/// extension of the original file name; an unlikely same-second collision
/// gets a numeric suffix rather than clobbering the earlier upload.
pub fn save_upload(
    bytes: &[u8],
    original_name: &str,
    paths: &AppPaths,
) -> std::io::Result<String> {
    std::fs::create_dir_all(&paths.uploads_dir)?;

    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav");
    let stem = Utc::now().format("%Y%m%dT%H%M%SZ").to_string();

    let mut target: PathBuf = paths.uploads_dir.join(format!("{stem}.{ext}"));
    let mut counter = 1u32;
    while target.exists() {
        target = paths.uploads_dir.join(format!("{stem}-{counter}.{ext}"));
        counter += 1;
    }

    std::fs::write(&target, bytes)?;
    log::info!("ingest: stored upload {} ({} bytes)", target.display(), bytes.len());

    Ok(target.display().to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
