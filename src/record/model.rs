//! The collected-song record schema.
//!
//! The corpus document on disk is a JSON array of [`Record`] objects, so
//! every field here is part of the persisted interchange format.  Unknown
//! keys in the document are rejected at load time rather than silently
//! dropped.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// TranscriptSource
// ---------------------------------------------------------------------------

/// How the record's transcript came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptSource {
    /// Draft produced by the ASR engine, not yet reviewed.
    Asr,
    /// Typed in by the contributor (including the ASR-unavailable fallback).
    Manual,
    /// An ASR draft or manual transcript corrected after the fact.
    AsrCorrected,
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// A single time-aligned text chunk produced by ASR.
///
/// Times are seconds from the start of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Segment start time in seconds.
    pub start: f64,
    /// Segment end time in seconds.
    pub end: f64,
    /// Segment text (may include punctuation inserted by the engine).
    pub text: String,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One persisted folk-song collection entry.
///
/// Created once by [`ingest()`](crate::record::ingest()); after that only the
/// transcript fields may change, via [`RecordPatch`] through
/// [`CorpusStore::update`](crate::store::CorpusStore::update).  Records are
/// never deleted by the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Unique identifier, generated at creation, immutable.
    pub id: Uuid,
    /// Creation timestamp; the store keeps these non-decreasing in append
    /// order.
    pub created_at: DateTime<Utc>,
    /// Path to the stored audio asset.  The file itself is owned by the
    /// uploads directory / object storage, not by the record.
    pub audio_reference: Option<String>,
    /// ISO-639-1 language code of the song.
    pub language: String,
    /// Performer / contributor name; `None` when anonymised.
    pub performer: Option<String>,
    /// Recording location (village, district, state).
    pub location: Option<String>,
    /// Whether the performer agreed to sharing.  Must be `true` before the
    /// record may leave local storage.
    pub consent_given: bool,
    /// The transcript text.
    pub transcript: String,
    /// Which path produced the transcript.
    pub transcript_source: TranscriptSource,
    /// ASR segment timings; empty on the manual path.
    #[serde(default)]
    pub segments: Vec<Segment>,

    // Optional descriptive metadata from the collection form.
    /// Title / short description.
    #[serde(default)]
    pub title: Option<String>,
    /// Performance context (e.g. "lullaby", "harvest song").
    #[serde(default)]
    pub context: Option<String>,
    /// Date the performance was recorded, as reported by the contributor.
    /// Distinct from `created_at`, which is the ingestion time.
    #[serde(default)]
    pub date_of_recording: Option<NaiveDate>,
    /// Romanized transliteration, produced by external language-pack rules.
    #[serde(default)]
    pub transliteration: Option<String>,
    /// Manual English translation.
    #[serde(default)]
    pub translation: Option<String>,
}

impl Record {
    /// Whether this record may be exposed outside local storage.
    pub fn is_shareable(&self) -> bool {
        self.consent_given
    }
}

// ---------------------------------------------------------------------------
// RecordPatch
// ---------------------------------------------------------------------------

/// A correction applied to an existing record.
///
/// Only the transcript-related fields are patchable; identity, audio and
/// consent are fixed at ingestion time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    /// Replacement transcript text.
    pub transcript: Option<String>,
    /// Replacement segment list.
    pub segments: Option<Vec<Segment>>,
    /// Replacement source tag (typically `AsrCorrected`).
    pub transcript_source: Option<TranscriptSource>,
}

impl RecordPatch {
    /// A patch that records a corrected transcript.
    pub fn corrected(transcript: impl Into<String>) -> Self {
        Self {
            transcript: Some(transcript.into()),
            segments: None,
            transcript_source: Some(TranscriptSource::AsrCorrected),
        }
    }

    /// Apply this patch to `record` in place.
    pub fn apply(&self, record: &mut Record) {
        if let Some(transcript) = &self.transcript {
            record.transcript = transcript.clone();
        }
        if let Some(segments) = &self.segments {
            record.segments = segments.clone();
        }
        if let Some(source) = self.transcript_source {
            record.transcript_source = source;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
