//! LokGeet — folk-song field-collection core.
//!
//! A contributor submission (audio upload, optional manual transcript,
//! metadata, consent flag) flows through the ingestion pipeline, which may
//! invoke a pluggable ASR stage, and ends up as a [`record::Record`] in the
//! append-only [`store::CorpusStore`] JSON document.
//!
//! ```text
//! RawSubmission ──▶ ingest() ──▶ Record ──▶ CorpusStore::append()
//!                      │
//!                      └─▶ AsrCapability::Available → WhisperAsr
//!                          AsrCapability::Unavailable → manual transcript
//! ```
//!
//! The interactive form, audio capture widgets, and transliteration rules
//! live in a separate front end that links against this crate.

pub mod asr;
pub mod audio;
pub mod config;
pub mod record;
pub mod store;
