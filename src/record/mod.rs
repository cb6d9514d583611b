//! Record schema and the ingestion pipeline.
//!
//! [`Record`] is the one persisted unit of collection: an audio reference,
//! a transcript (ASR-drafted or typed in), and contributor metadata with an
//! explicit consent flag.  [`ingest`] turns a [`RawSubmission`] into a
//! `Record`, deciding between the ASR and manual transcript paths; it never
//! persists anything — the caller appends the result to the corpus store.

pub mod ingest;
pub mod model;

pub use ingest::{ingest, save_upload, IngestError, RawSubmission};
pub use model::{Record, RecordPatch, Segment, TranscriptSource};
