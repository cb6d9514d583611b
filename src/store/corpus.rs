//! [`CorpusStore`] — the append-only record collection and its JSON document.

use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use crate::record::{Record, RecordPatch};

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

/// All errors that can arise from the corpus store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the corpus document failed.
    #[error("Corpus I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document on disk is not a valid record array.
    #[error("Corpus document is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// No record with the given id exists.
    #[error("No record with id {0}")]
    NotFound(Uuid),

    /// A record with this id is already in the corpus.
    #[error("Record {0} already exists in the corpus")]
    DuplicateId(Uuid),
}

// ---------------------------------------------------------------------------
// CorpusStore
// ---------------------------------------------------------------------------

/// The record collection, held in memory and mirrored to one JSON document.
///
/// Single-writer only: the read-modify-rewrite cycle has no locking, so at
/// most one process may mutate a given document at a time.
///
/// ```rust,no_run
/// use lokgeet::store::CorpusStore;
///
/// let mut store = CorpusStore::open("corpus.json").unwrap();
/// println!("{} songs collected", store.len());
/// for record in store.list_all() {
///     println!("  {} [{}] {}", record.id, record.language, record.transcript);
/// }
/// ```
#[derive(Debug)]
pub struct CorpusStore {
    records: Vec<Record>,
    path: PathBuf,
}

impl CorpusStore {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Open the corpus document at `path`.
    ///
    /// A missing file is the first-run case and yields an empty corpus; the
    /// document is created on the first append.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] — the file exists but cannot be read.
    /// - [`StoreError::Corrupt`] — the file is not a valid record array.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let records = if path.exists() {
            let data = std::fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            Vec::new()
        };

        log::debug!(
            "store: opened {} with {} records",
            path.display(),
            records.len()
        );

        Ok(Self { records, path })
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Durably add `record` to the end of the corpus.
    ///
    /// `created_at` is clamped to the newest existing timestamp so the
    /// column stays non-decreasing in append order even if the wall clock
    /// stepped backwards between ingests.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateId`] — a record with this id already exists.
    /// - [`StoreError::Io`] — the rewritten document could not be persisted
    ///   (the in-memory corpus is rolled back).
    pub fn append(&mut self, mut record: Record) -> Result<(), StoreError> {
        if self.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }

        if let Some(last) = self.records.last() {
            if record.created_at < last.created_at {
                log::warn!(
                    "store: clamping created_at of {} ({} < {})",
                    record.id,
                    record.created_at,
                    last.created_at
                );
                record.created_at = last.created_at;
            }
        }

        let id = record.id;
        self.records.push(record);

        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        log::info!("store: appended record {id} ({} total)", self.records.len());
        Ok(())
    }

    /// Apply a correction to the record with `id` and re-persist, returning
    /// the updated record.
    ///
    /// Only transcript, segments and source are patchable; see
    /// [`RecordPatch`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::NotFound`] — no such record.
    /// - [`StoreError::Io`] — persisting failed (the in-memory record is
    ///   rolled back).
    pub fn update(&mut self, id: Uuid, patch: &RecordPatch) -> Result<Record, StoreError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))?;

        let previous = self.records[index].clone();
        patch.apply(&mut self.records[index]);

        if let Err(e) = self.persist() {
            self.records[index] = previous;
            return Err(e);
        }

        log::info!("store: updated record {id}");
        Ok(self.records[index].clone())
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// All records in insertion order.
    pub fn list_all(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] — no such record.
    pub fn get(&self, id: Uuid) -> Result<&Record, StoreError> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Number of records in the corpus.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when the corpus is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Path of the corpus document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// Write the shareable subset of the corpus (records with
    /// `consent_given = true`) as JSON to `target`, returning how many were
    /// written.
    ///
    /// Non-consented records never leave local storage, so they are omitted
    /// rather than flagged.
    pub fn export_shareable(&self, target: impl AsRef<Path>) -> Result<usize, StoreError> {
        let shareable: Vec<&Record> =
            self.records.iter().filter(|r| r.is_shareable()).collect();

        let data = serde_json::to_string_pretty(&shareable)?;
        std::fs::write(target.as_ref(), data)?;

        log::info!(
            "store: exported {} of {} records to {}",
            shareable.len(),
            self.records.len(),
            target.as_ref().display()
        );
        Ok(shareable.len())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Rewrite the whole document: serialize to a sibling temp file, then
    /// atomically rename over the live path.  A crash mid-write leaves the
    /// previous document intact.
    fn persist(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(&self.records)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};
    use tempfile::tempdir;

    use crate::record::{Segment, TranscriptSource};

    fn record(transcript: &str, consent: bool) -> Record {
        Record {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            audio_reference: None,
            language: "hi".into(),
            performer: None,
            location: None,
            consent_given: consent,
            transcript: transcript.into(),
            transcript_source: TranscriptSource::Manual,
            segments: Vec::new(),
            title: None,
            context: None,
            date_of_recording: None,
            transliteration: None,
            translation: None,
        }
    }

    fn store_in_temp() -> (CorpusStore, tempfile::TempDir) {
        let dir = tempdir().expect("temp dir");
        let store = CorpusStore::open(dir.path().join("corpus.json")).expect("open");
        (store, dir)
    }

    #[test]
    fn opens_empty_on_first_run() {
        let (store, _dir) = store_in_temp();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn append_then_get_returns_identical_record() {
        let (mut store, _dir) = store_in_temp();
        let r = record("Jhulo jhulo", true);
        let id = r.id;

        store.append(r.clone()).expect("append");

        let fetched = store.get(id).expect("get");
        assert_eq!(fetched, &r);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let (store, _dir) = store_in_temp();
        let missing = Uuid::new_v4();
        let err = store.get(missing).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let (mut store, _dir) = store_in_temp();
        let r = record("one", true);

        store.append(r.clone()).expect("first append");
        let err = store.append(r).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn list_all_preserves_insertion_order_and_is_idempotent() {
        let (mut store, _dir) = store_in_temp();
        let a = record("first", true);
        let b = record("second", true);
        let (id_a, id_b) = (a.id, b.id);

        store.append(a).expect("append a");
        store.append(b).expect("append b");

        let once: Vec<Uuid> = store.list_all().iter().map(|r| r.id).collect();
        let twice: Vec<Uuid> = store.list_all().iter().map(|r| r.id).collect();
        assert_eq!(once, vec![id_a, id_b]);
        assert_eq!(once, twice);
    }

    #[test]
    fn reload_round_trips_records() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("corpus.json");

        let mut r = record("round trip", true);
        r.audio_reference = Some("uploads/x.wav".into());
        r.segments = vec![Segment {
            start: 0.5,
            end: 2.25,
            text: "round trip".into(),
        }];
        r.title = Some("title".into());
        r.date_of_recording = NaiveDate::from_ymd_opt(2024, 11, 3);

        {
            let mut store = CorpusStore::open(&path).expect("open");
            store.append(r.clone()).expect("append");
        }

        let reloaded = CorpusStore::open(&path).expect("reopen");
        assert_eq!(reloaded.list_all(), std::slice::from_ref(&r));
    }

    #[test]
    fn created_at_is_clamped_to_stay_monotonic() {
        let (mut store, _dir) = store_in_temp();

        let newer = record("newer", true);
        let newer_ts = newer.created_at;

        let mut older = record("older", true);
        older.created_at = newer_ts - Duration::seconds(30);

        store.append(newer).expect("append newer");
        store.append(older).expect("append older");

        let all = store.list_all();
        assert_eq!(all[1].created_at, newer_ts);
        assert!(all[0].created_at <= all[1].created_at);
    }

    #[test]
    fn update_applies_patch_and_persists() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("corpus.json");

        let r = record("Jhulo jhulo", true);
        let id = r.id;

        let mut store = CorpusStore::open(&path).expect("open");
        store.append(r).expect("append");

        let patch = RecordPatch::corrected("Jhulo jhulo re");
        let updated = store.update(id, &patch).expect("update");

        assert_eq!(updated.transcript, "Jhulo jhulo re");
        assert_eq!(updated.transcript_source, TranscriptSource::AsrCorrected);
        assert_eq!(store.get(id).unwrap().transcript, "Jhulo jhulo re");

        // Survives reload.
        let reloaded = CorpusStore::open(&path).expect("reopen");
        assert_eq!(reloaded.get(id).unwrap().transcript, "Jhulo jhulo re");
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (mut store, _dir) = store_in_temp();
        let err = store
            .update(Uuid::new_v4(), &RecordPatch::corrected("x"))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    /// The full collection scenario: append A, list, correct A, append B.
    #[test]
    fn collection_scenario_append_update_append() {
        let (mut store, _dir) = store_in_temp();

        let a = record("Jhulo jhulo", true);
        let id_a = a.id;
        store.append(a).expect("append A");
        assert_eq!(store.list_all().len(), 1);
        assert_eq!(store.list_all()[0].id, id_a);

        let updated = store
            .update(id_a, &RecordPatch::corrected("Jhulo jhulo re"))
            .expect("update A");
        assert_eq!(updated.transcript, "Jhulo jhulo re");
        assert_eq!(updated.transcript_source, TranscriptSource::AsrCorrected);
        assert_eq!(store.get(id_a).unwrap().transcript, "Jhulo jhulo re");

        let b = record("second song", true);
        let id_b = b.id;
        store.append(b).expect("append B");

        let all = store.list_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, id_a);
        assert_eq!(all[1].id, id_b);
        // A is unchanged by B's append.
        assert_eq!(all[0].transcript, "Jhulo jhulo re");
    }

    #[test]
    fn corrupt_document_is_reported() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("corpus.json");
        std::fs::write(&path, "{ not json ]").expect("write garbage");

        let err = CorpusStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn no_temp_file_is_left_behind() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("corpus.json");

        let mut store = CorpusStore::open(&path).expect("open");
        store.append(record("x", true)).expect("append");

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn export_filters_non_consented_records() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("corpus.json");
        let export_path = dir.path().join("export.json");

        let mut store = CorpusStore::open(&path).expect("open");
        let shared = record("shareable", true);
        let private = record("private", false);
        let shared_id = shared.id;

        store.append(shared).expect("append shared");
        store.append(private).expect("append private");

        let count = store.export_shareable(&export_path).expect("export");
        assert_eq!(count, 1);

        let exported: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
        assert_eq!(exported.len(), 1);
        assert_eq!(exported[0].id, shared_id);
    }
}
