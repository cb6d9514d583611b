//! The corpus store — append-only persistence for collected records.
//!
//! One JSON document holds the whole ordered corpus.  Every mutation
//! rewrites the document through an atomic temp-file replace, so the file on
//! disk is always either the prior state or the prior state plus the
//! mutation.  Correctness over throughput: the store is a stand-in for a
//! transactional database, sized for a single local collector.

pub mod corpus;

pub use corpus::{CorpusStore, StoreError};
