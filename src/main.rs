//! Process entry point — LokGeet collection core.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Resolve the [`AsrCapability`] once from config.
//! 4. Open the [`CorpusStore`].
//! 5. Report corpus status; the collection form (a separate front end
//!    linking against the `lokgeet` library) drives ingestion from here.

use anyhow::Result;

use lokgeet::{
    asr::AsrCapability,
    config::{AppConfig, AppPaths},
    store::CorpusStore,
};

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("LokGeet collection core starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    let paths = AppPaths::new();

    // 3. ASR capability — resolved once, carried through the run
    let asr = AsrCapability::from_config(&config.asr, &paths);
    if !asr.is_available() {
        log::info!("ASR stage unavailable — submissions use manual transcripts");
    }

    // 4. Corpus store
    let corpus_path = config.store.corpus_path(&paths);
    let store = CorpusStore::open(&corpus_path)?;

    // 5. Status report
    log::info!(
        "Corpus open at {} — {} song(s) collected",
        store.path().display(),
        store.len()
    );
    for record in store.list_all() {
        log::info!(
            "  {}  [{}] {}  ({:?}, {} segments)",
            record.id,
            record.language,
            record.title.as_deref().unwrap_or("<untitled>"),
            record.transcript_source,
            record.segments.len()
        );
    }

    Ok(())
}
