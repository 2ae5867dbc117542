//! Corpus storage: raw items in, analysis records out
//!
//! The corpus is the growing store of text items shared with the
//! harvesting collaborator. This module owns the storage trait the
//! backfill orchestrator runs against and the SQLite backend that
//! implements it.

mod sqlite;
mod traits;

pub use sqlite::SqliteCorpus;
pub use traits::{
    AnalysisRecord, CorpusStore, OpenCorpus, RawItem, StorageError, StorageResult,
};
