//! Crash-tolerant incremental backfill over the corpus
//!
//! Analyzes every item lacking an analysis record, in bounded pages,
//! each committed as a unit. The unanalyzed set is always re-derived
//! from the store (anti-join against the records table), so interrupted
//! runs resume safely: committed pages never reprocess, uncommitted work
//! is simply redone, and a record is written at most once per item
//! across any number of invocations.
//!
//! Failure policy: one item's scoring failure never aborts the run; the
//! item is reported and left unanalyzed. A failed page commit rolls the
//! whole page back and the run continues. Only a corpus that cannot be
//! reached at all — before any page work begins — is fatal.

use crate::analysis::{AnalysisPipeline, Dimension, ItemOutcome};
use crate::corpus::{CorpusStore, StorageError};
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Tuning for one backfill invocation.
#[derive(Debug, Clone)]
pub struct BackfillConfig {
    /// Items fetched and committed per page.
    pub page_size: u32,
    /// Ceiling on items processed this invocation. `None` runs to
    /// completion. Correctness is unaffected either way: capped-out
    /// items are picked up next time.
    pub max_items: Option<u64>,
    /// Pause between pages, a small backpressure valve on the store.
    pub page_delay: Duration,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_items: None,
            page_delay: Duration::from_millis(100),
        }
    }
}

impl BackfillConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_items(mut self, max_items: u64) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }
}

/// Errors that abort a backfill invocation.
#[derive(Debug, Error)]
pub enum BackfillError {
    /// The store could not be queried at all. Raised before any page
    /// work begins; the only fatal condition.
    #[error("corpus unreachable: {0}")]
    CorpusUnreachable(#[from] StorageError),
}

/// One item the run could not analyze.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub item_id: String,
    pub dimension: Dimension,
    pub reason: String,
}

/// Structured result of one backfill invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BackfillReport {
    /// Unanalyzed items found when the run started.
    pub found: u64,
    /// Records durably committed by this run.
    pub analyzed: u64,
    /// Items whose text cleaned down to nothing. Not failures: they stay
    /// unanalyzed by design.
    pub skipped_empty: u64,
    /// Pages whose staged records committed.
    pub pages_committed: u64,
    /// Pages whose commit failed and rolled back.
    pub pages_failed: u64,
    /// Per-item scoring failures.
    pub failures: Vec<ItemFailure>,
}

impl BackfillReport {
    /// Items this run looked at, whatever the outcome.
    pub fn processed(&self) -> u64 {
        self.analyzed + self.skipped_empty + self.failures.len() as u64
    }
}

/// The batch orchestrator.
///
/// Strictly sequential: one item's full pipeline completes before the
/// next begins, and pages are fetched, processed, and committed one at
/// a time.
pub struct Backfill<'a> {
    store: &'a dyn CorpusStore,
    pipeline: &'a AnalysisPipeline,
    config: BackfillConfig,
}

impl<'a> Backfill<'a> {
    pub fn new(store: &'a dyn CorpusStore, pipeline: &'a AnalysisPipeline) -> Self {
        Self {
            store,
            pipeline,
            config: BackfillConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BackfillConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the backfill to completion (or to the configured item cap).
    ///
    /// Returns the structured report; `Err` only when the corpus cannot
    /// be reached before any work starts.
    pub fn run(&self) -> Result<BackfillReport, BackfillError> {
        let found = self.store.count_unanalyzed()?;

        let mut report = BackfillReport {
            found,
            ..Default::default()
        };

        info!(found, "starting backfill");
        if found == 0 {
            return Ok(report);
        }

        let analyzed_at = Utc::now().timestamp();
        let mut offset: u64 = 0;
        let mut processed: u64 = 0;

        loop {
            let page = match self.store.fetch_unanalyzed_page(self.config.page_size, offset) {
                Ok(page) => page,
                Err(e) => {
                    // Committed pages are durable; the rest is picked up
                    // on the next invocation.
                    error!(offset, error = %e, "page fetch failed, stopping run");
                    break;
                }
            };
            if page.is_empty() {
                break;
            }

            let mut staged = Vec::with_capacity(page.len());
            let mut reached_cap = false;

            for item in &page {
                if self.config.max_items.is_some_and(|cap| processed >= cap) {
                    reached_cap = true;
                    break;
                }
                processed += 1;

                match self.pipeline.analyze_item(item, analyzed_at) {
                    ItemOutcome::Analyzed(record) => staged.push(*record),
                    ItemOutcome::SkippedEmpty => {
                        debug!(item_id = %item.id, "empty after cleaning, skipped");
                        report.skipped_empty += 1;
                    }
                    ItemOutcome::Failed(failure) => {
                        warn!(
                            item_id = %item.id,
                            dimension = %failure.dimension,
                            error = %failure.error,
                            "scoring failed, item left unanalyzed"
                        );
                        report.failures.push(ItemFailure {
                            item_id: item.id.clone(),
                            dimension: failure.dimension,
                            reason: failure.error.to_string(),
                        });
                    }
                }
            }

            if !staged.is_empty() {
                match self.store.commit_page(&staged) {
                    Ok(()) => {
                        report.analyzed += staged.len() as u64;
                        report.pages_committed += 1;
                        info!(offset, committed = staged.len(), "page committed");
                    }
                    Err(e) => {
                        // The whole page rolled back; its items remain
                        // unanalyzed and are retried next invocation.
                        report.pages_failed += 1;
                        error!(offset, error = %e, "page commit failed, page rolled back");
                    }
                }
            }

            if reached_cap {
                info!(processed, "item cap reached, stopping run");
                break;
            }

            offset += self.config.page_size as u64;
            std::thread::sleep(self.config.page_delay);
        }

        info!(
            analyzed = report.analyzed,
            skipped_empty = report.skipped_empty,
            failed = report.failures.len(),
            "backfill finished"
        );
        Ok(report)
    }
}
