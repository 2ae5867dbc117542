//! End-to-end backfill properties over a real SQLite corpus.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use undertone::analysis::scorers::{EmotionLexicon, RiskLexicon, SentimentModel};
use undertone::analysis::{
    Dimension, LabelDistribution, ScoreError, ScoreProvider, ScoreResult, ScorerRegistry,
    ValenceLexicon,
};
use undertone::corpus::{AnalysisRecord, StorageError, StorageResult};
use undertone::{
    AnalysisPipeline, Backfill, BackfillConfig, CorpusStore, OpenCorpus, RawItem, SqliteCorpus,
};

fn fast_config() -> BackfillConfig {
    BackfillConfig::new().with_page_delay(Duration::ZERO)
}

fn seed(corpus: &dyn CorpusStore, count: usize) {
    for i in 0..count {
        corpus
            .insert_item(&RawItem::new(
                format!("item-{:03}", i),
                format!("this is wonderful news number {}", i),
                1_700_000_000 + i as i64,
            ))
            .unwrap();
    }
}

/// Run backfills until a run makes no progress; returns runs executed.
fn run_to_convergence(corpus: &dyn CorpusStore, pipeline: &AnalysisPipeline) -> usize {
    let mut runs = 0;
    loop {
        let report = Backfill::new(corpus, pipeline)
            .with_config(fast_config().with_page_size(10))
            .run()
            .unwrap();
        runs += 1;
        if report.processed() == 0 {
            return runs;
        }
        assert!(runs < 20, "backfill failed to converge");
    }
}

// --- Scenario: a second run over an unchanged corpus adds nothing ---

#[test]
fn second_run_adds_zero_records() {
    let corpus = SqliteCorpus::open_in_memory().unwrap();
    seed(&corpus, 15);
    let pipeline = AnalysisPipeline::standard();

    let first = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config())
        .run()
        .unwrap();
    assert_eq!(first.found, 15);
    assert_eq!(first.analyzed, 15);
    assert_eq!(corpus.count_records().unwrap(), 15);

    let second = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config())
        .run()
        .unwrap();
    assert_eq!(second.found, 0);
    assert_eq!(second.analyzed, 0);
    assert_eq!(corpus.count_records().unwrap(), 15);

    let third = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config())
        .run()
        .unwrap();
    assert_eq!(third.analyzed, 0);
    assert_eq!(corpus.count_records().unwrap(), 15);
}

// --- Scenario: a corpus larger than one page converges across runs,
// never writing a second record for any item ---

#[test]
fn repeated_runs_converge_without_duplicates() {
    let corpus = SqliteCorpus::open_in_memory().unwrap();
    seed(&corpus, 45);
    let pipeline = AnalysisPipeline::standard();

    run_to_convergence(&corpus, &pipeline);

    assert_eq!(corpus.count_unanalyzed().unwrap(), 0);
    assert_eq!(corpus.count_records().unwrap(), 45);
    for i in 0..45 {
        let id = format!("item-{:03}", i);
        assert!(
            corpus.record_for(&id).unwrap().is_some(),
            "missing record for {}",
            id
        );
    }
}

// --- Scenario: one poisoned item in a page of twenty fails alone ---

struct PoisonableEmotion {
    inner: EmotionLexicon,
}

impl ScoreProvider for PoisonableEmotion {
    fn id(&self) -> &str {
        "emotion-poisonable"
    }
    fn dimension(&self) -> Dimension {
        Dimension::Emotion
    }
    fn labels(&self) -> &[&str] {
        self.inner.labels()
    }
    fn score(&self, text: &str) -> ScoreResult<LabelDistribution> {
        if text.contains("poison") {
            return Err(ScoreError::Inference("poisoned item".to_string()));
        }
        self.inner.score(text)
    }
}

fn poisonable_pipeline() -> AnalysisPipeline {
    let valence = Arc::new(ValenceLexicon::new());
    let mut registry = ScorerRegistry::new();
    registry.register(SentimentModel::new(valence.clone()));
    registry.register(PoisonableEmotion {
        inner: EmotionLexicon::new(valence.clone()),
    });
    registry.register(RiskLexicon::new(valence));
    AnalysisPipeline::with_registry(registry)
}

#[test]
fn one_failing_item_does_not_abort_the_page() {
    let corpus = SqliteCorpus::open_in_memory().unwrap();
    seed(&corpus, 20);
    // Overwrite item 7's text with the failure marker.
    corpus
        .insert_item(&RawItem::new("poisoned", "this text contains poison", 1_700_000_500))
        .unwrap();

    let pipeline = poisonable_pipeline();
    let report = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config().with_page_size(21))
        .run()
        .unwrap();

    assert_eq!(report.found, 21);
    assert_eq!(report.analyzed, 20);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item_id, "poisoned");
    assert_eq!(report.failures[0].dimension, Dimension::Emotion);

    assert_eq!(corpus.count_records().unwrap(), 20);
    assert!(corpus.record_for("poisoned").unwrap().is_none());
}

// --- Scenario: empty texts are skipped, not recorded, and stay skipped ---

#[test]
fn empty_texts_are_skipped_without_records() {
    let corpus = SqliteCorpus::open_in_memory().unwrap();
    corpus
        .insert_item(&RawItem::new("blank", "   ", 1_700_000_001))
        .unwrap();
    corpus
        .insert_item(&RawItem::new("emoji", "\u{1F600}\u{1F601}", 1_700_000_002))
        .unwrap();
    corpus
        .insert_item(&RawItem::new("real", "a genuinely great post", 1_700_000_003))
        .unwrap();

    let pipeline = AnalysisPipeline::standard();
    let report = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config())
        .run()
        .unwrap();

    assert_eq!(report.analyzed, 1);
    assert_eq!(report.skipped_empty, 2);
    assert!(report.failures.is_empty());
    assert_eq!(corpus.count_records().unwrap(), 1);

    // Empty items remain unanalyzed by design and are re-skipped.
    let again = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config())
        .run()
        .unwrap();
    assert_eq!(again.analyzed, 0);
    assert_eq!(again.skipped_empty, 2);
    assert_eq!(corpus.count_records().unwrap(), 1);
}

// --- Scenario: interrupting after page one loses nothing and
// reprocesses nothing ---

#[test]
fn interrupted_run_resumes_where_it_left_off() {
    let corpus = SqliteCorpus::open_in_memory().unwrap();
    seed(&corpus, 40);
    let pipeline = AnalysisPipeline::standard();

    // "Crash" after the first page commits by capping the run.
    let first = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config().with_page_size(20).with_max_items(20))
        .run()
        .unwrap();
    assert_eq!(first.analyzed, 20);
    assert_eq!(corpus.count_records().unwrap(), 20);

    let before: AnalysisRecord = corpus
        .record_for("item-039")
        .unwrap()
        .expect("newest item commits in page one");

    // The resumed run only sees the remaining twenty items.
    let second = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config().with_page_size(20))
        .run()
        .unwrap();
    assert_eq!(second.found, 20);
    assert_eq!(second.analyzed, 20);

    assert_eq!(corpus.count_records().unwrap(), 40);
    assert_eq!(corpus.count_unanalyzed().unwrap(), 0);

    // The record committed before the interruption is untouched.
    let after = corpus.record_for("item-039").unwrap().unwrap();
    assert_eq!(before, after);
}

// --- Test store wrapper with failure/insertion hooks ---

struct FlakyStore {
    inner: SqliteCorpus,
    fetches: AtomicU32,
    /// Item inserted right before the fetch with this ordinal (0-based).
    inject_on_fetch: Option<(u32, RawItem)>,
    fail_next_commit: AtomicBool,
}

impl FlakyStore {
    fn new(inner: SqliteCorpus) -> Self {
        Self {
            inner,
            fetches: AtomicU32::new(0),
            inject_on_fetch: None,
            fail_next_commit: AtomicBool::new(false),
        }
    }
}

impl CorpusStore for FlakyStore {
    fn insert_item(&self, item: &RawItem) -> StorageResult<()> {
        self.inner.insert_item(item)
    }
    fn count_items(&self) -> StorageResult<u64> {
        self.inner.count_items()
    }
    fn count_unanalyzed(&self) -> StorageResult<u64> {
        self.inner.count_unanalyzed()
    }
    fn fetch_unanalyzed_page(&self, limit: u32, offset: u64) -> StorageResult<Vec<RawItem>> {
        let ordinal = self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some((inject_at, item)) = &self.inject_on_fetch {
            if ordinal == *inject_at {
                self.inner.insert_item(item)?;
            }
        }
        self.inner.fetch_unanalyzed_page(limit, offset)
    }
    fn commit_page(&self, records: &[AnalysisRecord]) -> StorageResult<()> {
        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "injected commit failure",
            )));
        }
        self.inner.commit_page(records)
    }
    fn count_records(&self) -> StorageResult<u64> {
        self.inner.count_records()
    }
    fn record_for(&self, item_id: &str) -> StorageResult<Option<AnalysisRecord>> {
        self.inner.record_for(item_id)
    }
    fn label_counts(&self, dimension: Dimension) -> StorageResult<Vec<(String, u64)>> {
        self.inner.label_counts(dimension)
    }
    fn mean_distribution(&self, dimension: Dimension) -> StorageResult<LabelDistribution> {
        self.inner.mean_distribution(dimension)
    }
    fn top_examples(
        &self,
        dimension: Dimension,
        label: &str,
        limit: u32,
    ) -> StorageResult<Vec<(String, f64)>> {
        self.inner.top_examples(dimension, label, limit)
    }
}

// --- Scenario: a failed page commit rolls back and retries next run ---

#[test]
fn failed_commit_rolls_back_the_whole_page() {
    let store = FlakyStore::new(SqliteCorpus::open_in_memory().unwrap());
    seed(&store, 10);
    store.fail_next_commit.store(true, Ordering::SeqCst);

    let pipeline = AnalysisPipeline::standard();
    let report = Backfill::new(&store, &pipeline)
        .with_config(fast_config().with_page_size(10))
        .run()
        .unwrap();

    // The run survives the commit failure, but nothing was written.
    assert_eq!(report.pages_failed, 1);
    assert_eq!(report.analyzed, 0);
    assert_eq!(store.count_records().unwrap(), 0);
    assert_eq!(store.count_unanalyzed().unwrap(), 10);

    // Next invocation retries the same items successfully.
    let retry = Backfill::new(&store, &pipeline)
        .with_config(fast_config().with_page_size(10))
        .run()
        .unwrap();
    assert_eq!(retry.analyzed, 10);
    assert_eq!(store.count_records().unwrap(), 10);
}

// --- Scenario: items inserted mid-run are picked up by the next
// invocation, never duplicated ---

#[test]
fn mid_run_inserts_converge_on_the_next_run() {
    let mut store = FlakyStore::new(SqliteCorpus::open_in_memory().unwrap());
    seed(&store, 25);
    // A newest-first item lands right before the second page fetch,
    // shifting the window under the running backfill.
    store.inject_on_fetch = Some((
        1,
        RawItem::new("late-arrival", "a very late wonderful post", 1_800_000_000),
    ));

    let pipeline = AnalysisPipeline::standard();
    Backfill::new(&store, &pipeline)
        .with_config(fast_config().with_page_size(10))
        .run()
        .unwrap();

    // The late item may have been skipped this run, but is never lost.
    run_to_convergence(&store, &pipeline);

    assert_eq!(store.count_unanalyzed().unwrap(), 0);
    assert_eq!(store.count_records().unwrap(), 26);
    assert!(store.record_for("late-arrival").unwrap().is_some());
}

// --- Scenario: the item cap bounds work without affecting correctness ---

#[test]
fn item_cap_bounds_a_single_invocation() {
    let corpus = SqliteCorpus::open_in_memory().unwrap();
    seed(&corpus, 30);
    let pipeline = AnalysisPipeline::standard();

    let capped = Backfill::new(&corpus, &pipeline)
        .with_config(fast_config().with_page_size(10).with_max_items(15))
        .run()
        .unwrap();

    assert_eq!(capped.processed(), 15);
    assert_eq!(corpus.count_records().unwrap(), 15);

    run_to_convergence(&corpus, &pipeline);
    assert_eq!(corpus.count_records().unwrap(), 30);
}
