//! SQLite corpus backend

use super::traits::{AnalysisRecord, CorpusStore, OpenCorpus, RawItem, StorageResult};
use crate::analysis::{Dimension, LabelDistribution};
use rusqlite::{params, Connection, Row};
use std::cmp::Ordering;
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed corpus store
///
/// A single database file holds both the raw items and their analysis
/// records. Distributions are stored as JSON text columns, written and
/// read through [`LabelDistribution`]'s order-preserving serialization.
/// Thread-safe via an internal mutex on the connection.
pub struct SqliteCorpus {
    conn: Mutex<Connection>,
}

impl SqliteCorpus {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            -- Raw items, written by the harvesting collaborator
            CREATE TABLE IF NOT EXISTS items (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_created_at
                ON items(created_at DESC);

            -- One analysis record per item
            CREATE TABLE IF NOT EXISTS analysis_records (
                item_id TEXT PRIMARY KEY REFERENCES items(id),
                clean_text TEXT NOT NULL,
                lemma_text TEXT NOT NULL,
                char_count INTEGER NOT NULL,
                word_count INTEGER NOT NULL,
                raw_sentiment TEXT NOT NULL,
                raw_emotion TEXT NOT NULL,
                raw_risk TEXT NOT NULL,
                normalized_sentiment TEXT NOT NULL,
                normalized_emotion TEXT NOT NULL,
                normalized_risk TEXT NOT NULL,
                top_sentiment TEXT NOT NULL,
                top_emotion TEXT NOT NULL,
                top_risk TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                analyzed_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_records_top_sentiment
                ON analysis_records(top_sentiment);
            CREATE INDEX IF NOT EXISTS idx_records_top_emotion
                ON analysis_records(top_emotion);
            CREATE INDEX IF NOT EXISTS idx_records_top_risk
                ON analysis_records(top_risk);

            -- Enable foreign keys
            PRAGMA foreign_keys = ON;

            -- WAL keeps reads open while a page commits
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    /// Column holding the raw distribution for a dimension.
    fn raw_column(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Sentiment => "raw_sentiment",
            Dimension::Emotion => "raw_emotion",
            Dimension::Risk => "raw_risk",
        }
    }

    /// Column holding the winning label for a dimension.
    fn top_column(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Sentiment => "top_sentiment",
            Dimension::Emotion => "top_emotion",
            Dimension::Risk => "top_risk",
        }
    }

    fn row_to_item(row: &Row<'_>) -> rusqlite::Result<RawItem> {
        Ok(RawItem {
            id: row.get(0)?,
            text: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    fn row_to_record(row: &Row<'_>) -> StorageResult<AnalysisRecord> {
        let raw_sentiment: String = row.get(5)?;
        let raw_emotion: String = row.get(6)?;
        let raw_risk: String = row.get(7)?;
        let normalized_sentiment: String = row.get(8)?;
        let normalized_emotion: String = row.get(9)?;
        let normalized_risk: String = row.get(10)?;

        Ok(AnalysisRecord {
            item_id: row.get(0)?,
            clean_text: row.get(1)?,
            lemma_text: row.get(2)?,
            char_count: row.get::<_, i64>(3)? as usize,
            word_count: row.get::<_, i64>(4)? as usize,
            raw_sentiment: serde_json::from_str(&raw_sentiment)?,
            raw_emotion: serde_json::from_str(&raw_emotion)?,
            raw_risk: serde_json::from_str(&raw_risk)?,
            normalized_sentiment: serde_json::from_str(&normalized_sentiment)?,
            normalized_emotion: serde_json::from_str(&normalized_emotion)?,
            normalized_risk: serde_json::from_str(&normalized_risk)?,
            top_sentiment: row.get(11)?,
            top_emotion: row.get(12)?,
            top_risk: row.get(13)?,
            created_at: row.get(14)?,
            analyzed_at: row.get(15)?,
        })
    }

    const RECORD_COLUMNS: &'static str = "item_id, clean_text, lemma_text, char_count, \
         word_count, raw_sentiment, raw_emotion, raw_risk, normalized_sentiment, \
         normalized_emotion, normalized_risk, top_sentiment, top_emotion, top_risk, \
         created_at, analyzed_at";
}

impl OpenCorpus for SqliteCorpus {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CorpusStore for SqliteCorpus {
    fn insert_item(&self, item: &RawItem) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO items (id, text, created_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO NOTHING",
            params![item.id, item.text, item.created_at],
        )?;
        Ok(())
    }

    fn count_items(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_unanalyzed(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*)
            FROM items i
            LEFT JOIN analysis_records r ON r.item_id = i.id
            WHERE r.item_id IS NULL
            "#,
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn fetch_unanalyzed_page(&self, limit: u32, offset: u64) -> StorageResult<Vec<RawItem>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            r#"
            SELECT i.id, i.text, i.created_at
            FROM items i
            LEFT JOIN analysis_records r ON r.item_id = i.id
            WHERE r.item_id IS NULL
            ORDER BY i.created_at DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )?;

        let items = stmt
            .query_map(params![limit, offset as i64], Self::row_to_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(items)
    }

    fn commit_page(&self, records: &[AnalysisRecord]) -> StorageResult<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;

        for record in records {
            tx.execute(
                r#"
                INSERT INTO analysis_records (
                    item_id, clean_text, lemma_text, char_count, word_count,
                    raw_sentiment, raw_emotion, raw_risk,
                    normalized_sentiment, normalized_emotion, normalized_risk,
                    top_sentiment, top_emotion, top_risk,
                    created_at, analyzed_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
                ON CONFLICT(item_id) DO UPDATE SET
                    clean_text = excluded.clean_text,
                    lemma_text = excluded.lemma_text,
                    char_count = excluded.char_count,
                    word_count = excluded.word_count,
                    raw_sentiment = excluded.raw_sentiment,
                    raw_emotion = excluded.raw_emotion,
                    raw_risk = excluded.raw_risk,
                    normalized_sentiment = excluded.normalized_sentiment,
                    normalized_emotion = excluded.normalized_emotion,
                    normalized_risk = excluded.normalized_risk,
                    top_sentiment = excluded.top_sentiment,
                    top_emotion = excluded.top_emotion,
                    top_risk = excluded.top_risk,
                    created_at = excluded.created_at,
                    analyzed_at = excluded.analyzed_at
                "#,
                params![
                    record.item_id,
                    record.clean_text,
                    record.lemma_text,
                    record.char_count as i64,
                    record.word_count as i64,
                    serde_json::to_string(&record.raw_sentiment)?,
                    serde_json::to_string(&record.raw_emotion)?,
                    serde_json::to_string(&record.raw_risk)?,
                    serde_json::to_string(&record.normalized_sentiment)?,
                    serde_json::to_string(&record.normalized_emotion)?,
                    serde_json::to_string(&record.normalized_risk)?,
                    record.top_sentiment,
                    record.top_emotion,
                    record.top_risk,
                    record.created_at,
                    record.analyzed_at,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn count_records(&self) -> StorageResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM analysis_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn record_for(&self, item_id: &str) -> StorageResult<Option<AnalysisRecord>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM analysis_records WHERE item_id = ?1",
            Self::RECORD_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query(params![item_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_record(row)?)),
            None => Ok(None),
        }
    }

    fn label_counts(&self, dimension: Dimension) -> StorageResult<Vec<(String, u64)>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {col}, COUNT(*) FROM analysis_records GROUP BY {col} ORDER BY COUNT(*) DESC",
            col = Self::top_column(dimension)
        );
        let mut stmt = conn.prepare(&sql)?;
        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }

    fn mean_distribution(&self, dimension: Dimension) -> StorageResult<LabelDistribution> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {} FROM analysis_records",
            Self::raw_column(dimension)
        );
        let mut stmt = conn.prepare(&sql)?;
        let raw_jsons = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut sums = LabelDistribution::new();
        for json in &raw_jsons {
            let dist: LabelDistribution = serde_json::from_str(json)?;
            for (label, score) in dist.iter() {
                let prior = sums.get(label).unwrap_or(0.0);
                sums.insert(label, prior + score);
            }
        }

        if raw_jsons.is_empty() {
            return Ok(sums);
        }
        Ok(sums.scaled(1.0 / raw_jsons.len() as f64))
    }

    fn top_examples(
        &self,
        dimension: Dimension,
        label: &str,
        limit: u32,
    ) -> StorageResult<Vec<(String, f64)>> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT clean_text, {} FROM analysis_records",
            Self::raw_column(dimension)
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut scored = Vec::with_capacity(rows.len());
        for (text, json) in rows {
            let dist: LabelDistribution = serde_json::from_str(&json)?;
            if let Some(score) = dist.get(label) {
                scored.push((text, score));
            }
        }

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored.truncate(limit as usize);
        Ok(scored)
    }
}
