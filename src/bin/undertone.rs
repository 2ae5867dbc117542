//! Undertone CLI — corpus backfill and ad-hoc text analysis.
//!
//! Usage:
//!   undertone backfill [--db path] [--page-size N] [--max-items N]
//!   undertone analyze <text>
//!   undertone stats [--db path]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use undertone::{
    AnalysisPipeline, Backfill, BackfillConfig, CorpusStore, Dimension, OpenCorpus, SqliteCorpus,
    StorageResult,
};

#[derive(Parser)]
#[command(
    name = "undertone",
    version,
    about = "Incremental multi-dimensional text analysis for social corpora"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze every corpus item that has no analysis record yet
    Backfill {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
        /// Items per page (one transaction per page)
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        /// Stop after this many items; the next run picks up the rest
        #[arg(long)]
        max_items: Option<u64>,
        /// Pause between pages, in milliseconds
        #[arg(long, default_value_t = 100)]
        page_delay_ms: u64,
    },
    /// Analyze a single text and print the result as JSON
    Analyze {
        /// The text to analyze
        text: String,
    },
    /// Show corpus counts and per-dimension summaries
    Stats {
        /// Path to SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Get the default database path (~/.local/share/undertone/undertone.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    let undertone_dir = data_dir.join("undertone");
    std::fs::create_dir_all(&undertone_dir).ok();
    undertone_dir.join("undertone.db")
}

fn open_corpus(db: Option<PathBuf>) -> Result<SqliteCorpus, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    SqliteCorpus::open(&db_path).map_err(|e| format!("Failed to open corpus: {}", e))
}

fn cmd_backfill(corpus: &SqliteCorpus, config: BackfillConfig) -> i32 {
    let pipeline = AnalysisPipeline::standard();
    let backfill = Backfill::new(corpus, &pipeline).with_config(config);

    match backfill.run() {
        Ok(report) => {
            println!("Found {} unanalyzed items", report.found);
            println!(
                "Analyzed {} ({} pages committed, {} failed)",
                report.analyzed, report.pages_committed, report.pages_failed
            );
            if report.skipped_empty > 0 {
                println!("Skipped {} empty items", report.skipped_empty);
            }
            if !report.failures.is_empty() {
                println!("{} items failed scoring:", report.failures.len());
                for failure in &report.failures {
                    println!(
                        "  {} [{}]: {}",
                        failure.item_id, failure.dimension, failure.reason
                    );
                }
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_analyze(text: &str) -> i32 {
    let pipeline = AnalysisPipeline::standard();
    match pipeline.analyze_text(text) {
        Ok(analysis) => {
            match serde_json::to_string_pretty(&analysis.to_json()) {
                Ok(json) => {
                    println!("{}", json);
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_stats(corpus: &SqliteCorpus) -> StorageResult<()> {
    println!("Items:      {}", corpus.count_items()?);
    println!("Records:    {}", corpus.count_records()?);
    println!("Unanalyzed: {}", corpus.count_unanalyzed()?);

    for dimension in Dimension::ALL {
        let counts = corpus.label_counts(dimension)?;
        if counts.is_empty() {
            continue;
        }
        let mean = corpus.mean_distribution(dimension)?;

        println!();
        println!("{}", dimension);
        for (label, count) in counts {
            let avg = mean.get(&label).unwrap_or(0.0);
            println!("  {:<12} {:>7}  (mean score {:.3})", label, count, avg);
        }
    }
    Ok(())
}

fn cmd_stats(corpus: &SqliteCorpus) -> i32 {
    match print_stats(corpus) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Backfill {
            db,
            page_size,
            max_items,
            page_delay_ms,
        } => {
            let corpus = match open_corpus(db) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            let mut config = BackfillConfig::new()
                .with_page_size(page_size)
                .with_page_delay(Duration::from_millis(page_delay_ms));
            if let Some(cap) = max_items {
                config = config.with_max_items(cap);
            }
            cmd_backfill(&corpus, config)
        }
        Commands::Analyze { text } => cmd_analyze(&text),
        Commands::Stats { db } => {
            let corpus = match open_corpus(db) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };
            cmd_stats(&corpus)
        }
    };
    std::process::exit(code);
}
