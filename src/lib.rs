//! A parallel word-frequency counter built as a batched map → merge pipeline.
//!
//! Input is streamed in bounded batches of lines. Each batch is split
//! across a fixed pool of worker threads that tokenize their line ranges
//! into private local tables; the same pool then merges those tables into
//! one shared global table whose key space is partitioned into lock
//! stripes, so merge workers touching different stripes never contend.
//! Once input is exhausted the global table is drained, sorted
//! lexicographically, and emitted.
//!
//! # Features
//!
//! - Bounded streaming batches decouple memory use from file size
//! - Long-lived worker pool reused across phases and batches
//! - Striped-lock merge with independently tunable stripe count
//! - Deterministic output regardless of worker count or scheduling
//! - Cooperative cancellation between batch cycles
//! - Run-wide counters and phase timings via `tracing` + [`PipelineStats`]
//!
//! # Example
//!
//! ```ignore
//! use wordcount_pipeline::{write_report, PipelineBuilder};
//!
//! let mut pipeline = PipelineBuilder::new()
//!     .batch_size(100_000)
//!     .workers(8)
//!     .stripes(8)
//!     .build()?;
//!
//! pipeline.run(std::io::BufReader::new(file))?;
//! let counts = pipeline.finish()?;
//! write_report(&mut std::io::stdout().lock(), &counts)?;
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod reader;
pub mod report;
pub mod stats;
pub mod table;
pub mod tokenizer;

// Re-exports for convenience
pub use config::{PipelineConfig, DEFAULT_BATCH_SIZE};
pub use error::{PipelineError, Result};
pub use pipeline::{count_words, CancelToken, CountPipeline, PipelineBuilder};
pub use pool::WorkerPool;
pub use reader::{Batch, BatchReader};
pub use report::{write_report, REPORT_HEADER};
pub use stats::{PipelineStats, StatsSnapshot};
pub use table::{GlobalTable, LocalTable};
pub use tokenizer::{tokens, Tokens};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
