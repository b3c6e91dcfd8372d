use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::pool::WorkerPool;
use crate::reader::{Batch, BatchReader};
use crate::stats::PipelineStats;
use crate::table::{GlobalTable, LocalTable};
use crate::tokenizer;
use crossbeam::channel::bounded;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Cooperative cancellation flag, checked between batch cycles.
///
/// Cancelling never interrupts a phase mid-flight; the pipeline stops
/// cleanly at the next batch boundary without emitting results.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the pipeline to stop at the next batch boundary
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Builder for configuring a [`CountPipeline`]
pub struct PipelineBuilder {
    config: PipelineConfig,
    cancel: CancelToken,
}

impl PipelineBuilder {
    /// Start from the default configuration
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            cancel: CancelToken::new(),
        }
    }

    /// Start from an explicit configuration
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    /// Maximum lines buffered per streaming batch
    pub fn batch_size(mut self, lines: usize) -> Self {
        self.config.batch_size = lines;
        self
    }

    /// Pool size shared by the map and merge phases
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// Lock stripes in the global table
    pub fn stripes(mut self, stripes: usize) -> Self {
        self.config.stripes = stripes;
        self
    }

    /// Use an externally held cancellation token
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Validate the configuration and spawn the worker pool
    pub fn build(self) -> Result<CountPipeline> {
        self.config.validate()?;
        let pool = WorkerPool::new(self.config.workers)?;
        let locals = (0..self.config.workers).map(|_| LocalTable::new()).collect();
        Ok(CountPipeline {
            pool,
            global: Arc::new(GlobalTable::new(self.config.stripes)),
            locals,
            stats: PipelineStats::new(),
            cancel: self.cancel,
            config: self.config,
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The batched map → merge word-count pipeline.
///
/// Each cycle maps one batch of lines across the pool into per-worker
/// local tables, waits for all of them, then merges every local table
/// into the striped global table and waits again. The second barrier
/// guarantees batch N is fully merged before batch N+1 is mapped, which
/// keeps the final counts independent of thread scheduling and lets the
/// local tables be recycled without ever being shared between phases.
pub struct CountPipeline {
    config: PipelineConfig,
    pool: WorkerPool,
    global: Arc<GlobalTable>,
    locals: Vec<LocalTable>,
    stats: PipelineStats,
    cancel: CancelToken,
}

impl CountPipeline {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Token that cancels this pipeline's run from another thread
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drive the pipeline over `source` until input is exhausted.
    ///
    /// Returns `Ok(true)` on exhaustion, `Ok(false)` if cancelled between
    /// batches. Read failures abort the run; per the single-pass contract
    /// no results are emitted after a mid-stream failure.
    pub fn run<R: BufRead>(&mut self, source: R) -> Result<bool> {
        let mut reader = BatchReader::new(source, self.config.batch_size);
        while let Some(batch) = reader.next_batch()? {
            if self.cancel.is_cancelled() {
                debug!("cancelled after {} batches", self.stats.total_batches());
                return Ok(false);
            }
            self.process_batch(batch)?;
        }
        Ok(true)
    }

    /// Run one full map → merge cycle for a single batch
    fn process_batch(&mut self, batch: Batch) -> Result<()> {
        let line_count = batch.len() as u64;
        let batch = Arc::new(batch);

        let started = Instant::now();
        let tables = self.map_phase(&batch)?;
        let map_time = started.elapsed();
        self.stats.record_map_time(map_time);

        let started = Instant::now();
        self.merge_phase(tables)?;
        let merge_time = started.elapsed();
        self.stats.record_merge_time(merge_time);

        self.stats.record_lines(line_count);
        self.stats.record_batch();
        debug!(
            lines = line_count,
            map_ms = map_time.as_secs_f64() * 1000.0,
            merge_ms = merge_time.as_secs_f64() * 1000.0,
            "batch {} complete",
            self.stats.total_batches(),
        );
        Ok(())
    }

    /// Tokenize the batch into per-worker local tables.
    ///
    /// Line indices are split into contiguous ranges of
    /// `ceil(len / workers)` lines; a worker whose range is empty is
    /// skipped and its table passes through untouched. Collecting every
    /// dispatched table back is the map barrier.
    fn map_phase(&mut self, batch: &Arc<Batch>) -> Result<Vec<LocalTable>> {
        let workers = self.config.workers;
        let chunk = batch.len().div_ceil(workers);
        let (tx, rx) = bounded(workers);

        let mut collected: Vec<(usize, LocalTable)> = Vec::with_capacity(workers);
        let mut dispatched = 0;
        for (idx, mut table) in std::mem::take(&mut self.locals).into_iter().enumerate() {
            let start = idx * chunk;
            if start >= batch.len() {
                collected.push((idx, table));
                continue;
            }
            let end = (start + chunk).min(batch.len());
            let batch = Arc::clone(batch);
            let tx = tx.clone();
            let stats = self.stats.clone();
            self.pool.execute(move || {
                table.reset();
                let mut seen = 0u64;
                for line in &batch[start..end] {
                    for word in tokenizer::tokens(line) {
                        table.add(word);
                        seen += 1;
                    }
                }
                stats.record_tokens(seen);
                let _ = tx.send((idx, table));
            });
            dispatched += 1;
        }
        drop(tx);

        for _ in 0..dispatched {
            let result = rx
                .recv()
                .map_err(|_| PipelineError::Thread("map worker lost".into()))?;
            collected.push(result);
        }
        collected.sort_unstable_by_key(|(idx, _)| *idx);
        Ok(collected.into_iter().map(|(_, table)| table).collect())
    }

    /// Merge every local table into the striped global table.
    ///
    /// Table `i` is assigned to merge worker `i % workers`, so each table
    /// is merged exactly once. Collecting the drained tables back is the
    /// merge barrier; the next map phase cannot touch a table still owned
    /// by a merge job.
    fn merge_phase(&mut self, tables: Vec<LocalTable>) -> Result<()> {
        let merge_workers = self.pool.worker_count();
        let mut assigned: Vec<Vec<(usize, LocalTable)>> =
            (0..merge_workers).map(|_| Vec::new()).collect();
        for (idx, table) in tables.into_iter().enumerate() {
            assigned[idx % merge_workers].push((idx, table));
        }

        let (tx, rx) = bounded(merge_workers);
        let mut dispatched = 0;
        for group in assigned {
            if group.is_empty() {
                continue;
            }
            let global = Arc::clone(&self.global);
            let tx = tx.clone();
            self.pool.execute(move || {
                let mut group = group;
                for (_, table) in &mut group {
                    global.merge_local(table);
                }
                let _ = tx.send(group);
            });
            dispatched += 1;
        }
        drop(tx);

        let mut returned: Vec<(usize, LocalTable)> = Vec::with_capacity(self.config.workers);
        for _ in 0..dispatched {
            let group = rx
                .recv()
                .map_err(|_| PipelineError::Thread("merge worker lost".into()))?;
            returned.extend(group);
        }
        returned.sort_unstable_by_key(|(idx, _)| *idx);
        self.locals = returned.into_iter().map(|(_, table)| table).collect();
        Ok(())
    }

    /// Shut the pool down and produce the final sorted counts.
    ///
    /// Aggregation is single-threaded; after the pool joins, no writer to
    /// the global table remains.
    pub fn finish(mut self) -> Result<Vec<(String, u64)>> {
        self.pool.shutdown()?;
        let global = Arc::try_unwrap(self.global)
            .map_err(|_| PipelineError::Thread("global table still shared".into()))?;
        Ok(global.into_sorted())
    }
}

/// One-shot convenience: run the whole pipeline over `source` and return
/// the sorted `(word, count)` pairs.
pub fn count_words<R: BufRead>(source: R, config: PipelineConfig) -> Result<Vec<(String, u64)>> {
    let mut pipeline = PipelineBuilder::from_config(config).build()?;
    pipeline.run(source)?;
    pipeline.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn counts(text: &str, config: PipelineConfig) -> Vec<(String, u64)> {
        count_words(Cursor::new(text.as_bytes().to_vec()), config).unwrap()
    }

    fn config(batch_size: usize, workers: usize, stripes: usize) -> PipelineConfig {
        PipelineConfig {
            batch_size,
            workers,
            stripes,
        }
    }

    #[test]
    fn test_build_validates_config() {
        let result = PipelineBuilder::new().batch_size(0).build();
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_spec_scenario() {
        let result = counts("The cat sat.\nTHE CAT ran!\n", config(2, 2, 2));
        assert_eq!(
            result,
            vec![
                ("cat".to_string(), 2),
                ("ran".to_string(), 1),
                ("sat".to_string(), 1),
                ("the".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(counts("", config(100, 2, 2)).is_empty());
    }

    #[test]
    fn test_more_workers_than_lines() {
        let result = counts("one two\n", config(100, 8, 8));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_multiple_batches_accumulate() {
        let text = "a\n".repeat(10);
        let result = counts(&text, config(3, 2, 2));
        assert_eq!(result, vec![("a".to_string(), 10)]);
    }

    #[test]
    fn test_cancel_before_first_batch() {
        let mut pipeline = PipelineBuilder::new()
            .batch_size(2)
            .workers(2)
            .build()
            .unwrap();
        pipeline.cancel_token().cancel();
        let completed = pipeline.run(Cursor::new(b"a\nb\nc\n".to_vec())).unwrap();
        assert!(!completed);
        assert_eq!(pipeline.stats().total_batches(), 0);
    }

    #[test]
    fn test_stats_track_run() {
        let mut pipeline = PipelineBuilder::new()
            .batch_size(2)
            .workers(2)
            .build()
            .unwrap();
        pipeline
            .run(Cursor::new(b"one two\nthree\nfour\n".to_vec()))
            .unwrap();
        let snapshot = pipeline.stats().snapshot();
        assert_eq!(snapshot.lines, 3);
        assert_eq!(snapshot.tokens, 4);
        assert_eq!(snapshot.batches, 2);
        let total: u64 = pipeline.finish().unwrap().iter().map(|(_, c)| c).sum();
        assert_eq!(total, snapshot.tokens);
    }
}
