use crate::error::{PipelineError, Result};
use crossbeam::channel::{unbounded, Sender};
use std::thread::JoinHandle;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// A fixed pool of OS threads reused across the map and merge phases and
/// across batches.
///
/// Jobs are boxed closures dispatched over a shared channel; any idle
/// worker picks up the next one. The pool itself knows nothing about
/// phases — barriers are built by the caller collecting one result per
/// dispatched job. Workers run until the job channel disconnects.
pub struct WorkerPool {
    jobs: Option<Sender<Job>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` threads (minimum 1)
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let (tx, rx) = unbounded::<Job>();
        let mut handles = Vec::with_capacity(workers);
        for id in 0..workers {
            let rx = rx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("wc-worker-{id}"))
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        job();
                    }
                })
                .map_err(|e| PipelineError::Thread(format!("spawn failed: {e}")))?;
            handles.push(handle);
        }
        Ok(Self {
            jobs: Some(tx),
            handles,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.handles.len()
    }

    /// Submit one job; never blocks
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        if let Some(tx) = &self.jobs {
            // send only fails if every worker is gone, which shutdown surfaces
            let _ = tx.send(Box::new(job));
        }
    }

    /// Disconnect the job channel, let workers drain, and join them all
    pub fn shutdown(&mut self) -> Result<()> {
        self.jobs.take();
        for handle in self.handles.drain(..) {
            handle
                .join()
                .map_err(|_| PipelineError::Thread("worker panicked".into()))?;
        }
        Ok(())
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
