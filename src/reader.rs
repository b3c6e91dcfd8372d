use crate::error::Result;
use std::io::BufRead;

/// A bounded group of input lines processed together as one pipeline cycle
pub type Batch = Vec<String>;

/// Pulls lines off a buffered source in bounded batches, decoupling total
/// memory from file size.
///
/// Batches come out in file order with no line skipped or duplicated; the
/// final batch may be shorter than `batch_size`. `next_batch` returns
/// `Ok(None)` exactly once input is exhausted, so a batch that ends
/// precisely at end of file does not trigger a trailing empty cycle.
pub struct BatchReader<R> {
    source: R,
    batch_size: usize,
    lines_read: u64,
    done: bool,
}

impl<R: BufRead> BatchReader<R> {
    /// Create a reader producing batches of at most `batch_size` lines
    pub fn new(source: R, batch_size: usize) -> Self {
        Self {
            source,
            batch_size,
            lines_read: 0,
            done: false,
        }
    }

    /// Read the next batch, or `None` once input is exhausted.
    ///
    /// Lines are decoded lossily: byte sequences that are not valid UTF-8
    /// become replacement characters instead of read errors.
    pub fn next_batch(&mut self) -> Result<Option<Batch>> {
        if self.done {
            return Ok(None);
        }

        let mut batch = Vec::with_capacity(self.batch_size.min(4096));
        let mut buf = Vec::new();

        while batch.len() < self.batch_size {
            buf.clear();
            let n = self.source.read_until(b'\n', &mut buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if buf.last() == Some(&b'\n') {
                buf.pop();
                if buf.last() == Some(&b'\r') {
                    buf.pop();
                }
            }
            batch.push(String::from_utf8_lossy(&buf).into_owned());
        }

        if batch.is_empty() {
            self.done = true;
            return Ok(None);
        }

        self.lines_read += batch.len() as u64;
        Ok(Some(batch))
    }

    /// Total lines handed out so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }
}
