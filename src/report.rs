use crate::error::{PipelineError, Result};
use std::io::Write;

/// Fixed header emitted before the sorted counts
pub const REPORT_HEADER: &str = "=== Final Word Counts (A → Z) ===";

/// Write the header and one `word -> count` line per entry.
///
/// `counts` must already be sorted; see
/// [`GlobalTable::into_sorted`](crate::table::GlobalTable::into_sorted).
/// An empty result still gets the header.
pub fn write_report<W: Write>(out: &mut W, counts: &[(String, u64)]) -> Result<()> {
    writeln!(out, "{REPORT_HEADER}").map_err(PipelineError::OutputWrite)?;
    for (word, count) in counts {
        writeln!(out, "{word} -> {count}").map_err(PipelineError::OutputWrite)?;
    }
    out.flush().map_err(PipelineError::OutputWrite)
}
