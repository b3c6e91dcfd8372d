use crate::error::{PipelineError, Result};

/// Default maximum number of lines buffered per streaming batch
pub const DEFAULT_BATCH_SIZE: usize = 100_000;

/// Tunables for a pipeline run.
///
/// Worker count and stripe count are independent knobs: more stripes lower
/// merge contention at the cost of lock and memory overhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Maximum lines buffered per streaming batch
    pub batch_size: usize,
    /// Pool size shared by the map and merge phases
    pub workers: usize,
    /// Number of lock stripes in the global table
    pub stripes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let workers = num_cpus::get().max(1);
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            workers,
            stripes: workers,
        }
    }
}

impl PipelineConfig {
    /// Check that every knob is usable; all three must be at least 1
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch size must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(PipelineError::Config("worker count must be at least 1".into()));
        }
        if self.stripes == 0 {
            return Err(PipelineError::Config("stripe count must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.workers >= 1);
        assert_eq!(config.stripes, config.workers);
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let config = PipelineConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = PipelineConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_zero_stripes_rejected() {
        let config = PipelineConfig {
            stripes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }
}
