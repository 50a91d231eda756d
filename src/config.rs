//! Pool construction configuration.

use crate::{PoolError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Prior pool configuration.
///
/// Constructed once before the pool is built or loaded and never mutated
/// afterwards. The structural counts must match the cost model the pool is
/// built against; a persisted pool records them and refuses to load under a
/// different shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Lower bound of the target cost ladder (FLOPS).
    pub low_flops: u64,
    /// Upper bound of the target cost ladder (FLOPS).
    pub high_flops: u64,
    /// Number of ladder steps between the bounds.
    pub pool_size: usize,
    /// Number of layers in the target topology.
    pub layers: usize,
    /// Structural splits per layer.
    pub split_blocks: usize,
    /// Discrete operator choices per split, including the trailing skip choice.
    pub kernel_choices: usize,
    /// Inclusive upper bound on per-layer expansion depth; sampled depth is
    /// uniform in [2, expansion].
    pub expansion: usize,
    /// Half-width of the accepted cost window around each target.
    pub tolerance: u64,
    /// Minimum number of retained (non-skipped) decoded layers.
    pub min_depth: usize,
    /// Attempt budget per ladder target before the search fails.
    pub max_attempts: usize,
    /// Pool storage location.
    pub pool_path: PathBuf,
    /// Random seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            low_flops: 80,
            high_flops: 120,
            pool_size: 1,
            layers: 19,
            split_blocks: 6,
            kernel_choices: 4,
            expansion: 6,
            tolerance: 5,
            min_depth: 19,
            max_attempts: 100_000,
            pool_path: PathBuf::from("./prior_pool.json"),
            seed: None,
        }
    }
}

impl PoolConfig {
    /// Width of one encoding row: splits times choices per split.
    pub fn row_width(&self) -> usize {
        self.split_blocks * self.kernel_choices
    }

    /// Spacing between consecutive ladder targets.
    pub fn ladder_interval(&self) -> u64 {
        (self.high_flops - self.low_flops) / (self.pool_size as u64 + 1)
    }

    /// Target cost values the pool builder will search for, in order.
    pub fn ladder_targets(&self) -> Vec<u64> {
        let interval = self.ladder_interval();
        let mut targets = Vec::new();
        if interval == 0 {
            return targets;
        }
        let mut target = self.low_flops + interval;
        while target < self.high_flops - 1 {
            targets.push(target);
            target += interval;
        }
        targets
    }

    /// Check the configuration for internal consistency.
    pub fn validate(&self) -> Result<()> {
        if self.low_flops >= self.high_flops {
            return Err(PoolError::InvalidConfig(format!(
                "low_flops {} must be below high_flops {}",
                self.low_flops, self.high_flops
            )));
        }
        if self.pool_size == 0 {
            return Err(PoolError::InvalidConfig("pool_size must be positive".into()));
        }
        if self.layers == 0 {
            return Err(PoolError::InvalidConfig("layers must be positive".into()));
        }
        if self.kernel_choices < 2 {
            return Err(PoolError::InvalidConfig(
                "kernel_choices must include at least one active choice and skip".into(),
            ));
        }
        if self.expansion < 2 {
            return Err(PoolError::InvalidConfig(
                "expansion upper bound must be at least 2".into(),
            ));
        }
        if self.expansion > self.split_blocks {
            return Err(PoolError::InvalidConfig(format!(
                "expansion {} exceeds split_blocks {}",
                self.expansion, self.split_blocks
            )));
        }
        if self.max_attempts == 0 {
            return Err(PoolError::InvalidConfig(
                "max_attempts must be positive".into(),
            ));
        }
        if self.ladder_interval() == 0 {
            return Err(PoolError::InvalidConfig(format!(
                "cost range {}..{} too narrow for pool_size {}",
                self.low_flops, self.high_flops, self.pool_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn test_single_step_ladder() {
        let config = PoolConfig {
            low_flops: 80,
            high_flops: 120,
            pool_size: 1,
            ..Default::default()
        };

        assert_eq!(config.ladder_interval(), 20);
        assert_eq!(config.ladder_targets(), vec![100]);
    }

    #[test]
    fn test_multi_step_ladder() {
        let config = PoolConfig {
            low_flops: 100,
            high_flops: 400,
            pool_size: 2,
            ..Default::default()
        };

        assert_eq!(config.ladder_interval(), 100);
        assert_eq!(config.ladder_targets(), vec![200, 300]);
    }

    #[test]
    fn test_ladder_stops_before_upper_bound() {
        // 40 + 3*20 = 100 > 99, so 100 is excluded.
        let config = PoolConfig {
            low_flops: 40,
            high_flops: 101,
            pool_size: 2,
            ..Default::default()
        };

        assert_eq!(config.ladder_interval(), 20);
        assert_eq!(config.ladder_targets(), vec![60, 80]);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config = PoolConfig {
            low_flops: 120,
            high_flops: 80,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PoolError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = PoolConfig {
            low_flops: 80,
            high_flops: 82,
            pool_size: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_expansion_beyond_splits() {
        let config = PoolConfig {
            split_blocks: 4,
            expansion: 6,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_attempt_budget() {
        let config = PoolConfig {
            max_attempts: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_row_width() {
        let config = PoolConfig::default();
        assert_eq!(config.row_width(), 24);
    }
}
