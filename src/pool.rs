//! Prior pool construction, persistence, and nearest-cost lookup.
//!
//! The pool maps target FLOPS values to architecture encodings discovered by
//! rejection sampling. Construction walks an evenly spaced ladder of targets
//! between the configured cost bounds and, for each, resamples until an
//! encoding lands inside the tolerance window with enough retained layers.

use crate::config::PoolConfig;
use crate::encoding::ArchParam;
use crate::sampler::ArchSampler;
use crate::space::{ArchSpace, CostEvaluator};
use crate::{PoolError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info};

/// Persisted pool envelope.
///
/// The shape fields let a load fail fast when the file was built for a
/// different topology instead of deferring the mismatch to first use.
#[derive(Debug, Serialize, Deserialize)]
struct PoolFile {
    version: u32,
    layers: usize,
    width: usize,
    entries: IndexMap<u64, ArchParam>,
}

/// Cost-indexed pool of architecture priors.
///
/// Entries keep ladder (insertion) order. Construction runs to completion
/// before any query is issued; no concurrent use is supported.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorPool {
    entries: IndexMap<u64, ArchParam>,
    layers: usize,
    width: usize,
}

impl PriorPool {
    /// Current pool file format version.
    pub const VERSION: u32 = 1;

    /// Load the pool from the configured path if it exists, otherwise build
    /// it and persist the result.
    pub fn load_or_generate<S, C>(space: &S, evaluator: &C, config: &PoolConfig) -> Result<Self>
    where
        S: ArchSpace,
        C: CostEvaluator,
    {
        config.validate()?;

        if config.pool_path.exists() {
            info!("Loading prior pool from {}", config.pool_path.display());
            Self::load(&config.pool_path, config)
        } else {
            info!("Generating prior pool");
            Self::generate(space, evaluator, config)
        }
    }

    /// Build the pool over the configured target ladder and persist it.
    pub fn generate<S, C>(space: &S, evaluator: &C, config: &PoolConfig) -> Result<Self>
    where
        S: ArchSpace,
        C: CostEvaluator,
    {
        config.validate()?;

        let mut sampler = ArchSampler::new(config);
        let mut entries = IndexMap::new();

        for target in config.ladder_targets() {
            let (cost, param) = search_target(&mut sampler, space, evaluator, target, config)?;
            info!("Target flops {}: prior generated at {}", target, cost);
            entries.insert(target, param);
        }

        let pool = Self {
            entries,
            layers: config.layers,
            width: config.row_width(),
        };
        pool.save(&config.pool_path)?;

        Ok(pool)
    }

    /// Wrap an existing cost-to-encoding map as a pool.
    pub fn from_entries(entries: IndexMap<u64, ArchParam>, layers: usize, width: usize) -> Self {
        Self {
            entries,
            layers,
            width,
        }
    }

    /// Load a persisted pool, validating schema version and encoding shape
    /// against the live configuration.
    pub fn load(path: &Path, config: &PoolConfig) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let pool_file: PoolFile = serde_json::from_reader(reader)
            .map_err(|e| PoolError::corrupted(format!("failed to parse pool file: {}", e)))?;

        if pool_file.version != Self::VERSION {
            return Err(PoolError::SchemaMismatch {
                expected: Self::VERSION,
                found: pool_file.version,
            });
        }

        let expected_layers = config.layers;
        let expected_width = config.row_width();
        if pool_file.layers != expected_layers || pool_file.width != expected_width {
            return Err(PoolError::ShapeMismatch {
                expected_layers,
                expected_width,
                found_layers: pool_file.layers,
                found_width: pool_file.width,
            });
        }
        for param in pool_file.entries.values() {
            if param.layers() != pool_file.layers || param.width() != pool_file.width {
                return Err(PoolError::ShapeMismatch {
                    expected_layers: pool_file.layers,
                    expected_width: pool_file.width,
                    found_layers: param.layers(),
                    found_width: param.width(),
                });
            }
        }

        info!(
            "Loaded prior pool from {}: {} entries",
            path.display(),
            pool_file.entries.len()
        );

        Ok(Self {
            entries: pool_file.entries,
            layers: pool_file.layers,
            width: pool_file.width,
        })
    }

    /// Save the pool atomically, overwriting any existing file.
    ///
    /// Uses write-to-temp + rename so a crash mid-write cannot leave a
    /// truncated pool behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let pool_file = PoolFile {
            version: Self::VERSION,
            layers: self.layers,
            width: self.width,
            entries: self.entries.clone(),
        };

        let temp_path = path.with_extension("tmp");
        let file = File::create(&temp_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &pool_file)
            .map_err(|e| PoolError::corrupted(format!("failed to serialize pool: {}", e)))?;
        fs::rename(&temp_path, path)?;

        debug!("Saved prior pool to {}", path.display());

        Ok(())
    }

    /// Return the encoding whose target cost is nearest to `flops`.
    ///
    /// Ties resolve to the earlier key in insertion order; callers must not
    /// rely on the tie-break direction.
    pub fn get_prior(&self, flops: u64) -> Result<&ArchParam> {
        let (_, param) = self
            .entries
            .iter()
            .min_by_key(|(key, _)| key.abs_diff(flops))
            .ok_or(PoolError::EmptyPool)?;
        Ok(param)
    }

    /// Target cost keys in insertion order.
    pub fn get_prior_keys(&self) -> Vec<u64> {
        self.entries.keys().copied().collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the pool has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u64, &ArchParam)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

/// Rejection-sample one encoding for `target`.
///
/// Every draw is canonicalized through decode -> encode before the depth
/// check so skip-adjacent artifacts cannot survive into the pool. The cost
/// window applies to the sampler-reported cost. Gives up with
/// [`PoolError::SearchExhausted`] once the attempt budget is spent; an
/// infeasible target/tolerance pair is a configuration error, not a
/// transient fault.
fn search_target<S, C>(
    sampler: &mut ArchSampler,
    space: &S,
    evaluator: &C,
    target: u64,
    config: &PoolConfig,
) -> Result<(f64, ArchParam)>
where
    S: ArchSpace,
    C: CostEvaluator,
{
    let tolerance = config.tolerance as f64;

    for attempt in 1..=config.max_attempts {
        let (cost, param) = sampler.sample(space, evaluator)?;
        let layer_configs = space.decode(&param)?;
        let param = space.encode(&layer_configs)?;

        if (cost - target as f64).abs() <= tolerance && layer_configs.len() >= config.min_depth {
            debug!("Target flops {}: accepted after {} attempts", target, attempt);
            return Ok((cost, param));
        }
    }

    Err(PoolError::SearchExhausted {
        target,
        attempts: config.max_attempts,
    })
}
