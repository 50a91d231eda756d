//! Random architecture sampling.

use crate::config::PoolConfig;
use crate::encoding::ArchParam;
use crate::space::{ArchSpace, CostEvaluator, Resolution};
use crate::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Draws random architecture encodings over the configured topology.
///
/// Each draw picks a per-layer expansion depth uniformly from
/// `[2, expansion]`, activates that many leading choice blocks with a
/// uniformly chosen non-skip choice, and leaves the remaining blocks on the
/// skip choice. The result is validity-corrected by the architecture space
/// and priced by the cost evaluator.
#[derive(Debug)]
pub struct ArchSampler {
    layers: usize,
    split_blocks: usize,
    kernel_choices: usize,
    expansion: usize,
    rng: StdRng,
}

impl ArchSampler {
    /// Create a sampler for the configured topology.
    pub fn new(config: &PoolConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            layers: config.layers,
            split_blocks: config.split_blocks,
            kernel_choices: config.kernel_choices,
            expansion: config.expansion,
            rng,
        }
    }

    /// Draw one encoding and return it with its evaluated cost.
    pub fn sample<S, C>(&mut self, space: &S, evaluator: &C) -> Result<(f64, ArchParam)>
    where
        S: ArchSpace,
        C: CostEvaluator,
    {
        let width = self.split_blocks * self.kernel_choices;
        let mut param = ArchParam::zeros(self.layers, width);

        let mut skip = vec![0.0; self.kernel_choices];
        skip[self.kernel_choices - 1] = 1.0;

        for layer in 0..self.layers {
            let depth = self.rng.gen_range(2..=self.expansion);

            for block in 0..self.split_blocks {
                param.set_block(layer, block, &skip);
            }
            for block in 0..depth {
                let choice = self.rng.gen_range(0..self.kernel_choices - 1);
                let mut one_hot = vec![0.0; self.kernel_choices];
                one_hot[choice] = 1.0;
                param.set_block(layer, block, &one_hot);
            }
        }

        let param = space.resolve(param, Resolution::Validate)?;
        let cost = evaluator.evaluate(&param)?;

        Ok((cost, param))
    }
}
