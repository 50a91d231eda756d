//! Deterministic reference collaborators for tests.
//!
//! [`MockSpace`] implements the decode/encode/resolve contract over a fixed
//! topology and [`MockCostModel`] prices an encoding from a per-choice unit
//! cost, so pool construction can be exercised without a real lookup table
//! or device.

use crate::encoding::{ArchParam, LayerConfig};
use crate::space::{ArchSpace, CostEvaluator, Resolution};
use crate::{PoolError, Result};

/// Reference architecture space over a fixed `(layers, split_blocks,
/// kernel_choices)` topology.
///
/// A block is active when its one-hot choice is not the trailing skip
/// choice; a layer is retained when it has at least one active block.
/// `encode` packs a layer's active choices into its leading blocks, which is
/// the canonicalization the rejection loop relies on.
#[derive(Debug, Clone)]
pub struct MockSpace {
    layers: usize,
    split_blocks: usize,
    kernel_choices: usize,
}

impl MockSpace {
    /// Create a space for the given topology.
    pub fn new(layers: usize, split_blocks: usize, kernel_choices: usize) -> Self {
        Self {
            layers,
            split_blocks,
            kernel_choices,
        }
    }

    fn row_width(&self) -> usize {
        self.split_blocks * self.kernel_choices
    }

    /// Index of the first 1.0 in a block, if any.
    fn block_choice(&self, block: &[f32]) -> Option<usize> {
        block.iter().position(|&v| v == 1.0)
    }

    fn check_shape(&self, param: &ArchParam) -> Result<()> {
        if param.layers() != self.layers || param.width() != self.row_width() {
            return Err(PoolError::space(format!(
                "encoding shape {}x{} does not match space {}x{}",
                param.layers(),
                param.width(),
                self.layers,
                self.row_width()
            )));
        }
        Ok(())
    }

    fn skip_pattern(&self) -> Vec<f32> {
        let mut block = vec![0.0; self.kernel_choices];
        block[self.kernel_choices - 1] = 1.0;
        block
    }
}

impl ArchSpace for MockSpace {
    fn decode(&self, param: &ArchParam) -> Result<Vec<LayerConfig>> {
        self.check_shape(param)?;

        let skip = self.kernel_choices - 1;
        let mut configs = Vec::new();
        for layer in 0..param.layers() {
            let mut kernels = Vec::new();
            for block in 0..self.split_blocks {
                match self.block_choice(param.block(layer, block, self.kernel_choices)) {
                    Some(choice) if choice != skip => kernels.push(choice),
                    _ => {}
                }
            }
            if kernels.is_empty() {
                continue; // layer collapsed entirely to skip
            }
            configs.push(LayerConfig {
                expansion: kernels.len(),
                out_channels: 16 * (configs.len() + 1),
                kernels,
                stride: 1,
                split_blocks: self.split_blocks,
                se: false,
            });
        }
        Ok(configs)
    }

    fn encode(&self, layers: &[LayerConfig]) -> Result<ArchParam> {
        let mut param = ArchParam::zeros(layers.len(), self.row_width());
        for (row, config) in layers.iter().enumerate() {
            for block in 0..self.split_blocks {
                match config.kernels.get(block) {
                    Some(&choice) => {
                        let mut one_hot = vec![0.0; self.kernel_choices];
                        one_hot[choice] = 1.0;
                        param.set_block(row, block, &one_hot);
                    }
                    None => param.set_block(row, block, &self.skip_pattern()),
                }
            }
        }
        Ok(param)
    }

    fn resolve(&self, mut param: ArchParam, mode: Resolution) -> Result<ArchParam> {
        self.check_shape(&param)?;

        for layer in 0..param.layers() {
            for block in 0..self.split_blocks {
                let values = param.block(layer, block, self.kernel_choices).to_vec();
                let corrected = match mode {
                    // All-zero blocks become skip; anything else collapses to
                    // a one-hot at the first maximum.
                    Resolution::Validate => {
                        if values.iter().all(|&v| v == 0.0) {
                            self.skip_pattern()
                        } else {
                            let argmax = values
                                .iter()
                                .enumerate()
                                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                                .map(|(i, _)| i)
                                .unwrap_or(self.kernel_choices - 1);
                            let mut one_hot = vec![0.0; self.kernel_choices];
                            one_hot[argmax] = 1.0;
                            one_hot
                        }
                    }
                    Resolution::Relax { temperature } => {
                        let weights: Vec<f64> = values
                            .iter()
                            .map(|&v| (f64::from(v) / temperature).exp())
                            .collect();
                        let total: f64 = weights.iter().sum();
                        weights.iter().map(|w| (w / total) as f32).collect()
                    }
                };
                param.set_block(layer, block, &corrected);
            }
        }
        Ok(param)
    }
}

/// Prices an encoding at `unit * (choice index + 1)` per active block.
#[derive(Debug, Clone)]
pub struct MockCostModel {
    split_blocks: usize,
    kernel_choices: usize,
    unit: f64,
}

impl MockCostModel {
    /// Create a cost model with the given per-choice unit cost.
    pub fn new(split_blocks: usize, kernel_choices: usize, unit: f64) -> Self {
        Self {
            split_blocks,
            kernel_choices,
            unit,
        }
    }
}

impl CostEvaluator for MockCostModel {
    fn evaluate(&self, param: &ArchParam) -> Result<f64> {
        let skip = self.kernel_choices - 1;
        let mut cost = 0.0;
        for layer in 0..param.layers() {
            for block in 0..self.split_blocks {
                let values = param.block(layer, block, self.kernel_choices);
                let choice = values
                    .iter()
                    .enumerate()
                    .max_by(|(_, a), (_, b)| a.total_cmp(b))
                    .map(|(i, _)| i)
                    .unwrap_or(skip);
                if choice != skip && values[choice] > 0.0 {
                    cost += self.unit * (choice as f64 + 1.0);
                }
            }
        }
        Ok(cost)
    }
}
