//! Architecture encodings and their decoded layer form.
//!
//! An [`ArchParam`] is a dense `(layers, width)` matrix where each row is a
//! sequence of `kernel_choices`-wide one-hot blocks, one block per structural
//! split. The last choice in a block is the skip choice; blocks past a
//! layer's expansion depth carry it.

use crate::{PoolError, Result};
use serde::{Deserialize, Serialize};

/// One-hot encoding of a full architecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "Vec<Vec<f32>>", try_from = "Vec<Vec<f32>>")]
pub struct ArchParam {
    layers: usize,
    width: usize,
    data: Vec<f32>,
}

impl ArchParam {
    /// Create a zero-filled encoding of the given shape.
    pub fn zeros(layers: usize, width: usize) -> Self {
        Self {
            layers,
            width,
            data: vec![0.0; layers * width],
        }
    }

    /// Number of layer rows.
    pub fn layers(&self) -> usize {
        self.layers
    }

    /// Width of one row.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Borrow one layer row.
    pub fn row(&self, layer: usize) -> &[f32] {
        &self.data[layer * self.width..(layer + 1) * self.width]
    }

    /// Mutably borrow one layer row.
    pub fn row_mut(&mut self, layer: usize) -> &mut [f32] {
        &mut self.data[layer * self.width..(layer + 1) * self.width]
    }

    /// Borrow one choice block within a layer row.
    ///
    /// `block_width` is the number of choices per split; the row width must
    /// be a multiple of it.
    pub fn block(&self, layer: usize, block: usize, block_width: usize) -> &[f32] {
        let start = layer * self.width + block * block_width;
        &self.data[start..start + block_width]
    }

    /// Overwrite one choice block within a layer row.
    pub fn set_block(&mut self, layer: usize, block: usize, values: &[f32]) {
        let start = layer * self.width + block * values.len();
        self.data[start..start + values.len()].copy_from_slice(values);
    }

    /// Convert to nested rows for serialization.
    pub fn to_rows(&self) -> Vec<Vec<f32>> {
        (0..self.layers).map(|i| self.row(i).to_vec()).collect()
    }

    /// Build from nested rows, checking that the matrix is rectangular.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let layers = rows.len();
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        if layers == 0 || width == 0 {
            return Err(PoolError::corrupted("empty architecture encoding"));
        }

        let mut data = Vec::with_capacity(layers * width);
        for row in &rows {
            if row.len() != width {
                return Err(PoolError::corrupted(format!(
                    "ragged encoding row: expected width {}, found {}",
                    width,
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self { layers, width, data })
    }
}

impl From<ArchParam> for Vec<Vec<f32>> {
    fn from(param: ArchParam) -> Self {
        param.to_rows()
    }
}

impl TryFrom<Vec<Vec<f32>>> for ArchParam {
    type Error = PoolError;

    fn try_from(rows: Vec<Vec<f32>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

/// Returns true when the slice has exactly one entry equal to 1 and the rest 0.
pub fn is_one_hot(block: &[f32]) -> bool {
    let mut ones = 0usize;
    for &v in block {
        if v == 1.0 {
            ones += 1;
        } else if v != 0.0 {
            return false;
        }
    }
    ones == 1
}

/// Canonical decoded form of one retained layer.
///
/// Produced by the architecture space's `decode`; the pool never constructs
/// these directly, only round-trips through them to canonicalize an encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Expansion multiplier (number of active splits).
    pub expansion: usize,
    /// Output channel count.
    pub out_channels: usize,
    /// Selected kernel choice per active split.
    pub kernels: Vec<usize>,
    /// Spatial stride.
    pub stride: usize,
    /// Structural split count for the layer.
    pub split_blocks: usize,
    /// Squeeze-excite enabled.
    pub se: bool,
}
