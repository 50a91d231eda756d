//! Collaborator traits for the architecture space and cost model.
//!
//! The pool builder never interprets an encoding itself; it round-trips
//! through these seams. Implementations typically wrap a lookup table or a
//! device-resident cost model, and cost evaluation is a separate capability
//! so the sampler stays free of execution-device concerns.

use crate::encoding::{ArchParam, LayerConfig};
use crate::Result;

/// How structurally inconsistent rows are resolved after sampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// Deterministic validity correction. The pool builder always uses this.
    Validate,
    /// Probability-weighted relaxation over block choices.
    Relax {
        /// Softmax temperature; 5.0 is the conventional value.
        temperature: f64,
    },
}

/// Decode, encode, and correct architecture encodings.
pub trait ArchSpace {
    /// Decode an encoding into its retained layer configurations.
    ///
    /// Fails if the encoding shape does not match the space's expected
    /// layer count and row width.
    fn decode(&self, param: &ArchParam) -> Result<Vec<LayerConfig>>;

    /// Encode layer configurations back into the canonical encoding.
    ///
    /// The result may differ from the encoding that produced the
    /// configurations, e.g. by collapsing near-skip choices.
    fn encode(&self, layers: &[LayerConfig]) -> Result<ArchParam>;

    /// Resolve structurally inconsistent rows in a full encoding.
    fn resolve(&self, param: ArchParam, mode: Resolution) -> Result<ArchParam>;
}

/// Compute the scalar cost of a full encoding.
///
/// Implementations may move the encoding to an accelerator-resident
/// representation before evaluation; the pool assumes exclusive, uncontended
/// access to that device for the duration of each call.
pub trait CostEvaluator {
    /// Estimated FLOPS for the encoding.
    fn evaluate(&self, param: &ArchParam) -> Result<f64>;
}
