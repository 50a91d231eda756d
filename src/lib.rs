//! Prior pool for FLOPS-constrained architecture search
//!
//! This crate builds and serves a cached mapping from a target compute
//! budget (FLOPS) to an architecture encoding that realizes approximately
//! that cost:
//! - Random sampling of one-hot architecture encodings
//! - Rejection refinement against an injected cost model until each ladder
//!   target is hit within tolerance
//! - Versioned JSON persistence with shape validation on load
//! - Nearest-cost lookup for seeding downstream search

mod config;
mod encoding;
mod error;
mod pool;
mod sampler;
mod space;

pub mod testing;

pub use config::PoolConfig;
pub use encoding::{is_one_hot, ArchParam, LayerConfig};
pub use error::{PoolError, Result};
pub use pool::PriorPool;
pub use sampler::ArchSampler;
pub use space::{ArchSpace, CostEvaluator, Resolution};
