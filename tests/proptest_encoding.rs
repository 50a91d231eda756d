//! Property-based tests for sampled architecture encodings.
//!
//! These verify the structural invariants across random topologies:
//! - every choice block of a sampled encoding is exactly one-hot
//! - each layer's active prefix length stays within [2, expansion]
//! - canonicalization through decode -> encode is idempotent

use proptest::prelude::*;

use archprior::testing::{MockCostModel, MockSpace};
use archprior::{is_one_hot, ArchSampler, ArchSpace, PoolConfig};

/// Strategy for (layers, split_blocks, kernel_choices, expansion) with
/// expansion bounded by the split count.
fn topology_strategy() -> impl Strategy<Value = (usize, usize, usize, usize)> {
    (1usize..=4, 2usize..=6, 2usize..=5)
        .prop_flat_map(|(layers, splits, kernels)| {
            (Just(layers), Just(splits), Just(kernels), 2usize..=splits)
        })
}

fn config_for(topology: (usize, usize, usize, usize), seed: u64) -> PoolConfig {
    let (layers, split_blocks, kernel_choices, expansion) = topology;
    PoolConfig {
        layers,
        split_blocks,
        kernel_choices,
        expansion,
        seed: Some(seed),
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Property: every block of a sampled encoding is exactly one-hot.
    #[test]
    fn prop_sampled_blocks_one_hot(
        topology in topology_strategy(),
        seed in any::<u64>(),
    ) {
        let (layers, splits, kernels, _) = topology;
        let space = MockSpace::new(layers, splits, kernels);
        let model = MockCostModel::new(splits, kernels, 1.0);
        let mut sampler = ArchSampler::new(&config_for(topology, seed));

        let (_, param) = sampler.sample(&space, &model).unwrap();
        for layer in 0..param.layers() {
            for block in 0..splits {
                prop_assert!(
                    is_one_hot(param.block(layer, block, kernels)),
                    "block ({}, {}) not one-hot: {:?}",
                    layer, block, param.block(layer, block, kernels)
                );
            }
        }
    }

    /// Property: the active prefix of each layer has between 2 and
    /// `expansion` blocks, and everything after it is the skip choice.
    #[test]
    fn prop_active_prefix_bounded(
        topology in topology_strategy(),
        seed in any::<u64>(),
    ) {
        let (layers, splits, kernels, expansion) = topology;
        let space = MockSpace::new(layers, splits, kernels);
        let model = MockCostModel::new(splits, kernels, 1.0);
        let mut sampler = ArchSampler::new(&config_for(topology, seed));

        let (_, param) = sampler.sample(&space, &model).unwrap();
        for layer in 0..param.layers() {
            let active = (0..splits)
                .take_while(|&b| param.block(layer, b, kernels)[kernels - 1] != 1.0)
                .count();
            prop_assert!(
                (2..=expansion).contains(&active),
                "layer {} active prefix {} outside [2, {}]",
                layer, active, expansion
            );
            for block in active..splits {
                prop_assert_eq!(param.block(layer, block, kernels)[kernels - 1], 1.0);
            }
        }
    }

    /// Property: decode(encode(decode(x))) equals decode(x).
    #[test]
    fn prop_canonicalization_idempotent(
        topology in topology_strategy(),
        seed in any::<u64>(),
    ) {
        let (layers, splits, kernels, _) = topology;
        let space = MockSpace::new(layers, splits, kernels);
        let model = MockCostModel::new(splits, kernels, 1.0);
        let mut sampler = ArchSampler::new(&config_for(topology, seed));

        let (_, param) = sampler.sample(&space, &model).unwrap();
        let first = space.decode(&param).unwrap();
        let canonical = space.encode(&first).unwrap();
        let second = space.decode(&canonical).unwrap();
        prop_assert_eq!(first, second);
    }
}
