use proptest::prelude::*;

use sparsebench::config::ConvGeometry;
use sparsebench::conv::{conv2d, constant_kernel, ConvAlgorithm};
use sparsebench::sparse::{extract_nonzeros, sparse_conv2d, RulebookPolicy, SparseConvPlan};
use sparsebench::tensor::FeatureMap;

/// A sparse map with small integer values plus a geometry that fits it.
fn sparse_case() -> impl Strategy<Value = (FeatureMap, ConvGeometry)> {
    (3usize..12, 3usize..12, 1usize..4, 0usize..2).prop_flat_map(|(h, w, oc, pad)| {
        let cells = proptest::collection::vec(prop_oneof![4 => Just(0i8), 1 => -3i8..=3], h * w);
        cells.prop_map(move |cells| {
            let values = cells.into_iter().map(f32::from).collect();
            let map = FeatureMap::from_rows(h, w, values).unwrap();
            let g = ConvGeometry::single_channel(h, w, oc, 3).with_padding(pad);
            (map, g)
        })
    })
}

proptest! {
    #[test]
    fn explicit_sparse_matches_dense((map, g) in sparse_case()) {
        let kernel = constant_kernel(&g, 0.5);
        let dense = conv2d(ConvAlgorithm::Naive, map.as_tensor(), &kernel, &g).unwrap();
        let sparse = sparse_conv2d(&map, &kernel, &g, RulebookPolicy::Explicit).unwrap();
        // integers times 0.5 sum exactly in f32
        prop_assert_eq!(sparse, dense);
    }

    #[test]
    fn nonzeros_are_row_major_and_complete((map, _g) in sparse_case()) {
        let nonzeros = extract_nonzeros(&map);
        prop_assert_eq!(nonzeros.len(), map.as_tensor().count_nonzero());
        let coords: Vec<_> = nonzeros.iter().map(|c| (c.row, c.col)).collect();
        let mut sorted = coords.clone();
        sorted.sort_unstable();
        prop_assert_eq!(coords.clone(), sorted);
        for (row, col) in coords {
            prop_assert!(map.at(row, col) != 0.0);
        }
    }

    #[test]
    fn output_coords_stay_in_bounds((map, g) in sparse_case()) {
        let plan = SparseConvPlan::build(&map, &g, RulebookPolicy::Explicit).unwrap();
        let [_, oc, oh, ow] = g.output_shape();
        prop_assert!(plan.output_coords().len() <= plan.nonzeros().len() * g.taps() * oc);
        prop_assert_eq!(plan.rulebook().len(), plan.output_coords().len());
        for coord in plan.output_coords().iter() {
            prop_assert_eq!(coord.batch, 0);
            prop_assert!(coord.out_channel < oc);
            prop_assert!(coord.row < oh);
            prop_assert!(coord.col < ow);
        }
    }

    #[test]
    fn positional_policy_accepts_exactly_full_blocks((map, g) in sparse_case()) {
        let outputs = SparseConvPlan::build(&map, &g, RulebookPolicy::Explicit).unwrap();
        let full = outputs.output_coords().len() == outputs.nonzeros().len() * g.taps() * g.out_channels;
        let positional = SparseConvPlan::build(&map, &g, RulebookPolicy::Positional);
        prop_assert_eq!(positional.is_ok(), full);
    }
}
