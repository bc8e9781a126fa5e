use rand::rngs::StdRng;
use rand::SeedableRng;

use sparsebench::config::ConvGeometry;
use sparsebench::conv::{conv2d, constant_kernel, ConvAlgorithm};
use sparsebench::loader::synthetic_feature_map;
use sparsebench::matmul::{Matrix, MatmulAlgorithm, MatmulOperands};
use sparsebench::metrics::{run_conv, run_matmul, time_iterations, ConvStrategy, Timed};
use sparsebench::sparse::RulebookPolicy;
use sparsebench::Error;

fn setup() -> (ConvGeometry, sparsebench::tensor::FeatureMap, sparsebench::tensor::Tensor) {
    let g = ConvGeometry::single_channel(12, 20, 4, 3);
    let map = synthetic_feature_map(g.height, g.width, 0.2, 0, 11);
    let kernel = constant_kernel(&g, 0.5);
    (g, map, kernel)
}

#[test]
fn every_strategy_reproduces_the_reference() {
    let (g, map, kernel) = setup();
    let reference = conv2d(ConvAlgorithm::Naive, map.as_tensor(), &kernel, &g).unwrap();

    let mut strategies: Vec<ConvStrategy> = ConvAlgorithm::ALL.into_iter().map(ConvStrategy::Dense).collect();
    strategies.push(ConvStrategy::Sparse(RulebookPolicy::Explicit));
    strategies.push(ConvStrategy::SparseReusedPlan(RulebookPolicy::Explicit));

    for strategy in strategies {
        let run = run_conv(strategy, &map, &kernel, &g, 3, Some(&reference)).unwrap();
        assert_eq!(run.timings.len(), 3);
        assert_eq!(run.output_shape, [1, 4, 10, 18]);
        let diff = run.max_abs_diff.unwrap();
        assert!(diff < 1e-4, "{strategy}: {diff}");
    }
}

#[test]
fn no_reference_means_no_diff() {
    let (g, map, kernel) = setup();
    let run = run_conv(ConvStrategy::Sparse(RulebookPolicy::Explicit), &map, &kernel, &g, 2, None).unwrap();
    assert!(run.max_abs_diff.is_none());
    assert!(run.average() <= run.total());
}

#[test]
fn zero_iterations_time_nothing() {
    let (g, map, kernel) = setup();
    let run = run_conv(ConvStrategy::Dense(ConvAlgorithm::Im2col), &map, &kernel, &g, 0, None).unwrap();
    assert!(run.timings.is_empty());
    assert!(run.max_abs_diff.is_none());
}

#[test]
fn sparse_errors_propagate() {
    let g = ConvGeometry::single_channel(12, 20, 4, 3).with_stride(2);
    let map = synthetic_feature_map(12, 20, 0.2, 0, 11);
    let kernel = constant_kernel(&g, 0.5);
    let err = run_conv(ConvStrategy::SparseReusedPlan(RulebookPolicy::Explicit), &map, &kernel, &g, 1, None)
        .err()
        .unwrap();
    assert!(matches!(err, Error::UnsupportedSparseConfig { param: "stride", .. }));
}

#[test]
fn time_iterations_stops_at_first_error() {
    let mut calls = 0;
    let result = time_iterations(5, || {
        calls += 1;
        if calls == 2 {
            Err(Error::InvalidGeometry { reason: "boom".into() })
        } else {
            Ok(calls)
        }
    });
    assert!(result.is_err());
    assert_eq!(calls, 2);
}

#[test]
fn matmul_runs_verify_against_reference() {
    let mut rng = StdRng::seed_from_u64(8);
    let ops = MatmulOperands::new(Matrix::random(24, 24, 10, &mut rng), Matrix::random(24, 24, 10, &mut rng));
    let reference = ops.multiply(MatmulAlgorithm::Ikj);

    let run = run_matmul(MatmulAlgorithm::Tiled(8), &ops, 2, &reference);
    assert!(run.verified);
    assert_eq!(run.timings.len(), 2);

    let wrong = Matrix::zeros(24, 24);
    assert!(!run_matmul(MatmulAlgorithm::Ijk, &ops, 1, &wrong).verified);
}
