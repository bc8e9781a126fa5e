use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sparsebench::config::ConvGeometry;
use sparsebench::conv::{conv2d, constant_kernel, ConvAlgorithm};
use sparsebench::loader::synthetic_feature_map;
use sparsebench::matmul::{Matrix, MatmulAlgorithm, MatmulOperands};
use sparsebench::sparse::{sparse_conv2d, RulebookPolicy, SparseConvPlan};

#[track_caller]
fn unwrap_ok<T, E: core::fmt::Debug>(context: &str, result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => panic!("{context}: {error:?}"),
    }
}

fn bench_conv_strategies(c: &mut Criterion) {
    let geometry = ConvGeometry::single_channel(64, 512, 16, 3);
    let kernel = constant_kernel(&geometry, 0.5);

    for density in [0.005, 0.05] {
        let map = synthetic_feature_map(geometry.height, geometry.width, density, 0, 7);
        let mut group = c.benchmark_group(format!("conv_64x512_oc16_density_{density}"));
        group.sample_size(20);

        for alg in [ConvAlgorithm::Im2col, ConvAlgorithm::Winograd] {
            group.bench_function(BenchmarkId::new("dense", alg), |b| {
                b.iter(|| black_box(unwrap_ok("dense conv failed", conv2d(alg, map.as_tensor(), &kernel, &geometry))))
            });
        }

        group.bench_function("sparse_rebuild", |b| {
            b.iter(|| {
                black_box(unwrap_ok(
                    "sparse conv failed",
                    sparse_conv2d(&map, &kernel, &geometry, RulebookPolicy::Explicit),
                ))
            })
        });

        let plan = unwrap_ok("plan build failed", SparseConvPlan::build(&map, &geometry, RulebookPolicy::Explicit));
        group.bench_function("sparse_reuse_plan", |b| {
            b.iter(|| black_box(unwrap_ok("plan execute failed", plan.execute(&map, &kernel))))
        });

        group.finish();
    }
}

fn bench_matmul_variants(c: &mut Criterion) {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let mut rng = StdRng::seed_from_u64(3);
    let n = 128;
    let operands = MatmulOperands::new(Matrix::random(n, n, 10, &mut rng), Matrix::random(n, n, 10, &mut rng));

    let mut group = c.benchmark_group("matmul_128");
    for alg in [
        MatmulAlgorithm::Ijk,
        MatmulAlgorithm::Ikj,
        MatmulAlgorithm::TransposedB,
        MatmulAlgorithm::Unrolled,
        MatmulAlgorithm::Tiled(32),
        MatmulAlgorithm::Strassen,
    ] {
        group.bench_function(BenchmarkId::from_parameter(alg), |b| {
            b.iter(|| black_box(operands.multiply(alg)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_conv_strategies, bench_matmul_variants);
criterion_main!(benches);
