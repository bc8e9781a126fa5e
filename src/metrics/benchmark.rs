use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::config::ConvGeometry;
use crate::conv::{conv2d, ConvAlgorithm};
use crate::error::Result;
use crate::matmul::{Matrix, MatmulAlgorithm, MatmulOperands};
use crate::sparse::{sparse_conv2d, RulebookPolicy, SparseConvPlan};
use crate::tensor::{FeatureMap, Tensor};

/// A convolution strategy the harness can time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvStrategy {
    /// One of the dense baselines.
    Dense(ConvAlgorithm),
    /// Sparse engine, rebuilding the rulebook on every iteration.
    Sparse(RulebookPolicy),
    /// Sparse engine with the plan built once outside the timed loop.
    /// Times accumulation only.
    SparseReusedPlan(RulebookPolicy),
}

impl fmt::Display for ConvStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy_name = |p: &RulebookPolicy| match p {
            RulebookPolicy::Explicit => "",
            RulebookPolicy::Positional => "-positional",
        };
        match self {
            ConvStrategy::Dense(alg) => write!(f, "{alg}"),
            ConvStrategy::Sparse(p) => write!(f, "sparse{}", policy_name(p)),
            ConvStrategy::SparseReusedPlan(p) => write!(f, "sparse{}-reuse", policy_name(p)),
        }
    }
}

/// Timings and verification outcome of one strategy.
pub struct ConvRun {
    pub strategy: ConvStrategy,
    pub timings: Vec<Duration>,
    pub output_shape: [usize; 4],
    /// Largest deviation from the reference output, when one was supplied.
    pub max_abs_diff: Option<f32>,
}

/// Timings and verification outcome of one matmul variant.
pub struct MatmulRun {
    pub algorithm: MatmulAlgorithm,
    pub timings: Vec<Duration>,
    /// Whether every iteration reproduced the reference product exactly.
    pub verified: bool,
}

/// Summary statistics over per-iteration timings.
pub trait Timed {
    fn timings(&self) -> &[Duration];

    fn total(&self) -> Duration {
        self.timings().iter().sum()
    }

    fn average(&self) -> Duration {
        let n = self.timings().len();
        if n == 0 {
            return Duration::ZERO;
        }
        self.total().div_f64(n as f64)
    }

    fn fastest(&self) -> Duration {
        self.timings().iter().copied().min().unwrap_or(Duration::ZERO)
    }
}

impl Timed for ConvRun {
    fn timings(&self) -> &[Duration] {
        &self.timings
    }
}

impl Timed for MatmulRun {
    fn timings(&self) -> &[Duration] {
        &self.timings
    }
}

/// Call `f` `iterations` times, timing each call. Returns the timings and the last result.
pub fn time_iterations<T>(iterations: usize, mut f: impl FnMut() -> Result<T>) -> Result<(Vec<Duration>, Option<T>)> {
    let mut timings = Vec::with_capacity(iterations);
    let mut last = None;
    for iter in 0..iterations {
        let start = Instant::now();
        let out = f()?;
        let elapsed = start.elapsed();
        debug!(iter, ?elapsed, "iteration finished");
        timings.push(elapsed);
        last = Some(out);
    }
    Ok((timings, last))
}

/// Time `strategy` on `input`, optionally checking the last output against `reference`.
pub fn run_conv(
    strategy: ConvStrategy,
    input: &FeatureMap,
    kernel: &Tensor,
    geometry: &ConvGeometry,
    iterations: usize,
    reference: Option<&Tensor>,
) -> Result<ConvRun> {
    info!(%strategy, iterations, "running convolution benchmark");
    let (timings, last) = match strategy {
        ConvStrategy::Dense(alg) => {
            time_iterations(iterations, || conv2d(alg, input.as_tensor(), kernel, geometry))?
        }
        ConvStrategy::Sparse(policy) => {
            time_iterations(iterations, || sparse_conv2d(input, kernel, geometry, policy))?
        }
        ConvStrategy::SparseReusedPlan(policy) => {
            let plan = SparseConvPlan::build(input, geometry, policy)?;
            debug!(rules = plan.rulebook().len(), "plan built outside timed loop");
            time_iterations(iterations, || plan.execute(input, kernel))?
        }
    };

    let max_abs_diff = match (&last, reference) {
        (Some(out), Some(reference)) => Some(out.max_abs_diff(reference)),
        _ => None,
    };
    Ok(ConvRun {
        strategy,
        timings,
        output_shape: geometry.output_shape(),
        max_abs_diff,
    })
}

/// Time `algorithm` and compare every product with `reference`.
pub fn run_matmul(algorithm: MatmulAlgorithm, operands: &MatmulOperands, iterations: usize, reference: &Matrix) -> MatmulRun {
    info!(%algorithm, iterations, "running matmul benchmark");
    let mut timings = Vec::with_capacity(iterations);
    let mut verified = true;
    for _ in 0..iterations {
        let start = Instant::now();
        let c = operands.multiply(algorithm);
        timings.push(start.elapsed());
        verified &= c == *reference;
    }
    MatmulRun {
        algorithm,
        timings,
        verified,
    }
}

fn secs(d: Duration) -> f64 {
    d.as_secs_f64()
}

/// Print per-iteration lines and the average for one convolution run.
pub fn print_conv_run(run: &ConvRun) {
    let [n, c, h, w] = run.output_shape;
    println!();
    println!("===== {} CONV OUT_CHANNELS = {} =====", run.strategy, c);
    for (i, t) in run.timings.iter().enumerate() {
        println!("Rnd:{}\tTime:{:.6}s\tOutput_shape: [{}, {}, {}, {}]", i + 1, secs(*t), n, c, h, w);
    }
    println!(
        "###@@@ Avg Time for Calculation({}, out_channel = {}): {:.6}s.",
        run.strategy,
        c,
        secs(run.average())
    );
    if let Some(diff) = run.max_abs_diff {
        println!("max |diff| vs reference: {:.3e}", diff);
    }
}

/// Print one line per matmul variant.
pub fn print_matmul_run(run: &MatmulRun) {
    println!(
        "{:<14} avg {:>10.6}s  min {:>10.6}s  {}",
        run.algorithm.to_string(),
        secs(run.average()),
        secs(run.fastest()),
        if run.verified { "ok" } else { "MISMATCH" }
    );
}

/// Print a side-by-side table of convolution strategies, speedups relative to the first run.
pub fn print_comparison(runs: &[ConvRun]) {
    let Some(baseline) = runs.first() else {
        return;
    };
    let base_avg = secs(baseline.average());

    println!("\n=== Strategy Comparison (baseline: {}) ===", baseline.strategy);
    println!(
        "{:<22} {:>12} {:>12} {:>9} {:>12}",
        "Strategy", "Avg", "Min", "Speedup", "Max |diff|"
    );
    for run in runs {
        let avg = secs(run.average());
        let speedup = if avg > 0.0 { base_avg / avg } else { 0.0 };
        let diff = run
            .max_abs_diff
            .map(|d| format!("{d:.3e}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<22} {:>11.6}s {:>11.6}s {:>8.2}x {:>12}",
            run.strategy.to_string(),
            avg,
            secs(run.fastest()),
            speedup,
            diff
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_of_no_timings_is_zero() {
        let run = MatmulRun {
            algorithm: MatmulAlgorithm::Ijk,
            timings: Vec::new(),
            verified: true,
        };
        assert_eq!(run.average(), Duration::ZERO);
        assert_eq!(run.fastest(), Duration::ZERO);
    }

    #[test]
    fn average_divides_by_iteration_count() {
        let run = MatmulRun {
            algorithm: MatmulAlgorithm::Ijk,
            timings: vec![Duration::from_secs(1), Duration::from_secs(2)],
            verified: true,
        };
        assert_eq!(run.average(), Duration::from_millis(1500));
        assert_eq!(run.fastest(), Duration::from_secs(1));
    }

    #[test]
    fn strategy_labels() {
        assert_eq!(ConvStrategy::Dense(ConvAlgorithm::Im2col).to_string(), "im2col");
        assert_eq!(ConvStrategy::Sparse(RulebookPolicy::Explicit).to_string(), "sparse");
        assert_eq!(
            ConvStrategy::SparseReusedPlan(RulebookPolicy::Positional).to_string(),
            "sparse-positional-reuse"
        );
    }
}
