/// Timing harness and text reports for the convolution and matmul benchmarks.
mod benchmark;

pub use benchmark::*;
