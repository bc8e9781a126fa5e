//! Sparse convolution benchmark suite.
//!
//! The centrepiece is a rulebook-based sparse convolution over single-channel,
//! point-cloud-like feature maps: nonzero inputs are mapped through every
//! kernel tap to the output positions they feed, and the resulting
//! (input, output, kernel) index triples are walked to accumulate a dense
//! output. Dense convolution (direct, Im2col+GEMM, Winograd) and dense matmul
//! variants are included as baselines.
//!
//! # Example
//!
//! ```
//! use sparsebench::config::ConvGeometry;
//! use sparsebench::conv::constant_kernel;
//! use sparsebench::sparse::{sparse_conv2d, RulebookPolicy};
//! use sparsebench::tensor::FeatureMap;
//!
//! let geometry = ConvGeometry::single_channel(8, 8, 1, 3);
//! let mut map = FeatureMap::zeros(8, 8);
//! map.set(4, 4, 2.0);
//!
//! let kernel = constant_kernel(&geometry, 0.5);
//! let out = sparse_conv2d(&map, &kernel, &geometry, RulebookPolicy::Explicit).unwrap();
//! assert_eq!(out.get(0, 0, 3, 3), 1.0);
//! ```

/// Error type and `Result` alias.
pub mod error;
/// Convolution geometry and benchmark configuration.
pub mod config;
/// Flat NCHW tensor and the single-channel feature map.
pub mod tensor;
/// CSV and synthetic feature-map sources.
pub mod loader;
/// Rulebook-based sparse convolution engine.
pub mod sparse;
/// Dense convolution baselines.
pub mod conv;
/// Dense matmul baselines.
pub mod matmul;
/// Benchmark harness and reports.
pub mod metrics;

pub use error::{Error, Result};
