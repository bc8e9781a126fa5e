//! Error types for sparsebench.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using sparsebench's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while configuring, loading or running a benchmark kernel.
#[derive(Error, Debug)]
pub enum Error {
    /// The convolution geometry cannot produce an output.
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry {
        /// Why the geometry was rejected
        reason: String,
    },

    /// The sparse engine only handles batch=1, in_channels=1, stride=1.
    #[error("Sparse engine does not support {param}={value} (expected {expected})")]
    UnsupportedSparseConfig {
        /// Parameter name
        param: &'static str,
        /// Value supplied
        value: usize,
        /// Value the engine requires
        expected: usize,
    },

    /// A tensor does not have the shape the geometry requires.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Which operand
        what: &'static str,
        /// Expected NCHW shape
        expected: [usize; 4],
        /// Actual NCHW shape
        got: [usize; 4],
    },

    /// A nonzero input produced fewer taps than positional kernel indexing assumes.
    #[error(
        "Input {input_index} emitted {emitted} output coordinates, positional rulebook needs {expected}"
    )]
    TruncatedTaps {
        /// Index into the nonzero list
        input_index: usize,
        /// Entries actually emitted by the mapper
        emitted: usize,
        /// KERNEL_SIZE^2 * OUT_CHANNELS
        expected: usize,
    },

    /// A rulebook entry points outside one of the coordinate lists.
    #[error("Rulebook entry {entry}: {list} index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// Rulebook position
        entry: usize,
        /// Which list was indexed
        list: &'static str,
        /// Offending index
        index: usize,
        /// Length of the indexed list
        len: usize,
    },

    /// A rulebook entry points at a coordinate outside one of the tensors.
    #[error("Rulebook entry {entry}: {tensor} coordinate {coord:?} outside shape {shape:?}")]
    CoordinateOutOfRange {
        /// Rulebook position
        entry: usize,
        /// Which tensor was addressed
        tensor: &'static str,
        /// Offending NCHW coordinate
        coord: [usize; 4],
        /// Shape of the addressed tensor
        shape: [usize; 4],
    },

    /// A benchmark parameter is outside its valid range.
    #[error("Invalid {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// I/O failure on a feature map or config file.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A config file could not be parsed.
    #[error("Failed to parse config {path}: {source}")]
    Config {
        /// Config file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },
}

impl Error {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        Error::InvalidGeometry {
            reason: reason.into(),
        }
    }
}
