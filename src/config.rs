//! Convolution geometry and benchmark configuration.
//!
//! Defaults reproduce the point-cloud benchmark: a 64x4096 single-channel
//! feature map convolved by a 3x3 kernel into 128 output channels, stride 1,
//! no padding, 32 timed iterations.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Shape parameters shared by every convolution algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvGeometry {
    pub batch: usize,
    pub height: usize,
    pub width: usize,
    pub in_channels: usize,
    pub out_channels: usize,
    pub kernel_size: usize,
    pub stride: usize,
    pub padding: usize,
}

impl Default for ConvGeometry {
    fn default() -> Self {
        ConvGeometry {
            batch: 1,
            height: 64,
            width: 4096,
            in_channels: 1,
            out_channels: 128,
            kernel_size: 3,
            stride: 1,
            padding: 0,
        }
    }
}

impl ConvGeometry {
    /// Single-channel, batch=1, stride=1 geometry with no padding.
    pub fn single_channel(height: usize, width: usize, out_channels: usize, kernel_size: usize) -> Self {
        ConvGeometry {
            height,
            width,
            out_channels,
            kernel_size,
            ..ConvGeometry::default()
        }
    }

    pub fn with_padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// `(HEIGHT - K + 2P) / S + 1`
    pub fn out_height(&self) -> usize {
        (self.height + 2 * self.padding - self.kernel_size) / self.stride + 1
    }

    /// `(WIDTH - K + 2P) / S + 1`
    pub fn out_width(&self) -> usize {
        (self.width + 2 * self.padding - self.kernel_size) / self.stride + 1
    }

    pub fn input_shape(&self) -> [usize; 4] {
        [self.batch, self.in_channels, self.height, self.width]
    }

    pub fn kernel_shape(&self) -> [usize; 4] {
        [self.out_channels, self.in_channels, self.kernel_size, self.kernel_size]
    }

    pub fn output_shape(&self) -> [usize; 4] {
        [self.batch, self.out_channels, self.out_height(), self.out_width()]
    }

    /// Number of kernel taps per output channel: `K^2`.
    pub fn taps(&self) -> usize {
        self.kernel_size * self.kernel_size
    }

    /// Reject geometries for which the output size formula is meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.batch == 0 || self.in_channels == 0 || self.out_channels == 0 {
            return Err(Error::geometry("batch and channel counts must be non-zero"));
        }
        if self.kernel_size == 0 {
            return Err(Error::geometry("kernel_size must be non-zero"));
        }
        if self.stride == 0 {
            return Err(Error::geometry("stride must be non-zero"));
        }
        if self.kernel_size > self.height + 2 * self.padding
            || self.kernel_size > self.width + 2 * self.padding
        {
            return Err(Error::geometry(format!(
                "kernel {k}x{k} does not fit padded input {}x{}",
                self.height + 2 * self.padding,
                self.width + 2 * self.padding,
                k = self.kernel_size,
            )));
        }
        Ok(())
    }
}

/// Everything one benchmark run needs besides the input data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub geometry: ConvGeometry,
    /// Timed repetitions per algorithm.
    pub iterations: usize,
    /// Value every kernel weight is set to.
    pub kernel_fill: f32,
    /// CSV feature map; a missing file degrades to an all-zero map.
    pub input: Option<PathBuf>,
    /// Generate a random map from `seed` and `density` instead of reading `input`.
    pub synthetic: bool,
    /// Seed for synthetic inputs when no CSV is given.
    pub seed: u64,
    /// Fraction of nonzero entries in a synthetic feature map.
    pub density: f64,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            geometry: ConvGeometry::default(),
            iterations: 32,
            kernel_fill: 0.5,
            input: Some(PathBuf::from("pointcloud.csv")),
            synthetic: false,
            seed: 42,
            density: 0.01,
        }
    }
}

impl BenchConfig {
    /// Load a TOML config; unspecified keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BenchConfig = toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the geometry and the numeric run parameters.
    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !(0.0..=1.0).contains(&self.density) {
            return Err(Error::InvalidParameter {
                name: "density",
                reason: format!("{} is not a fraction in [0, 1]", self.density),
            });
        }
        if !self.kernel_fill.is_finite() {
            return Err(Error::InvalidParameter {
                name: "kernel_fill",
                reason: format!("{} is not finite", self.kernel_fill),
            });
        }
        Ok(())
    }

    /// Whether the feature map comes from the random generator.
    pub fn uses_synthetic(&self) -> bool {
        self.synthetic || self.input.is_none()
    }
}
