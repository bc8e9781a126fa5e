/// Rulebook-based sparse convolution.
///
/// Pipeline: [`extract_nonzeros`] -> [`KernelCoordList::generate`] and
/// [`map_output_coords`] -> [`build_rulebook`] -> [`accumulate`]. The stages
/// are bundled in [`SparseConvPlan`]; [`sparse_conv2d`] builds and executes a
/// plan in one call.

mod extract;
mod kernel_coords;
mod output_map;
mod rulebook;
mod accumulate;

pub use extract::{count_nonzeros, extract_nonzeros, InputCoord, NonzeroList};
pub use kernel_coords::{KernelCoord, KernelCoordList};
pub use output_map::{map_output_coords, OutputCoord, OutputCoordList, TapOrigin};
pub use rulebook::{build_rulebook, Rule, Rulebook, RulebookPolicy};
pub use accumulate::accumulate;

use tracing::debug;

use crate::config::ConvGeometry;
use crate::error::{Error, Result};
use crate::tensor::{FeatureMap, Tensor};

/// The index structures derived from one feature map.
///
/// A plan stays valid for any feature map with the same sparsity pattern:
/// executing it reads values at the planned nonzero positions only.
#[derive(Debug, Clone)]
pub struct SparseConvPlan {
    geometry: ConvGeometry,
    nonzeros: NonzeroList,
    kernel_coords: KernelCoordList,
    outputs: OutputCoordList,
    rulebook: Rulebook,
}

impl SparseConvPlan {
    /// Run extraction, mapping and rulebook construction for `input`.
    pub fn build(input: &FeatureMap, geometry: &ConvGeometry, policy: RulebookPolicy) -> Result<Self> {
        check_geometry(geometry)?;
        check_input(input, geometry)?;

        let nonzeros = extract_nonzeros(input);
        let kernel_coords = KernelCoordList::generate(geometry);
        let outputs = map_output_coords(&nonzeros, &kernel_coords, geometry);
        let rulebook = build_rulebook(&nonzeros, &outputs, geometry, policy)?;
        debug!(
            nonzeros = nonzeros.len(),
            kernel_coords = kernel_coords.len(),
            output_coords = outputs.len(),
            "sparse plan ready"
        );

        Ok(SparseConvPlan {
            geometry: *geometry,
            nonzeros,
            kernel_coords,
            outputs,
            rulebook,
        })
    }

    /// Accumulate into a fresh zero-initialised output tensor.
    pub fn execute(&self, input: &FeatureMap, kernel: &Tensor) -> Result<Tensor> {
        check_input(input, &self.geometry)?;
        check_kernel(kernel, &self.geometry)?;

        let [n, c, h, w] = self.geometry.output_shape();
        let mut output = Tensor::new(n, c, h, w);
        accumulate(
            &self.rulebook,
            input,
            &self.nonzeros,
            kernel,
            &self.kernel_coords,
            &self.outputs,
            &mut output,
        )?;
        Ok(output)
    }

    pub fn geometry(&self) -> &ConvGeometry {
        &self.geometry
    }

    pub fn nonzeros(&self) -> &NonzeroList {
        &self.nonzeros
    }

    pub fn kernel_coords(&self) -> &KernelCoordList {
        &self.kernel_coords
    }

    pub fn output_coords(&self) -> &OutputCoordList {
        &self.outputs
    }

    pub fn rulebook(&self) -> &Rulebook {
        &self.rulebook
    }
}

/// Sparse convolution of a single-channel feature map.
///
/// Rebuilds every index structure on each call.
pub fn sparse_conv2d(
    input: &FeatureMap,
    kernel: &Tensor,
    geometry: &ConvGeometry,
    policy: RulebookPolicy,
) -> Result<Tensor> {
    SparseConvPlan::build(input, geometry, policy)?.execute(input, kernel)
}

fn check_geometry(geometry: &ConvGeometry) -> Result<()> {
    geometry.validate()?;
    for (param, value) in [
        ("batch", geometry.batch),
        ("in_channels", geometry.in_channels),
        ("stride", geometry.stride),
    ] {
        if value != 1 {
            return Err(Error::UnsupportedSparseConfig { param, value, expected: 1 });
        }
    }
    Ok(())
}

fn check_input(input: &FeatureMap, geometry: &ConvGeometry) -> Result<()> {
    let got = input.as_tensor().shape();
    if got != geometry.input_shape() {
        return Err(Error::ShapeMismatch {
            what: "feature map",
            expected: geometry.input_shape(),
            got,
        });
    }
    Ok(())
}

fn check_kernel(kernel: &Tensor, geometry: &ConvGeometry) -> Result<()> {
    if kernel.shape() != geometry.kernel_shape() {
        return Err(Error::ShapeMismatch {
            what: "kernel",
            expected: geometry.kernel_shape(),
            got: kernel.shape(),
        });
    }
    Ok(())
}
