/// Rulebook execution into a dense output tensor.

use super::extract::NonzeroList;
use super::kernel_coords::KernelCoordList;
use super::output_map::OutputCoordList;
use super::rulebook::Rulebook;
use crate::error::{Error, Result};
use crate::tensor::{FeatureMap, Tensor};

/// Walk `rulebook` and accumulate every `input * weight` product into `output`.
///
/// `output` is not cleared here; callers pass a zero-initialised tensor.
/// Every list index and every coordinate is checked before use. A bad list
/// index aborts the walk with [`Error::IndexOutOfRange`], a coordinate outside
/// `input`, `kernel` or `output` with [`Error::CoordinateOutOfRange`].
pub fn accumulate(
    rulebook: &Rulebook,
    input: &FeatureMap,
    nonzeros: &NonzeroList,
    kernel: &Tensor,
    kernel_coords: &KernelCoordList,
    outputs: &OutputCoordList,
    output: &mut Tensor,
) -> Result<()> {
    for (entry, rule) in rulebook.iter().enumerate() {
        let at = nonzeros.get(rule.input_index).ok_or(Error::IndexOutOfRange {
            entry,
            list: "nonzero",
            index: rule.input_index,
            len: nonzeros.len(),
        })?;
        let kc = kernel_coords.get(rule.kernel_index).ok_or(Error::IndexOutOfRange {
            entry,
            list: "kernel",
            index: rule.kernel_index,
            len: kernel_coords.len(),
        })?;
        let oc = outputs.get(rule.output_index).ok_or(Error::IndexOutOfRange {
            entry,
            list: "output",
            index: rule.output_index,
            len: outputs.len(),
        })?;

        let input_val = input.get(at.row, at.col).ok_or(Error::CoordinateOutOfRange {
            entry,
            tensor: "feature map",
            coord: [0, 0, at.row, at.col],
            shape: input.as_tensor().shape(),
        })?;
        let weight = kernel
            .get_checked(kc.out_channel, kc.in_channel, kc.kh, kc.kw)
            .ok_or(Error::CoordinateOutOfRange {
                entry,
                tensor: "kernel",
                coord: [kc.out_channel, kc.in_channel, kc.kh, kc.kw],
                shape: kernel.shape(),
            })?;
        let slot = output
            .checked_index(oc.batch, oc.out_channel, oc.row, oc.col)
            .ok_or(Error::CoordinateOutOfRange {
                entry,
                tensor: "output",
                coord: [oc.batch, oc.out_channel, oc.row, oc.col],
                shape: output.shape(),
            })?;
        output.data_mut()[slot] += input_val * weight;
    }
    Ok(())
}
