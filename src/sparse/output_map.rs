/// Output coordinate mapping: nonzero input x kernel tap -> output position.
///
/// Uses the subtractive map `out = in - k + PADDING` (stride 1). An input at
/// row `r` therefore reaches output rows `r + P - (K-1) ..= r + P`, the same
/// positions whose window `oh + kh - P` covers it in a dense convolution.

use super::extract::NonzeroList;
use super::kernel_coords::KernelCoordList;
use crate::config::ConvGeometry;

/// One output element receiving a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputCoord {
    pub batch: usize,
    pub out_channel: usize,
    pub row: usize,
    pub col: usize,
}

/// Where an output entry came from: the nonzero input and the kernel weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapOrigin {
    pub input_index: usize,
    pub kernel_index: usize,
}

/// Output coordinates in emission order, with the origin of each entry.
///
/// Entries are not deduplicated; two inputs reaching the same output element
/// produce two entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputCoordList {
    coords: Vec<OutputCoord>,
    origins: Vec<TapOrigin>,
}

impl OutputCoordList {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn get(&self, output_index: usize) -> Option<OutputCoord> {
        self.coords.get(output_index).copied()
    }

    pub fn origin(&self, output_index: usize) -> Option<TapOrigin> {
        self.origins.get(output_index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputCoord> {
        self.coords.iter()
    }

    pub fn origins(&self) -> &[TapOrigin] {
        &self.origins
    }

    /// Number of entries emitted for each input index.
    pub fn entries_per_input(&self, num_inputs: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_inputs];
        for origin in &self.origins {
            counts[origin.input_index] += 1;
        }
        counts
    }
}

/// Map every nonzero through every kernel tap.
///
/// Emission order is input index, `kh`, `kw`, batch, out channel (innermost).
/// Taps landing outside `out_height x out_width` are skipped. The sparse
/// engine fixes `in_channel` at 0.
pub fn map_output_coords(
    nonzeros: &NonzeroList,
    kernel_coords: &KernelCoordList,
    geometry: &ConvGeometry,
) -> OutputCoordList {
    let k = geometry.kernel_size;
    let out_h = geometry.out_height() as isize;
    let out_w = geometry.out_width() as isize;
    let pad = geometry.padding as isize;

    let per_input = k * k * geometry.batch * geometry.out_channels;
    let mut coords = Vec::with_capacity(nonzeros.len() * per_input);
    let mut origins = Vec::with_capacity(nonzeros.len() * per_input);

    for (input_index, input) in nonzeros.iter().enumerate() {
        for kh in 0..k {
            for kw in 0..k {
                let oh = input.row as isize - kh as isize + pad;
                let ow = input.col as isize - kw as isize + pad;
                if oh < 0 || oh >= out_h || ow < 0 || ow >= out_w {
                    continue;
                }
                for batch in 0..geometry.batch {
                    for out_channel in 0..geometry.out_channels {
                        coords.push(OutputCoord {
                            batch,
                            out_channel,
                            row: oh as usize,
                            col: ow as usize,
                        });
                        origins.push(TapOrigin {
                            input_index,
                            kernel_index: kernel_coords.index_of(out_channel, 0, kh, kw),
                        });
                    }
                }
            }
        }
    }

    OutputCoordList { coords, origins }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparse::extract::extract_nonzeros;
    use crate::tensor::FeatureMap;

    #[test]
    fn corner_input_reaches_a_single_output() {
        let g = ConvGeometry::single_channel(5, 5, 2, 3);
        let mut map = FeatureMap::zeros(5, 5);
        map.set(0, 0, 1.0);
        let nz = extract_nonzeros(&map);
        let out = map_output_coords(&nz, &KernelCoordList::generate(&g), &g);
        // only kh = kw = 0 lands in bounds
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.row == 0 && c.col == 0));
        assert_eq!(out.origin(1).unwrap().kernel_index, 9);
    }

    #[test]
    fn out_channel_is_innermost() {
        let g = ConvGeometry::single_channel(6, 6, 3, 3);
        let mut map = FeatureMap::zeros(6, 6);
        map.set(3, 3, 1.0);
        let nz = extract_nonzeros(&map);
        let out = map_output_coords(&nz, &KernelCoordList::generate(&g), &g);
        assert_eq!(out.len(), 27);
        let first: Vec<usize> = out.iter().take(3).map(|c| c.out_channel).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!((out.get(3).unwrap().row, out.get(3).unwrap().col), (3, 2));
    }
}
