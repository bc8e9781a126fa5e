/// Kernel weight enumeration.

use crate::config::ConvGeometry;

/// One kernel weight position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelCoord {
    pub out_channel: usize,
    pub in_channel: usize,
    pub kh: usize,
    pub kw: usize,
}

/// Every kernel weight position, out channel outermost and `kw` innermost.
///
/// The position of a coordinate in this list is its kernel index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KernelCoordList {
    coords: Vec<KernelCoord>,
    in_channels: usize,
    kernel_size: usize,
}

impl KernelCoordList {
    pub fn generate(geometry: &ConvGeometry) -> Self {
        let k = geometry.kernel_size;
        let mut coords = Vec::with_capacity(geometry.out_channels * geometry.in_channels * k * k);
        for out_channel in 0..geometry.out_channels {
            for in_channel in 0..geometry.in_channels {
                for kh in 0..k {
                    for kw in 0..k {
                        coords.push(KernelCoord { out_channel, in_channel, kh, kw });
                    }
                }
            }
        }
        KernelCoordList {
            coords,
            in_channels: geometry.in_channels,
            kernel_size: k,
        }
    }

    /// Kernel index of `(oc, ic, kh, kw)` without searching the list.
    #[inline]
    pub fn index_of(&self, out_channel: usize, in_channel: usize, kh: usize, kw: usize) -> usize {
        let k = self.kernel_size;
        out_channel * self.in_channels * k * k + in_channel * k * k + kh * k + kw
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn get(&self, kernel_index: usize) -> Option<KernelCoord> {
        self.coords.get(kernel_index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KernelCoord> {
        self.coords.iter()
    }
}
