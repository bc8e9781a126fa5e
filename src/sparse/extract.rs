/// Nonzero coordinate extraction from a dense feature map.

use crate::tensor::FeatureMap;

/// Position of one nonzero input entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputCoord {
    pub row: usize,
    pub col: usize,
}

/// Coordinates of every nonzero feature-map entry, in row-major scan order.
///
/// The position of a coordinate in this list is its input index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonzeroList {
    coords: Vec<InputCoord>,
}

impl NonzeroList {
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn get(&self, input_index: usize) -> Option<InputCoord> {
        self.coords.get(input_index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InputCoord> {
        self.coords.iter()
    }

    pub fn as_slice(&self) -> &[InputCoord] {
        &self.coords
    }
}

/// Number of entries that are not exactly zero.
pub fn count_nonzeros(map: &FeatureMap) -> usize {
    map.as_tensor().count_nonzero()
}

/// Scan `map` row by row and record every entry that is not exactly `0.0`.
pub fn extract_nonzeros(map: &FeatureMap) -> NonzeroList {
    let mut coords = Vec::with_capacity(count_nonzeros(map));
    for row in 0..map.height() {
        for col in 0..map.width() {
            if map.at(row, col) != 0.0 {
                coords.push(InputCoord { row, col });
            }
        }
    }
    NonzeroList { coords }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_order_is_row_major() {
        let mut map = FeatureMap::zeros(3, 3);
        map.set(2, 0, 1.0);
        map.set(0, 2, 1.0);
        map.set(1, 1, -3.0);
        let list = extract_nonzeros(&map);
        let coords: Vec<(usize, usize)> = list.iter().map(|c| (c.row, c.col)).collect();
        assert_eq!(coords, vec![(0, 2), (1, 1), (2, 0)]);
    }

    #[test]
    fn tiny_values_are_not_zero() {
        let mut map = FeatureMap::zeros(1, 2);
        map.set(0, 1, 1e-30);
        assert_eq!(extract_nonzeros(&map).len(), 1);
    }
}
