use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::tensor::FeatureMap;

/// Read a comma-separated feature map into a `height x width` grid.
///
/// Each field is parsed as a float and rounded to the nearest integer (half
/// away from zero). Lines past `height` and fields past `width` are ignored;
/// missing lines or fields stay zero. A field that does not parse ends its
/// line.
pub fn load_feature_map(path: &Path, height: usize, width: usize) -> Result<FeatureMap> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_feature_map(BufReader::new(file), height, width).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_feature_map`], but an unreadable file yields an all-zero map.
pub fn load_feature_map_or_zeroed(path: &Path, height: usize, width: usize) -> FeatureMap {
    match load_feature_map(path, height, width) {
        Ok(map) => map,
        Err(err) => {
            warn!("{err}; continuing with a zero-filled {height}x{width} feature map");
            FeatureMap::zeros(height, width)
        }
    }
}

/// Parse CSV rows from any buffered reader.
pub fn read_feature_map<R: BufRead>(reader: R, height: usize, width: usize) -> std::io::Result<FeatureMap> {
    let mut map = FeatureMap::zeros(height, width);
    let mut rows_read = 0usize;

    for (row, line) in reader.lines().enumerate() {
        if row >= height {
            break;
        }
        let line = line?;
        for (col, field) in line.trim_end_matches('\r').split(',').enumerate() {
            if col >= width {
                break;
            }
            match field.trim().parse::<f64>() {
                Ok(v) => map.set(row, col, v.round() as f32),
                Err(_) => {
                    warn!(row, col, field, "unparseable value, skipping rest of row");
                    break;
                }
            }
        }
        rows_read += 1;
    }

    if rows_read < height {
        debug!(rows_read, height, "feature map shorter than declared, remainder left at zero");
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        let map = read_feature_map("0.5,1.49,-0.5,2.5\n".as_bytes(), 1, 4).unwrap();
        let row: Vec<f32> = (0..4).map(|c| map.at(0, c)).collect();
        assert_eq!(row, vec![1.0, 1.0, -1.0, 3.0]);
    }

    #[test]
    fn bad_field_truncates_row_only() {
        let map = read_feature_map("1,x,1\n1,1,1\n".as_bytes(), 2, 3).unwrap();
        assert_eq!(map.at(0, 0), 1.0);
        assert_eq!(map.at(0, 2), 0.0);
        assert_eq!(map.at(1, 2), 1.0);
    }
}
