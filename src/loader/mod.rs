mod csv;
mod synthetic;

pub use self::csv::{load_feature_map, load_feature_map_or_zeroed, read_feature_map};
pub use self::synthetic::synthetic_feature_map;
