mod tensor;
mod feature_map;

pub use tensor::Tensor;
pub use feature_map::FeatureMap;
