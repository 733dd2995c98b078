//! Logic Module - Inference & Rules
//!
//! - `features/` - Crop feature vector and its fixed layout
//! - `model/` - Model registry and ONNX classifiers
//! - `crop/` - Crop predictor, rule fallback, top-k insights
//! - `vision/` - Image preprocessing and generic classification
//! - `pest/` - Category buckets and treatment advice

pub mod crop;
pub mod features;
pub mod model;
pub mod pest;
pub mod vision;
