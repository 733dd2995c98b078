//! Vision Module
//!
//! Image preprocessing and the generic visual classifier wrapper.

pub mod classifier;
pub mod preprocess;

pub use classifier::{
    top_k, Classification, ClassificationResult, ClassifyError, ImageCategoryClassifier, DEFAULT_TOP_K,
};
pub use preprocess::{preprocess, CROP_SIZE, RESIZE_SHORTER_SIDE};
