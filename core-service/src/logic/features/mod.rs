//! Features Module - Tabular model input
//!
//! Layout and per-request container for soil & climate readings.

pub mod layout;
pub mod vector;

// Re-export common types
pub use layout::{FEATURE_COUNT, FEATURE_LAYOUT};
pub use vector::FeatureVector;
