//! Crop Module
//!
//! Soil & climate readings in, crop suggestion out.
//!
//! ## Structure
//! - `types`: Result types (CropPrediction, CropRecommendation, ...)
//! - `rules`: Thresholds, constants and static tables
//! - `fallback`: Rule-based (rainfall, temperature) table
//! - `insights`: Yield, market potential and reasons
//! - `predictor`: Model-first prediction with explicit fallback branch

pub mod types;
pub mod rules;
pub mod fallback;
pub mod insights;
pub mod predictor;

// Re-export main types for convenience
pub use types::{
    CropPrediction,
    CropRecommendation,
    MarketPotential,
    PredictionMethod,
    RecommendedCrop,
};

pub use fallback::{fallback_crop, fallback_prediction};
pub use insights::{expected_yield, market_potential};
pub use predictor::{rank_top_k, CropPredictor, PredictError};
