//! Agromind AI - Inference Core
//!
//! Crop recommendation from soil and weather readings, and pest/disease
//! triage from field photos. Trained models are optional: without them
//! every call still answers through rule-based fallbacks.

pub mod api;
pub mod constants;
pub mod logic;

pub use api::{Engine, EngineStatus};
pub use logic::crop::{CropPrediction, CropRecommendation, PredictionMethod};
pub use logic::features::FeatureVector;
pub use logic::model::{ModelConfig, ModelRegistry};
pub use logic::pest::PestReport;
