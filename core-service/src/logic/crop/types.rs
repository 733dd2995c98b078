//! Crop Types
//!
//! Result types for the crop path. No logic here.

use serde::{Deserialize, Serialize};

// ============================================================================
// PREDICTION METHOD
// ============================================================================

/// Where a crop suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    /// Trained tabular classifier
    Model,
    /// Threshold table, used when no classifier is usable
    RuleBased,
}

impl PredictionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMethod::Model => "model",
            PredictionMethod::RuleBased => "rule_based",
        }
    }
}

impl std::fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// SINGLE PREDICTION
// ============================================================================

/// Best crop for a feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPrediction {
    pub crop_name: String,
    /// 0.0 - 1.0
    pub confidence: f32,
    pub method: PredictionMethod,
}

// ============================================================================
// MARKET POTENTIAL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketPotential {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Good,
    Moderate,
}

impl MarketPotential {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketPotential::VeryHigh => "Very High",
            MarketPotential::High => "High",
            MarketPotential::Good => "Good",
            MarketPotential::Moderate => "Moderate",
        }
    }
}

impl std::fmt::Display for MarketPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// TOP-K RECOMMENDATION
// ============================================================================

/// One ranked crop with its explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedCrop {
    pub crop_name: String,
    pub confidence: f32,
    pub expected_yield: String,
    pub market_potential: MarketPotential,
    /// At most 3 entries
    pub reasons: Vec<String>,
}

/// Ranked crop list for a feature vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropRecommendation {
    /// Sorted by descending confidence
    pub recommended_crops: Vec<RecommendedCrop>,
    /// Confidence of the first entry
    pub confidence_score: f32,
    pub method: PredictionMethod,
    pub reasoning: String,
    pub sources: Vec<String>,
    pub assumptions: Vec<String>,
}
