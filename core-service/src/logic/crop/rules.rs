//! Crop Rules & Tables
//!
//! Thresholds, constants and static lookups for the crop path.
//! No logic here.

use std::collections::HashMap;

use once_cell::sync::Lazy;

// ============================================================================
// CONFIDENCE CONSTANTS
// ============================================================================

/// Confidence reported by the rule-based fallback
pub const FALLBACK_CONFIDENCE: f32 = 0.75;

/// Confidence reported when the classifier has no probability output
pub const DEFAULT_MODEL_CONFIDENCE: f32 = 0.85;

// ============================================================================
// FALLBACK TABLE (rainfall mm, temperature °C)
// ============================================================================

/// Above this rainfall = wet band
pub const HIGH_RAINFALL_MM: f32 = 200.0;

/// Above this rainfall (and up to HIGH_RAINFALL_MM) = moderate band
pub const MODERATE_RAINFALL_MM: f32 = 100.0;

/// Above this temperature = warm column
pub const WARM_TEMPERATURE_C: f32 = 25.0;

/// (warm, cool) crop per rainfall band
pub const WET_CROPS: (&str, &str) = ("rice", "wheat");
pub const MODERATE_CROPS: (&str, &str) = ("maize", "chickpea");
pub const DRY_CROPS: (&str, &str) = ("cotton", "mustard");

/// Every crop the fallback table can produce
pub const FALLBACK_CROPS: [&str; 6] = ["rice", "wheat", "maize", "chickpea", "cotton", "mustard"];

// ============================================================================
// MARKET POTENTIAL (strictly greater than)
// ============================================================================

pub const MARKET_VERY_HIGH_MIN: f32 = 0.8;
pub const MARKET_HIGH_MIN: f32 = 0.6;
pub const MARKET_GOOD_MIN: f32 = 0.4;

// ============================================================================
// REASON THRESHOLDS
// ============================================================================

/// Maximum reasons attached to one recommended crop
pub const MAX_REASONS: usize = 3;

pub const EXCELLENT_MATCH_MIN: f32 = 0.7;
pub const GOOD_MATCH_MIN: f32 = 0.5;

pub const HIGH_NITROGEN: f32 = 70.0;
pub const GOOD_PHOSPHORUS: f32 = 50.0;
pub const ADEQUATE_POTASSIUM: f32 = 40.0;
pub const OPTIMAL_TEMPERATURE_RANGE: (f32, f32) = (20.0, 30.0);
pub const LOW_RAINFALL_MM: f32 = 100.0;

// ============================================================================
// YIELD TABLE (quintals/acre unless stated)
// ============================================================================

pub const DEFAULT_YIELD: &str = "10-15 quintals/acre";

pub static YIELD_TABLE: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("rice", "45-55 quintals/acre"),
        ("maize", "28-35 quintals/acre"),
        ("chickpea", "12-15 quintals/acre"),
        ("kidneybeans", "8-12 quintals/acre"),
        ("pigeonpeas", "10-14 quintals/acre"),
        ("mothbeans", "6-10 quintals/acre"),
        ("mungbean", "8-12 quintals/acre"),
        ("blackgram", "8-12 quintals/acre"),
        ("lentil", "10-14 quintals/acre"),
        ("pomegranate", "80-120 quintals/acre"),
        ("banana", "200-300 quintals/acre"),
        ("mango", "40-60 quintals/acre"),
        ("grapes", "80-120 quintals/acre"),
        ("watermelon", "150-200 quintals/acre"),
        ("muskmelon", "100-150 quintals/acre"),
        ("apple", "60-100 quintals/acre"),
        ("orange", "80-120 quintals/acre"),
        ("papaya", "150-200 quintals/acre"),
        ("coconut", "60-80 nuts/tree/year"),
        ("cotton", "18-22 quintals/acre"),
        ("jute", "20-25 quintals/acre"),
        ("coffee", "8-12 quintals/acre"),
    ])
});

// ============================================================================
// NARRATIVE
// ============================================================================

pub const MODEL_SOURCES: [&str; 3] = [
    "ML Model Prediction",
    "Agricultural Guidelines",
    "Historical Data",
];

pub const RULE_BASED_SOURCES: [&str; 2] = ["Rule-based Rainfall/Temperature Table", "Agricultural Guidelines"];

pub const ASSUMPTIONS: [&str; 4] = [
    "Based on provided soil and climate parameters",
    "Assuming standard farming practices",
    "Market conditions may vary by region",
    "Consult local agricultural experts for final decision",
];
