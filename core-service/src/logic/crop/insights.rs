//! Crop Insights
//!
//! Static yield lookup, market potential tiers and the textual reasons
//! attached to each recommended crop.

use crate::logic::features::FeatureVector;
use super::rules::{
    ADEQUATE_POTASSIUM, DEFAULT_YIELD, EXCELLENT_MATCH_MIN, GOOD_MATCH_MIN, GOOD_PHOSPHORUS,
    HIGH_NITROGEN, HIGH_RAINFALL_MM, LOW_RAINFALL_MM, MARKET_GOOD_MIN, MARKET_HIGH_MIN,
    MARKET_VERY_HIGH_MIN, MAX_REASONS, OPTIMAL_TEMPERATURE_RANGE, YIELD_TABLE,
};
use super::types::MarketPotential;

/// Expected yield for a crop, case-insensitive
pub fn expected_yield(crop_name: &str) -> &'static str {
    YIELD_TABLE
        .get(crop_name.to_lowercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_YIELD)
}

/// Market potential tier from confidence
pub fn market_potential(confidence: f32) -> MarketPotential {
    if confidence > MARKET_VERY_HIGH_MIN {
        MarketPotential::VeryHigh
    } else if confidence > MARKET_HIGH_MIN {
        MarketPotential::High
    } else if confidence > MARKET_GOOD_MIN {
        MarketPotential::Good
    } else {
        MarketPotential::Moderate
    }
}

/// Up to three reasons, in fixed order: confidence tier, N, P, K,
/// temperature, rainfall
pub fn reasons(crop_name: &str, features: &FeatureVector, confidence: f32) -> Vec<String> {
    let mut reasons = Vec::new();

    if confidence > EXCELLENT_MATCH_MIN {
        reasons.push("Excellent match for your soil and climate conditions".to_string());
    } else if confidence > GOOD_MATCH_MIN {
        reasons.push("Good compatibility with your parameters".to_string());
    } else {
        reasons.push("Suitable option for your conditions".to_string());
    }

    if features.nitrogen > HIGH_NITROGEN {
        reasons.push(format!("High nitrogen content supports {} growth", crop_name));
    }
    if features.phosphorus > GOOD_PHOSPHORUS {
        reasons.push("Good phosphorus levels for root development".to_string());
    }
    if features.potassium > ADEQUATE_POTASSIUM {
        reasons.push("Adequate potassium for disease resistance".to_string());
    }

    let (t_min, t_max) = OPTIMAL_TEMPERATURE_RANGE;
    if (t_min..=t_max).contains(&features.temperature) {
        reasons.push(format!("Optimal temperature range for {}", crop_name));
    }

    if features.rainfall > HIGH_RAINFALL_MM {
        reasons.push("High rainfall suitable for water-intensive crop".to_string());
    } else if features.rainfall < LOW_RAINFALL_MM {
        reasons.push("Low water requirement matches rainfall pattern".to_string());
    }

    reasons.truncate(MAX_REASONS);
    reasons
}

/// One-paragraph summary of the inputs and the top crop
pub fn reasoning(features: &FeatureVector, top_crop: &str, confidence: f32) -> String {
    format!(
        "Based on your soil parameters (N:{:.0}, P:{:.0}, K:{:.0}, pH:{:.1}) \
         and climate conditions (Temp:{:.1}°C, Humidity:{:.0}%, Rainfall:{:.0}mm), \
         {} is the most suitable crop with {:.1}% confidence. \
         The soil nutrient levels and climate parameters align well with {} requirements.",
        features.nitrogen,
        features.phosphorus,
        features.potassium,
        features.ph,
        features.temperature,
        features.humidity,
        features.rainfall,
        top_crop,
        confidence * 100.0,
        top_crop,
    )
}
