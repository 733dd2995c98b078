//! Rule-based Crop Fallback
//!
//! Deterministic (rainfall, temperature) table used whenever the trained
//! classifier is unavailable or fails.

use crate::logic::features::FeatureVector;
use super::rules::{
    DRY_CROPS, FALLBACK_CONFIDENCE, HIGH_RAINFALL_MM, MODERATE_CROPS, MODERATE_RAINFALL_MM,
    WARM_TEMPERATURE_C, WET_CROPS,
};
use super::types::{CropPrediction, PredictionMethod};

/// Crop name from the threshold table
pub fn fallback_crop(temperature: f32, rainfall: f32) -> &'static str {
    let (warm, cool) = if rainfall > HIGH_RAINFALL_MM {
        WET_CROPS
    } else if rainfall > MODERATE_RAINFALL_MM {
        MODERATE_CROPS
    } else {
        DRY_CROPS
    };

    if temperature > WARM_TEMPERATURE_C {
        warm
    } else {
        cool
    }
}

/// Rule-based prediction for a feature vector
pub fn fallback_prediction(features: &FeatureVector) -> CropPrediction {
    CropPrediction {
        crop_name: fallback_crop(features.temperature, features.rainfall).to_string(),
        confidence: FALLBACK_CONFIDENCE,
        method: PredictionMethod::RuleBased,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::crop::rules::FALLBACK_CROPS;

    fn features(temperature: f32, rainfall: f32) -> FeatureVector {
        FeatureVector::new(50.0, 40.0, 30.0, temperature, 70.0, 6.5, rainfall)
    }

    #[test]
    fn test_table_cells() {
        let cases = [
            (30.0, 250.0, "rice"),
            (20.0, 250.0, "wheat"),
            (30.0, 150.0, "maize"),
            (20.0, 150.0, "chickpea"),
            (30.0, 50.0, "cotton"),
            (20.0, 50.0, "mustard"),
        ];
        for (temperature, rainfall, expected) in cases {
            assert_eq!(
                fallback_crop(temperature, rainfall),
                expected,
                "temperature={} rainfall={}",
                temperature,
                rainfall
            );
        }
    }

    #[test]
    fn test_band_edges_are_inclusive_below() {
        // rainfall == 200 belongs to the moderate band, == 100 to the dry band
        assert_eq!(fallback_crop(30.0, 200.0), "maize");
        assert_eq!(fallback_crop(30.0, 100.0), "cotton");
        // temperature == 25 is cool
        assert_eq!(fallback_crop(25.0, 250.0), "wheat");
        assert_eq!(fallback_crop(25.1, 250.0), "rice");
    }

    #[test]
    fn test_fallback_prediction_shape() {
        let prediction = fallback_prediction(&features(30.0, 250.0));
        assert_eq!(prediction.crop_name, "rice");
        assert_eq!(prediction.confidence, 0.75);
        assert_eq!(prediction.method, PredictionMethod::RuleBased);
    }

    #[test]
    fn test_extreme_inputs_stay_in_vocabulary() {
        for &t in &[-40.0, 0.0, 25.0, 60.0, f32::MAX] {
            for &r in &[-1.0, 0.0, 100.0, 200.0, 5000.0] {
                assert!(FALLBACK_CROPS.contains(&fallback_crop(t, r)));
            }
        }
    }
}
