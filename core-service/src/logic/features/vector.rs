//! Feature Vector - Soil & climate readings for one request
//!
//! Created per request, never persisted.

use serde::{Deserialize, Serialize};
use super::layout::{FEATURE_COUNT, FEATURE_LAYOUT};

// ============================================================================
// FEATURE VECTOR
// ============================================================================

/// Soil nutrients and climate readings for a field
///
/// Field names on the wire follow the training columns (`N`, `P`, `K`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Nitrogen content (kg/ha)
    #[serde(rename = "N")]
    pub nitrogen: f32,
    /// Phosphorus content (kg/ha)
    #[serde(rename = "P")]
    pub phosphorus: f32,
    /// Potassium content (kg/ha)
    #[serde(rename = "K")]
    pub potassium: f32,
    /// Temperature (°C)
    pub temperature: f32,
    /// Relative humidity (%)
    pub humidity: f32,
    /// Soil pH
    pub ph: f32,
    /// Rainfall (mm)
    pub rainfall: f32,
}

impl FeatureVector {
    pub fn new(
        nitrogen: f32,
        phosphorus: f32,
        potassium: f32,
        temperature: f32,
        humidity: f32,
        ph: f32,
        rainfall: f32,
    ) -> Self {
        Self { nitrogen, phosphorus, potassium, temperature, humidity, ph, rainfall }
    }

    /// Values in model input order
    pub fn as_array(&self) -> [f32; FEATURE_COUNT] {
        [
            self.nitrogen,
            self.phosphorus,
            self.potassium,
            self.temperature,
            self.humidity,
            self.ph,
            self.rainfall,
        ]
    }

    /// Get feature by name
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        super::layout::feature_index(name).map(|i| self.as_array()[i])
    }

    /// Every value is a finite number
    pub fn is_finite(&self) -> bool {
        self.as_array().iter().all(|v| v.is_finite())
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!(FEATURE_LAYOUT
            .iter()
            .zip(self.as_array().iter())
            .map(|(name, value)| (name.to_string(), *value))
            .collect::<std::collections::BTreeMap<_, _>>())
    }
}

impl From<[f32; FEATURE_COUNT]> for FeatureVector {
    fn from(v: [f32; FEATURE_COUNT]) -> Self {
        Self::new(v[0], v[1], v[2], v[3], v[4], v[5], v[6])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_roundtrip_order() {
        let values = [90.0, 42.0, 43.0, 20.8, 82.0, 6.5, 202.9];
        let vector = FeatureVector::from(values);
        assert_eq!(vector.as_array(), values);
        assert_eq!(vector.get_by_name("ph"), Some(6.5));
        assert_eq!(vector.get_by_name("K"), Some(43.0));
    }

    #[test]
    fn test_wire_names() {
        let json = r#"{"N":90,"P":42,"K":43,"temperature":20.8,"humidity":82,"ph":6.5,"rainfall":202.9}"#;
        let vector: FeatureVector = serde_json::from_str(json).unwrap();
        assert_eq!(vector.nitrogen, 90.0);
        assert_eq!(vector.rainfall, 202.9);

        let back = serde_json::to_value(vector).unwrap();
        assert!(back.get("N").is_some());
        assert!(back.get("nitrogen").is_none());
    }

    #[test]
    fn test_non_finite_detected() {
        let mut vector = FeatureVector::from([1.0; FEATURE_COUNT]);
        assert!(vector.is_finite());
        vector.ph = f32::NAN;
        assert!(!vector.is_finite());
    }
}
