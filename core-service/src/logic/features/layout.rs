//! Feature Layout - Soil & Climate Input Definition
//!
//! The crop classifier was trained on columns in exactly this order.
//! Reordering here breaks every exported model artifact.

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Number of features fed to the tabular classifier
pub const FEATURE_COUNT: usize = 7;

/// Feature names in the order they appear in the model input
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "N",           // 0: Nitrogen (kg/ha)
    "P",           // 1: Phosphorus (kg/ha)
    "K",           // 2: Potassium (kg/ha)
    "temperature", // 3: Air temperature (°C)
    "humidity",    // 4: Relative humidity (%)
    "ph",          // 5: Soil pH (0-14)
    "rainfall",    // 6: Rainfall (mm)
];

/// Look up the index of a feature by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&f| f == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_index() {
        assert_eq!(feature_index("N"), Some(0));
        assert_eq!(feature_index("rainfall"), Some(6));
        assert_eq!(feature_index("moisture"), None);
    }
}
