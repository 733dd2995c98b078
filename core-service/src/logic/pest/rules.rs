//! Pest Recommendation Rules
//!
//! Class-id ranges, confidence cut-offs and the fixed advice texts.
//! No logic here.

use std::ops::RangeInclusive;

// ============================================================================
// BUCKET RANGES (ImageNet-1k class ids)
// ============================================================================

/// Arthropod classes
pub const INSECT_CLASS_IDS: RangeInclusive<usize> = 300..=399;

/// Fungus and plant classes at the end of the label space
pub const DISEASE_OR_PLANT_CLASS_IDS: RangeInclusive<usize> = 980..=999;

/// Outside both ranges and below this = uncertain
pub const UNCERTAIN_CONFIDENCE: f32 = 0.40;

// ============================================================================
// SEVERITY
// ============================================================================

pub const SEVERITY_HIGH_CONFIDENCE: f32 = 0.8;
pub const SEVERITY_MEDIUM_CONFIDENCE: f32 = 0.6;

/// Name fragments that escalate a confident detection to high severity
pub const SEVERE_KEYWORDS: [&str; 3] = ["blight", "bacterial", "fungal"];

/// Affected-area percent ranges, half-open, by confidence band
pub const AREA_HIGH: (f32, f32) = (15.0, 30.0);
pub const AREA_MEDIUM: (f32, f32) = (8.0, 15.0);
pub const AREA_LOW: (f32, f32) = (3.0, 8.0);

// ============================================================================
// ADVICE TEXT
// ============================================================================

pub const INSECT_STEPS: [&str; 3] = [
    "2. **Immediate Action:** Isolate affected plants to prevent spread.",
    "3. **Organic Solution:** Spray Neem oil (5ml/liter) or insecticidal soap every 3-5 days.",
    "4. **Chemical Control:** If severe, apply broad-spectrum insecticide (consult local approved list).",
];

pub const INSECT_PREVENTION: [&str; 3] = [
    "• **Monitor:** Check undersides of leaves daily.",
    "• **Hygiene:** Remove weeds and debris where pests hide.",
    "• **Traps:** Use yellow sticky traps to monitor population.",
];

pub const DISEASE_STEPS: [&str; 3] = [
    "2. **Isolate:** Remove and destroy infected plant parts immediately (do not compost).",
    "3. **Airflow:** Improve spacing between plants.",
    "4. **Fungicide:** Apply copper-based fungicide or baking soda solution (1 tsp/liter).",
];

pub const DISEASE_PREVENTION: [&str; 3] = [
    "• **Rotation:** Rotate crops every season.",
    "• **Soil:** Ensure well-draining soil to prevent root rot.",
    "• **Seeds:** Use disease-resistant seed varieties.",
];

pub const UNCERTAIN_TREATMENT: &str = "The image analysis is inconclusive. \
     Please upload a structured closeup of the specific leaf spot or insect.";

pub const UNCERTAIN_PREVENTION: &str = "Ensure good lighting and focus when taking photos.";

pub const OTHER_NOTES: [&str; 2] = [
    "• No major active pests or disease patterns recognized.",
    "• Ensure balanced NPK fertilization.",
];

pub const OTHER_PREVENTION: &str = "Continue regular monitoring and maintain good field hygiene.";

// ============================================================================
// ERROR REPORTS
// ============================================================================

pub const ERROR_METHOD: &str = "error";
pub const ERROR_HEADLINE_UNAVAILABLE: &str = "ML Error";
pub const ERROR_HEADLINE_PROCESSING: &str = "Processing Error";
