//! Pest Report Types

use serde::{Deserialize, Serialize};

use crate::logic::vision::ClassificationResult;

/// Coarse category derived from a generic classifier's class id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryBucket {
    Insect,
    DiseaseOrPlant,
    Uncertain,
    Other,
}

impl CategoryBucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryBucket::Insect => "insect",
            CategoryBucket::DiseaseOrPlant => "disease_or_plant",
            CategoryBucket::Uncertain => "uncertain",
            CategoryBucket::Other => "other",
        }
    }
}

impl std::fmt::Display for CategoryBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// Agronomic report for one uploaded image
///
/// `bucket` and `class_id` are `None` only on error reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PestReport {
    pub headline: String,
    /// Top-1 probability in [0, 1]
    pub confidence: f32,
    pub treatment: String,
    pub prevention: String,
    /// Classifier identifier, or `"error"`
    pub method: String,
    pub bucket: Option<CategoryBucket>,
    pub severity: Severity,
    pub class_id: Option<usize>,
    pub affected_area_percent: f32,
    #[serde(default)]
    pub alternatives: Vec<ClassificationResult>,
}

impl PestReport {
    pub fn is_error(&self) -> bool {
        self.method == super::rules::ERROR_METHOD
    }
}
