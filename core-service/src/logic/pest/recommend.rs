//! Recommendation Engine
//!
//! Turns a generic classification into agronomic advice. Headline and
//! advice text are a pure function of (class id, confidence, name); only
//! the affected-area estimate draws from an RNG.

use rand::Rng;

use crate::logic::vision::Classification;
use super::mapper::{CategoryMapper, ImageNetRanges};
use super::rules::*;
use super::types::{CategoryBucket, PestReport, Severity};

// ============================================================================
// TEXT
// ============================================================================

/// Underscores to spaces, then title case
///
/// A word starts after whitespace or a hyphen; everything else is lowercased.
pub fn display_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut word_start = true;
    for ch in raw.trim().chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        word_start = ch.is_whitespace() || ch == '-';
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advice {
    pub headline: String,
    pub treatment: String,
    pub prevention: String,
}

/// Headline, treatment and prevention for a bucket
pub fn advice_for(bucket: CategoryBucket, name: &str) -> Advice {
    match bucket {
        CategoryBucket::Insect => Advice {
            headline: format!("Detected: {}", name),
            treatment: numbered(
                format!("1. **Identification:** The AI identified this as **{}**.", name),
                &INSECT_STEPS,
            ),
            prevention: INSECT_PREVENTION.join("\n"),
        },
        CategoryBucket::DiseaseOrPlant => Advice {
            headline: format!("Possible Issue: {}", name),
            treatment: numbered(
                format!("1. **Analysis:** The AI detected patterns resembling **{}**.", name),
                &DISEASE_STEPS,
            ),
            prevention: DISEASE_PREVENTION.join("\n"),
        },
        CategoryBucket::Uncertain => Advice {
            headline: format!("Unsure (Resembles {})", name),
            treatment: UNCERTAIN_TREATMENT.to_string(),
            prevention: UNCERTAIN_PREVENTION.to_string(),
        },
        CategoryBucket::Other => Advice {
            headline: format!("Analysis: {}", name),
            treatment: numbered(
                format!("• The image appears to be **{}**.", name),
                &OTHER_NOTES,
            ),
            prevention: OTHER_PREVENTION.to_string(),
        },
    }
}

fn numbered(first: String, rest: &[&str]) -> String {
    let mut lines = Vec::with_capacity(rest.len() + 1);
    lines.push(first);
    lines.extend(rest.iter().map(|s| s.to_string()));
    lines.join("\n")
}

// ============================================================================
// SEVERITY & AREA
// ============================================================================

pub fn severity(bucket: CategoryBucket, confidence: f32, class_name: &str) -> Severity {
    match bucket {
        CategoryBucket::Other => Severity::None,
        CategoryBucket::Uncertain => Severity::Low,
        CategoryBucket::Insect | CategoryBucket::DiseaseOrPlant => {
            if confidence > SEVERITY_HIGH_CONFIDENCE {
                let name = class_name.to_lowercase();
                let severe_name = SEVERE_KEYWORDS.iter().any(|k| name.contains(k));
                if bucket == CategoryBucket::DiseaseOrPlant || severe_name {
                    Severity::High
                } else {
                    Severity::Medium
                }
            } else if confidence > SEVERITY_MEDIUM_CONFIDENCE {
                Severity::Medium
            } else {
                Severity::Low
            }
        }
    }
}

/// Rough affected-area percentage; 0 when nothing was found
pub fn estimate_affected_area<R: Rng>(severity: Severity, confidence: f32, rng: &mut R) -> f32 {
    if severity == Severity::None {
        return 0.0;
    }
    let (low, high) = if confidence > SEVERITY_HIGH_CONFIDENCE {
        AREA_HIGH
    } else if confidence > SEVERITY_MEDIUM_CONFIDENCE {
        AREA_MEDIUM
    } else {
        AREA_LOW
    };
    rng.gen_range(low..high)
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct RecommendationEngine {
    mapper: Box<dyn CategoryMapper>,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecommendationEngine {
    pub fn new() -> Self {
        Self::with_mapper(Box::new(ImageNetRanges::default()))
    }

    pub fn with_mapper(mapper: Box<dyn CategoryMapper>) -> Self {
        Self { mapper }
    }

    /// Pure part of the mapping
    pub fn advise(&self, class_id: usize, confidence: f32, class_name: &str) -> (CategoryBucket, Advice) {
        let bucket = self.mapper.bucket(class_id, confidence);
        (bucket, advice_for(bucket, &display_name(class_name)))
    }

    /// Full report for a classification
    pub fn report<R: Rng>(&self, classification: &Classification, rng: &mut R) -> PestReport {
        let top = &classification.top;
        let (bucket, advice) = self.advise(top.class_id, top.confidence, &top.class_name);
        let severity = severity(bucket, top.confidence, &top.class_name);
        let affected_area_percent = estimate_affected_area(severity, top.confidence, rng);

        log::debug!(
            "Pest report: class={} bucket={} severity={}",
            top.class_id,
            bucket,
            severity.as_str()
        );

        PestReport {
            headline: advice.headline,
            confidence: top.confidence,
            treatment: advice.treatment,
            prevention: advice.prevention,
            method: classification.model.clone(),
            bucket: Some(bucket),
            severity,
            class_id: Some(top.class_id),
            affected_area_percent,
            alternatives: classification.ranked.clone(),
        }
    }
}

/// Structured failure result; the message is carried in `treatment`
pub fn error_report(headline: &str, message: impl Into<String>) -> PestReport {
    PestReport {
        headline: headline.to_string(),
        confidence: 0.0,
        treatment: message.into(),
        prevention: String::new(),
        method: ERROR_METHOD.to_string(),
        bucket: None,
        severity: Severity::None,
        class_id: None,
        affected_area_percent: 0.0,
        alternatives: Vec::new(),
    }
}
