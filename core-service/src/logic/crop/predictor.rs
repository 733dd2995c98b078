//! Tabular Crop Predictor
//!
//! Model first, rule table otherwise. The model attempt returns an explicit
//! `Result`; its `Err` branch is the fallback path.

use std::cmp::Ordering;
use std::sync::Arc;

use thiserror::Error;

use crate::logic::features::FeatureVector;
use crate::logic::model::{CropClassifier, CropScores, InferenceError, ModelRegistry};
use super::fallback::fallback_prediction;
use super::insights::{expected_yield, market_potential, reasoning, reasons};
use super::rules::{ASSUMPTIONS, DEFAULT_MODEL_CONFIDENCE, FALLBACK_CROPS, MODEL_SOURCES, RULE_BASED_SOURCES};
use super::types::{CropPrediction, CropRecommendation, PredictionMethod, RecommendedCrop};

// ============================================================================
// ERRORS
// ============================================================================

/// Why the trained classifier could not answer
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("crop model unavailable")]
    ModelUnavailable,

    #[error("classifier label {0} has no crop name")]
    UnknownLabel(usize),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// ============================================================================
// RANKING
// ============================================================================

/// Top `k` (name, probability) pairs, descending; ties by crop name
///
/// Returns at most `k` entries, fewer when there are fewer classes.
pub fn rank_top_k(classes: &[String], probabilities: &[f32], k: usize) -> Vec<(String, f32)> {
    let mut ranked: Vec<(String, f32)> = classes
        .iter()
        .zip(probabilities.iter())
        .map(|(name, &p)| (name.clone(), clamp_confidence(p)))
        .collect();

    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    ranked.truncate(k);
    ranked
}

/// Confidences always land in [0, 1]; NaN counts as 0
fn clamp_confidence(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

// ============================================================================
// PREDICTOR
// ============================================================================

/// Crop path of the core, sharing the registry with the pest path
#[derive(Clone)]
pub struct CropPredictor {
    registry: Arc<ModelRegistry>,
}

impl CropPredictor {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Best crop for the readings. Never fails.
    pub fn predict(&self, features: &FeatureVector) -> CropPrediction {
        match self.try_predict_with_model(features) {
            Ok(prediction) => prediction,
            Err(PredictError::ModelUnavailable) => {
                log::debug!("Crop model unavailable, using rule-based fallback");
                fallback_prediction(features)
            }
            Err(e) => {
                log::warn!("Error in crop prediction: {} - using rule-based fallback", e);
                fallback_prediction(features)
            }
        }
    }

    /// Single best label from the trained classifier
    pub fn try_predict_with_model(&self, features: &FeatureVector) -> Result<CropPrediction, PredictError> {
        let classifier = self.classifier()?;
        let classes = classifier.classes();

        let (crop_name, confidence) = match classifier.predict(features)? {
            CropScores::Probabilities(probabilities) => {
                check_width(&probabilities, classes)?;
                // Same ranking as `recommend`, so top-1 always agrees
                rank_top_k(classes, &probabilities, 1)
                    .pop()
                    .ok_or_else(|| InferenceError::Shape("empty probability output".to_string()))?
            }
            CropScores::Label(index) => {
                let name = classes.get(index).ok_or(PredictError::UnknownLabel(index))?;
                (name.clone(), DEFAULT_MODEL_CONFIDENCE)
            }
        };

        Ok(CropPrediction {
            crop_name,
            confidence: clamp_confidence(confidence),
            method: PredictionMethod::Model,
        })
    }

    /// Ranked top-k crops with yield, market and reasons. Never fails.
    ///
    /// Without probability output (or without a model) the list holds the
    /// single best crop. The list never exceeds `k`; `reasoning` and
    /// `confidence_score` always describe the best crop.
    pub fn recommend(&self, features: &FeatureVector, k: usize) -> CropRecommendation {
        let (mut ranked, method) = match self.try_rank_with_model(features, k.max(1)) {
            Ok(ranked) => (ranked, PredictionMethod::Model),
            Err(e) => {
                if !matches!(e, PredictError::ModelUnavailable) {
                    log::warn!("Error in crop ranking: {} - using rule-based fallback", e);
                }
                let fallback = fallback_prediction(features);
                (vec![(fallback.crop_name, fallback.confidence)], PredictionMethod::RuleBased)
            }
        };

        // ranked is never empty here: k >= 1 and the fallback always yields one
        let (top_name, top_confidence) = ranked.first().cloned().unwrap_or_default();
        ranked.truncate(k);

        let recommended_crops: Vec<RecommendedCrop> = ranked
            .into_iter()
            .map(|(crop_name, confidence)| RecommendedCrop {
                expected_yield: expected_yield(&crop_name).to_string(),
                market_potential: market_potential(confidence),
                reasons: reasons(&crop_name, features, confidence),
                crop_name,
                confidence,
            })
            .collect();

        let sources: &[&str] = match method {
            PredictionMethod::Model => &MODEL_SOURCES[..],
            PredictionMethod::RuleBased => &RULE_BASED_SOURCES[..],
        };

        CropRecommendation {
            reasoning: reasoning(features, &top_name, top_confidence),
            recommended_crops,
            confidence_score: top_confidence,
            method,
            sources: sources.iter().map(|s| s.to_string()).collect(),
            assumptions: ASSUMPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Ranked (name, confidence) from the trained classifier
    pub fn try_rank_with_model(&self, features: &FeatureVector, k: usize) -> Result<Vec<(String, f32)>, PredictError> {
        let classifier = self.classifier()?;
        match classifier.predict(features)? {
            CropScores::Probabilities(probabilities) => {
                check_width(&probabilities, classifier.classes())?;
                Ok(rank_top_k(classifier.classes(), &probabilities, k))
            }
            CropScores::Label(index) => {
                let name = classifier
                    .classes()
                    .get(index)
                    .ok_or(PredictError::UnknownLabel(index))?;
                Ok(vec![(name.clone(), DEFAULT_MODEL_CONFIDENCE)])
            }
        }
    }

    /// Every crop name this predictor can return
    pub fn known_crops(&self) -> Vec<String> {
        let mut crops: Vec<String> = FALLBACK_CROPS.iter().map(|s| s.to_string()).collect();
        if let Some(classifier) = self.registry.crop_classifier() {
            crops.extend(classifier.classes().iter().cloned());
        }
        crops.sort();
        crops.dedup();
        crops
    }

    fn classifier(&self) -> Result<Arc<dyn CropClassifier>, PredictError> {
        self.registry.crop_classifier().ok_or(PredictError::ModelUnavailable)
    }
}

fn check_width(probabilities: &[f32], classes: &[String]) -> Result<(), InferenceError> {
    if probabilities.len() == classes.len() {
        Ok(())
    } else {
        Err(InferenceError::Shape(format!(
            "{} probabilities for {} classes",
            probabilities.len(),
            classes.len()
        )))
    }
}
