//! Image Category Classifier
//!
//! Runs the generic visual classifier over an uploaded image and reports
//! the arg-max class with its probability.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::model::{ImageClassifier, InferenceError, ModelRegistry};
use super::preprocess::preprocess;

/// Number of runner-up classes kept alongside the top-1 result
pub const DEFAULT_TOP_K: usize = 3;

/// One class with its softmax probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class_id: usize,
    pub class_name: String,
    pub confidence: f32,
}

/// Top-1 plus the ranked runners-up from one forward pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub top: ClassificationResult,
    pub ranked: Vec<ClassificationResult>,
    pub model: String,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("visual classifier unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

pub struct ImageCategoryClassifier {
    registry: Arc<ModelRegistry>,
}

impl ImageCategoryClassifier {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Decode, preprocess and classify one image
    pub fn classify(&self, image_bytes: &[u8]) -> Result<Classification, ClassifyError> {
        // Availability first: without a model nothing is decoded
        let model = self.registry.image_classifier().ok_or_else(|| {
            ClassifyError::Unavailable(
                self.registry
                    .vision_error()
                    .unwrap_or_else(|| "not loaded".to_string()),
            )
        })?;

        let input = preprocess(image_bytes)?;

        let probabilities = model.predict(input)?;
        let ranked = top_k(model.as_ref(), &probabilities, DEFAULT_TOP_K);
        let top = ranked
            .first()
            .cloned()
            .ok_or_else(|| InferenceError::Shape("empty probability vector".to_string()))?;

        log::debug!(
            "Image classified as {} ({}) p={:.3}",
            top.class_id,
            top.class_name,
            top.confidence
        );

        Ok(Classification {
            top,
            ranked,
            model: model.name().to_string(),
        })
    }
}

/// Highest `k` classes, descending; ties keep the lower class id first
pub fn top_k(model: &dyn ImageClassifier, probabilities: &[f32], k: usize) -> Vec<ClassificationResult> {
    let names = model.class_names();
    let mut indices: Vec<usize> = (0..probabilities.len()).collect();
    // Stable sort preserves id order among equal probabilities
    indices.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    indices
        .into_iter()
        .take(k.max(1))
        .map(|id| ClassificationResult {
            class_id: id,
            class_name: names
                .get(id)
                .filter(|n| !n.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("class_{}", id)),
            confidence: probabilities[id].clamp(0.0, 1.0),
        })
        .collect()
}
