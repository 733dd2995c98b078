//! Inference Engine
//!
//! Single entry point for callers. Owns the registry and wires the crop
//! predictor, the image classifier and the recommendation engine to it.
//! Every call returns a result value; model trouble shows up as a
//! `rule_based` prediction or an `error` report, never as a failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;

use crate::constants::{APP_NAME, APP_VERSION};
use crate::logic::crop::{CropPrediction, CropPredictor, CropRecommendation, PredictionMethod};
use crate::logic::features::FeatureVector;
use crate::logic::model::inference::{CROP_MODEL_NAME, VISION_MODEL_NAME};
use crate::logic::model::{ModelConfig, ModelRegistry};
use crate::logic::pest::rules::{ERROR_HEADLINE_PROCESSING, ERROR_HEADLINE_UNAVAILABLE};
use crate::logic::pest::{error_report, PestReport, RecommendationEngine};
use crate::logic::vision::{ClassifyError, ImageCategoryClassifier};
use super::engine_status::{EngineStatus, ModelInfo};

// ============================================================================
// STATS
// ============================================================================

#[derive(Debug, Default)]
struct EngineStats {
    inferences: AtomicU64,
    fallbacks: AtomicU64,
    errors: AtomicU64,
    total_latency_us: AtomicU64,
}

impl EngineStats {
    fn record(&self, started: Instant) {
        let micros = started.elapsed().as_micros() as u64;
        self.inferences.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us.fetch_add(micros, Ordering::Relaxed);
    }

    fn avg_latency_ms(&self) -> f64 {
        let count = self.inferences.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.total_latency_us.load(Ordering::Relaxed) as f64 / count as f64 / 1000.0
    }
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct Engine {
    registry: Arc<ModelRegistry>,
    crop: CropPredictor,
    vision: ImageCategoryClassifier,
    recommender: RecommendationEngine,
    stats: EngineStats,
}

impl Engine {
    pub fn new(config: ModelConfig) -> Self {
        Self::with_registry(Arc::new(ModelRegistry::new(config)))
    }

    /// Engine configured from `AGROMIND_*` environment variables
    pub fn from_env() -> Self {
        Self::new(ModelConfig::from_env())
    }

    pub fn with_registry(registry: Arc<ModelRegistry>) -> Self {
        Self {
            crop: CropPredictor::new(Arc::clone(&registry)),
            vision: ImageCategoryClassifier::new(Arc::clone(&registry)),
            recommender: RecommendationEngine::new(),
            registry,
            stats: EngineStats::default(),
        }
    }

    /// Swap the bucket mapping, e.g. for a domain-trained classifier
    pub fn with_recommender(mut self, recommender: RecommendationEngine) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Eager load of every artifact; failures are recorded, not returned
    pub fn load(&self) {
        self.registry.load();
    }

    pub fn unload(&self) {
        self.registry.unload();
    }

    // ------------------------------------------------------------------------
    // Crop path
    // ------------------------------------------------------------------------

    pub fn predict_crop(&self, features: &FeatureVector) -> CropPrediction {
        let started = Instant::now();
        let prediction = self.crop.predict(features);
        if prediction.method == PredictionMethod::RuleBased {
            self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.record(started);
        prediction
    }

    pub fn recommend_crops(&self, features: &FeatureVector, k: usize) -> CropRecommendation {
        let started = Instant::now();
        let recommendation = self.crop.recommend(features, k);
        if recommendation.method == PredictionMethod::RuleBased {
            self.stats.fallbacks.fetch_add(1, Ordering::Relaxed);
        }
        self.stats.record(started);
        recommendation
    }

    // ------------------------------------------------------------------------
    // Pest path
    // ------------------------------------------------------------------------

    /// Classify an uploaded image and build the pest report
    ///
    /// The caller is expected to have rejected non-image uploads already.
    pub fn classify_pest_image(&self, image_bytes: &[u8]) -> PestReport {
        self.classify_pest_image_with_rng(image_bytes, &mut rand::thread_rng())
    }

    pub fn classify_pest_image_with_rng<R: Rng>(&self, image_bytes: &[u8], rng: &mut R) -> PestReport {
        let started = Instant::now();
        let report = match self.vision.classify(image_bytes) {
            Ok(classification) => self.recommender.report(&classification, rng),
            Err(ClassifyError::Unavailable(reason)) => {
                log::warn!("Pest detection without visual classifier: {}", reason);
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                error_report(ERROR_HEADLINE_UNAVAILABLE, format!("visual classifier unavailable: {}", reason))
            }
            Err(ClassifyError::Inference(e)) => {
                log::error!("Pest detection failed: {}", e);
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                error_report(ERROR_HEADLINE_PROCESSING, e.to_string())
            }
        };
        self.stats.record(started);
        report
    }

    // ------------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------------

    pub fn status(&self) -> EngineStatus {
        let snapshot = self.registry.snapshot();
        let config = self.registry.config();

        EngineStatus {
            app_name: APP_NAME.to_string(),
            version: APP_VERSION.to_string(),
            crop_model: ModelInfo::from_slot(CROP_MODEL_NAME, &config.crop_model_path, snapshot.crop),
            vision_model: ModelInfo::from_slot(VISION_MODEL_NAME, &config.vision_model_path, snapshot.vision),
            inference_count: self.stats.inferences.load(Ordering::Relaxed),
            fallback_count: self.stats.fallbacks.load(Ordering::Relaxed),
            error_count: self.stats.errors.load(Ordering::Relaxed),
            avg_latency_ms: self.stats.avg_latency_ms(),
        }
    }
}
