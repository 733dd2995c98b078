//! Inference Engine - ONNX Runtime Integration
//!
//! Classifier traits the predictors depend on, and their ONNX-backed
//! implementations. Swapping a model means implementing a trait here,
//! nothing downstream changes.

use std::path::{Path, PathBuf};

use ndarray::{Array2, Array4};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;

use crate::logic::features::{FeatureVector, FEATURE_COUNT};
use crate::logic::vision::CROP_SIZE;
use super::checksum::verify_checksum;
use super::config::ModelConfig;
use super::error::{InferenceError, LoadError};
use super::labels::{placeholder_class_names, read_class_names, LabelEncoder};
use super::registry::ArtifactLoader;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Size of the generic visual classifier's label space
pub const IMAGENET_CLASS_COUNT: usize = 1000;

/// Method tag reported for the tabular classifier
pub const CROP_MODEL_NAME: &str = "crop_classifier_onnx";

/// Method tag reported for the visual classifier
pub const VISION_MODEL_NAME: &str = "resnet50_imagenet";

// ============================================================================
// CLASSIFIER TRAITS
// ============================================================================

/// Raw output of one tabular forward pass
#[derive(Debug, Clone, PartialEq)]
pub enum CropScores {
    /// Per-class probabilities, indexed like `CropClassifier::classes`
    Probabilities(Vec<f32>),
    /// Only a hard label is available
    Label(usize),
}

/// Tabular classifier: 7 features in, crop class out
pub trait CropClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Class names in output index order
    fn classes(&self) -> &[String];

    fn predict(&self, features: &FeatureVector) -> Result<CropScores, InferenceError>;
}

/// Visual classifier: preprocessed NCHW tensor in, class probabilities out
pub trait ImageClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// Class names in output index order
    fn class_names(&self) -> &[String];

    /// Probabilities over `class_names`, summing to 1
    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError>;
}

// ============================================================================
// HELPERS
// ============================================================================

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum > 0.0 && sum.is_finite() {
        exps.into_iter().map(|e| e / sum).collect()
    } else {
        vec![0.0; logits.len()]
    }
}

fn corrupt(path: &Path, reason: String) -> LoadError {
    LoadError::Corrupt { path: path.to_path_buf(), reason }
}

/// Create an ONNX Runtime session for a model file
fn build_session(path: &Path) -> Result<Session, LoadError> {
    log::info!("Loading ONNX model from: {}", path.display());

    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }

    let session = Session::builder()
        .map_err(|e| corrupt(path, format!("Failed to create session builder: {}", e)))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| corrupt(path, format!("Failed to set optimization: {}", e)))?
        .commit_from_file(path)
        .map_err(|e| corrupt(path, format!("Failed to load model: {}", e)))?;

    Ok(session)
}

// ============================================================================
// ONNX CROP CLASSIFIER
// ============================================================================

/// Tabular classifier exported to ONNX
///
/// Expects a `[1, 7]` float input and an int64 label output. A float
/// `[1, n_classes]` output whose name contains `prob` is used for confidences
/// when present (export without a zipmap).
pub struct OnnxCropClassifier {
    session: Mutex<Session>,
    encoder: LabelEncoder,
    label_output: String,
    probability_output: Option<String>,
    model_path: PathBuf,
}

impl OnnxCropClassifier {
    pub fn load(config: &ModelConfig) -> Result<Self, LoadError> {
        let path = &config.crop_model_path;
        if !path.exists() {
            return Err(LoadError::Missing(path.clone()));
        }
        if let Some(expected) = &config.crop_model_sha256 {
            verify_checksum(path, expected)?;
        }

        let encoder = LabelEncoder::load(&config.label_encoder_path)?;
        let session = build_session(path)?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();
        let label_output = output_names
            .first()
            .cloned()
            .ok_or_else(|| LoadError::Incompatible("crop model defines no outputs".to_string()))?;
        let probability_output = output_names.iter().find(|n| n.contains("prob")).cloned();

        let classifier = Self {
            session: Mutex::new(session),
            encoder,
            label_output,
            probability_output,
            model_path: path.clone(),
        };
        classifier.check_output_schema()?;

        log::info!(
            "Crop classifier ready: {} classes, probabilities: {}",
            classifier.encoder.len(),
            classifier.probability_output.is_some()
        );
        Ok(classifier)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// One forward pass on a zero vector to check the output schema
    fn check_output_schema(&self) -> Result<(), LoadError> {
        let zeros = FeatureVector::from([0.0; FEATURE_COUNT]);
        match self.predict(&zeros) {
            Ok(CropScores::Probabilities(p)) if p.len() != self.encoder.len() => {
                Err(LoadError::Incompatible(format!(
                    "model emits {} probabilities, label encoder has {} classes",
                    p.len(),
                    self.encoder.len()
                )))
            }
            Ok(CropScores::Label(i)) if i >= self.encoder.len() => Err(LoadError::Incompatible(
                format!("model label {} outside label encoder range", i),
            )),
            Ok(_) => Ok(()),
            Err(e) => Err(LoadError::Incompatible(format!("schema check inference failed: {}", e))),
        }
    }
}

impl CropClassifier for OnnxCropClassifier {
    fn name(&self) -> &str {
        CROP_MODEL_NAME
    }

    fn classes(&self) -> &[String] {
        &self.encoder.classes
    }

    fn predict(&self, features: &FeatureVector) -> Result<CropScores, InferenceError> {
        let input = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), features.as_array().to_vec())?;
        let input_tensor = Value::from_array(input)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        if let Some(name) = &self.probability_output {
            if let Some(output) = outputs.get(name.as_str()) {
                let data = output
                    .try_extract_tensor::<f32>()
                    .map_err(|e| InferenceError::Shape(format!("Extract error: {}", e)))?
                    .1;
                return Ok(CropScores::Probabilities(data.to_vec()));
            }
        }

        let output = outputs
            .get(self.label_output.as_str())
            .ok_or_else(|| InferenceError::Shape("No label output".to_string()))?;
        let data = output
            .try_extract_tensor::<i64>()
            .map_err(|e| InferenceError::Shape(format!("Extract error: {}", e)))?
            .1;
        let label = data
            .first()
            .copied()
            .ok_or_else(|| InferenceError::Shape("Empty label output".to_string()))?;
        let index = usize::try_from(label)
            .map_err(|_| InferenceError::Shape(format!("Negative label {}", label)))?;

        Ok(CropScores::Label(index))
    }
}

// ============================================================================
// ONNX IMAGE CLASSIFIER
// ============================================================================

/// Generic pretrained visual classifier exported to ONNX
///
/// Input `[1, 3, H, W]`, output `[1, n_classes]` logits.
pub struct OnnxImageClassifier {
    session: Mutex<Session>,
    class_names: Vec<String>,
    model_path: PathBuf,
}

impl OnnxImageClassifier {
    pub fn load(config: &ModelConfig) -> Result<Self, LoadError> {
        if !config.vision_enabled {
            return Err(LoadError::Disabled);
        }

        let session = build_session(&config.vision_model_path)?;

        let class_names = match read_class_names(&config.vision_labels_path) {
            Ok(names) => names,
            Err(LoadError::Missing(path)) => {
                log::warn!(
                    "Vision labels not found at {}, using placeholder names",
                    path.display()
                );
                placeholder_class_names(IMAGENET_CLASS_COUNT)
            }
            Err(e) => return Err(e),
        };

        let classifier = Self {
            session: Mutex::new(session),
            class_names,
            model_path: config.vision_model_path.clone(),
        };
        verify_output_width(&classifier)?;

        log::info!("Visual classifier ready: {} classes", classifier.class_names.len());
        Ok(classifier)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl ImageClassifier for OnnxImageClassifier {
    fn name(&self) -> &str {
        VISION_MODEL_NAME
    }

    fn class_names(&self) -> &[String] {
        &self.class_names
    }

    fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
        let input_tensor = Value::from_array(input)
            .map_err(|e| InferenceError::Runtime(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError::Shape("No output defined".to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Runtime(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(output_name.as_str())
            .ok_or_else(|| InferenceError::Shape("No output".to_string()))?;
        let logits = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Shape(format!("Extract error: {}", e)))?
            .1;

        if logits.len() != self.class_names.len() {
            return Err(InferenceError::Shape(format!(
                "model emits {} scores, {} class names loaded",
                logits.len(),
                self.class_names.len()
            )));
        }

        Ok(softmax(logits))
    }
}

/// One forward pass on a blank image: the label list must match the output width
pub fn verify_output_width(classifier: &dyn ImageClassifier) -> Result<(), LoadError> {
    let side = CROP_SIZE as usize;
    let blank = Array4::<f32>::zeros((1, 3, side, side));
    let expected = classifier.class_names().len();
    match classifier.predict(blank) {
        Ok(scores) if scores.len() == expected => Ok(()),
        Ok(scores) => Err(LoadError::Incompatible(format!(
            "model emits {} scores, {} class names loaded",
            scores.len(),
            expected
        ))),
        Err(e) => Err(LoadError::Incompatible(format!(
            "{} with {} class names: {}",
            classifier.name(),
            expected,
            e
        ))),
    }
}

// ============================================================================
// LOADER
// ============================================================================

/// Loads both classifiers from ONNX files on disk
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl ArtifactLoader for OnnxLoader {
    fn load_crop(&self, config: &ModelConfig) -> Result<std::sync::Arc<dyn CropClassifier>, LoadError> {
        Ok(std::sync::Arc::new(OnnxCropClassifier::load(config)?))
    }

    fn load_vision(&self, config: &ModelConfig) -> Result<std::sync::Arc<dyn ImageClassifier>, LoadError> {
        Ok(std::sync::Arc::new(OnnxImageClassifier::load(config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_large_logits_stable() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-5);
        assert!(probs.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_crop_classifier_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::in_dir(dir.path());
        let err = OnnxCropClassifier::load(&config).err().unwrap();
        assert!(matches!(err, LoadError::Missing(_)));
    }

    #[test]
    fn test_crop_classifier_corrupt_model() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::in_dir(dir.path());
        std::fs::write(&config.crop_model_path, b"definitely not onnx").unwrap();
        std::fs::write(&config.label_encoder_path, r#"{"classes": ["rice"]}"#).unwrap();
        let err = OnnxCropClassifier::load(&config).err().unwrap();
        assert!(matches!(err, LoadError::Corrupt { .. }));
    }

    #[test]
    fn test_crop_classifier_checksum_checked_before_parse() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::in_dir(dir.path()).with_crop_model_sha256("00ff");
        std::fs::write(&config.crop_model_path, b"bytes").unwrap();
        let err = OnnxCropClassifier::load(&config).err().unwrap();
        assert!(matches!(err, LoadError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_image_classifier_disabled() {
        let config = ModelConfig::in_dir("unused").with_vision_enabled(false);
        let err = OnnxImageClassifier::load(&config).err().unwrap();
        assert!(matches!(err, LoadError::Disabled));
    }

    struct BlankVision {
        names: Vec<String>,
        width: usize,
    }

    impl ImageClassifier for BlankVision {
        fn name(&self) -> &str {
            "blank"
        }
        fn class_names(&self) -> &[String] {
            &self.names
        }
        fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            assert_eq!(input.shape(), &[1, 3, 224, 224]);
            Ok(vec![1.0 / self.width as f32; self.width])
        }
    }

    #[test]
    fn test_output_width_must_match_labels() {
        let ok = BlankVision { names: placeholder_class_names(4), width: 4 };
        assert!(verify_output_width(&ok).is_ok());

        let short_labels = BlankVision { names: placeholder_class_names(3), width: 4 };
        let err = verify_output_width(&short_labels).unwrap_err();
        assert!(matches!(err, LoadError::Incompatible(_)));
    }

    #[test]
    fn test_image_classifier_missing_weights() {
        let dir = tempfile::tempdir().unwrap();
        let config = ModelConfig::in_dir(dir.path());
        let err = OnnxImageClassifier::load(&config).err().unwrap();
        assert!(matches!(err, LoadError::Missing(_)));
    }
}
