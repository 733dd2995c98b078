//! Model Configuration
//!
//! Where artifacts live and how the registry treats failed loads.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;

/// Artifact locations and loading policy
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Tabular crop classifier (ONNX)
    pub crop_model_path: PathBuf,

    /// Label encoder for the crop classifier (JSON)
    pub label_encoder_path: PathBuf,

    /// Pinned SHA-256 of the crop classifier, lowercase hex
    pub crop_model_sha256: Option<String>,

    /// Visual classifier weights (ONNX)
    pub vision_model_path: PathBuf,

    /// Visual classifier class names, one per line
    pub vision_labels_path: PathBuf,

    /// Load the visual classifier at all
    pub vision_enabled: bool,

    /// Minimum wait before a failed slot is retried on demand
    pub reload_backoff: Duration,
}

impl ModelConfig {
    /// All artifacts under `dir` with default file names
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            crop_model_path: dir.join(constants::DEFAULT_CROP_MODEL_FILE),
            label_encoder_path: dir.join(constants::DEFAULT_LABEL_ENCODER_FILE),
            crop_model_sha256: None,
            vision_model_path: dir.join(constants::DEFAULT_VISION_MODEL_FILE),
            vision_labels_path: dir.join(constants::DEFAULT_VISION_LABELS_FILE),
            vision_enabled: true,
            reload_backoff: Duration::from_secs(constants::DEFAULT_RELOAD_BACKOFF_SECS),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let dir = PathBuf::from(constants::get_model_dir());
        Self {
            crop_model_path: dir.join(constants::get_crop_model_file()),
            label_encoder_path: dir.join(constants::get_label_encoder_file()),
            crop_model_sha256: constants::get_crop_model_sha256(),
            vision_model_path: dir.join(constants::get_vision_model_file()),
            vision_labels_path: dir.join(constants::get_vision_labels_file()),
            vision_enabled: constants::is_vision_enabled(),
            reload_backoff: constants::get_reload_backoff(),
        }
    }

    pub fn with_reload_backoff(mut self, backoff: Duration) -> Self {
        self.reload_backoff = backoff;
        self
    }

    pub fn with_vision_enabled(mut self, enabled: bool) -> Self {
        self.vision_enabled = enabled;
        self
    }

    pub fn with_crop_model_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.crop_model_sha256 = Some(sha256.into().to_lowercase());
        self
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::in_dir(constants::DEFAULT_MODEL_DIR)
    }
}
