//! Central Configuration Constants
//!
//! Single source of truth for artifact locations and tunables.
//! Every value can be overridden from the environment.

use std::time::Duration;

/// Default directory holding all model artifacts
pub const DEFAULT_MODEL_DIR: &str = "models";

/// Tabular crop classifier (exported to ONNX with probability output)
pub const DEFAULT_CROP_MODEL_FILE: &str = "crop_model.onnx";

/// Label encoder for the crop classifier
pub const DEFAULT_LABEL_ENCODER_FILE: &str = "label_encoder.json";

/// Generic pretrained visual classifier (1000 classes)
pub const DEFAULT_VISION_MODEL_FILE: &str = "resnet50.onnx";

/// One class name per line, in output index order
pub const DEFAULT_VISION_LABELS_FILE: &str = "imagenet_classes.txt";

/// Minimum wait before a failed artifact is loaded again on demand (seconds)
pub const DEFAULT_RELOAD_BACKOFF_SECS: u64 = 60;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Agromind AI";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model directory from environment or use default
pub fn get_model_dir() -> String {
    std::env::var("AGROMIND_MODEL_DIR")
        .unwrap_or_else(|_| DEFAULT_MODEL_DIR.to_string())
}

/// Get crop model file name from environment or use default
pub fn get_crop_model_file() -> String {
    std::env::var("AGROMIND_CROP_MODEL")
        .unwrap_or_else(|_| DEFAULT_CROP_MODEL_FILE.to_string())
}

/// Get label encoder file name from environment or use default
pub fn get_label_encoder_file() -> String {
    std::env::var("AGROMIND_LABEL_ENCODER")
        .unwrap_or_else(|_| DEFAULT_LABEL_ENCODER_FILE.to_string())
}

/// Get vision model file name from environment or use default
pub fn get_vision_model_file() -> String {
    std::env::var("AGROMIND_VISION_MODEL")
        .unwrap_or_else(|_| DEFAULT_VISION_MODEL_FILE.to_string())
}

/// Get vision label file name from environment or use default
pub fn get_vision_labels_file() -> String {
    std::env::var("AGROMIND_VISION_LABELS")
        .unwrap_or_else(|_| DEFAULT_VISION_LABELS_FILE.to_string())
}

/// Expected SHA-256 of the crop model, if pinned
pub fn get_crop_model_sha256() -> Option<String> {
    std::env::var("AGROMIND_CROP_MODEL_SHA256")
        .ok()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
}

/// Get reload backoff from environment or use default
pub fn get_reload_backoff() -> Duration {
    let secs = std::env::var("AGROMIND_RELOAD_BACKOFF_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_RELOAD_BACKOFF_SECS);
    Duration::from_secs(secs)
}

/// Check if the visual classifier is enabled
pub fn is_vision_enabled() -> bool {
    std::env::var("AGROMIND_VISION_ENABLED")
        .map(|s| s.to_lowercase() != "false" && s != "0")
        .unwrap_or(true)
}
