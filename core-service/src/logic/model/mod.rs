//! Model Module - Artifact lifecycle & inference
//!
//! Registry, classifier traits and their ONNX implementations.
//! Easy to swap a model: implement `CropClassifier` / `ImageClassifier`
//! and hand a custom `ArtifactLoader` to the registry.

pub mod checksum;
pub mod config;
pub mod error;
pub mod inference;
pub mod labels;
pub mod registry;

// Re-export common types
pub use config::ModelConfig;
pub use error::{InferenceError, LoadError};
pub use inference::{
    softmax, CropClassifier, CropScores, ImageClassifier, OnnxCropClassifier,
    OnnxImageClassifier, OnnxLoader, IMAGENET_CLASS_COUNT,
};
pub use labels::LabelEncoder;
pub use registry::{ArtifactLoader, ModelRegistry, ModelStatus, RegistryStatus, SlotStatus};
