//! Label Loading
//!
//! Class-index to name tables for both classifiers.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::LoadError;

// ============================================================================
// CROP LABEL ENCODER
// ============================================================================

/// Crop names in classifier output order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    pub classes: Vec<String>,
}

/// Accepted on-disk shapes: `{"classes": [...]}`, `{"crops": [...]}` or a bare array
#[derive(Deserialize)]
#[serde(untagged)]
enum LabelEncoderFile {
    Classes { classes: Vec<String> },
    Crops { crops: Vec<String> },
    Bare(Vec<String>),
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Read and validate a label encoder JSON file
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::Missing(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let parsed: LabelEncoderFile =
            serde_json::from_str(&content).map_err(|e| LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let classes = match parsed {
            LabelEncoderFile::Classes { classes } => classes,
            LabelEncoderFile::Crops { crops } => crops,
            LabelEncoderFile::Bare(classes) => classes,
        };

        if classes.is_empty() {
            return Err(LoadError::Incompatible(format!(
                "label encoder {} has no classes",
                path.display()
            )));
        }

        Ok(Self::new(classes))
    }

    /// Class index back to crop name
    pub fn inverse_transform(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// ============================================================================
// VISION LABELS
// ============================================================================

/// Read a class-name list, one entry per line
///
/// Blank lines are kept so that line numbers stay aligned with class ids.
pub fn read_class_names(path: &Path) -> Result<Vec<String>, LoadError> {
    if !path.exists() {
        return Err(LoadError::Missing(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().map(|s| s.trim().to_string()).collect())
}

/// Placeholder names used when no label file is shipped with the weights
pub fn placeholder_class_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("class_{}", i)).collect()
}
