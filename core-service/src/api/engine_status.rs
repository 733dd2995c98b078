use serde::{Deserialize, Serialize};

use chrono::{DateTime, Utc};

use crate::logic::model::{ModelStatus, SlotStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub app_name: String,
    pub version: String,

    pub crop_model: ModelInfo,
    pub vision_model: ModelInfo,

    pub inference_count: u64,
    pub fallback_count: u64,
    pub error_count: u64,
    pub avg_latency_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub loaded: bool,
    pub status: ModelStatus, // unloaded | loaded | load_failed
    pub path: String,
    pub last_error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

impl ModelInfo {
    pub fn from_slot(name: &str, path: &std::path::Path, slot: SlotStatus) -> Self {
        Self {
            name: name.to_string(),
            loaded: slot.status == ModelStatus::Loaded,
            status: slot.status,
            path: path.display().to_string(),
            last_error: slot.last_error,
            loaded_at: slot.loaded_at,
            attempts: slot.attempts,
        }
    }
}
