//! Model Registry
//!
//! Owns loading of the crop and vision artifacts and reports availability.
//!
//! ## Lifecycle
//! - Slots start `Unloaded`.
//! - `load()` tries every slot that is not loaded yet. Failures are logged
//!   and recorded, never returned.
//! - On demand (`crop_classifier()` / `image_classifier()`) an unloaded slot
//!   is loaded, and a failed slot is retried only once `reload_backoff` has
//!   passed since the last attempt.
//! - `unload()` drops every artifact and resets the slots.
//!
//! Loads are serialized by `load_guard`: concurrent first callers block until
//! the winning load has finished and then read its outcome.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::config::ModelConfig;
use super::error::LoadError;
use super::inference::{CropClassifier, ImageClassifier, OnnxLoader};

// ============================================================================
// LOADER TRAIT
// ============================================================================

/// Turns configured artifact paths into ready classifiers
pub trait ArtifactLoader: Send + Sync {
    fn load_crop(&self, config: &ModelConfig) -> Result<Arc<dyn CropClassifier>, LoadError>;
    fn load_vision(&self, config: &ModelConfig) -> Result<Arc<dyn ImageClassifier>, LoadError>;
}

// ============================================================================
// MODEL HANDLE
// ============================================================================

/// Availability of one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Unloaded,
    Loaded,
    LoadFailed,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Unloaded => "unloaded",
            ModelStatus::Loaded => "loaded",
            ModelStatus::LoadFailed => "load_failed",
        }
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One registry slot: the artifact plus what happened when loading it
struct ModelHandle<T: ?Sized> {
    artifact: Option<Arc<T>>,
    status: ModelStatus,
    last_attempt: Option<Instant>,
    last_error: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    attempts: u32,
}

impl<T: ?Sized> ModelHandle<T> {
    fn new() -> Self {
        Self {
            artifact: None,
            status: ModelStatus::Unloaded,
            last_attempt: None,
            last_error: None,
            loaded_at: None,
            attempts: 0,
        }
    }

    fn set_loaded(&mut self, artifact: Arc<T>) {
        self.artifact = Some(artifact);
        self.status = ModelStatus::Loaded;
        self.last_attempt = Some(Instant::now());
        self.last_error = None;
        self.loaded_at = Some(Utc::now());
        self.attempts += 1;
    }

    fn set_failed(&mut self, error: &LoadError) {
        self.artifact = None;
        self.status = ModelStatus::LoadFailed;
        self.last_attempt = Some(Instant::now());
        self.last_error = Some(error.to_string());
        self.loaded_at = None;
        self.attempts += 1;
    }

    fn snapshot(&self) -> SlotStatus {
        SlotStatus {
            status: self.status,
            last_error: self.last_error.clone(),
            loaded_at: self.loaded_at,
            attempts: self.attempts,
        }
    }
}

/// Serializable view of one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotStatus {
    pub status: ModelStatus,
    pub last_error: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub attempts: u32,
}

/// Serializable view of the whole registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryStatus {
    pub crop: SlotStatus,
    pub vision: SlotStatus,
}

/// What an on-demand access should do with a slot
enum Access<T: ?Sized> {
    Ready(Arc<T>),
    Unavailable,
    NeedsLoad,
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Process-wide owner of model artifacts, shared by `Arc`
pub struct ModelRegistry {
    config: ModelConfig,
    loader: Box<dyn ArtifactLoader>,
    crop: RwLock<ModelHandle<dyn CropClassifier>>,
    vision: RwLock<ModelHandle<dyn ImageClassifier>>,
    load_guard: Mutex<()>,
}

impl ModelRegistry {
    /// Registry backed by ONNX files on disk. Nothing is loaded yet.
    pub fn new(config: ModelConfig) -> Self {
        Self::with_loader(config, Box::new(OnnxLoader))
    }

    pub fn with_loader(config: ModelConfig, loader: Box<dyn ArtifactLoader>) -> Self {
        Self {
            config,
            loader,
            crop: RwLock::new(ModelHandle::new()),
            vision: RwLock::new(ModelHandle::new()),
            load_guard: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Load every slot that is not loaded yet. Never fails.
    ///
    /// Loaded slots are left alone; failed slots are retried immediately.
    pub fn load(&self) {
        let _guard = self.load_guard.lock();

        if self.crop.read().status != ModelStatus::Loaded {
            self.load_crop_locked();
        }
        if self.vision.read().status != ModelStatus::Loaded {
            self.load_vision_locked();
        }
    }

    /// Whether the crop classifier is usable. No side effects.
    pub fn status(&self) -> bool {
        self.crop.read().status == ModelStatus::Loaded
    }

    /// Whether the visual classifier is usable. No side effects.
    pub fn vision_status(&self) -> bool {
        self.vision.read().status == ModelStatus::Loaded
    }

    /// Detailed per-slot status
    pub fn snapshot(&self) -> RegistryStatus {
        RegistryStatus {
            crop: self.crop.read().snapshot(),
            vision: self.vision.read().snapshot(),
        }
    }

    /// Crop classifier, loading it on first use
    pub fn crop_classifier(&self) -> Option<Arc<dyn CropClassifier>> {
        match self.access_crop() {
            Access::Ready(model) => return Some(model),
            Access::Unavailable => return None,
            Access::NeedsLoad => {}
        }

        let _guard = self.load_guard.lock();
        // Another caller may have finished the load while we waited
        if let Access::NeedsLoad = self.access_crop() {
            self.load_crop_locked();
        }
        self.crop.read().artifact.clone()
    }

    /// Visual classifier, loading it on first use
    pub fn image_classifier(&self) -> Option<Arc<dyn ImageClassifier>> {
        match self.access_vision() {
            Access::Ready(model) => return Some(model),
            Access::Unavailable => return None,
            Access::NeedsLoad => {}
        }

        let _guard = self.load_guard.lock();
        if let Access::NeedsLoad = self.access_vision() {
            self.load_vision_locked();
        }
        self.vision.read().artifact.clone()
    }

    /// Last recorded vision load error, if any
    pub fn vision_error(&self) -> Option<String> {
        self.vision.read().last_error.clone()
    }

    /// Drop all artifacts and reset every slot to `Unloaded`
    pub fn unload(&self) {
        let _guard = self.load_guard.lock();
        *self.crop.write() = ModelHandle::new();
        *self.vision.write() = ModelHandle::new();
        log::info!("Model registry unloaded");
    }

    // ------------------------------------------------------------------------

    fn access_crop(&self) -> Access<dyn CropClassifier> {
        let handle = self.crop.read();
        Self::access(&handle, &self.config)
    }

    fn access_vision(&self) -> Access<dyn ImageClassifier> {
        let handle = self.vision.read();
        Self::access(&handle, &self.config)
    }

    fn access<T: ?Sized>(handle: &ModelHandle<T>, config: &ModelConfig) -> Access<T> {
        match handle.status {
            ModelStatus::Loaded => match &handle.artifact {
                Some(model) => Access::Ready(Arc::clone(model)),
                None => Access::NeedsLoad,
            },
            ModelStatus::Unloaded => Access::NeedsLoad,
            ModelStatus::LoadFailed => {
                let backoff_elapsed = handle
                    .last_attempt
                    .map(|t| t.elapsed() >= config.reload_backoff)
                    .unwrap_or(true);
                if backoff_elapsed {
                    Access::NeedsLoad
                } else {
                    Access::Unavailable
                }
            }
        }
    }

    // Callers must hold `load_guard`.
    fn load_crop_locked(&self) {
        match self.loader.load_crop(&self.config) {
            Ok(model) => {
                log::info!(
                    "Crop recommendation model loaded from: {}",
                    self.config.crop_model_path.display()
                );
                self.crop.write().set_loaded(model);
            }
            Err(e) => {
                log::warn!("Could not load crop model: {} - using rule-based fallback", e);
                self.crop.write().set_failed(&e);
            }
        }
    }

    // Callers must hold `load_guard`.
    fn load_vision_locked(&self) {
        match self.loader.load_vision(&self.config) {
            Ok(model) => {
                log::info!(
                    "Visual classifier loaded from: {}",
                    self.config.vision_model_path.display()
                );
                self.vision.write().set_loaded(model);
            }
            Err(LoadError::Disabled) => {
                log::info!("Visual classifier disabled by configuration");
                self.vision.write().set_failed(&LoadError::Disabled);
            }
            Err(e) => {
                log::warn!("Could not load visual classifier: {}", e);
                self.vision.write().set_failed(&e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FeatureVector;
    use crate::logic::model::error::InferenceError;
    use crate::logic::model::inference::CropScores;
    use ndarray::Array4;
    use std::sync::atomic::{AtomicU32, AtomicBool, Ordering};
    use std::time::Duration;

    struct StubCrop;

    impl CropClassifier for StubCrop {
        fn name(&self) -> &str {
            "stub"
        }
        fn classes(&self) -> &[String] {
            &[]
        }
        fn predict(&self, _features: &FeatureVector) -> Result<CropScores, InferenceError> {
            Ok(CropScores::Label(0))
        }
    }

    struct StubVision;

    impl ImageClassifier for StubVision {
        fn name(&self) -> &str {
            "stub"
        }
        fn class_names(&self) -> &[String] {
            &[]
        }
        fn predict(&self, _input: Array4<f32>) -> Result<Vec<f32>, InferenceError> {
            Ok(vec![])
        }
    }

    /// Counts attempts; succeeds only when `succeed` is set
    #[derive(Default)]
    struct CountingLoader {
        crop_attempts: Arc<AtomicU32>,
        vision_attempts: Arc<AtomicU32>,
        succeed: Arc<AtomicBool>,
    }

    impl ArtifactLoader for CountingLoader {
        fn load_crop(&self, config: &ModelConfig) -> Result<Arc<dyn CropClassifier>, LoadError> {
            self.crop_attempts.fetch_add(1, Ordering::SeqCst);
            if self.succeed.load(Ordering::SeqCst) {
                Ok(Arc::new(StubCrop))
            } else {
                Err(LoadError::Missing(config.crop_model_path.clone()))
            }
        }

        fn load_vision(&self, config: &ModelConfig) -> Result<Arc<dyn ImageClassifier>, LoadError> {
            self.vision_attempts.fetch_add(1, Ordering::SeqCst);
            if self.succeed.load(Ordering::SeqCst) {
                Ok(Arc::new(StubVision))
            } else {
                Err(LoadError::Missing(config.vision_model_path.clone()))
            }
        }
    }

    fn counting_registry(backoff: Duration, succeed: bool) -> (ModelRegistry, Arc<AtomicU32>, Arc<AtomicBool>) {
        let loader = CountingLoader::default();
        loader.succeed.store(succeed, Ordering::SeqCst);
        let attempts = Arc::clone(&loader.crop_attempts);
        let flag = Arc::clone(&loader.succeed);
        let config = ModelConfig::in_dir("unused").with_reload_backoff(backoff);
        (ModelRegistry::with_loader(config, Box::new(loader)), attempts, flag)
    }

    #[test]
    fn test_starts_unloaded() {
        let (registry, attempts, _) = counting_registry(Duration::ZERO, true);
        assert!(!registry.status());
        assert_eq!(registry.snapshot().crop.status, ModelStatus::Unloaded);
        assert_eq!(attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_load_is_idempotent_after_success() {
        let (registry, attempts, _) = counting_registry(Duration::ZERO, true);
        registry.load();
        registry.load();
        registry.load();
        assert!(registry.status());
        assert!(registry.vision_status());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_failure_is_absorbed() {
        let (registry, _, _) = counting_registry(Duration::ZERO, false);
        registry.load();
        assert!(!registry.status());
        let snapshot = registry.snapshot();
        assert_eq!(snapshot.crop.status, ModelStatus::LoadFailed);
        assert!(snapshot.crop.last_error.unwrap().contains("not found"));
    }

    #[test]
    fn test_lazy_load_on_first_access() {
        let (registry, attempts, _) = counting_registry(Duration::ZERO, true);
        assert!(registry.crop_classifier().is_some());
        assert!(registry.crop_classifier().is_some());
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_backoff_suppresses_retries() {
        let (registry, attempts, _) = counting_registry(Duration::from_secs(3600), false);
        for _ in 0..10 {
            assert!(registry.crop_classifier().is_none());
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_load_retries_despite_backoff() {
        let (registry, attempts, succeed) = counting_registry(Duration::from_secs(3600), false);
        registry.load();
        assert!(!registry.status());

        succeed.store(true, Ordering::SeqCst);
        registry.load();
        assert!(registry.status());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_retry_after_backoff_elapsed() {
        let (registry, attempts, succeed) = counting_registry(Duration::ZERO, false);
        assert!(registry.crop_classifier().is_none());
        succeed.store(true, Ordering::SeqCst);
        assert!(registry.crop_classifier().is_some());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unload_resets_slots() {
        let (registry, attempts, _) = counting_registry(Duration::ZERO, true);
        registry.load();
        registry.unload();
        assert!(!registry.status());
        assert_eq!(registry.snapshot().crop.status, ModelStatus::Unloaded);

        assert!(registry.crop_classifier().is_some());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_first_use_loads_once() {
        let (registry, attempts, _) = counting_registry(Duration::ZERO, true);
        let registry = Arc::new(registry);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.crop_classifier().is_some())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_directory_with_onnx_loader() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModelRegistry::new(ModelConfig::in_dir(dir.path().join("absent")));
        registry.load();
        assert!(!registry.status());
        assert!(!registry.vision_status());
        assert!(registry.vision_error().is_some());
    }
}
