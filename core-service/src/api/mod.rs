//! API Module
//!
//! The `Engine` façade consumed by the HTTP server and any other caller.

pub mod engine;
pub mod engine_status;

pub use engine::Engine;
pub use engine_status::{EngineStatus, ModelInfo};
