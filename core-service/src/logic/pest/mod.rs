//! Pest Module
//!
//! Category buckets, severity and treatment advice on top of the generic
//! visual classifier.

pub mod mapper;
pub mod recommend;
pub mod rules;
pub mod types;

pub use mapper::{bucket_for, CategoryMapper, ImageNetRanges};
pub use recommend::{
    advice_for, display_name, error_report, estimate_affected_area, severity, Advice,
    RecommendationEngine,
};
pub use types::{CategoryBucket, PestReport, Severity};
