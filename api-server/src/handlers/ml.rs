//! ML inference handlers
//!
//! Thin glue: validate the request, run the engine on the blocking pool,
//! serialize whatever it returns.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;

use agromind_core::{CropPrediction, CropRecommendation, EngineStatus, FeatureVector, PestReport};

use crate::{AppError, AppResult, AppState};

/// Multipart field carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// Top-k size when the query omits `k`
pub const DEFAULT_TOP_K: usize = 3;

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub k: Option<usize>,
}

fn validate_features(features: &FeatureVector) -> AppResult<()> {
    if features.is_finite() {
        Ok(())
    } else {
        Err(AppError::ValidationError("All features must be finite numbers".to_string()))
    }
}

/// Engine status and model availability
pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.engine.status())
}

/// Single best crop
pub async fn crop_recommendation(
    State(state): State<AppState>,
    Json(features): Json<FeatureVector>,
) -> AppResult<Json<CropPrediction>> {
    validate_features(&features)?;

    let engine = state.engine.clone();
    let prediction = tokio::task::spawn_blocking(move || engine.predict_crop(&features)).await?;

    tracing::debug!(
        crop = %prediction.crop_name,
        method = prediction.method.as_str(),
        "Crop prediction served"
    );
    Ok(Json(prediction))
}

/// Ranked crops with yield, market and reasoning
pub async fn top_crops(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
    Json(features): Json<FeatureVector>,
) -> AppResult<Json<CropRecommendation>> {
    validate_features(&features)?;
    let k = query.k.unwrap_or(DEFAULT_TOP_K);
    if k == 0 {
        return Err(AppError::ValidationError("k must be at least 1".to_string()));
    }

    let engine = state.engine.clone();
    let recommendation =
        tokio::task::spawn_blocking(move || engine.recommend_crops(&features, k)).await?;
    Ok(Json(recommendation))
}

/// Pest/disease report for an uploaded photo
pub async fn pest_detection(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<PestReport>> {
    let mut image_bytes = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let is_image = field
            .content_type()
            .map(|ct| ct.starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(AppError::UnsupportedMedia("File must be an image".to_string()));
        }

        image_bytes = Some(field.bytes().await?);
        break;
    }

    let bytes = image_bytes
        .ok_or_else(|| AppError::ValidationError(format!("Missing '{}' field", IMAGE_FIELD)))?;

    let engine = state.engine.clone();
    let report = tokio::task::spawn_blocking(move || engine.classify_pest_image(&bytes)).await?;

    tracing::debug!(headline = %report.headline, method = %report.method, "Pest report served");
    Ok(Json(report))
}
