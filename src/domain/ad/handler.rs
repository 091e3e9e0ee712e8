use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::AppError;
use crate::response::{BaseResponse, ErrorResponse};
use crate::AppState;

use super::dto::{AdRequest, AdResult, AdSuccessResponse};

/// Generate an advertisement
///
/// Produces one line of ad copy and an English image-generation prompt.
#[utoipa::path(
    post,
    path = "/api/ads/generate",
    tag = "Ad",
    request_body = AdRequest,
    responses(
        (status = 200, description = "Ad generated", body = AdSuccessResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid secret key", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse),
        (status = 503, description = "Provider unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_ad(
    State(state): State<AppState>,
    request: Result<Json<AdRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<AdResult>>, AppError> {
    let Json(request) = request?;

    tracing::info!(
        has_uploaded_image = request.has_uploaded_image,
        description_length = request.description.chars().count(),
        "Ad request received"
    );

    let result = state.ad_service.generate_ad(request).await?;

    Ok(Json(BaseResponse::success(result)))
}
