use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::error::AppError;
use crate::response::{BaseResponse, ErrorResponse};
use crate::AppState;

use super::dto::{OfferRequest, OfferResult, OfferSuccessResponse};

/// Generate a marketing offer
///
/// Builds a prompt from the offer fields, generates the text and returns it
/// normalized for right-to-left display.
#[utoipa::path(
    post,
    path = "/api/offers/generate",
    tag = "Offer",
    request_body = OfferRequest,
    responses(
        (status = 200, description = "Offer generated", body = OfferSuccessResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Invalid secret key", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse),
        (status = 500, description = "Generation failed", body = ErrorResponse),
        (status = 503, description = "Provider unavailable", body = ErrorResponse)
    )
)]
pub async fn generate_offer(
    State(state): State<AppState>,
    request: Result<Json<OfferRequest>, JsonRejection>,
) -> Result<Json<BaseResponse<OfferResult>>, AppError> {
    let Json(request) = request?;

    tracing::info!(
        category = %request.category,
        tone = ?request.tone,
        has_custom_message = request.custom_message().is_some(),
        "Offer request received"
    );

    let result = state.offer_service.generate_offer(request).await?;

    Ok(Json(BaseResponse::success(result)))
}
