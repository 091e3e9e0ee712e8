use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::category::CategoryKind;

/// Voice of the generated offer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OfferTone {
    /// رسمی
    #[default]
    Formal,
    /// صمیمی
    Friendly,
    /// پرانرژی
    Energetic,
}

impl OfferTone {
    /// Instruction embedded in the system prompt
    pub fn description(self) -> &'static str {
        match self {
            OfferTone::Formal => "لحن متن رسمی، محترمانه و حرفه‌ای باشد.",
            OfferTone::Friendly => "لحن متن صمیمی و گرم باشد، اما از زبان محاوره‌ای افراطی پرهیز کن.",
            OfferTone::Energetic => "لحن متن پرانرژی و هیجان‌انگیز باشد و حس فوریت ایجاد کند.",
        }
    }
}

/// Offer generation request
///
/// Required text fields default to empty so that a missing field is reported
/// as a validation error rather than a JSON parse failure.
#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    /// Campaign goal
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "هدف پیشنهاد الزامی است"))]
    #[schema(example = "افزایش فروش آخر هفته")]
    pub goal: String,

    /// Free-form discount description, e.g. "20% off"
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "نوع تخفیف الزامی است"))]
    #[schema(example = "20% تخفیف")]
    pub discount_type: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "محصول یا خدمت الزامی است"))]
    #[schema(example = "قهوه")]
    pub product_or_service: String,

    /// Category slug, e.g. `cafe`
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "دسته‌بندی الزامی است"))]
    #[schema(example = "cafe")]
    pub category: String,

    #[validate(length(max = 1000, message = "پیام سفارشی حداکثر ۱۰۰۰ کاراکتر است"))]
    pub custom_message: Option<String>,

    /// ISO date (`YYYY-MM-DD`)
    #[serde(default)]
    #[validate(length(min = 1, message = "تاریخ شروع الزامی است"))]
    #[schema(example = "2024-06-01")]
    pub start_date: String,

    /// ISO date (`YYYY-MM-DD`)
    #[serde(default)]
    #[validate(length(min = 1, message = "تاریخ پایان الزامی است"))]
    #[schema(example = "2024-06-07")]
    pub end_date: String,

    #[serde(default)]
    pub tone: OfferTone,

    /// Shared service secret
    #[serde(default, skip_serializing)]
    #[validate(length(min = 1, message = "کلید محرمانه الزامی است"))]
    pub secret_key: String,
}

impl OfferRequest {
    /// Custom message, if it carries any text
    pub fn custom_message(&self) -> Option<&str> {
        self.custom_message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Generated offer
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferResult {
    /// Normalized offer text, ready for RTL display
    pub description: String,

    pub category_kind: CategoryKind,

    /// Discount number enforced on the text, if the discount type had one
    #[schema(example = "20")]
    pub applied_discount: Option<String>,
}

/// Offer success envelope (OpenAPI schema)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferSuccessResponse {
    #[schema(example = true)]
    pub is_success: bool,
    #[schema(example = "COMMON200")]
    pub code: String,
    pub message: String,
    pub result: OfferResult,
}
