use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Advertisement generation request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "عنوان آگهی الزامی است"))]
    #[schema(example = "کافه آفتاب")]
    pub title: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 2000, message = "توضیحات آگهی الزامی است"))]
    #[schema(example = "قهوه تازه دم با دانه‌های عربیکا")]
    pub description: String,

    /// Page or channel the ad points to
    #[serde(default)]
    #[validate(length(min = 1, max = 500, message = "صفحه هدف الزامی است"))]
    #[schema(example = "instagram.com/cafe_aftab")]
    pub target_page: String,

    /// Required unless the caller already uploaded an image
    #[validate(length(max = 1000, message = "توضیحات تصویر حداکثر ۱۰۰۰ کاراکتر است"))]
    pub image_description: Option<String>,

    #[serde(default)]
    pub has_uploaded_image: bool,

    #[serde(default)]
    #[validate(length(min = 1, message = "کلید محرمانه الزامی است"))]
    pub secret_key: String,
}

impl AdRequest {
    /// Image description, if it carries any text
    pub fn image_description(&self) -> Option<&str> {
        self.image_description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// Generated advertisement
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdResult {
    /// Normalized ad copy, ready for RTL display
    pub ad_text: String,

    /// English prompt for an image generator; absent when neither the reply
    /// nor the request described an image
    pub image_prompt: Option<String>,
}

/// Advertisement success envelope (OpenAPI schema)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdSuccessResponse {
    #[schema(example = true)]
    pub is_success: bool,
    #[schema(example = "COMMON200")]
    pub code: String,
    pub message: String,
    pub result: AdResult,
}
