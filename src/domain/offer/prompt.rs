use crate::error::AppError;

use super::category::CategoryKind;
use super::date::{format_naive_date, parse_date};
use super::dto::OfferRequest;

pub const OFFER_TEMPERATURE: f32 = 0.5;
pub const OFFER_MAX_TOKENS: u16 = 200;

pub const EDITOR_TEMPERATURE: f32 = 0.4;
pub const EDITOR_MAX_TOKENS: u16 = 120;

/// System role for the input-enhancement pre-pass
pub const EDITOR_SYSTEM_PROMPT: &str = "شما ویراستار حرفه‌ای فارسی در حوزه متن‌های تجاری هستید. \
متن‌ها باید رسمی، دقیق و کوتاه باشند. فقط متن ویرایش‌شده را بدون توضیح اضافه برگردان.";

/// User instruction for the input-enhancement pre-pass
pub fn editor_user_prompt(input: &str) -> String {
    format!(
        "لطفاً این متن فارسی را برای استفاده رسمی تجاری به‌صورت حرفه‌ای، رسمی و کوتاه ویرایش کن:\n\"{}\"",
        input.trim()
    )
}

/// Instruction pair sent to the generator for one offer
#[derive(Debug, Clone, PartialEq)]
pub struct OfferPrompt {
    pub system: String,
    pub user: String,
}

impl OfferPrompt {
    /// Render an offer request into a system/user prompt pair.
    ///
    /// Fails when a required field is blank, a date does not parse, or the
    /// offer ends before it starts.
    pub fn build(request: &OfferRequest) -> Result<Self, AppError> {
        let goal = required(&request.goal, "هدف پیشنهاد")?;
        let discount_type = required(&request.discount_type, "نوع تخفیف")?;
        let product_or_service = required(&request.product_or_service, "محصول یا خدمت")?;
        let category = required(&request.category, "دسته‌بندی")?;
        required(&request.start_date, "تاریخ شروع")?;
        required(&request.end_date, "تاریخ پایان")?;

        let start = parse_date(&request.start_date)?;
        let end = parse_date(&request.end_date)?;
        if end < start {
            return Err(AppError::validation(
                "تاریخ پایان نمی‌تواند قبل از تاریخ شروع باشد",
            ));
        }
        let start_date = format_naive_date(start);
        let end_date = format_naive_date(end);

        let kind = CategoryKind::from_slug(category);
        let label = kind.label();

        let details = request
            .custom_message()
            .map(|message| format!(" جزئیات تکمیلی: {message}"))
            .unwrap_or_default();

        let user = format!(
            r#"بیزینسی با موضوع "{product_or_service}" در دسته‌بندی {category} که مربوط به {label} است، قصد دارد با هدف "{goal}"، پیشنهادی با نوع تخفیف "{discount_type}" از تاریخ {start_date} تا {end_date} ارائه دهد.{details}

لطفاً یک پیشنهاد جذاب و مؤثر بنویس، با توجه به اینکه این مورد مربوط به {label} است. از واژگان مرتبط با {label} استفاده کن.

## قوانین
1. نام ماه‌ها را فقط با املای کامل و دقیق انگلیسی بنویس (مثلاً June).
2. از هشتگ استفاده نکن.
3. هیچ کد تخفیفی از خودت نساز.
4. تاریخ پایان را دقیقاً به صورت "{end_date}" بنویس.
5. جملات کوتاه و خبری بنویس.
6. متن حداکثر ۳ خط باشد."#
        );

        Ok(Self {
            system: system_prompt(request, kind),
            user,
        })
    }
}

fn system_prompt(request: &OfferRequest, kind: CategoryKind) -> String {
    format!(
        "شما یک کپی‌رایتر فارسی هستید که وظیفه تولید پیشنهادهای بازاریابی متناسب با نوع بیزینس \
(محصول، خدمات یا محتوا) را دارد. این بیزینس در حوزه {} فعالیت می‌کند. \
از واژگان مرتبط استفاده کنید، از کلی‌گویی یا جملات بی‌ربط خودداری کنید، \
و ماه‌ها و اعداد را به صورت صحیح و انگلیسی نمایش دهید.\n{}",
        kind.label(),
        request.tone.description()
    )
}

fn required<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} الزامی است")));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::offer::dto::OfferTone;

    fn sample_request() -> OfferRequest {
        OfferRequest {
            goal: "فروش آخر هفته".to_string(),
            discount_type: "20% off".to_string(),
            product_or_service: "قهوه".to_string(),
            category: "cafe".to_string(),
            custom_message: None,
            start_date: "2024-06-01".to_string(),
            end_date: "2024-06-07".to_string(),
            tone: OfferTone::Formal,
            secret_key: "secret".to_string(),
        }
    }

    #[test]
    fn should_embed_formatted_dates() {
        // Arrange
        let request = sample_request();

        // Act
        let prompt = OfferPrompt::build(&request).unwrap();

        // Assert
        assert!(prompt.user.contains("از تاریخ 1 June 2024 تا 7 June 2024"));
        assert!(prompt.user.contains("دقیقاً به صورت \"7 June 2024\""));
    }

    #[test]
    fn should_embed_fields_and_category_label() {
        // Arrange
        let request = sample_request();

        // Act
        let prompt = OfferPrompt::build(&request).unwrap();

        // Assert
        assert!(prompt.user.contains("\"قهوه\""));
        assert!(prompt.user.contains("\"20% off\""));
        assert!(prompt.user.contains("مربوط به خدمات"));
        assert!(prompt.system.contains("خدمات"));
        assert!(!prompt.user.contains("جزئیات تکمیلی"));
    }

    #[test]
    fn should_state_formatting_rules() {
        let prompt = OfferPrompt::build(&sample_request()).unwrap();

        assert!(prompt.user.contains("هشتگ"));
        assert!(prompt.user.contains("کد تخفیفی"));
        assert!(prompt.user.contains("حداکثر ۳ خط"));
        assert!(prompt.user.contains("انگلیسی"));
    }

    #[test]
    fn should_include_custom_message_when_present() {
        // Arrange
        let mut request = sample_request();
        request.custom_message = Some("  ارسال رایگان  ".to_string());

        // Act
        let prompt = OfferPrompt::build(&request).unwrap();

        // Assert
        assert!(prompt.user.contains("جزئیات تکمیلی: ارسال رایگان"));
    }

    #[test]
    fn should_embed_tone_description() {
        // Arrange
        let mut request = sample_request();
        request.tone = OfferTone::Energetic;

        // Act
        let prompt = OfferPrompt::build(&request).unwrap();

        // Assert
        assert!(prompt.system.contains(OfferTone::Energetic.description()));
    }

    #[test]
    fn should_reject_blank_required_field() {
        // Arrange
        let mut request = sample_request();
        request.goal = "   ".to_string();

        // Act
        let result = OfferPrompt::build(&request);

        // Assert
        assert!(matches!(result, Err(AppError::ValidationError(m)) if m.contains("هدف")));
    }

    #[test]
    fn should_reject_unparseable_date() {
        let mut request = sample_request();
        request.start_date = "2024-13-01".to_string();

        assert!(matches!(
            OfferPrompt::build(&request),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn should_reject_end_before_start() {
        // Arrange
        let mut request = sample_request();
        request.start_date = "2024-06-07".to_string();
        request.end_date = "2024-06-01".to_string();

        // Act
        let result = OfferPrompt::build(&request);

        // Assert
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn single_day_offer_should_be_accepted() {
        let mut request = sample_request();
        request.end_date = request.start_date.clone();

        assert!(OfferPrompt::build(&request).is_ok());
    }

    #[test]
    fn should_be_deterministic() {
        let request = sample_request();
        assert_eq!(
            OfferPrompt::build(&request).unwrap(),
            OfferPrompt::build(&request).unwrap()
        );
    }

    #[test]
    fn editor_prompt_should_quote_trimmed_input() {
        assert_eq!(
            editor_user_prompt("  سلام "),
            "لطفاً این متن فارسی را برای استفاده رسمی تجاری به‌صورت حرفه‌ای، رسمی و کوتاه ویرایش کن:\n\"سلام\""
        );
    }
}
