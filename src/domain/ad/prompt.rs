use std::sync::LazyLock;

use regex::Regex;

use crate::error::AppError;

use super::dto::AdRequest;

pub const AD_TEMPERATURE: f32 = 0.7;
pub const AD_MAX_TOKENS: u16 = 500;

pub const AD_SYSTEM_PROMPT: &str = "شما یک کپی‌رایتر حرفه‌ای فارسی هستید که در تولید آگهی‌های تبلیغاتی تخصص دارید. \
شما باید متن‌های ورودی را به آگهی‌های حرفه‌ای و جذاب فارسی تبدیل کنید. \
متن‌های تولید شده باید رسمی، جذاب و تأثیرگذار باشند و به زبان فارسی روان نوشته شوند. \
در تولید توضیحات تصویر، تصاویر باید مدرن و حرفه‌ای باشند.";

pub const AD_EDITOR_SYSTEM_PROMPT: &str = "شما ویراستار حرفه‌ای فارسی در حوزه متن‌های تبلیغاتی هستید. \
متن‌ها باید رسمی، جذاب و تأثیرگذار باشند. فقط متن ویرایش‌شده را بدون توضیح اضافه برگردان.";

/// Appended to the image description to steer the image generator
pub const IMAGE_STYLE_SUFFIX: &str = "high quality - vibrant colors - clean design - minimalist style - \
professional photography - commercial use - business advertisement - no religious elements - \
no cultural symbols - focus on main subject";

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());
static AD_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\*\*)?(?:متن آگهی\s*:|آگهی\s*:|[1۱]\s*[.\-]\s)(?:\*\*)?\s*").unwrap());
static IMAGE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\*\*)?(?:توضیحات تصویر\s*:|تصویر\s*:|[2۲]\s*[.\-]\s)(?:\*\*)?\s*").unwrap()
});

/// Instruction for the advertising editor pre-pass
pub fn ad_editor_user_prompt(input: &str) -> String {
    format!(
        "لطفاً این متن فارسی را برای استفاده در آگهی تبلیغاتی به‌صورت حرفه‌ای، رسمی و جذاب ویرایش کن:\n\"{}\"",
        input.trim()
    )
}

/// Check the request beyond per-field validation.
pub fn check_request(request: &AdRequest) -> Result<(), AppError> {
    let blank = [&request.title, &request.description, &request.target_page]
        .iter()
        .any(|field| field.trim().is_empty());
    if blank {
        return Err(AppError::validation("لطفاً تمام فیلدهای ضروری را پر کنید"));
    }
    if !request.has_uploaded_image && request.image_description().is_none() {
        return Err(AppError::validation("لطفاً توضیحات تصویر را وارد کنید"));
    }
    Ok(())
}

/// User instruction for one advertisement. Fields are expected to be
/// enhanced already; `image_description` may be empty.
pub fn ad_user_prompt(
    title: &str,
    description: &str,
    target_page: &str,
    image_description: &str,
) -> String {
    format!(
        r#"یک بیزینس با مشخصات زیر قصد دارد یک آگهی تبلیغاتی حرفه‌ای ایجاد کند:

عنوان: {title}
توضیحات اولیه: {description}
صفحه هدف: {target_page}
توضیحات تصویر: {image_description}

لطفاً با توجه به توضیحات اولیه، یک آگهی تبلیغاتی کاملاً جدید و حرفه‌ای ایجاد کن.
پاسخ را در دو بخش بنویس که با یک خط خالی از هم جدا شده باشند: ابتدا متن آگهی، سپس توضیحات تصویر.

متن آگهی باید:
- حداکثر ۱ خط باشد
- رسمی، جذاب و متناسب با صفحه هدف باشد
- شامل call to action مناسب باشد
- عیناً از توضیحات اولیه کپی نشود

توضیحات تصویر باید:
- دقیق، ساده و مرتبط با محتوای آگهی باشد
- مناسب برای تولید تصویر مدرن و حرفه‌ای باشد
- از المان‌های اضافی و غیرضروری پرهیز کند
- بر روی موضوع اصلی تمرکز داشته باشد"#
    )
}

/// Parts of a generated advertisement reply
#[derive(Debug, PartialEq)]
pub struct AdReply<'a> {
    pub ad_text: &'a str,
    pub image_description: Option<&'a str>,
}

/// Split a reply at its first blank line and strip leading section labels.
pub fn split_reply(reply: &str) -> AdReply<'_> {
    let mut parts = PARAGRAPH_BREAK.splitn(reply.trim(), 2);
    let ad_part = parts.next().unwrap_or_default().trim();
    let image_part = parts.next().map(str::trim);

    AdReply {
        ad_text: strip_label(&AD_LABEL, ad_part),
        image_description: image_part
            .map(|part| strip_label(&IMAGE_LABEL, part))
            .filter(|part| !part.is_empty()),
    }
}

fn strip_label<'a>(label: &Regex, text: &'a str) -> &'a str {
    match label.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text,
    }
}

/// English image-generation prompt for an image description
pub fn image_prompt(image_description: &str) -> String {
    format!("Modern professional {image_description} - {IMAGE_STYLE_SUFFIX}")
}
