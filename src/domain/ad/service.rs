use validator::Validate;

use crate::config::AppConfig;
use crate::domain::ai::{with_retry, AiClient, CompletionRequest};
use crate::domain::offer::enhance::InputEnhancer;
use crate::domain::offer::TextNormalizer;
use crate::error::AppError;
use crate::global::validator::SecretKeyValidator;

use super::dto::{AdRequest, AdResult};
use super::prompt::{
    ad_editor_user_prompt, ad_user_prompt, check_request, image_prompt, split_reply,
    AD_EDITOR_SYSTEM_PROMPT, AD_MAX_TOKENS, AD_SYSTEM_PROMPT, AD_TEMPERATURE,
};

#[derive(Clone)]
pub struct AdService {
    client: AiClient,
    enhancer: InputEnhancer,
    secret: SecretKeyValidator,
    model: String,
}

impl AdService {
    pub fn new(client: AiClient, config: &AppConfig) -> Self {
        Self {
            enhancer: InputEnhancer::new(
                client.clone(),
                config.editor_model.clone(),
                config.enhance_inputs,
            )
            .with_editor(AD_EDITOR_SYSTEM_PROMPT, ad_editor_user_prompt),
            client,
            secret: SecretKeyValidator::new(config.app_secret_key.clone()),
            model: config.openai_model.clone(),
        }
    }

    /// Generate ad copy and an image prompt.
    ///
    /// Replies without usable Farsi copy fall back to the caller's own
    /// description, normalized.
    pub async fn generate_ad(&self, request: AdRequest) -> Result<AdResult, AppError> {
        self.secret.validate(&request.secret_key)?;
        request.validate()?;
        check_request(&request)?;

        let image_input = if request.has_uploaded_image {
            None
        } else {
            request.image_description()
        };

        let enhance_image = async {
            match image_input {
                Some(description) => self.enhancer.enhance("image_description", description).await,
                None => String::new(),
            }
        };

        let (title, description, image_description) = tokio::join!(
            self.enhancer.enhance("title", &request.title),
            self.enhancer.enhance("description", &request.description),
            enhance_image,
        );

        let completion = CompletionRequest {
            model: self.model.clone(),
            system: AD_SYSTEM_PROMPT.to_string(),
            user: ad_user_prompt(
                &title,
                &description,
                request.target_page.trim(),
                &image_description,
            ),
            temperature: AD_TEMPERATURE,
            max_tokens: AD_MAX_TOKENS,
        };

        let raw = with_retry(|| {
            let client = self.client.clone();
            let completion = completion.clone();
            async move { client.complete(completion).await }
        })
        .await?;

        let reply = split_reply(&raw);
        let normalizer = TextNormalizer::new();

        let generated = normalizer.normalize(reply.ad_text);
        let ad_text = if has_arabic_script(&generated) {
            generated
        } else {
            tracing::warn!("Generated ad has no Farsi text, using the request description");
            metrics::counter!("ad_text_fallbacks_total").increment(1);
            normalizer.normalize(&request.description)
        };

        let image_prompt = match reply.image_description {
            Some(part) => Some(image_prompt(&normalizer.clean(part))),
            None if !image_description.is_empty() => Some(image_description),
            None => None,
        };

        tracing::info!(
            chars = ad_text.chars().count(),
            has_image_prompt = image_prompt.is_some(),
            "Ad generated"
        );
        metrics::counter!("ad_generations_total").increment(1);

        Ok(AdResult {
            ad_text,
            image_prompt,
        })
    }
}

fn has_arabic_script(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::client::MockAiClientTrait;
    use crate::domain::offer::normalizer::{LRI, PDI};
    use std::sync::Arc;

    const SECRET: &str = "test-secret";

    fn service(mock: MockAiClientTrait) -> AdService {
        let config = AppConfig {
            enhance_inputs: false,
            ..AppConfig::for_test(SECRET)
        };
        AdService::new(Arc::new(mock), &config)
    }

    fn sample_request() -> AdRequest {
        AdRequest {
            title: "کافه آفتاب".to_string(),
            description: "قهوه تازه ۱۰۰ ٪ عربیکا".to_string(),
            target_page: "instagram.com/aftab".to_string(),
            image_description: Some("فنجان قهوه".to_string()),
            has_uploaded_image: false,
            secret_key: SECRET.to_string(),
        }
    }

    #[tokio::test]
    async fn should_split_and_normalize_reply() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .withf(|r| r.temperature == AD_TEMPERATURE && r.max_tokens == AD_MAX_TOKENS)
            .times(1)
            .returning(|_| {
                Ok("متن آگهی: تا ۳۰٪ تخفیف در کافه آفتاب!\n\nتصویر: a cup of coffee".to_string())
            });

        // Act
        let result = service(mock).generate_ad(sample_request()).await.unwrap();

        // Assert
        assert_eq!(
            result.ad_text,
            format!("تا {LRI}30%{PDI} تخفیف در کافه آفتاب!")
        );
        let image_prompt = result.image_prompt.unwrap();
        assert!(image_prompt.starts_with("Modern professional a cup of coffee - "));
    }

    #[tokio::test]
    async fn non_farsi_reply_should_fall_back_to_description() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .returning(|_| Ok("Fresh coffee every day".to_string()));

        // Act
        let result = service(mock).generate_ad(sample_request()).await.unwrap();

        // Assert
        assert_eq!(result.ad_text, format!("قهوه تازه {LRI}100%{PDI} عربیکا"));
        assert_eq!(result.image_prompt.as_deref(), Some("فنجان قهوه"));
    }

    #[tokio::test]
    async fn uploaded_image_without_image_part_should_have_no_prompt() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .returning(|_| Ok("قهوه تازه، همین حالا سفارش دهید".to_string()));
        let request = AdRequest {
            image_description: None,
            has_uploaded_image: true,
            ..sample_request()
        };

        // Act
        let result = service(mock).generate_ad(request).await.unwrap();

        // Assert
        assert_eq!(result.ad_text, "قهوه تازه، همین حالا سفارش دهید");
        assert_eq!(result.image_prompt, None);
    }

    #[tokio::test]
    async fn missing_image_description_should_fail_before_provider_call() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete().never();
        let request = AdRequest {
            image_description: None,
            ..sample_request()
        };

        // Act
        let result = service(mock).generate_ad(request).await;

        // Assert
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn should_reject_invalid_secret() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete().never();
        let request = AdRequest {
            secret_key: "nope".to_string(),
            ..sample_request()
        };

        let result = service(mock).generate_ad(request).await;

        assert!(matches!(result, Err(AppError::InvalidSecretKey)));
    }

    #[test]
    fn should_detect_arabic_script() {
        assert!(has_arabic_script("abc قهوه"));
        assert!(!has_arabic_script("coffee 123"));
        assert!(!has_arabic_script(""));
    }
}
