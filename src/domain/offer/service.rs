use validator::Validate;

use crate::config::AppConfig;
use crate::domain::ai::{with_retry, AiClient, CompletionRequest};
use crate::error::AppError;
use crate::global::validator::SecretKeyValidator;

use super::category::CategoryKind;
use super::dto::{OfferRequest, OfferResult};
use super::enhance::InputEnhancer;
use super::normalizer::TextNormalizer;
use super::prompt::{OfferPrompt, OFFER_MAX_TOKENS, OFFER_TEMPERATURE};

#[derive(Clone)]
pub struct OfferService {
    client: AiClient,
    enhancer: InputEnhancer,
    secret: SecretKeyValidator,
    model: String,
}

impl OfferService {
    pub fn new(client: AiClient, config: &AppConfig) -> Self {
        Self {
            enhancer: InputEnhancer::new(
                client.clone(),
                config.editor_model.clone(),
                config.enhance_inputs,
            ),
            client,
            secret: SecretKeyValidator::new(config.app_secret_key.clone()),
            model: config.openai_model.clone(),
        }
    }

    /// Generate one offer text.
    ///
    /// The request is validated before any provider call. Free-text fields go
    /// through the editor pre-pass, the assembled prompt is sent once (with
    /// retries on transient failures) and the reply is normalized with the
    /// caller's original discount pinned.
    pub async fn generate_offer(&self, request: OfferRequest) -> Result<OfferResult, AppError> {
        self.secret.validate(&request.secret_key)?;
        request.validate()?;
        OfferPrompt::build(&request)?;

        let enhanced = self.enhance(&request).await;
        let prompt = OfferPrompt::build(&enhanced)?;

        let completion = CompletionRequest {
            model: self.model.clone(),
            system: prompt.system,
            user: prompt.user,
            temperature: OFFER_TEMPERATURE,
            max_tokens: OFFER_MAX_TOKENS,
        };

        let raw = with_retry(|| {
            let client = self.client.clone();
            let completion = completion.clone();
            async move { client.complete(completion).await }
        })
        .await?;

        let normalizer = TextNormalizer::with_discount(&request.discount_type);
        let description = normalizer.normalize(&raw);
        if description.is_empty() {
            tracing::warn!("Provider returned an empty offer");
            metrics::counter!("empty_offer_replies_total").increment(1);
        }

        let category_kind = CategoryKind::from_slug(&request.category);
        tracing::info!(
            category = %request.category,
            tone = ?request.tone,
            chars = description.chars().count(),
            "Offer generated"
        );
        metrics::counter!("offer_generations_total", "kind" => kind_label(category_kind))
            .increment(1);

        Ok(OfferResult {
            description,
            category_kind,
            applied_discount: normalizer.discount().map(str::to_string),
        })
    }

    async fn enhance(&self, request: &OfferRequest) -> OfferRequest {
        let custom_message = async {
            match request.custom_message() {
                Some(message) => Some(self.enhancer.enhance("custom_message", message).await),
                None => None,
            }
        };

        let (goal, discount_type, product_or_service, custom_message) = tokio::join!(
            self.enhancer.enhance("goal", &request.goal),
            self.enhancer.enhance("discount_type", &request.discount_type),
            self.enhancer.enhance("product_or_service", &request.product_or_service),
            custom_message,
        );

        OfferRequest {
            goal,
            discount_type,
            product_or_service,
            custom_message,
            ..request.clone()
        }
    }
}

fn kind_label(kind: CategoryKind) -> &'static str {
    match kind {
        CategoryKind::Product => "product",
        CategoryKind::Service => "service",
        CategoryKind::Content => "content",
    }
}
