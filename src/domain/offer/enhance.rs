use crate::domain::ai::{AiClient, CompletionRequest};

use super::normalizer::TextNormalizer;
use super::prompt::{editor_user_prompt, EDITOR_MAX_TOKENS, EDITOR_SYSTEM_PROMPT, EDITOR_TEMPERATURE};

/// Quote characters the editor tends to wrap its answer in
const QUOTES: &[char] = &['"', '«', '»', '“', '”'];

/// Editor-model pre-pass over free-text inputs.
///
/// Enhancement never fails: when the editor call errors, or when the pass is
/// disabled, the original input is returned cleaned by the normalizer.
#[derive(Clone)]
pub struct InputEnhancer {
    client: AiClient,
    model: String,
    enabled: bool,
    system: &'static str,
    instruction: fn(&str) -> String,
}

impl InputEnhancer {
    /// Enhancer using the business-copy editor prompts
    pub fn new(client: AiClient, model: impl Into<String>, enabled: bool) -> Self {
        Self {
            client,
            model: model.into(),
            enabled,
            system: EDITOR_SYSTEM_PROMPT,
            instruction: editor_user_prompt,
        }
    }

    /// Replace the editor's system role and instruction template
    pub fn with_editor(mut self, system: &'static str, instruction: fn(&str) -> String) -> Self {
        self.system = system;
        self.instruction = instruction;
        self
    }

    pub async fn enhance(&self, field: &'static str, input: &str) -> String {
        let fallback = TextNormalizer::new().clean(input);
        if !self.enabled || fallback.is_empty() {
            return fallback;
        }

        let request = CompletionRequest {
            model: self.model.clone(),
            system: self.system.to_string(),
            user: (self.instruction)(input),
            temperature: EDITOR_TEMPERATURE,
            max_tokens: EDITOR_MAX_TOKENS,
        };

        match self.client.complete(request).await {
            Ok(edited) => {
                let edited = TextNormalizer::new().clean(edited.trim_matches(QUOTES));
                if edited.is_empty() {
                    fallback
                } else {
                    edited
                }
            }
            Err(e) => {
                tracing::warn!(field, error = %e, "Input enhancement failed, using original text");
                metrics::counter!("input_enhancement_fallbacks_total", "field" => field)
                    .increment(1);
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::client::MockAiClientTrait;
    use crate::error::AppError;
    use std::sync::Arc;

    #[tokio::test]
    async fn should_return_edited_text() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .withf(|r| r.system == EDITOR_SYSTEM_PROMPT && r.max_tokens == EDITOR_MAX_TOKENS)
            .times(1)
            .returning(|_| Ok("«فروش ویژه آخر هفته»".to_string()));
        let enhancer = InputEnhancer::new(Arc::new(mock), "editor", true);

        // Act
        let result = enhancer.enhance("goal", "فروش اخر هفته").await;

        // Assert
        assert_eq!(result, "فروش ویژه آخر هفته");
    }

    #[tokio::test]
    async fn should_fall_back_to_cleaned_original_on_error() {
        // Arrange
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .times(1)
            .returning(|_| Err(AppError::OpenAiTemporaryError));
        let enhancer = InputEnhancer::new(Arc::new(mock), "editor", true);

        // Act
        let result = enhancer.enhance("discount_type", "  ۳۰ ٪   تخفیف ").await;

        // Assert
        assert_eq!(result, "30% تخفیف");
    }

    #[tokio::test]
    async fn should_use_custom_editor_prompts() {
        // Arrange
        fn instruction(input: &str) -> String {
            format!("edit: {input}")
        }
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete()
            .withf(|r| r.system == "custom editor" && r.user == "edit: متن")
            .times(1)
            .returning(|_| Ok("متن ویرایش‌شده".to_string()));
        let enhancer = InputEnhancer::new(Arc::new(mock), "editor", true)
            .with_editor("custom editor", instruction);

        // Act
        let result = enhancer.enhance("title", "متن").await;

        // Assert
        assert_eq!(result, "متن ویرایش‌شده");
    }

    #[tokio::test]
    async fn should_skip_call_when_disabled() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete().never();
        let enhancer = InputEnhancer::new(Arc::new(mock), "editor", false);

        assert_eq!(enhancer.enhance("goal", "قهوه\u{200F}").await, "قهوه");
    }

    #[tokio::test]
    async fn should_skip_call_for_blank_input() {
        let mut mock = MockAiClientTrait::new();
        mock.expect_complete().never();
        let enhancer = InputEnhancer::new(Arc::new(mock), "editor", true);

        assert_eq!(enhancer.enhance("custom_message", "   ").await, "");
    }
}
