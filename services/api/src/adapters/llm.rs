//! services/api/src/adapters/llm.rs
//!
//! This module contains the adapter for the slide-writing LLM.
//! It implements the `LanguageModelService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use slidecraft_core::ports::{CompletionRequest, LanguageModelService, PortError, PortResult};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `LanguageModelService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiChatAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatAdapter {
    /// Creates a new `OpenAiChatAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `LanguageModelService` Trait Implementation
//=========================================================================================

#[async_trait]
impl LanguageModelService for OpenAiChatAdapter {
    async fn complete(&self, request: CompletionRequest) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(request.system_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.user_prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_completion_tokens(request.max_tokens)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Sending chat completion to model {}", self.model);
        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            PortError::Unexpected("Slide generation LLM returned no choices.".to_string())
        })?;
        choice.message.content.ok_or_else(|| {
            PortError::Unexpected("Slide generation LLM response contained no text.".to_string())
        })
    }
}

/// Stands in for the model when no API key is configured. Every call fails,
/// so each generation operation takes its fallback path.
#[derive(Clone, Copy, Default)]
pub struct UnconfiguredModel;

#[async_trait]
impl LanguageModelService for UnconfiguredModel {
    async fn complete(&self, _request: CompletionRequest) -> PortResult<String> {
        Err(PortError::Unexpected(
            "No OPENAI_API_KEY is configured".to_string(),
        ))
    }
}
