//! Chat-completion models and the backend built on top of them

use crate::backend::{ClauseBackend, StructuredBackend, Suggestion};
use crate::prompt::{self, Prompt};
use crate::{parser, LlmError};
use async_trait::async_trait;
use guardian_domain::{Clause, ClauseAnnotation};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Sampling temperature used for every annotation call
pub const TEMPERATURE: f32 = 0.1;

/// A remote model that answers a system + user message pair
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Provider name ("ollama", "openai")
    fn provider(&self) -> &str;

    /// Model identifier sent to the provider
    fn model_name(&self) -> &str;

    /// Complete one chat turn
    async fn complete(&self, system: &str, user: &str, max_tokens: u32) -> Result<String, LlmError>;
}

/// Run a request up to `max_retries` times with exponential backoff
///
/// Only retryable errors (see [`LlmError::is_retryable`]) are retried; the
/// delay doubles from one second.
pub(crate) async fn with_retries<F, Fut>(max_retries: u32, mut request: F) -> Result<String, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<String, LlmError>>,
{
    let max_retries = max_retries.max(1);
    let mut attempts = 0;

    loop {
        match request().await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_retryable() => {
                attempts += 1;
                if attempts >= max_retries {
                    return Err(e);
                }
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("Retrying after {:?} ({}/{}): {}", delay, attempts, max_retries, e);
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Annotation backend that drives a [`ChatModel`] with prompts
///
/// Supports the structured call and the triad, so it is normally wrapped as
/// `Backend::structured`.
pub struct PromptedBackend<M> {
    model: M,
}

impl<M: ChatModel> PromptedBackend<M> {
    /// Wrap a chat model
    pub fn new(model: M) -> Self {
        Self { model }
    }

    /// The underlying model
    pub fn model(&self) -> &M {
        &self.model
    }

    async fn ask(&self, prompt: Prompt) -> Result<String, LlmError> {
        debug!(
            provider = self.model.provider(),
            model = self.model.model_name(),
            "Sending prompt ({} chars)",
            prompt.user.len()
        );
        let answer = self
            .model
            .complete(prompt.system, &prompt.user, prompt.max_tokens)
            .await?;
        Ok(answer.trim().to_string())
    }
}

#[async_trait]
impl<M: ChatModel> ClauseBackend for PromptedBackend<M> {
    fn name(&self) -> &str {
        self.model.provider()
    }

    async fn summarize_clause(&self, text: &str) -> Result<String, LlmError> {
        self.ask(prompt::summarize(text)).await
    }

    async fn classify_clause(&self, text: &str) -> Result<String, LlmError> {
        let answer = self.ask(prompt::classify(text)).await?;
        let label = parser::normalize_label(&answer);
        if label.is_empty() {
            return Err(LlmError::InvalidResponse("Empty category label".to_string()));
        }
        Ok(label)
    }

    async fn analyze_risk(&self, text: &str) -> Result<String, LlmError> {
        self.ask(prompt::analyze_risk(text)).await
    }

    async fn infer_contract_type(&self, clauses: &[Clause]) -> Result<Option<String>, LlmError> {
        if clauses.is_empty() {
            return Ok(None);
        }
        let answer = self.ask(prompt::infer_contract_type(clauses)).await?;
        parser::parse_contract_type(&answer)
    }

    async fn suggest_improvement(&self, text: &str) -> Result<Suggestion, LlmError> {
        let answer = self.ask(prompt::suggest_improvement(text)).await?;
        parser::parse_suggestion(&answer)
    }
}

#[async_trait]
impl<M: ChatModel> StructuredBackend for PromptedBackend<M> {
    async fn analyze_clause(&self, text: &str) -> Result<ClauseAnnotation, LlmError> {
        let answer = self.ask(prompt::analyze_clause(text)).await?;
        parser::parse_clause_annotation(&answer)
    }
}
