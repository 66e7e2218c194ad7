//! The semantic-matching collaborator.
//!
//! The resolver only ever talks to a [`SemanticMatcher`]; the concrete service
//! behind it is injected, so tests can swap in a stub and the CLI can turn the
//! stage off entirely with [`DisabledMatcher`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;

use crate::core::entry::CanonicalEntry;
use crate::core::types::CanonicalKey;

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("semantic matching is disabled")]
    Disabled,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// One lookup handed to the semantic matcher
#[derive(Debug, Clone, Copy)]
pub struct SemanticRequest<'a> {
    pub raw_value: &'a str,
    pub key: CanonicalKey,
    pub domain_hint: &'static str,
    pub entries: &'a [CanonicalEntry],
}

impl<'a> SemanticRequest<'a> {
    pub fn new(key: CanonicalKey, raw_value: &'a str, entries: &'a [CanonicalEntry]) -> Self {
        Self {
            raw_value,
            key,
            domain_hint: key.domain_hint(),
            entries,
        }
    }
}

/// What the matcher picked. `match_id = None` is an explicit abstention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticSelection {
    pub match_id: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

impl SemanticSelection {
    pub fn abstain(reasoning: impl Into<String>) -> Self {
        Self {
            match_id: None,
            confidence: 0.0,
            reasoning: reasoning.into(),
        }
    }

    pub fn pick(id: impl Into<String>, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            match_id: Some(id.into()),
            confidence,
            reasoning: reasoning.into(),
        }
    }
}

/// Given a raw string, a domain hint and the candidate entries, select at most one entry id.
#[async_trait]
pub trait SemanticMatcher: Send + Sync {
    async fn select(&self, request: &SemanticRequest<'_>) -> Result<SemanticSelection, SemanticError>;
}

/// Matcher used when no semantic service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMatcher;

#[async_trait]
impl SemanticMatcher for DisabledMatcher {
    async fn select(&self, _request: &SemanticRequest<'_>) -> Result<SemanticSelection, SemanticError> {
        Err(SemanticError::Disabled)
    }
}

const SYSTEM_PROMPT: &str = "You are a semantic matching assistant for healthcare workforce data.

Your task:
- Select exactly one canonical entry id from the provided list, or return null.
- Never invent an id.
- Only select an id if there is a clear semantic match.
- If unsure, return null.
- Give a one-line reason for your choice.

Confidence rules:
- Confidence is ignored unless a valid id is selected.
- Do not return confidence above 0.5 unless you are reasonably certain.

Respond with a JSON object: {\"matchId\": string | null, \"confidence\": number, \"reasoning\": string}";

/// Render the entry list the way it is shown to the model, one entry per line
#[must_use]
pub fn render_entries(entries: &[CanonicalEntry]) -> String {
    let mut text = String::new();
    for entry in entries {
        let _ = write!(text, "id: {:?}, name: {:?}", entry.id.as_str(), entry.name);
        if let Some(abbreviation) = entry.abbreviation.as_deref().filter(|a| !a.is_empty()) {
            let _ = write!(text, ", abbreviation: {abbreviation:?}");
        }
        if !entry.aliases.is_empty() {
            let _ = write!(text, ", aliases: {:?}", entry.aliases);
        }
        text.push('\n');
    }
    text
}

fn user_prompt(request: &SemanticRequest<'_>) -> String {
    format!(
        "Domain: {}\n\nInput value:\n{:?}\n\nCanonical entries:\n{}\nReturn the best matching canonical entry id, or null if none apply.",
        request.domain_hint,
        request.raw_value,
        render_entries(request.entries)
    )
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Extract the selection from a chat completion response body
///
/// # Errors
///
/// Returns `SemanticError::MalformedResponse` if the body is not a chat completion,
/// has no content, or the content does not match the selection schema.
pub fn parse_completion(body: &str) -> Result<SemanticSelection, SemanticError> {
    let completion: ChatCompletion = serde_json::from_str(body)
        .map_err(|e| SemanticError::MalformedResponse(format!("not a chat completion: {e}")))?;

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| SemanticError::MalformedResponse("empty completion".to_string()))?;

    serde_json::from_str(&content)
        .map_err(|e| SemanticError::MalformedResponse(format!("selection schema: {e}")))
}

/// Semantic matcher backed by an OpenAI-compatible chat completions endpoint
pub struct OpenAiMatcher {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiMatcher {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from `OPENAI_API_KEY` and optional `OPENAI_BASE_URL`.
    /// Returns `None` when no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty())?;
        let mut matcher = Self::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            matcher = matcher.with_base_url(base_url);
        }
        Some(matcher)
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl SemanticMatcher for OpenAiMatcher {
    async fn select(&self, request: &SemanticRequest<'_>) -> Result<SemanticSelection, SemanticError> {
        let body = serde_json::json!({
            "model": self.model,
            "temperature": 0,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt(request)}
            ]
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(SemanticError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        parse_completion(&text)
    }
}
