// paid generation tier: openai-compatible chat completions
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::GenerationKind;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: reqwest::StatusCode, body: String },

    #[error("provider returned no usable content")]
    Empty,

    #[error("timed out")]
    Timeout,
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Request(e.without_url())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PromptParams<'a> {
    pub subject: &'a str,
    pub niche: &'a str,
    pub details: &'a str,
}

#[async_trait]
pub trait AiClient: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(
        &self,
        kind: GenerationKind,
        params: PromptParams<'_>,
        count: usize,
    ) -> Result<Vec<String>, AiError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct OpenAiCompatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatClient {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

const SYSTEM_PROMPT: &str = "You are an assistant for video creators. Follow the requested format exactly and output nothing else.";

pub fn build_prompt(kind: GenerationKind, params: PromptParams<'_>, count: usize) -> String {
    let niche = if params.niche.trim().is_empty() {
        String::new()
    } else {
        format!(" The channel niche is \"{}\".", params.niche.trim())
    };

    match kind {
        GenerationKind::Titles => format!(
            "Write {} catchy, click-worthy video titles about \"{}\".{} Each under 100 characters. One title per line, no numbering.",
            count, params.subject, niche
        ),
        GenerationKind::Hashtags => format!(
            "Suggest {} relevant hashtags for a video about \"{}\".{} One hashtag per line, each starting with #.",
            count, params.subject, niche
        ),
        GenerationKind::Tags => format!(
            "Suggest {} search tags for a video titled \"{}\".{} Description: \"{}\". One tag per line, lowercase, no # symbols.",
            count, params.subject, niche, params.details
        ),
        GenerationKind::Description => format!(
            "Write one engaging video description for \"{}\".{} Key points:\n{}\nInclude a short hook, the key points as bullets, a call to action and 3 hashtags on the last line.",
            params.subject, niche, params.details
        ),
    }
}

/// `1. x`, `2) x`, `- x`, `• x` -> `x`. Leading numbers that are part of the
/// text (`10 Tips`) stay.
fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    let rest = &line[digits..];
    let rest = match rest.chars().next() {
        Some('.') | Some(')') if digits > 0 => &rest[1..],
        _ if digits > 0 => line,
        _ => rest,
    };
    rest.trim_start_matches(['-', '*', '•']).trim()
}

/// Splits a completion into list items, dropping numbering, bullets and
/// wrapping quotes. Descriptions are kept whole.
pub fn parse_completion(kind: GenerationKind, content: &str) -> Vec<String> {
    if kind == GenerationKind::Description {
        let text = content.trim();
        return if text.is_empty() { Vec::new() } else { vec![text.to_string()] };
    }

    content
        .lines()
        .map(|line| strip_list_marker(line).trim_matches('"').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

#[async_trait]
impl AiClient for OpenAiCompatClient {
    fn name(&self) -> &'static str {
        "openai_compat"
    }

    async fn generate(
        &self,
        kind: GenerationKind,
        params: PromptParams<'_>,
        count: usize,
    ) -> Result<Vec<String>, AiError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: build_prompt(kind, params, count),
                },
            ],
            temperature: 0.8,
            max_tokens: 800,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status,
                body: body.chars().take(200).collect(),
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AiError::Empty)?;

        let items = parse_completion(kind, &content);
        if items.is_empty() {
            return Err(AiError::Empty);
        }
        Ok(items)
    }
}
