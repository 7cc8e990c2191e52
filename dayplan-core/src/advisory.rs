//! Short written commentary on one day's plan, from an external text
//! generation service.
//!
//! One request per call, no retries, no caching. Failures never escape:
//! they become a fixed message the caller can show as-is.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::config::AdvisoryConfig;
use crate::day_plan::DayPlan;
use crate::error::{PlanError, PlanResult};

pub const NOTHING_TO_ANALYZE: &str =
    "Nothing to analyze: add at least one entry with a description first.";
pub const ADVISORY_UNAVAILABLE: &str =
    "The advisory service is unavailable right now. Please try again later.";

const SYSTEM_PROMPT: &str = "You are a concise planning assistant. \
Comment briefly on the user's plan for the day: spot conflicts, overload and anything worth preparing for.";

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub temperature: f32,
}

/// Anything that can turn a prompt into text.
pub trait TextGenerator: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = PlanResult<String>> + Send;
}

impl<T: TextGenerator> TextGenerator for &T {
    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = PlanResult<String>> + Send {
        (**self).generate(request)
    }
}

/// One line per active entry, under a heading naming the date. `None` when
/// the day has nothing worth sending.
pub fn build_prompt(day: &DayPlan) -> Option<String> {
    let lines: Vec<String> = day
        .active_entries()
        .map(|e| {
            let time = if e.time.trim().is_empty() { "--:--" } else { e.time.trim() };
            let category = if e.category.trim().is_empty() { "general" } else { e.category.trim() };
            format!("- {} | {} | {}", time, category, e.description.trim())
        })
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(format!(
        "My plan for {} (time | category | description):\n{}\n\nGive me a short analysis.",
        day.date,
        lines.join("\n")
    ))
}

pub struct AdvisoryClient<G> {
    generator: G,
    temperature: f32,
}

impl<G: TextGenerator> AdvisoryClient<G> {
    pub fn new(generator: G, temperature: f32) -> Self {
        AdvisoryClient {
            generator,
            temperature,
        }
    }

    /// Commentary for `day`, or one of the fixed fallback messages.
    pub async fn advise(&self, day: &DayPlan) -> String {
        let Some(prompt) = build_prompt(day) else {
            return NOTHING_TO_ANALYZE.to_string();
        };

        let request = GenerationRequest {
            prompt,
            temperature: self.temperature,
        };

        match self.generator.generate(&request).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(date = %day.date, "advisory service returned empty text");
                ADVISORY_UNAVAILABLE.to_string()
            }
            Err(e) => {
                tracing::warn!(date = %day.date, "advisory request failed: {}", e);
                ADVISORY_UNAVAILABLE.to_string()
            }
        }
    }
}

// OpenAI-compatible chat completions wire types

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Text generation over HTTP against a chat-completions endpoint.
pub struct HttpGenerator {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerator {
    pub fn new(endpoint: &str, model: &str, api_key: Option<String>) -> Self {
        HttpGenerator {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key,
        }
    }

    /// The credential is read from the environment variable named in the
    /// config. A missing credential is reported when a request is made.
    pub fn from_config(config: &AdvisoryConfig) -> Self {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());

        Self::new(&config.endpoint, &config.model, api_key)
    }
}

impl TextGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> PlanResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PlanError::Advisory("no API key configured".to_string()))?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::Advisory(format!("request failed: {}", e)))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(PlanError::Advisory(format!("{}: {}", status, error_text)));
        }

        let parsed: ChatResponse = resp
            .json()
            .await
            .map_err(|e| PlanError::Advisory(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| PlanError::Advisory("response had no content".to_string()))
    }
}
