// This file is part of game-arena.
//
// game-arena is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// game-arena is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Strategy tips and support replies from a text generation service.
//!
//! Both queries are best effort. A failed strategy request yields no
//! strategies and a failed support request yields [`SUPPORT_FALLBACK`]; the
//! error is only logged.

use std::{fmt, sync::Arc, sync::mpsc::Sender, thread};

use log::{debug, error};
use reqwest::{StatusCode, blocking::Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config::AdvisoryConfig;

pub const SUPPORT_FALLBACK: &str =
    "I'm having trouble connecting to support. Please try again later.";

const PLATFORM_NAME: &str = "GameArena Pro";
const JSON_MIME_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("failed: {status}: {body}")]
    FailedWithBody { status: StatusCode, body: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no api key is configured")]
    MissingApiKey,
    #[error("unexpected response")]
    UnexpectedResponse,
}

/// What the caller wants back.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResponseShape {
    Json,
    Text,
}

/// Anything that turns a prompt into text.
pub trait TextGenerator: Send + Sync {
    /// # Errors
    ///
    /// If the service can't be reached or answers with something unusable.
    fn generate(&self, prompt: &str, shape: ResponseShape) -> Result<String, AdvisoryError>;
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Strategy {
    pub title: String,
    pub description: String,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|part| part.text).collect();

        Some(text)
    }
}

/// Talks to the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    config: AdvisoryConfig,
}

impl GeminiClient {
    /// # Errors
    ///
    /// If the HTTP client can't be built.
    pub fn new(config: AdvisoryConfig) -> Result<Self, AdvisoryError> {
        Ok(Self {
            http: Client::builder().build()?,
            config,
        })
    }

    /// Uses an already configured HTTP client.
    #[must_use]
    pub fn with_client(config: AdvisoryConfig, http: Client) -> Self {
        Self { http, config }
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str, shape: ResponseShape) -> Result<String, AdvisoryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(AdvisoryError::MissingApiKey)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: match shape {
                ResponseShape::Json => Some(GenerationConfig {
                    response_mime_type: JSON_MIME_TYPE.to_string(),
                }),
                ResponseShape::Text => None,
            },
        };

        debug!("generate_content: {} {shape:?}", self.config.model);
        let response = self
            .http
            .post(self.config.generate_content_url())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdvisoryError::FailedWithBody { status, body });
        }

        let response: GenerateContentResponse = serde_json::from_str(&response.text()?)?;
        response.text().ok_or(AdvisoryError::UnexpectedResponse)
    }
}

/// A query tagged with the session generation that asked it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdvisoryRequest {
    Strategies { generation: u64, label: String },
    Support { generation: u64, question: String },
}

/// Carries the generation of its request back unchanged.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdvisoryReply {
    Strategies {
        generation: u64,
        label: String,
        strategies: Vec<Strategy>,
    },
    Support {
        generation: u64,
        text: String,
    },
}

impl AdvisoryReply {
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Strategies { generation, .. } | Self::Support { generation, .. } => *generation,
        }
    }
}

/// The best effort wrapper the rest of the crate talks to.
#[derive(Clone)]
pub struct Advisory {
    generator: Arc<dyn TextGenerator>,
}

impl Advisory {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    #[must_use]
    pub fn fetch_strategies(&self, game_label: &str) -> Vec<Strategy> {
        let prompt = format!(
            "Provide 3 quick winning strategies for {game_label} tournaments in a JSON format. \
             Include a title and a short description for each."
        );

        match self.generator.generate(&prompt, ResponseShape::Json) {
            Ok(text) => {
                let strategies = parse_strategies(&text);
                if strategies.is_empty() {
                    debug!("strategies: the response for {game_label} had no strategies");
                }
                strategies
            }
            Err(err) => {
                error!("strategies: {err}");
                Vec::new()
            }
        }
    }

    /// The reply may be empty if the service had nothing to say.
    #[must_use]
    pub fn fetch_support_reply(&self, question: &str) -> String {
        let prompt = format!(
            "You are a helpful customer support agent for '{PLATFORM_NAME}', a gaming \
             tournament platform. Answer this user query: \"{question}\""
        );

        match self.generator.generate(&prompt, ResponseShape::Text) {
            Ok(text) => text,
            Err(err) => {
                error!("support: {err}");
                SUPPORT_FALLBACK.to_string()
            }
        }
    }

    #[must_use]
    pub fn answer(&self, request: AdvisoryRequest) -> AdvisoryReply {
        match request {
            AdvisoryRequest::Strategies { generation, label } => AdvisoryReply::Strategies {
                generation,
                strategies: self.fetch_strategies(&label),
                label,
            },
            AdvisoryRequest::Support {
                generation,
                question,
            } => AdvisoryReply::Support {
                generation,
                text: self.fetch_support_reply(&question),
            },
        }
    }

    /// Answers the request on its own thread and sends the reply to `tx`.
    pub fn dispatch<T: From<AdvisoryReply> + Send + 'static>(
        &self,
        request: AdvisoryRequest,
        tx: Sender<T>,
    ) -> thread::JoinHandle<()> {
        let advisory = self.clone();

        thread::spawn(move || {
            let reply = advisory.answer(request);
            if tx.send(reply.into()).is_err() {
                debug!("advisory: the receiver hung up before the reply arrived");
            }
        })
    }
}

impl fmt::Debug for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advisory").finish_non_exhaustive()
    }
}

/// Reads a list of strategies out of loosely structured JSON.
///
/// Accepts a bare array, or an object holding the array under any key,
/// optionally wrapped in a markdown code fence. Anything else is empty.
#[must_use]
pub fn parse_strategies(text: &str) -> Vec<Strategy> {
    let text = strip_code_fence(text);

    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return Vec::new();
    };

    match value {
        Value::Array(_) => serde_json::from_value(value).unwrap_or_default(),
        Value::Object(map) => map
            .into_iter()
            .filter(|(_, value)| value.is_array())
            .find_map(|(_, value)| serde_json::from_value::<Vec<Strategy>>(value).ok())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();

    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);

    rest.strip_suffix("```").unwrap_or(rest).trim()
}
