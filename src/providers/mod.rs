// file: src/providers/mod.rs
// description: chat and embedding provider traits with openai and gemini backends
// reference: https://docs.rs/async-trait

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

use crate::config::ProviderConfig;
use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
}

impl FromStr for ProviderKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "gemini" => Ok(Self::Gemini),
            other => Err(PipelineError::Config(format!(
                "Unsupported provider: {}. Use 'openai' or 'gemini'.",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Single-turn text completion.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;

    fn model(&self) -> &str;
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    fn model(&self) -> &str;
}

/// The chat model and embedder of one provider, chosen once per run.
#[derive(Clone)]
pub struct ProviderSet {
    pub kind: ProviderKind,
    pub chat: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn Embedder>,
}

impl ProviderSet {
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let kind: ProviderKind = config.kind.parse()?;
        let http = build_http_client(config.request_timeout_secs)?;

        let set = match kind {
            ProviderKind::OpenAi => {
                Validator::validate_url(&config.openai_base_url)?;
                let api_key = require_key(config.openai_api_key.as_deref(), "OPENAI_API_KEY")?;
                let chat = OpenAiClient::new(
                    http.clone(),
                    &config.openai_base_url,
                    api_key,
                    &config.openai_chat_model,
                );
                let embedder = OpenAiClient::new(
                    http,
                    &config.openai_base_url,
                    api_key,
                    &config.openai_embedding_model,
                );
                Self {
                    kind,
                    chat: Arc::new(chat),
                    embedder: Arc::new(embedder),
                }
            }
            ProviderKind::Gemini => {
                Validator::validate_url(&config.gemini_base_url)?;
                let api_key = require_key(config.gemini_api_key.as_deref(), "GEMINI_API_KEY")?;
                let chat = GeminiClient::new(
                    http.clone(),
                    &config.gemini_base_url,
                    api_key,
                    &config.gemini_chat_model,
                );
                let embedder = GeminiClient::new(
                    http,
                    &config.gemini_base_url,
                    api_key,
                    &config.gemini_embedding_model,
                );
                Self {
                    kind,
                    chat: Arc::new(chat),
                    embedder: Arc::new(embedder),
                }
            }
        };

        info!(
            "Using {} provider (chat: {}, embeddings: {})",
            set.kind,
            set.chat.model(),
            set.embedder.model()
        );
        Ok(set)
    }
}

fn require_key<'a>(key: Option<&'a str>, env_name: &str) -> Result<&'a str> {
    key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        PipelineError::Provider(format!("Missing API key: set {} in your environment", env_name))
    })
}

fn build_http_client(timeout_secs: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| PipelineError::Provider(format!("Failed to build HTTP client: {}", e)))
}

/// Sends a prepared request and decodes a JSON body, mapping every failure
/// to a provider error that names the call.
async fn send_json<R: DeserializeOwned>(request: RequestBuilder, call: &str) -> Result<R> {
    let response = request
        .send()
        .await
        .map_err(|e| PipelineError::Provider(format!("Failed to send {} request: {}", call, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(PipelineError::Provider(format!(
            "{} request failed with status {}: {}",
            call, status, error_text
        )));
    }

    debug!("{} request succeeded", call);

    response.json::<R>().await.map_err(|e| {
        PipelineError::Provider(format!("Failed to parse {} response: {}", call, e))
    })
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Chat model that replays scripted replies and records every prompt.
    pub struct ScriptedChat {
        replies: Mutex<VecDeque<Result<String>>>,
        fallback: Option<String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedChat {
        pub fn new(replies: Vec<Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                fallback: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        /// Answers every prompt with the same text.
        pub fn constant(reply: &str) -> Self {
            Self {
                replies: Mutex::new(VecDeque::new()),
                fallback: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedChat {
        async fn complete(&self, prompt: &str, _temperature: f32) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.replies.lock().unwrap().pop_front() {
                Some(reply) => reply,
                None => self
                    .fallback
                    .clone()
                    .ok_or_else(|| PipelineError::Provider("script exhausted".to_string())),
            }
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    /// Bag-of-letters embedder: deterministic and offline.
    pub struct LetterEmbedder;

    impl LetterEmbedder {
        pub fn vector(text: &str) -> Vec<f32> {
            let mut v = vec![0.0f32; 26];
            for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
                v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
            }
            v
        }
    }

    #[async_trait]
    impl Embedder for LetterEmbedder {
        async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| Self::vector(t)).collect())
        }

        async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
            Ok(Self::vector(text))
        }

        fn model(&self) -> &str {
            "letters"
        }
    }
}
