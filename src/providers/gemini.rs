// file: src/providers/gemini.rs
// description: Gemini generateContent and batchEmbedContents client
// reference: https://ai.google.dev/api

use super::{ChatModel, Embedder, send_json};
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TASK_DOCUMENT: &str = "RETRIEVAL_DOCUMENT";
const TASK_QUERY: &str = "RETRIEVAL_QUERY";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedRequest<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    #[serde(rename = "taskType")]
    task_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    /// Always in `models/<name>` form.
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, base_url: &str, api_key: &str, model: &str) -> Self {
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{}", model)
        };

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model,
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}:{}", self.base_url, self.model, method)
    }

    async fn embed(&self, texts: &[String], task_type: &str) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: &self.model,
                    content: Content {
                        role: None,
                        parts: vec![Part { text }],
                    },
                    task_type,
                })
                .collect(),
        };

        debug!("Embedding {} texts with {}", texts.len(), self.model);

        let response: BatchEmbedResponse = send_json(
            self.client
                .post(self.endpoint("batchEmbedContents"))
                .header("x-goog-api-key", &self.api_key)
                .json(&request),
            "Gemini embeddings",
        )
        .await?;

        embedding_vectors(response, texts.len())
    }
}

fn candidate_text(response: GenerateResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PipelineError::Provider(
            "No candidate text returned from Gemini".to_string(),
        ));
    }

    Ok(text.trim().to_string())
}

fn embedding_vectors(response: BatchEmbedResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    if response.embeddings.len() != expected {
        return Err(PipelineError::Provider(format!(
            "Gemini returned {} embeddings for {} inputs",
            response.embeddings.len(),
            expected
        )));
    }
    Ok(response.embeddings.into_iter().map(|e| e.values).collect())
}

#[async_trait]
impl ChatModel for GeminiClient {
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature },
        };

        debug!("Requesting completion from {} for {} chars", self.model, prompt.len());

        let response: GenerateResponse = send_json(
            self.client
                .post(self.endpoint("generateContent"))
                .header("x-goog-api-key", &self.api_key)
                .json(&request),
            "Gemini generateContent",
        )
        .await?;

        candidate_text(response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for GeminiClient {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.embed(texts, TASK_DOCUMENT).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()], TASK_QUERY).await?;
        vectors
            .pop()
            .ok_or_else(|| PipelineError::Provider("No embedding data returned from Gemini".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client(model: &str) -> GeminiClient {
        GeminiClient::new(
            Client::new(),
            "https://generativelanguage.googleapis.com/v1beta/",
            "key",
            model,
        )
    }

    #[test]
    fn test_model_prefix_normalized() {
        assert_eq!(client("gemini-2.0-flash").model, "models/gemini-2.0-flash");
        assert_eq!(client("models/gemini-embedding-001").model, "models/gemini-embedding-001");
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            client("gemini-2.0-flash").endpoint("generateContent"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_generate_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig { temperature: 0.25 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["temperature"], 0.25);
    }

    #[test]
    fn test_embed_request_omits_role() {
        let request = EmbedRequest {
            model: "models/gemini-embedding-001",
            content: Content {
                role: None,
                parts: vec![Part { text: "chunk" }],
            },
            task_type: TASK_QUERY,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json["content"].get("role").is_none());
        assert_eq!(json["taskType"], "RETRIEVAL_QUERY");
    }

    #[test]
    fn test_candidate_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"1. What is "},{"text":"osmosis?"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(candidate_text(response).unwrap(), "1. What is osmosis?");
    }

    #[test]
    fn test_blocked_response_is_provider_error() {
        let response: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(candidate_text(response), Err(PipelineError::Provider(_))));
    }

    #[test]
    fn test_embedding_vectors() {
        let response: BatchEmbedResponse =
            serde_json::from_str(r#"{"embeddings":[{"values":[0.1,0.2]},{"values":[0.3,0.4]}]}"#)
                .unwrap();
        assert_eq!(
            embedding_vectors(response, 2).unwrap(),
            vec![vec![0.1, 0.2], vec![0.3, 0.4]]
        );
    }
}
