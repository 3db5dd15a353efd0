// file: src/config.rs
// description: application configuration management with toml and environment support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::providers::ProviderKind;
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "STUDY_BUDDY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub input: InputConfig,
    pub splitter: SplitterConfig,
    pub provider: ProviderConfig,
    pub index: IndexConfig,
    pub answers: AnswersConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub file_path: Option<PathBuf>,
    pub question_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplitterConfig {
    /// Model whose tokenizer drives the chunk boundaries.
    pub model_name: String,
    pub chunk_size_q: usize,
    pub chunk_overlap_q: usize,
    pub chunk_size_a: usize,
    pub chunk_overlap_a: usize,
    pub suppress_warnings: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub kind: String,
    pub openai_api_key: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openai_base_url: String,
    pub gemini_base_url: String,
    pub openai_chat_model: String,
    pub openai_embedding_model: String,
    pub gemini_chat_model: String,
    pub gemini_embedding_model: String,
    pub question_temperature: f32,
    pub answer_temperature: f32,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    pub batch_size: usize,
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswersConfig {
    pub output_path: PathBuf,
    pub on_error: ErrorPolicy,
}

/// What the answer loop does when a single question fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    #[default]
    Abort,
    Skip,
}

/// Flat variables kept from the original `.env` layout; they win over
/// every other source.
#[derive(Debug, Default)]
struct LegacyEnv {
    file_path: Option<String>,
    question_limit: Option<u64>,
    provider: Option<String>,
    openai_api_key: Option<String>,
    gemini_api_key: Option<String>,
}

impl LegacyEnv {
    fn from_process() -> Result<Self> {
        let question_limit = match env_var("QUESTION_LIMIT") {
            Some(raw) => Some(parse_question_limit(&raw)? as u64),
            None => None,
        };

        Ok(Self {
            file_path: env_var("FILE_PATH"),
            question_limit,
            provider: env_var("LLM_PROVIDER"),
            openai_api_key: env_var("OPENAI_API_KEY"),
            gemini_api_key: env_var("GEMINI_API_KEY"),
        })
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();
        let legacy = LegacyEnv::from_process()?;
        Self::from_sources(path, Some(ENV_PREFIX), &legacy)
    }

    /// Defaults, then the TOML file, then `<prefix>__SECTION__KEY` variables
    /// when a prefix is given, then the flat variables in `legacy`.
    fn from_sources(
        path: Option<&Path>,
        env_prefix: Option<&str>,
        legacy: &LegacyEnv,
    ) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let mut builder = config::Config::builder().add_source(defaults);

        let path = path.unwrap_or_else(|| Path::new("config/default.toml"));
        builder = builder.add_source(config::File::from(path).required(false));

        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                config::Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            );
        }

        builder = builder
            .set_override_option("input.file_path", legacy.file_path.clone())
            .and_then(|b| b.set_override_option("input.question_limit", legacy.question_limit))
            .and_then(|b| b.set_override_option("provider.kind", legacy.provider.clone()))
            .and_then(|b| {
                b.set_override_option("provider.openai_api_key", legacy.openai_api_key.clone())
            })
            .and_then(|b| {
                b.set_override_option("provider.gemini_api_key", legacy.gemini_api_key.clone())
            })
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            input: InputConfig::default(),
            splitter: SplitterConfig {
                model_name: "gpt-3.5-turbo-16k".to_string(),
                chunk_size_q: 10_000,
                chunk_overlap_q: 200,
                chunk_size_a: 1_000,
                chunk_overlap_a: 100,
                suppress_warnings: true,
            },
            provider: ProviderConfig {
                kind: "gemini".to_string(),
                openai_api_key: None,
                gemini_api_key: None,
                openai_base_url: "https://api.openai.com/v1".to_string(),
                gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                openai_chat_model: "gpt-3.5-turbo-16k".to_string(),
                openai_embedding_model: "text-embedding-3-small".to_string(),
                gemini_chat_model: "gemini-2.0-flash".to_string(),
                gemini_embedding_model: "models/gemini-embedding-001".to_string(),
                question_temperature: 0.4,
                answer_temperature: 0.1,
                request_timeout_secs: None,
            },
            index: IndexConfig {
                batch_size: 100,
                top_k: 4,
            },
            answers: AnswersConfig {
                output_path: PathBuf::from("outputs/answers.txt"),
                on_error: ErrorPolicy::Abort,
            },
        }
    }

    /// The input document path, which has no default.
    pub fn file_path(&self) -> Result<&Path> {
        self.input.file_path.as_deref().ok_or_else(|| {
            PipelineError::Config(
                "Missing required environment variables: [\"FILE_PATH\"]".to_string(),
            )
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.provider.kind.parse::<ProviderKind>()?;
        Validator::validate_temperature(self.provider.question_temperature)?;
        Validator::validate_temperature(self.provider.answer_temperature)?;

        let s = &self.splitter;
        if s.chunk_size_q == 0 || s.chunk_size_a == 0 {
            return Err(PipelineError::Config(
                "chunk sizes must be greater than 0".to_string(),
            ));
        }

        if s.chunk_overlap_q >= s.chunk_size_q || s.chunk_overlap_a >= s.chunk_size_a {
            return Err(PipelineError::Config(
                "chunk overlap must be smaller than chunk size".to_string(),
            ));
        }

        if s.chunk_size_a > s.chunk_size_q {
            return Err(PipelineError::Config(
                "answer chunk size cannot exceed question chunk size".to_string(),
            ));
        }

        if self.index.batch_size == 0 {
            return Err(PipelineError::Config(
                "batch_size must be greater than 0".to_string(),
            ));
        }

        if self.index.top_k == 0 {
            return Err(PipelineError::Config(
                "top_k must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

pub fn parse_question_limit(raw: &str) -> Result<usize> {
    raw.trim().parse::<usize>().map_err(|_| {
        PipelineError::Config(format!("Invalid QUESTION_LIMIT value: {:?}", raw))
    })
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
