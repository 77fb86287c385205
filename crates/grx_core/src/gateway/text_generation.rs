//! Text generation contract.

use crate::config::CoreConfig;
use crate::gateway::gemini::GeminiTextGenerator;
use async_trait::async_trait;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum GenerationError {
    /// No credentials configured; callers show a "service unavailable" text.
    Unavailable,
    /// Network or decode failure; the request URL is stripped so the key
    /// never reaches `Display`.
    Transport(reqwest::Error),
    /// Upstream answered with a non-success status or an error payload.
    Upstream { status: Option<u16>, message: String },
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "text generation service unavailable"),
            Self::Transport(err) => write!(f, "text generation request failed: {err}"),
            Self::Upstream {
                status: Some(status),
                message,
            } => write!(f, "text generation error {status}: {message}"),
            Self::Upstream {
                status: None,
                message,
            } => write!(f, "text generation error: {message}"),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value.without_url())
    }
}

/// Prompt-in, text-out generative model.
///
/// Implementations own retry and timeout policy; callers make one request and
/// take whatever comes back.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Stand-in used when no API key is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableTextGenerator;

#[async_trait]
impl TextGenerationService for UnavailableTextGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable)
    }
}

/// Picks the Gemini client when a key is configured, else the stand-in.
pub fn text_generator_from_config(config: &CoreConfig) -> Arc<dyn TextGenerationService> {
    let Some(api_key) = config.gemini_api_key.as_deref() else {
        warn!("event=text_generation_init module=gateway status=skipped reason=missing_api_key");
        return Arc::new(UnavailableTextGenerator);
    };
    Arc::new(GeminiTextGenerator::new(
        api_key,
        config.gemini_model.as_str(),
        config.request_timeout_secs,
    ))
}
