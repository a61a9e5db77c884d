//! Provider identity and text-generation parameters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// The embedding/LLM backends the core can be wired to.
///
/// `OpenAi` is the hosted variant (remote model addressed by name, native
/// batch embedding). `Ollama` is the local variant (model server on a local
/// address, one request per text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Ollama,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn all() -> [ProviderKind; 2] {
        [ProviderKind::OpenAi, ProviderKind::Ollama]
    }

    /// Hosted providers run remotely and support native batch embedding.
    pub fn is_hosted(&self) -> bool {
        matches!(self, ProviderKind::OpenAi)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(DomainError::Validation(format!(
                "Unsupported provider: {other}. Expected one of: openai, ollama"
            ))),
        }
    }
}

/// Sampling parameters passed to a provider's text-generation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
}

impl GenerationParams {
    pub fn hosted_default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 1.0,
            max_tokens: 2048,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    pub fn local_default() -> Self {
        Self {
            temperature: 0.1,
            top_p: 0.9,
            max_tokens: 2048,
            presence_penalty: None,
            frequency_penalty: None,
        }
    }

    /// Mistral models answer more reliably with near-greedy sampling.
    pub fn tuned_for_mistral(&self) -> Self {
        Self {
            temperature: 0.05,
            top_p: 0.85,
            ..self.clone()
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::hosted_default()
    }
}
