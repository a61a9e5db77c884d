//! Embedding and text-generation provider adapters.

pub mod ollama;
pub mod openai;
pub mod registry;

pub use ollama::{OllamaEmbeddingProvider, OllamaLlmProvider};
pub use openai::{OpenAiEmbeddingProvider, OpenAiLlmProvider};
pub use registry::DefaultProviderFactory;
