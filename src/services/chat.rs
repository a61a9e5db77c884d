//! Question answering over retrieved context.

use serde::Serialize;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::instrument;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ProviderKind, RetrievalConfig, RetrievedDocument};

use super::provider_registry::ProviderRegistry;

pub const NO_ANSWER_REPLY: &str =
    "I could not generate an answer to your question. Could you try rephrasing it?";

#[derive(Debug, Clone, Serialize)]
pub struct ChatAnswer {
    pub answer: String,
    pub provider: ProviderKind,
    pub model: String,
    pub documents: Vec<RetrievedDocument>,
}

pub struct ChatService {
    registry: Arc<ProviderRegistry>,
    retrieval: RetrievalConfig,
}

impl ChatService {
    pub fn new(registry: Arc<ProviderRegistry>, retrieval: RetrievalConfig) -> Self {
        Self { registry, retrieval }
    }

    /// How many documents to retrieve for `question`.
    pub fn k_for(&self, question: &str) -> usize {
        let lower = question.to_lowercase();
        if self.retrieval.broad_keywords.iter().any(|kw| lower.contains(kw.as_str())) {
            self.retrieval.broad_k
        } else {
            self.retrieval.focused_k
        }
    }

    #[instrument(skip(self, question), fields(provider = %provider))]
    pub async fn answer(
        &self,
        question: &str,
        provider: ProviderKind,
        model: Option<&str>,
    ) -> DomainResult<ChatAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::Validation("question must not be empty".to_string()));
        }

        let documents = match self.retrieve(question, provider).await {
            Ok(docs) => docs,
            Err(err) => {
                tracing::error!(error = %err, "retrieval failed, answering without context");
                Vec::new()
            }
        };
        tracing::debug!(documents = documents.len(), "retrieved context");

        let llm = self.registry.factory().llm(provider, model)?;
        let prompt = build_prompt(&documents, question);
        let answer = llm.generate(&prompt).await?;

        let answer = if answer.trim().is_empty() {
            tracing::warn!(model = llm.model_name(), "empty answer from model");
            NO_ANSWER_REPLY.to_string()
        } else {
            answer.trim().to_string()
        };

        Ok(ChatAnswer {
            answer,
            provider,
            model: llm.model_name().to_string(),
            documents,
        })
    }

    async fn retrieve(&self, question: &str, provider: ProviderKind) -> DomainResult<Vec<RetrievedDocument>> {
        let store = self.registry.get_store(provider).await?;
        store.as_retriever(self.k_for(question)).get_relevant_documents(question).await
    }
}

/// Numbered context blocks followed by the question.
pub fn build_prompt(documents: &[RetrievedDocument], question: &str) -> String {
    let mut prompt = String::from(
        "You are a helpful assistant. Answer the question using only the context below.\n\n",
    );

    if documents.is_empty() {
        prompt.push_str("Context: (no relevant documents found)\n\n");
    } else {
        prompt.push_str("Context:\n");
        for (i, doc) in documents.iter().enumerate() {
            let source = doc.source().unwrap_or("unknown");
            let _ = writeln!(prompt, "[{}] (source: {source})\n{}\n", i + 1, doc.content.trim());
        }
    }

    let _ = write!(
        prompt,
        "Question: {question}\n\n\
         If the context does not contain the answer, say that you could not find \
         information about it in the available documents. Otherwise answer concisely."
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Metadata;

    #[test]
    fn test_prompt_numbers_documents() {
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), serde_json::json!("https://a.se"));
        let docs = vec![
            RetrievedDocument {
                content: "Rent is due monthly.".to_string(),
                metadata,
            },
            RetrievedDocument {
                content: "No source here.".to_string(),
                metadata: Metadata::new(),
            },
        ];

        let prompt = build_prompt(&docs, "When is rent due?");
        assert!(prompt.contains("[1] (source: https://a.se)\nRent is due monthly."));
        assert!(prompt.contains("[2] (source: unknown)\nNo source here."));
        assert!(prompt.contains("Question: When is rent due?"));
    }

    #[test]
    fn test_prompt_without_documents() {
        let prompt = build_prompt(&[], "Anything?");
        assert!(prompt.contains("no relevant documents found"));
    }
}
