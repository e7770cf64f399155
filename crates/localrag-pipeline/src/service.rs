//! The answer service: one explicitly constructed object owning the embedder,
//! the vector index, the language model and the conversation.
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use localrag_core::chunker::ChunkingParams;
use localrag_core::config::Settings;
use localrag_core::context::{assemble, cited_chunks};
use localrag_core::data_processor::DataProcessor;
use localrag_core::history::ConversationState;
use localrag_core::prompt::PromptTemplate;
use localrag_core::traits::{Embedder, LanguageModel, VectorIndex};
use localrag_core::types::{AnswerResponse, Chunk, Document, IngestReport, ScoredChunk};
use localrag_core::{yes_no, Error, Result};

use crate::ingest::ingest;
use crate::retrieve::Retriever;
use crate::synthesize::Synthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    pub status: &'static str,
}

/// A completed query: the public response plus the cited rows, kept so the
/// interactive loop can print previews.
#[derive(Debug, Clone)]
pub struct Answer {
    pub response: AnswerResponse,
    pub cited: Vec<ScoredChunk>,
}

pub struct RagService {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    retriever: Retriever,
    synthesizer: Synthesizer,
    processor: DataProcessor,
    chunking: ChunkingParams,
    top_k: usize,
    max_pairs: usize,
    conversation: Mutex<ConversationState>,
    // Ingestion clears then rebuilds the index; queries must never see that window.
    maintenance: RwLock<()>,
}

impl RagService {
    pub fn new(
        settings: &Settings,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self> {
        settings.validate()?;
        let retriever = Retriever::new(embedder.clone(), index.clone(), settings.retrieval.max_k);
        let synthesizer = Synthesizer::new(model, PromptTemplate::new(settings.prompt.instructions.clone()));
        Ok(Self {
            embedder,
            index,
            retriever,
            synthesizer,
            processor: DataProcessor::new(),
            chunking: settings.chunking,
            top_k: settings.retrieval.top_k,
            max_pairs: settings.history.max_pairs,
            conversation: Mutex::new(ConversationState::with_capacity(settings.history.capacity)),
            maintenance: RwLock::new(()),
        })
    }

    pub fn with_processor(mut self, processor: DataProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn health(&self) -> Health {
        Health { status: "ok" }
    }

    pub async fn answer(&self, question: &str) -> Result<AnswerResponse> {
        Ok(self.ask(question).await?.response)
    }

    /// Retrieve, assemble, prompt, normalise and remember one exchange.
    ///
    /// A failed retrieval or generation leaves the conversation untouched.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let question = question.trim();
        let _window = self.maintenance.read().await;

        let retrieved = self.retriever.retrieve(question, self.top_k).await?;
        let assembled = assemble(&retrieved);
        if assembled.is_empty() {
            warn!("no context retrieved; the model will be asked without supporting passages");
        }

        // Held across generation so concurrent questions append in order.
        let mut conversation = self.conversation.lock().await;
        let history = conversation.render(self.max_pairs);
        let raw = self.synthesizer.synthesize(&history, &assembled.context, question).await?;
        let answer = yes_no::normalize(question, &raw);
        conversation.append(question, answer.clone());

        let cited = cited_chunks(&retrieved).into_iter().cloned().collect();
        Ok(Answer { response: AnswerResponse { answer, sources: assembled.citations }, cited })
    }

    /// Rebuild the index from an explicit document set.
    pub async fn ingest_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let _window = self.maintenance.write().await;
        ingest(documents, self.chunking, self.embedder.as_ref(), self.index.as_ref()).await
    }

    /// Rebuild the index from every supported file under `folder`.
    pub async fn ingest_all(&self, folder: &Path) -> Result<IngestReport> {
        self.chunking.validate()?;
        let documents = self.processor.load_documents(folder)?;
        if documents.is_empty() {
            return Err(Error::NoDocumentsFound(folder.display().to_string()));
        }
        let chunks = self.ingest_documents(&documents).await?;
        let report = IngestReport { document_count: documents.len(), chunk_count: chunks.len() };
        info!(documents = report.document_count, chunks = report.chunk_count, "indexed {} chunks", report.chunk_count);
        Ok(report)
    }

    pub async fn history_len(&self) -> usize {
        self.conversation.lock().await.len()
    }
}
