use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use localrag_core::config::{IndexBackend, Settings};
use localrag_core::traits::{Embedder, LanguageModel, VectorIndex};
use localrag_llm::{OllamaClient, OllamaConfig};
use localrag_pipeline::RagService;
use localrag_vector::{LanceIndex, MemoryIndex};

/// Load the embedder, open the index and connect the model client once, at
/// startup. Failures here are fatal for the process.
pub async fn build_service(settings: &Settings) -> Result<RagService> {
    let embedder: Arc<dyn Embedder> = Arc::from(localrag_embed::get_default_embedder(settings)?);

    let index: Arc<dyn VectorIndex> = match settings.index.backend {
        IndexBackend::Lance => {
            let dir = settings.index_dir();
            Arc::new(LanceIndex::open(&dir, &settings.data.collection, embedder.dim()).await?)
        }
        IndexBackend::Memory => Arc::new(MemoryIndex::new()),
    };

    let client = OllamaClient::new(OllamaConfig::from(&settings.llm))?;
    info!(model = client.model(), base_url = %settings.llm.base_url, "language model client ready");
    let model: Arc<dyn LanguageModel> = Arc::new(client);

    Ok(RagService::new(settings, embedder, index, model)?)
}
