use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::chunker::ChunkingParams;
use crate::error::{Error, Result};
use crate::history::{DEFAULT_CAPACITY, DEFAULT_MAX_PAIRS};
use crate::prompt::DEFAULT_INSTRUCTIONS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub chunking: ChunkingParams,
    pub retrieval: RetrievalSettings,
    pub history: HistorySettings,
    pub embedding: EmbeddingSettings,
    pub index: IndexSettings,
    pub llm: LlmSettings,
    pub prompt: PromptSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub documents_dir: String,
    pub index_dir: String,
    pub collection: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub max_k: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    pub max_pairs: usize,
    pub capacity: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    Local,
    Hash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub model_dir: String,
    pub max_len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    Lance,
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub backend: IndexBackend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSettings {
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { documents_dir: "data".to_string(), index_dir: "chroma_db".to_string(), collection: "pdf_docs".to_string() }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 5, max_k: 50 }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { max_pairs: DEFAULT_MAX_PAIRS, capacity: DEFAULT_CAPACITY }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self { backend: EmbeddingBackend::Local, model_dir: "models/all-MiniLM-L6-v2".to_string(), max_len: 256 }
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self { backend: IndexBackend::Lance }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self { base_url: "http://localhost:11434".to_string(), model: "mistral".to_string(), temperature: 0.2, timeout_secs: 120 }
    }
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self { instructions: DEFAULT_INSTRUCTIONS.to_string() }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8000 }
    }
}

impl Settings {
    /// Load `config.toml`, the `RUST_ENV` overlay and `APP_*` variables,
    /// falling back to defaults for anything unset.
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::from_figment(figment_for_env(&env_name))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract().map_err(|e| Error::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        if self.retrieval.top_k == 0 || self.retrieval.max_k == 0 {
            return Err(Error::InvalidParameters("retrieval.top_k and retrieval.max_k must be greater than 0".to_string()));
        }
        if self.history.max_pairs > self.history.capacity {
            return Err(Error::InvalidParameters(format!(
                "history.max_pairs ({}) exceeds history.capacity ({})",
                self.history.max_pairs, self.history.capacity
            )));
        }
        if self.data.collection.trim().is_empty() {
            return Err(Error::Config("data.collection must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn documents_dir(&self) -> PathBuf {
        expand_path(&self.data.documents_dir)
    }

    pub fn index_dir(&self) -> PathBuf {
        expand_path(&self.data.index_dir)
    }

    pub fn model_dir(&self) -> PathBuf {
        expand_path(&self.embedding.model_dir)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Defaults, then `config.toml`, then `config.<env>.toml`, then `APP_*`
/// (nested keys use `__`, e.g. `APP_LLM__MODEL`).
pub fn figment_for_env(env_name: &str) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::file("config.toml"));
    match env_name {
        "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
        "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
        "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
        _ => {}
    }
    figment.merge(Env::prefixed("APP_").split("__"))
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_reference_behaviour() {
        let settings = Settings::default();
        assert_eq!(settings.chunking, ChunkingParams { chunk_size: 500, chunk_overlap: 50 });
        assert_eq!(settings.history.max_pairs, 3);
        assert_eq!(settings.data.collection, "pdf_docs");
        assert_eq!(settings.llm.model, "mistral");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn toml_env_overlay_and_env_vars_merge() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[chunking]\nchunk_size = 200\nchunk_overlap = 20\n[retrieval]\ntop_k = 3\n")?;
            jail.create_file("config.test.toml", "[llm]\nmodel = \"llama3\"\n")?;
            jail.set_env("APP_SERVER__PORT", "9001");
            let settings = Settings::from_figment(figment_for_env("test")).expect("settings");
            assert_eq!(settings.chunking.chunk_size, 200);
            assert_eq!(settings.retrieval.top_k, 3);
            assert_eq!(settings.retrieval.max_k, 50);
            assert_eq!(settings.llm.model, "llama3");
            assert_eq!(settings.server.port, 9001);
            Ok(())
        });
    }

    #[test]
    fn invalid_chunking_is_rejected_at_load() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "[chunking]\nchunk_size = 50\nchunk_overlap = 50\n")?;
            let err = Settings::from_figment(figment_for_env("dev")).expect_err("must fail");
            assert!(matches!(err, Error::InvalidParameters(_)));
            Ok(())
        });
    }

    #[test]
    fn window_larger_than_capacity_is_rejected() {
        let mut settings = Settings::default();
        settings.history.capacity = 2;
        assert!(matches!(settings.validate(), Err(Error::InvalidParameters(_))));
    }
}
