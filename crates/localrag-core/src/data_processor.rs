//! Document discovery and text extraction.
//!
//! Walks a folder for `.pdf`, `.txt` and `.md` files in sorted path order and
//! extracts their text. Extraction is best effort: a PDF that cannot be parsed
//! becomes an empty document instead of failing the whole run.
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::traits::TextExtractor;
use crate::types::Document;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["pdf", "txt", "md"];

#[derive(Debug, Default, Clone, Copy)]
pub struct FileTextExtractor;

impl TextExtractor for FileTextExtractor {
    fn extract(&self, path: &Path) -> anyhow::Result<String> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable file, indexing it as empty");
                return Ok(String::new());
            }
        };
        match extension_of(path).as_deref() {
            Some("pdf") => match pdf_extract::extract_text_from_mem(&bytes) {
                Ok(text) => Ok(text),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "unreadable PDF, indexing it as empty");
                    Ok(String::new())
                }
            },
            _ => Ok(String::from_utf8(bytes).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())),
        }
    }
}

pub struct DataProcessor {
    extractor: Box<dyn TextExtractor>,
}

impl Default for DataProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl DataProcessor {
    pub fn new() -> Self {
        Self::with_extractor(Box::new(FileTextExtractor))
    }

    pub fn with_extractor(extractor: Box<dyn TextExtractor>) -> Self {
        Self { extractor }
    }

    /// Extract every supported file under `data_dir`. Document ids are the
    /// paths as discovered.
    pub fn load_documents(&self, data_dir: &Path) -> Result<Vec<Document>> {
        let files = list_document_files(data_dir);
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no supported documents found");
            return Ok(vec![]);
        }
        let mut documents = Vec::with_capacity(files.len());
        for (file_index, file_path) in files.iter().enumerate() {
            debug!("Processing file {}/{}: {}", file_index + 1, files.len(), file_path.display());
            let text = self.extractor.extract(file_path).map_err(|e| crate::error::Error::Extraction {
                path: file_path.display().to_string(),
                reason: e.to_string(),
            })?;
            documents.push(Document::new(file_path.to_string_lossy().to_string(), text));
        }
        info!("Loaded {} document(s) from {}", documents.len(), data_dir.display());
        Ok(documents)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension().and_then(|s| s.to_str()).map(str::to_ascii_lowercase)
}

pub fn list_document_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| extension_of(p).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str())))
        .collect();
    files.sort();
    files
}
