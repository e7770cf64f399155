use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("No documents found in {0}")]
    NoDocumentsFound(String),

    #[error("Retrieval failed: {0}")]
    RetrievalFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector index operation failed: {0}")]
    Index(String),

    #[error("Text extraction failed for {path}: {reason}")]
    Extraction { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for collaborator failures a caller may retry as-is; false for
    /// errors only an operator can fix (bad parameters, missing input, config).
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RetrievalFailed(_) | Error::GenerationFailed(_) | Error::Embedding(_) | Error::Index(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collaborator_errors_are_retryable() {
        assert!(Error::RetrievalFailed("timeout".into()).is_retryable());
        assert!(Error::GenerationFailed("503".into()).is_retryable());
        assert!(!Error::InvalidParameters("overlap".into()).is_retryable());
        assert!(!Error::NoDocumentsFound("data".into()).is_retryable());
    }
}
