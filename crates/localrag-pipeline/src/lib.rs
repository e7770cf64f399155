//! localrag-pipeline
//!
//! Ingestion, retrieval and answer synthesis wired over the collaborator
//! traits of `localrag-core`, plus the `RagService` entry point.

pub mod ingest;
pub mod retrieve;
pub mod service;
pub mod synthesize;

pub use ingest::ingest;
pub use retrieve::Retriever;
pub use service::{Answer, Health, RagService};
pub use synthesize::Synthesizer;
