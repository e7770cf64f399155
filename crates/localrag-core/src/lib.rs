//! Core of the local RAG assistant: domain types, error taxonomy, settings,
//! collaborator traits, and the pure stages of the answer pipeline.

pub mod chunker;
pub mod config;
pub mod context;
pub mod data_processor;
pub mod error;
pub mod history;
pub mod prompt;
pub mod traits;
pub mod types;
pub mod yes_no;

pub use error::{Error, Result};
