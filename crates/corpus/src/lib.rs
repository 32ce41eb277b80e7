//! Corpus line filter for the search benchmark.
//!
//! Reads JSON lines of the form `{"url": ..., "body": ...}` and emits one
//! `{"id": ..., "text": ..., "filter": [...]}` line per usable document. Text
//! is normalized for indexing and every document is tagged with the sampling
//! buckets it belongs to, so benchmarks can run against fixed subsets of the
//! corpus.
//!
//! Bucket membership depends only on the document URL, through
//! [`search_bench_core::hash::stable_hash`]; the same URL lands in the same
//! buckets on every machine and every run.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod sampling;
pub mod transform;

pub use sampling::sampling_buckets;
pub use transform::{CorpusDocument, CorpusTransformer, LineOutcome, SourceDocument, TransformStats};

use thiserror::Error;

/// Errors raised by the corpus filter.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The normalization pattern failed to compile.
    #[error("Invalid normalization pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A transformed document could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
