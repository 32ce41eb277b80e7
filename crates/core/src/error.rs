// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error type for the core data model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building core values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not match the run timestamp pattern.
    #[error("Invalid run timestamp: {0:?} (expected YYYY-MM-DDThh-mm-ss)")]
    InvalidTimestamp(String),

    /// Reading a file failed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A file did not contain the expected JSON structure.
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        /// File that could not be parsed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
