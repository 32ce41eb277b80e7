// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed view of the measurement artifact.
//!
//! The artifact is a JSON document shaped as
//! `results -> category -> engine -> [ { query, duration } ]`.
//! Each level is optional; an absent level reads as empty, never as an error.
//! Unknown keys are ignored so producers can add fields freely.

use crate::error::{CoreError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Per-engine result lists of one category, in artifact order.
pub type CategoryResults = IndexMap<String, Vec<QueryResult>>;

/// A parsed measurement artifact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsDocument {
    /// Category name to engine results. Absent means no categories.
    #[serde(default)]
    pub results: IndexMap<String, CategoryResults>,
}

/// Measurements of one query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Query string. Absent and empty are equivalent.
    #[serde(default)]
    pub query: Option<String>,
    /// Duration samples in artifact order. Absent means no samples.
    #[serde(default)]
    pub duration: Vec<f64>,
}

impl QueryResult {
    /// Create a query result.
    pub fn new(query: impl Into<String>, duration: Vec<f64>) -> Self {
        Self {
            query: Some(query.into()),
            duration,
        }
    }

    /// Query string, or `None` when absent or empty.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.is_empty())
    }

    /// Whether the entry has both a query and at least one sample.
    pub fn is_usable(&self) -> bool {
        self.query().is_some() && !self.duration.is_empty()
    }
}

impl ResultsDocument {
    /// Parse an artifact from a JSON string.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Read and parse an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content).map_err(|source| CoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Category names in artifact order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    /// Whether the artifact has the category.
    pub fn has_category(&self, category: &str) -> bool {
        self.results.contains_key(category)
    }

    /// Result list of `engine` under `category`, empty when either is absent.
    pub fn engine_results(&self, category: &str, engine: &str) -> &[QueryResult] {
        self.results
            .get(category)
            .and_then(|engines| engines.get(engine))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
