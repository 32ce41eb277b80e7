// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run annotations.
//!
//! Annotations label notable runs (a deployment, a merged pull request) on the
//! latency charts. They are supplied by the caller, keyed by the run's
//! directory-name timestamp, and joined to runs by exact timestamp equality.

use crate::run::RunTimestamp;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw entry of an annotation table.
///
/// ```json
/// {
///   "2025-11-18T10-39-24": "Deployment v1.2.3",
///   "2025-11-22T11-01-12": { "text": "Made block postings generic", "pr": 5995 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AnnotationEntry {
    /// Plain label.
    Label(String),
    /// Label with an optional pull request number.
    Record {
        /// Label text.
        #[serde(default)]
        text: String,
        /// Pull request number.
        #[serde(default)]
        pr: Option<u64>,
    },
}

/// A resolved annotation attached to a run timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// Run the annotation belongs to.
    pub timestamp: RunTimestamp,
    /// Label text.
    pub text: String,
    /// Pull request number, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr: Option<u64>,
}

impl Annotation {
    /// Create an annotation without a pull request reference.
    pub fn new(timestamp: RunTimestamp, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
            pr: None,
        }
    }

    /// Attach a pull request number.
    pub fn with_pr(mut self, pr: u64) -> Self {
        self.pr = Some(pr);
        self
    }

    /// Label as displayed on a chart: text plus ` #<pr>` when present.
    pub fn label(&self) -> String {
        match self.pr {
            Some(pr) => format!("{} #{}", self.text, pr),
            None => self.text.clone(),
        }
    }
}

/// Annotations keyed by run timestamp. A timestamp holds at most one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationTable {
    entries: BTreeMap<RunTimestamp, Annotation>,
}

impl AnnotationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw entries.
    ///
    /// Returns the table and the keys that are not valid run timestamps; those
    /// entries can never match a run and are left out.
    pub fn from_entries(raw: IndexMap<String, AnnotationEntry>) -> (Self, Vec<String>) {
        let mut table = Self::new();
        let mut rejected = Vec::new();

        for (key, entry) in raw {
            let Some(timestamp) = RunTimestamp::parse_dirname(&key) else {
                rejected.push(key);
                continue;
            };
            let annotation = match entry {
                AnnotationEntry::Label(text) => Annotation::new(timestamp, text),
                AnnotationEntry::Record { text, pr } => Annotation {
                    timestamp,
                    text,
                    pr,
                },
            };
            table.insert(annotation);
        }

        (table, rejected)
    }

    /// Insert an annotation, replacing any existing one for its timestamp.
    pub fn insert(&mut self, annotation: Annotation) {
        self.entries.insert(annotation.timestamp, annotation);
    }

    /// Annotation for a run timestamp.
    pub fn get(&self, timestamp: &RunTimestamp) -> Option<&Annotation> {
        self.entries.get(timestamp)
    }

    /// Number of annotations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Annotations in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.entries.values()
    }
}
