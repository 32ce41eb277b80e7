// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Recoverable-condition reporting.
//!
//! Loading and comparison absorb recoverable conditions (an unreadable
//! artifact, a query missing from the baseline) instead of failing. They
//! report each one to an injected [`WarningSink`] so callers decide where the
//! diagnostics go. Warnings never end up in computed results.

use std::fmt;
use std::path::PathBuf;

/// A recoverable condition worth telling the user about.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A run directory's artifact could not be read or parsed; the run was skipped.
    UnreadableArtifact {
        /// Artifact path.
        path: PathBuf,
        /// Read or parse error.
        reason: String,
    },
    /// The build tree itself could not be listed.
    UnreadableTree {
        /// Root directory.
        path: PathBuf,
        /// Listing error.
        reason: String,
    },
    /// A contender query has no baseline counterpart; its row was skipped.
    MissingBaselineQuery {
        /// Result category.
        category: String,
        /// Query string.
        query: String,
    },
    /// An annotation key is not a run timestamp and can never match a run.
    InvalidAnnotationKey {
        /// Offending key.
        key: String,
    },
    /// Runs handed to aggregation were out of order and got sorted.
    UnsortedRuns {
        /// Number of runs sorted.
        count: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnreadableArtifact { path, reason } => {
                write!(f, "Error processing {}: {}", path.display(), reason)
            }
            Self::UnreadableTree { path, reason } => {
                write!(f, "Cannot list {}: {}", path.display(), reason)
            }
            Self::MissingBaselineQuery { category, query } => {
                write!(f, "Query [{}] not found in baseline results ({})", query, category)
            }
            Self::InvalidAnnotationKey { key } => {
                write!(f, "Annotation key {:?} is not a run timestamp", key)
            }
            Self::UnsortedRuns { count } => {
                write!(f, "Runs were not in chronological order; sorted {} runs before aggregation", count)
            }
        }
    }
}

/// Destination for warnings.
pub trait WarningSink {
    /// Report one warning.
    fn warn(&mut self, warning: Warning);
}

/// Sink that forwards warnings to `tracing` at `WARN` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning);
    }
}

/// Sink that keeps every warning for later inspection.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    warnings: Vec<Warning>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far, in order.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of warnings received.
    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    /// Whether no warning was received.
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Take the collected warnings.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl WarningSink for CollectingSink {
    fn warn(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}
