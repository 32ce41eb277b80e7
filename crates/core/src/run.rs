// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run identity and loaded runs.
//!
//! A run is one timestamped execution of the benchmark. Its identity comes
//! from the name of the directory holding its artifact, which must be exactly
//! `YYYY-MM-DDThh-mm-ss`. Anything else in the build tree is ignored.

use crate::artifact::ResultsDocument;
use crate::error::{CoreError, Result};
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// `strftime` pattern of run directory names.
pub const DIRNAME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// `strftime` pattern of the ISO-8601 form handed to the presentation layer.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Timestamp identifying a run, parsed from its directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunTimestamp(NaiveDateTime);

impl RunTimestamp {
    /// Parse a directory name.
    ///
    /// The name must re-format to itself, so `2025-1-2T3-4-5` is rejected even
    /// though a lenient parser would accept it.
    pub fn parse_dirname(name: &str) -> Option<Self> {
        let parsed = NaiveDateTime::parse_from_str(name, DIRNAME_FORMAT).ok()?;
        (parsed.format(DIRNAME_FORMAT).to_string() == name).then_some(Self(parsed))
    }

    /// Directory-name form, e.g. `2025-11-22T11-01-12`.
    pub fn dirname(&self) -> String {
        self.0.format(DIRNAME_FORMAT).to_string()
    }

    /// ISO-8601 form, e.g. `2025-11-22T11:01:12`.
    pub fn to_iso(&self) -> String {
        self.0.format(ISO_FORMAT).to_string()
    }

    /// Underlying date-time.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl FromStr for RunTimestamp {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_dirname(s).ok_or_else(|| CoreError::InvalidTimestamp(s.to_string()))
    }
}

impl fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dirname())
    }
}

impl Serialize for RunTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso())
    }
}

/// One loaded benchmark run.
#[derive(Debug, Clone)]
pub struct Run {
    timestamp: RunTimestamp,
    path: PathBuf,
    document: ResultsDocument,
}

impl Run {
    /// Create a run from an already-parsed artifact.
    pub fn new(timestamp: RunTimestamp, document: ResultsDocument) -> Self {
        Self {
            timestamp,
            path: PathBuf::new(),
            document,
        }
    }

    /// Record the directory the run was loaded from.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Load a run from `dir`, reading `artifact_name` inside it.
    ///
    /// Fails if the directory name is not a run timestamp or the artifact
    /// cannot be read or parsed.
    pub fn load(dir: &Path, artifact_name: &str) -> Result<Self> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let timestamp: RunTimestamp = name.parse()?;
        let document = ResultsDocument::from_path(dir.join(artifact_name))?;
        Ok(Self::new(timestamp, document).with_path(dir))
    }

    /// Run timestamp.
    pub fn timestamp(&self) -> RunTimestamp {
        self.timestamp
    }

    /// Directory the run was loaded from (empty for in-memory runs).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed artifact.
    pub fn document(&self) -> &ResultsDocument {
        &self.document
    }
}
