// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Run discovery.
//!
//! A build tree holds one directory per benchmark run, named after the run's
//! timestamp, next to unrelated content (index pages, scratch files). The
//! loader turns every timestamp-named directory that holds a readable
//! artifact into a [`Run`] and ignores everything else.

use crate::warning::{Warning, WarningSink};
use search_bench_core::{Run, RunTimestamp, ARTIFACT_FILE};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Loads runs from a build tree.
#[derive(Debug, Clone)]
pub struct RunLoader {
    artifact_name: String,
}

impl Default for RunLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl RunLoader {
    /// Create a loader looking for `results.json` in each run directory.
    pub fn new() -> Self {
        Self {
            artifact_name: ARTIFACT_FILE.to_string(),
        }
    }

    /// Use a different artifact file name.
    pub fn with_artifact_name(mut self, name: impl Into<String>) -> Self {
        self.artifact_name = name.into();
        self
    }

    /// Artifact file name looked up in each run directory.
    pub fn artifact_name(&self) -> &str {
        &self.artifact_name
    }

    /// Load every run under `root`, sorted ascending by timestamp.
    ///
    /// - entries whose name is not a run timestamp, and non-directories, are
    ///   skipped silently
    /// - run directories without the artifact are skipped silently
    /// - artifacts that fail to read or parse are reported to `sink` and skipped
    ///
    /// A missing `root` yields no runs.
    pub fn scan(&self, root: &Path, sink: &mut dyn WarningSink) -> Vec<Run> {
        let entries = match fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(root = %root.display(), "build tree does not exist");
                return Vec::new();
            }
            Err(e) => {
                sink.warn(Warning::UnreadableTree {
                    path: root.to_path_buf(),
                    reason: e.to_string(),
                });
                return Vec::new();
            }
        };

        let mut runs = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(timestamp) = RunTimestamp::parse_dirname(name) else {
                continue;
            };

            let artifact = path.join(&self.artifact_name);
            if !artifact.is_file() {
                debug!(run = %timestamp, "no artifact, skipping");
                continue;
            }

            match Run::load(&path, &self.artifact_name) {
                Ok(run) => {
                    debug!(run = %timestamp, "loaded run");
                    runs.push(run);
                }
                Err(e) => sink.warn(Warning::UnreadableArtifact {
                    path: artifact,
                    reason: e.to_string(),
                }),
            }
        }

        runs.sort_by_key(Run::timestamp);
        runs
    }

    /// The run with the greatest timestamp, if any run loads.
    pub fn latest(&self, root: &Path, sink: &mut dyn WarningSink) -> Option<Run> {
        self.scan(root, sink).pop()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warning::CollectingSink;
    use std::path::PathBuf;

    fn write_run(root: &Path, name: &str, body: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("results.json"), body).unwrap();
        dir
    }

    const VALID: &str =
        r#"{"results": {"TOP_10": {"turbopuffer": [{"query": "a", "duration": [1, 2]}]}}}"#;

    #[test]
    fn test_scan_sorts_runs() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), "2025-11-30T10-52-49", VALID);
        write_run(tmp.path(), "2025-11-01T00-00-00", VALID);
        write_run(tmp.path(), "2025-11-15T08-30-00", VALID);

        let mut sink = CollectingSink::new();
        let runs = RunLoader::new().scan(tmp.path(), &mut sink);

        let names: Vec<String> = runs.iter().map(|r| r.timestamp().dirname()).collect();
        assert_eq!(
            names,
            vec![
                "2025-11-01T00-00-00",
                "2025-11-15T08-30-00",
                "2025-11-30T10-52-49"
            ]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_scan_skips_non_runs_and_warns_on_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        write_run(tmp.path(), "assets", VALID);
        write_run(tmp.path(), "2025-11-20T09-00-00", "{\"results\": {");
        write_run(tmp.path(), "2025-11-21T09-00-00", VALID);
        fs::write(tmp.path().join("index.html"), "<html></html>").unwrap();

        let mut sink = CollectingSink::new();
        let runs = RunLoader::new().scan(tmp.path(), &mut sink);

        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].timestamp().dirname(), "2025-11-21T09-00-00");
        assert_eq!(sink.len(), 1);
        assert!(matches!(
            &sink.warnings()[0],
            Warning::UnreadableArtifact { path, .. } if path.ends_with("2025-11-20T09-00-00/results.json")
        ));
    }

    #[test]
    fn test_scan_skips_run_without_artifact() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("2025-11-20T09-00-00")).unwrap();

        let mut sink = CollectingSink::new();
        assert!(RunLoader::new().scan(tmp.path(), &mut sink).is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_scan_missing_root_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = CollectingSink::new();
        let runs = RunLoader::new().scan(&tmp.path().join("nope"), &mut sink);
        assert!(runs.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_custom_artifact_name() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("2025-11-20T09-00-00");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("nightly.json"), VALID).unwrap();

        let mut sink = CollectingSink::new();
        let loader = RunLoader::new().with_artifact_name("nightly.json");
        assert_eq!(loader.scan(tmp.path(), &mut sink).len(), 1);
        assert!(RunLoader::new().scan(tmp.path(), &mut sink).is_empty());
    }

    #[test]
    fn test_latest() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = CollectingSink::new();
        assert!(RunLoader::new().latest(tmp.path(), &mut sink).is_none());

        write_run(tmp.path(), "2025-11-01T00-00-00", VALID);
        write_run(tmp.path(), "2025-12-01T00-00-00", VALID);
        write_run(tmp.path(), "2025-12-02T00-00-00", "garbage");

        let latest = RunLoader::new().latest(tmp.path(), &mut sink).unwrap();
        assert_eq!(latest.timestamp().dirname(), "2025-12-01T00-00-00");
        assert_eq!(sink.len(), 1);
    }
}
