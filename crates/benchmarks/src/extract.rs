// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-query latency extraction.
//!
//! Reads `results -> category -> ENGINE` of one artifact and keeps, for each
//! query, its duration samples and their minimum.
//!
//! The minimum is the summary used for time series on purpose: it answers
//! "best achievable latency" and filters out scheduling noise, at the cost of
//! hiding variance. Comparisons between two runs use the full samples instead.

use indexmap::IndexMap;
use search_bench_core::{ResultsDocument, Run, ENGINE};
use serde::Serialize;
use std::collections::BTreeSet;

/// Samples of one query in one run and category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySamples {
    /// Duration samples in artifact order. Never empty.
    pub samples: Vec<f64>,
    /// Minimum of `samples`.
    pub min: f64,
}

impl QuerySamples {
    /// Summarise samples; `None` when there are none.
    pub fn from_samples(samples: Vec<f64>) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self { samples, min })
    }
}

/// Query string to samples, in the artifact's query order.
pub type LatencyTable = IndexMap<String, QuerySamples>;

/// Extract per-query samples of `category` from an artifact.
///
/// Entries with an absent or empty query, or no samples, are left out. If a
/// query repeats, the later samples win and the first position is kept.
pub fn extract_document(document: &ResultsDocument, category: &str) -> LatencyTable {
    let mut table = LatencyTable::new();
    for entry in document.engine_results(category, ENGINE) {
        let Some(query) = entry.query() else {
            continue;
        };
        if let Some(samples) = QuerySamples::from_samples(entry.duration.clone()) {
            table.insert(query.to_string(), samples);
        }
    }
    table
}

/// Extract per-query samples of `category` from a run.
pub fn extract(run: &Run, category: &str) -> LatencyTable {
    extract_document(run.document(), category)
}

/// Whether the run has at least one usable query in `category`.
pub fn has_data(run: &Run, category: &str) -> bool {
    run.document()
        .engine_results(category, ENGINE)
        .iter()
        .any(|entry| entry.is_usable())
}

/// Result categories of a run, sorted.
pub fn categories(run: &Run) -> BTreeSet<String> {
    run.document().categories().map(str::to_string).collect()
}

/// Pick `preferred` if it is among `categories`, else the first one.
pub fn default_category<'a>(categories: &'a BTreeSet<String>, preferred: &str) -> Option<&'a str> {
    categories
        .get(preferred)
        .or_else(|| categories.iter().next())
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_bench_core::RunTimestamp;

    fn run(json: &str) -> Run {
        Run::new(
            RunTimestamp::parse_dirname("2025-11-30T10-52-49").unwrap(),
            ResultsDocument::from_json_str(json).unwrap(),
        )
    }

    #[test]
    fn test_extract_filters_and_takes_min() {
        let run = run(r#"{"results": {"TOP_10": {
            "turbopuffer": [
                {"query": "the", "duration": [120, 95, 130]},
                {"query": "", "duration": [1]},
                {"duration": [2]},
                {"query": "nothing", "duration": []},
                {"query": "fox", "duration": [7]}
            ],
            "lucene": [{"query": "other", "duration": [1]}]
        }}}"#);

        let table = extract(&run, "TOP_10");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["the", "fox"]);
        assert_eq!(table["the"].samples, vec![120.0, 95.0, 130.0]);
        assert_eq!(table["the"].min, 95.0);
        assert_eq!(table["fox"].min, 7.0);
    }

    #[test]
    fn test_extract_never_returns_empty_samples() {
        let run = run(r#"{"results": {"COUNT": {"turbopuffer": [
            {"query": "a", "duration": []},
            {"query": "b", "duration": [3, 2, 9, 2.5]}
        ]}}}"#);

        for (_, samples) in extract(&run, "COUNT") {
            assert!(!samples.samples.is_empty());
            let true_min = samples.samples.iter().cloned().fold(f64::MAX, f64::min);
            assert_eq!(samples.min, true_min);
        }
    }

    #[test]
    fn test_extract_duplicate_query_keeps_first_position() {
        let run = run(r#"{"results": {"TOP_10": {"turbopuffer": [
            {"query": "a", "duration": [5]},
            {"query": "b", "duration": [6]},
            {"query": "a", "duration": [4]}
        ]}}}"#);

        let table = extract(&run, "TOP_10");
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table["a"].min, 4.0);
    }

    #[test]
    fn test_extract_missing_category() {
        let run = run(r#"{"results": {"TOP_10": {"turbopuffer": []}}}"#);
        assert!(extract(&run, "TOP_100").is_empty());
        assert!(!has_data(&run, "TOP_10"));
    }

    #[test]
    fn test_categories_and_default() {
        let run = run(r#"{"results": {"TOP_100": {}, "COUNT": {}, "TOP_10": {}}}"#);
        let cats = categories(&run);
        assert_eq!(
            cats.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["COUNT", "TOP_10", "TOP_100"]
        );
        assert_eq!(default_category(&cats, "TOP_10"), Some("TOP_10"));
        assert_eq!(default_category(&cats, "TOP_1000"), Some("COUNT"));
        assert_eq!(default_category(&BTreeSet::new(), "TOP_10"), None);
    }
}
