// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query ordering.
//!
//! The order queries appear in an artifact is the benchmark's intended
//! presentation order, so charts follow it rather than sorting.

use search_bench_core::{Run, ENGINE};
use std::collections::HashSet;

/// Queries of `category` in artifact order, first occurrence only.
///
/// Entries with an empty query are skipped. An absent run or category yields
/// an empty list.
pub fn query_order(run: Option<&Run>, category: &str) -> Vec<String> {
    let Some(run) = run else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    run.document()
        .engine_results(category, ENGINE)
        .iter()
        .filter_map(|entry| entry.query())
        .filter(|query| seen.insert(*query))
        .map(str::to_string)
        .collect()
}

/// Display order of queries that have a series.
///
/// Queries from `natural` that have a series come first, in `natural` order.
/// The remaining queries with a series follow in lexicographic order.
pub fn display_order<'a, I>(natural: &[String], with_series: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut remaining: Vec<&String> = with_series.into_iter().collect();
    let present: HashSet<&String> = remaining.iter().copied().collect();

    let mut seen = HashSet::new();
    let mut order: Vec<String> = natural
        .iter()
        .filter(|query| present.contains(query) && seen.insert(*query))
        .cloned()
        .collect();

    remaining.retain(|query| !seen.contains(query));
    remaining.sort();
    remaining.dedup();
    order.extend(remaining.into_iter().cloned());
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_bench_core::{ResultsDocument, RunTimestamp};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_query_order_preserves_artifact_order() {
        let run = Run::new(
            RunTimestamp::parse_dirname("2025-11-30T10-52-49").unwrap(),
            ResultsDocument::from_json_str(
                r#"{"results": {"TOP_10": {"turbopuffer": [
                    {"query": "zebra", "duration": [1]},
                    {"query": "apple", "duration": []},
                    {"query": "", "duration": [1]},
                    {"query": "zebra", "duration": [2]},
                    {"query": "mango", "duration": [3]}
                ]}}}"#,
            )
            .unwrap(),
        );

        assert_eq!(
            query_order(Some(&run), "TOP_10"),
            strings(&["zebra", "apple", "mango"])
        );
        assert!(query_order(Some(&run), "COUNT").is_empty());
        assert!(query_order(None, "TOP_10").is_empty());
    }

    #[test]
    fn test_display_order() {
        let natural = strings(&["C", "A", "X"]);
        let with_series = strings(&["A", "B", "C", "AA"]);

        assert_eq!(
            display_order(&natural, &with_series),
            strings(&["C", "A", "AA", "B"])
        );
    }

    #[test]
    fn test_display_order_without_natural_order() {
        let with_series = strings(&["b", "a"]);
        assert_eq!(display_order(&[], &with_series), strings(&["a", "b"]));
    }
}
