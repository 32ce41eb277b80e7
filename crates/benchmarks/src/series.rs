// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Latency time series across the run history.
//!
//! Runs are folded in chronological order. For every category and query the
//! minimum latency of each run becomes one point, so each series comes out
//! already sorted by timestamp.
//!
//! The display order of a category is fixed by the most recent run with data
//! in that category: its queries come first, in its artifact order, followed
//! by queries seen only in older runs, sorted lexicographically.

use crate::extract::{self, has_data};
use crate::order::{display_order, query_order};
use crate::warning::{Warning, WarningSink};
use search_bench_core::{Annotation, AnnotationTable, Run, RunTimestamp};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Minimum latency of one query in one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    /// Run timestamp.
    pub timestamp: RunTimestamp,
    /// Minimum duration sample of that run.
    pub latency: f64,
}

/// Query to its chronological series.
pub type QuerySeries = BTreeMap<String, Vec<TimeSeriesPoint>>;

/// Aggregated history, ready for presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Aggregation {
    /// Categories that were aggregated, sorted.
    pub categories: Vec<String>,
    /// Category to per-query series.
    pub series: BTreeMap<String, QuerySeries>,
    /// Category to query display order.
    pub display_order: BTreeMap<String, Vec<String>>,
    /// ISO timestamp to annotation, only for timestamps of aggregated runs.
    pub annotations: BTreeMap<String, Annotation>,
    /// Number of runs folded in.
    pub run_count: usize,
}

impl Aggregation {
    /// Whether no category has any series.
    pub fn is_empty(&self) -> bool {
        self.series.values().all(BTreeMap::is_empty)
    }

    /// Series of one query.
    pub fn series(&self, category: &str, query: &str) -> Option<&[TimeSeriesPoint]> {
        self.series
            .get(category)
            .and_then(|queries| queries.get(query))
            .map(Vec::as_slice)
    }

    /// Series of a category in display order.
    pub fn ordered_series<'a>(
        &'a self,
        category: &str,
    ) -> impl Iterator<Item = (&'a str, &'a [TimeSeriesPoint])> + 'a {
        let queries = self.series.get(category);
        self.display_order
            .get(category)
            .into_iter()
            .flatten()
            .filter_map(move |query| {
                queries
                    .and_then(|q| q.get(query))
                    .map(|points| (query.as_str(), points.as_slice()))
            })
    }
}

/// Fold runs into per-category, per-query latency series.
///
/// `runs` should be sorted ascending by timestamp; they are re-sorted if not,
/// and [`Warning::UnsortedRuns`] goes to `sink`.
/// Without explicit `categories`, the categories of the most recent run are
/// used. No runs yields an empty aggregation.
pub fn aggregate(
    runs: &[Run],
    categories: Option<&BTreeSet<String>>,
    annotations: &AnnotationTable,
    sink: &mut dyn WarningSink,
) -> Aggregation {
    let mut ordered: Vec<&Run> = runs.iter().collect();
    if !ordered.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()) {
        sink.warn(Warning::UnsortedRuns {
            count: ordered.len(),
        });
        ordered.sort_by_key(|run| run.timestamp());
    }

    let Some(latest) = ordered.last().copied() else {
        debug!("no runs to aggregate");
        return Aggregation::default();
    };

    let categories = match categories {
        Some(categories) => categories.clone(),
        None => extract::categories(latest),
    };

    let mut series: BTreeMap<String, QuerySeries> = categories
        .iter()
        .map(|category| (category.clone(), QuerySeries::new()))
        .collect();

    for run in &ordered {
        for (category, queries) in series.iter_mut() {
            for (query, samples) in extract::extract(run, category) {
                queries.entry(query).or_default().push(TimeSeriesPoint {
                    timestamp: run.timestamp(),
                    latency: samples.min,
                });
            }
        }
    }

    let display_order: BTreeMap<String, Vec<String>> = series
        .iter()
        .map(|(category, queries)| {
            let newest = ordered.iter().rev().copied().find(|run| has_data(run, category));
            let natural = query_order(newest, category);
            (category.clone(), display_order(&natural, queries.keys()))
        })
        .collect();

    let matched: BTreeMap<String, Annotation> = ordered
        .iter()
        .filter_map(|run| annotations.get(&run.timestamp()))
        .map(|annotation| (annotation.timestamp.to_iso(), annotation.clone()))
        .collect();

    Aggregation {
        categories: categories.into_iter().collect(),
        series,
        display_order,
        annotations: matched,
        run_count: ordered.len(),
    }
}
