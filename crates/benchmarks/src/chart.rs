// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chart payload handed to the presentation layer.
//!
//! The payload carries everything a latency-over-time page needs and nothing
//! that would force it back into raw artifacts: per-category charts in display
//! order, their points as parallel `dates`/`latencies` arrays, summary figures
//! and the annotation markers that fall on each chart.

use crate::series::{Aggregation, TimeSeriesPoint};
use search_bench_core::hash::chart_id;
use search_bench_core::Annotation;
use serde::Serialize;
use std::collections::BTreeMap;

/// Annotation marker placed on one chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMarker {
    /// Index into the chart's `dates`.
    pub x: usize,
    /// Label text.
    pub text: String,
    /// Pull request number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pr: Option<u64>,
}

/// One query's chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    /// Stable element id derived from the query.
    pub id: String,
    /// Query string.
    pub query: String,
    /// ISO timestamps, chronological.
    pub dates: Vec<String>,
    /// Minimum latency per date.
    pub latencies: Vec<f64>,
    /// Smallest latency of the series.
    pub min: f64,
    /// Largest latency of the series.
    pub max: f64,
    /// Mean latency of the series.
    pub avg: f64,
    /// Markers for annotated dates.
    pub annotations: Vec<ChartMarker>,
}

impl Chart {
    fn build(query: &str, points: &[TimeSeriesPoint], annotations: &BTreeMap<String, Annotation>) -> Self {
        let dates: Vec<String> = points.iter().map(|p| p.timestamp.to_iso()).collect();
        let latencies: Vec<f64> = points.iter().map(|p| p.latency).collect();

        let (min, max, avg) = if latencies.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                latencies.iter().copied().fold(f64::INFINITY, f64::min),
                latencies.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                latencies.iter().sum::<f64>() / latencies.len() as f64,
            )
        };

        let markers: Vec<ChartMarker> = dates
            .iter()
            .enumerate()
            .filter_map(|(x, date)| {
                annotations.get(date).map(|a| ChartMarker {
                    x,
                    text: a.text.clone(),
                    pr: a.pr,
                })
            })
            .collect();

        Self {
            id: chart_id(query),
            query: query.to_string(),
            dates,
            latencies,
            min,
            max,
            avg,
            annotations: markers,
        }
    }
}

/// Complete payload for the latency history page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    /// Categories available for selection, sorted.
    pub result_types: Vec<String>,
    /// Category shown initially.
    pub default_result_type: Option<String>,
    /// Category to charts in display order.
    pub charts: BTreeMap<String, Vec<Chart>>,
    /// ISO timestamp to annotation, for every aggregated run that has one.
    pub date_annotations: BTreeMap<String, Annotation>,
}

impl ChartPayload {
    /// Build the payload; `preferred` is the initial category when present.
    pub fn from_aggregation(aggregation: &Aggregation, preferred: &str) -> Self {
        let charts: BTreeMap<String, Vec<Chart>> = aggregation
            .categories
            .iter()
            .map(|category| {
                let charts: Vec<Chart> = aggregation
                    .ordered_series(category)
                    .map(|(query, points)| Chart::build(query, points, &aggregation.annotations))
                    .collect();
                (category.clone(), charts)
            })
            .collect();

        let default_result_type = aggregation
            .categories
            .iter()
            .find(|c| c.as_str() == preferred)
            .or_else(|| aggregation.categories.first())
            .cloned();

        Self {
            result_types: aggregation.categories.clone(),
            default_result_type,
            charts,
            date_annotations: aggregation.annotations.clone(),
        }
    }

    /// Total number of charts across categories.
    pub fn chart_count(&self) -> usize {
        self.charts.values().map(Vec::len).sum()
    }
}
