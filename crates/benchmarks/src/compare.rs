// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pairwise comparison of two runs.
//!
//! Queries are matched by exact string equality, one category at a time. For
//! every contender query the comparison reports both sides' mean and sample
//! standard deviation, the percent change of the mean, and the two-tailed
//! p-value of Student's equal-variance t-test.
//!
//! Each side needs at least [`MIN_SAMPLES`] samples for a query; fewer makes
//! the sample standard deviation undefined and fails the comparison with
//! [`CompareError::InsufficientSamples`]. A contender query with no baseline
//! counterpart is reported as a warning and its row is skipped.

use crate::extract::{extract_document, LatencyTable};
use crate::stats;
use crate::warning::{Warning, WarningSink};
use search_bench_core::{CoreError, ResultsDocument};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Minimum number of samples per side for a comparison row.
pub const MIN_SAMPLES: usize = 2;

/// Which run of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The reference run.
    Baseline,
    /// The run being evaluated.
    Contender,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Baseline => write!(f, "baseline"),
            Self::Contender => write!(f, "contender"),
        }
    }
}

/// Errors that make a requested comparison impossible.
#[derive(Debug, Error)]
pub enum CompareError {
    /// A side has fewer than [`MIN_SAMPLES`] samples for a query.
    #[error("Insufficient samples for query [{query}]: {side} has {count}, need at least {min}", min = MIN_SAMPLES)]
    InsufficientSamples {
        /// Query string.
        query: String,
        /// Side lacking samples.
        side: Side,
        /// Number of samples that side has.
        count: usize,
    },

    /// The baseline mean is zero, so a percent change is undefined.
    #[error("Baseline mean is zero for query [{query}]; percent change is undefined")]
    ZeroBaselineMean {
        /// Query string.
        query: String,
    },

    /// An artifact could not be loaded.
    #[error(transparent)]
    Artifact(#[from] CoreError),
}

/// Result type for comparison operations.
pub type Result<T> = std::result::Result<T, CompareError>;

/// Comparison of one query between baseline and contender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Query string.
    pub query: String,
    /// Baseline mean latency.
    pub baseline_mean: f64,
    /// Baseline sample standard deviation.
    pub baseline_stddev: f64,
    /// Contender mean latency.
    pub contender_mean: f64,
    /// Contender sample standard deviation.
    pub contender_stddev: f64,
    /// `100 * (contender_mean - baseline_mean) / baseline_mean`.
    pub percent_change: f64,
    /// Two-tailed p-value of the equal-variance t-test.
    pub p_value: f64,
}

impl ComparisonRow {
    /// Contender is faster than or as fast as baseline.
    pub fn is_improvement(&self) -> bool {
        self.percent_change <= 0.0
    }

    /// Contender is slower than baseline.
    pub fn is_regression(&self) -> bool {
        self.percent_change > 0.0
    }

    /// Whether the difference is significant at level `alpha`.
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Rows of one category, in contender query order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryComparison {
    /// Result category.
    pub category: String,
    /// One row per contender query that has a baseline counterpart.
    pub rows: Vec<ComparisonRow>,
}

/// Compare one query's samples.
pub fn compare_query(query: &str, baseline: &[f64], contender: &[f64]) -> Result<ComparisonRow> {
    let insufficient = |side, count| CompareError::InsufficientSamples {
        query: query.to_string(),
        side,
        count,
    };
    if baseline.len() < MIN_SAMPLES {
        return Err(insufficient(Side::Baseline, baseline.len()));
    }
    if contender.len() < MIN_SAMPLES {
        return Err(insufficient(Side::Contender, contender.len()));
    }

    let baseline_mean = stats::mean(baseline).ok_or_else(|| insufficient(Side::Baseline, 0))?;
    let contender_mean = stats::mean(contender).ok_or_else(|| insufficient(Side::Contender, 0))?;
    let baseline_stddev = stats::sample_std_dev(baseline)
        .ok_or_else(|| insufficient(Side::Baseline, baseline.len()))?;
    let contender_stddev = stats::sample_std_dev(contender)
        .ok_or_else(|| insufficient(Side::Contender, contender.len()))?;
    let test = stats::students_t_test(baseline, contender)
        .ok_or_else(|| insufficient(Side::Baseline, baseline.len()))?;

    if baseline_mean == 0.0 {
        return Err(CompareError::ZeroBaselineMean {
            query: query.to_string(),
        });
    }

    Ok(ComparisonRow {
        query: query.to_string(),
        baseline_mean,
        baseline_stddev,
        contender_mean,
        contender_stddev,
        percent_change: 100.0 * (contender_mean - baseline_mean) / baseline_mean,
        p_value: test.p_value,
    })
}

/// Compare the per-query samples of one category.
///
/// Rows follow the contender's query order. Contender queries missing from
/// the baseline are reported to `sink` and skipped. The first query failing
/// [`compare_query`] aborts the comparison.
pub fn compare(
    category: &str,
    baseline: &LatencyTable,
    contender: &LatencyTable,
    sink: &mut dyn WarningSink,
) -> Result<Vec<ComparisonRow>> {
    let mut rows = Vec::with_capacity(contender.len());
    for (query, contender_samples) in contender {
        let Some(baseline_samples) = baseline.get(query) else {
            sink.warn(Warning::MissingBaselineQuery {
                category: category.to_string(),
                query: query.clone(),
            });
            continue;
        };
        rows.push(compare_query(
            query,
            &baseline_samples.samples,
            &contender_samples.samples,
        )?);
    }
    Ok(rows)
}

/// Compare every category present in both artifacts, in baseline order.
pub fn compare_documents(
    baseline: &ResultsDocument,
    contender: &ResultsDocument,
    sink: &mut dyn WarningSink,
) -> Result<Vec<CategoryComparison>> {
    let mut comparisons = Vec::new();
    for category in baseline.categories() {
        if !contender.has_category(category) {
            debug!(category, "category missing from contender, skipping");
            continue;
        }
        let rows = compare(
            category,
            &extract_document(baseline, category),
            &extract_document(contender, category),
            sink,
        )?;
        comparisons.push(CategoryComparison {
            category: category.to_string(),
            rows,
        });
    }
    Ok(comparisons)
}

/// Load two artifacts and compare them.
pub fn compare_files(
    baseline: impl AsRef<Path>,
    contender: impl AsRef<Path>,
    sink: &mut dyn WarningSink,
) -> Result<Vec<CategoryComparison>> {
    let baseline = ResultsDocument::from_path(baseline)?;
    let contender = ResultsDocument::from_path(contender)?;
    compare_documents(&baseline, &contender, sink)
}

/// Counts over a set of comparison rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    /// Rows compared.
    pub total: usize,
    /// Rows with `percent_change <= 0`.
    pub improvements: usize,
    /// Rows with `percent_change > 0`.
    pub regressions: usize,
    /// Regressions significant at the given level.
    pub significant_regressions: usize,
}

/// Summarise rows, counting regressions significant at `alpha`.
pub fn summarize<'a>(rows: impl IntoIterator<Item = &'a ComparisonRow>, alpha: f64) -> ComparisonSummary {
    rows.into_iter()
        .fold(ComparisonSummary::default(), |mut summary, row| {
            summary.total += 1;
            if row.is_regression() {
                summary.regressions += 1;
                if row.is_significant(alpha) {
                    summary.significant_regressions += 1;
                }
            } else {
                summary.improvements += 1;
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::QuerySamples;
    use crate::warning::CollectingSink;

    fn table(entries: &[(&str, &[f64])]) -> LatencyTable {
        entries
            .iter()
            .map(|(q, s)| (q.to_string(), QuerySamples::from_samples(s.to_vec()).unwrap()))
            .collect()
    }

    #[test]
    fn test_identical_samples_show_no_change() {
        let samples = [10.0, 12.0, 11.0, 9.0, 10.0];
        let row = compare_query("the", &samples, &samples).unwrap();

        assert_eq!(row.percent_change, 0.0);
        assert!(row.is_improvement());
        assert!(!row.is_significant(0.05));
        assert!((row.baseline_mean - 10.4).abs() < 1e-12);
        assert_eq!(row.baseline_stddev, row.contender_stddev);
    }

    #[test]
    fn test_halved_latency_is_significant() {
        let row = compare_query(
            "the",
            &[100.0, 102.0, 98.0, 101.0, 99.0],
            &[50.0, 52.0, 49.0, 51.0, 48.0],
        )
        .unwrap();

        assert!((row.baseline_mean - 100.0).abs() < 1e-12);
        assert!((row.contender_mean - 50.0).abs() < 1e-12);
        assert!((row.percent_change + 50.0).abs() < 1e-9);
        assert!(row.p_value < 1e-6);
        assert!(row.is_significant(0.001));
        // sqrt(10 / 4)
        assert!((row.baseline_stddev - 1.581_138_830_084_19).abs() < 1e-9);
    }

    #[test]
    fn test_regression_sign() {
        let row = compare_query("q", &[10.0, 11.0], &[20.0, 21.0]).unwrap();
        assert!(row.percent_change > 0.0);
        assert!(row.is_regression());
    }

    #[test]
    fn test_single_sample_fails() {
        let err = compare_query("lonely", &[10.0], &[10.0, 11.0]).unwrap_err();
        assert!(matches!(
            err,
            CompareError::InsufficientSamples { side: Side::Baseline, count: 1, .. }
        ));
        assert!(err.to_string().contains("lonely"));
        assert!(err.to_string().ends_with(&format!("need at least {MIN_SAMPLES}")));

        let err = compare_query("lonely", &[10.0, 11.0], &[10.0]).unwrap_err();
        assert!(matches!(
            err,
            CompareError::InsufficientSamples { side: Side::Contender, count: 1, .. }
        ));
    }

    #[test]
    fn test_zero_baseline_mean_fails() {
        let err = compare_query("free", &[0.0, 0.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CompareError::ZeroBaselineMean { .. }));
    }

    #[test]
    fn test_compare_follows_contender_order_and_skips_missing() {
        let baseline = table(&[("a", &[1.0, 2.0]), ("b", &[3.0, 4.0])]);
        let contender = table(&[("b", &[3.0, 5.0]), ("new", &[1.0, 1.5]), ("a", &[1.0, 2.0])]);

        let mut sink = CollectingSink::new();
        let rows = compare("TOP_10", &baseline, &contender, &mut sink).unwrap();

        let queries: Vec<&str> = rows.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["b", "a"]);
        assert_eq!(
            sink.warnings(),
            &[Warning::MissingBaselineQuery {
                category: "TOP_10".to_string(),
                query: "new".to_string(),
            }]
        );
    }

    #[test]
    fn test_compare_propagates_insufficient_samples() {
        let baseline = table(&[("a", &[1.0, 2.0]), ("b", &[3.0])]);
        let contender = table(&[("a", &[1.0, 2.0]), ("b", &[3.0, 4.0])]);

        let mut sink = CollectingSink::new();
        let err = compare("TOP_10", &baseline, &contender, &mut sink).unwrap_err();
        assert!(matches!(err, CompareError::InsufficientSamples { ref query, .. } if query == "b"));
    }

    #[test]
    fn test_compare_documents_uses_shared_categories() {
        let baseline = ResultsDocument::from_json_str(
            r#"{"results": {
                "TOP_10": {"turbopuffer": [{"query": "a", "duration": [10, 12]}]},
                "COUNT": {"turbopuffer": [{"query": "a", "duration": [5, 6]}]},
                "TOP_100": {"turbopuffer": [{"query": "a", "duration": [7, 8]}]}
            }}"#,
        )
        .unwrap();
        let contender = ResultsDocument::from_json_str(
            r#"{"results": {
                "COUNT": {"turbopuffer": [{"query": "a", "duration": [5, 6]}]},
                "TOP_10": {"turbopuffer": [{"query": "a", "duration": [9, 11]}]}
            }}"#,
        )
        .unwrap();

        let mut sink = CollectingSink::new();
        let comparisons = compare_documents(&baseline, &contender, &mut sink).unwrap();

        let categories: Vec<&str> = comparisons.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(categories, vec!["TOP_10", "COUNT"]);
        assert!((comparisons[0].rows[0].percent_change + 100.0 / 11.0).abs() < 1e-9);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_summarize() {
        let rows = vec![
            compare_query("a", &[10.0, 11.0], &[5.0, 6.0]).unwrap(),
            compare_query("b", &[10.0, 10.1, 9.9], &[20.0, 20.1, 19.9]).unwrap(),
            compare_query("c", &[10.0, 30.0], &[12.0, 31.0]).unwrap(),
        ];
        let summary = summarize(&rows, 0.05);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.improvements, 1);
        assert_eq!(summary.regressions, 2);
        assert_eq!(summary.significant_regressions, 1);
    }
}
