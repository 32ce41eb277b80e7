//! Markdown output generation.
//!
//! Renders comparison results and history summaries as GitHub-flavoured
//! markdown, suitable for pull request comments and CI job summaries.

use crate::compare::{summarize, CategoryComparison};
use crate::series::Aggregation;
use std::fmt::{self, Write};

/// Significance level used in rendered reports.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Display width of the query column in the terminal report.
pub const QUERY_WIDTH: usize = 64;

/// Truncate `query` to `width` characters, ending with `…` when cut.
pub fn truncate_query(query: &str, width: usize) -> String {
    if query.chars().count() <= width {
        return query.to_string();
    }
    let kept: String = query.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Escape characters that would break a table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate a markdown report for a baseline/contender comparison.
pub fn generate_comparison_report(comparisons: &[CategoryComparison]) -> String {
    let mut output = String::new();
    let _ = write_comparison_report(&mut output, comparisons);
    output
}

fn write_comparison_report(out: &mut String, comparisons: &[CategoryComparison]) -> fmt::Result {
    writeln!(out, "# Latency Comparison")?;
    writeln!(out)?;

    let summary = summarize(comparisons.iter().flat_map(|c| &c.rows), SIGNIFICANCE_LEVEL);
    writeln!(
        out,
        "{} queries compared: {} faster or unchanged, {} slower ({} significant at p < {}).",
        summary.total,
        summary.improvements,
        summary.regressions,
        summary.significant_regressions,
        SIGNIFICANCE_LEVEL
    )?;

    for comparison in comparisons {
        writeln!(out)?;
        writeln!(out, "## {}", comparison.category)?;
        writeln!(out)?;
        if comparison.rows.is_empty() {
            writeln!(out, "_No comparable queries._")?;
            continue;
        }
        writeln!(
            out,
            "| Query | Baseline mean | Baseline stddev | Contender mean | Contender stddev | Change | p-value |"
        )?;
        writeln!(out, "|-------|--------------:|----------------:|---------------:|-----------------:|-------:|--------:|")?;
        for row in &comparison.rows {
            let marker = if row.is_regression() && row.is_significant(SIGNIFICANCE_LEVEL) {
                " ⚠"
            } else {
                ""
            };
            writeln!(
                out,
                "| {} | {:.2} | {:.2} | {:.2} | {:.2} | {:+.2}%{} | {:.2} |",
                cell(&truncate_query(&row.query, QUERY_WIDTH)),
                row.baseline_mean,
                row.baseline_stddev,
                row.contender_mean,
                row.contender_stddev,
                row.percent_change,
                marker,
                row.p_value
            )?;
        }
    }
    Ok(())
}

/// Generate a markdown summary of an aggregated history.
///
/// One table per category, in display order, with the first and latest
/// minimum latency of every query and the change between them.
pub fn generate_history_summary(aggregation: &Aggregation) -> String {
    let mut output = String::new();
    let _ = write_history_summary(&mut output, aggregation);
    output
}

fn write_history_summary(out: &mut String, aggregation: &Aggregation) -> fmt::Result {
    writeln!(out, "# Latency History")?;
    writeln!(out)?;
    writeln!(out, "Runs aggregated: {}", aggregation.run_count)?;

    if !aggregation.annotations.is_empty() {
        writeln!(out)?;
        writeln!(out, "## Annotations")?;
        writeln!(out)?;
        for (date, annotation) in &aggregation.annotations {
            writeln!(out, "- `{}` {}", date, annotation.label())?;
        }
    }

    for category in &aggregation.categories {
        writeln!(out)?;
        writeln!(out, "## {}", category)?;
        writeln!(out)?;

        let mut rows = aggregation.ordered_series(category).peekable();
        if rows.peek().is_none() {
            writeln!(out, "_No data._")?;
            continue;
        }

        writeln!(out, "| Query | Runs | First | Latest | Best | Change |")?;
        writeln!(out, "|-------|-----:|------:|-------:|-----:|-------:|")?;
        for (query, points) in rows {
            let (Some(first), Some(latest)) = (points.first(), points.last()) else {
                continue;
            };
            let best = points.iter().map(|p| p.latency).fold(f64::INFINITY, f64::min);
            let change = if first.latency == 0.0 {
                "n/a".to_string()
            } else {
                format!("{:+.2}%", 100.0 * (latest.latency - first.latency) / first.latency)
            };
            writeln!(
                out,
                "| {} | {} | {:.2} | {:.2} | {:.2} | {} |",
                cell(&truncate_query(query, QUERY_WIDTH)),
                points.len(),
                first.latency,
                latest.latency,
                best,
                change
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::ComparisonRow;
    use crate::series::aggregate;
    use crate::warning::TracingSink;
    use search_bench_core::{AnnotationTable, ResultsDocument, Run, RunTimestamp};

    fn row(query: &str, percent_change: f64, p_value: f64) -> ComparisonRow {
        ComparisonRow {
            query: query.to_string(),
            baseline_mean: 10.0,
            baseline_stddev: 1.0,
            contender_mean: 10.0 * (1.0 + percent_change / 100.0),
            contender_stddev: 1.0,
            percent_change,
            p_value,
        }
    }

    #[test]
    fn test_truncate_query() {
        assert_eq!(truncate_query("short", 64), "short");
        let long = "x".repeat(70);
        let cut = truncate_query(&long, 64);
        assert_eq!(cut.chars().count(), 64);
        assert!(cut.ends_with('…'));
        assert_eq!(truncate_query(&"y".repeat(64), 64), "y".repeat(64));
    }

    #[test]
    fn test_comparison_report() {
        let comparisons = vec![CategoryComparison {
            category: "TOP_10".to_string(),
            rows: vec![row("the", 5.0, 0.01), row("a|b", -5.0, 0.3)],
        }];
        let report = generate_comparison_report(&comparisons);

        assert!(report.contains("## TOP_10"));
        assert!(report.contains("2 queries compared: 1 faster or unchanged, 1 slower (1 significant"));
        assert!(report.contains("| the | 10.00 | 1.00 | 10.50 | 1.00 | +5.00% ⚠ | 0.01 |"));
        assert!(report.contains("| a\\|b |"));
    }

    #[test]
    fn test_comparison_report_empty_category() {
        let report = generate_comparison_report(&[CategoryComparison {
            category: "COUNT".to_string(),
            rows: Vec::new(),
        }]);
        assert!(report.contains("_No comparable queries._"));
    }

    #[test]
    fn test_history_summary() {
        let run = |ts: &str, d: f64| {
            Run::new(
                RunTimestamp::parse_dirname(ts).unwrap(),
                ResultsDocument::from_json_str(&format!(
                    r#"{{"results": {{"TOP_10": {{"turbopuffer": [{{"query": "the", "duration": [{d}]}}]}}}}}}"#
                ))
                .unwrap(),
            )
        };
        let runs = vec![run("2025-11-01T00-00-00", 20.0), run("2025-11-02T00-00-00", 15.0)];
        let summary = generate_history_summary(&aggregate(&runs, None, &AnnotationTable::new(), &mut TracingSink));

        assert!(summary.contains("Runs aggregated: 2"));
        assert!(summary.contains("| the | 2 | 20.00 | 15.00 | 15.00 | -25.00% |"));
    }
}
