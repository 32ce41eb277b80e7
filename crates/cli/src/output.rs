//! Terminal rendering of comparison results.

use colored::Colorize;
use search_bench_benchmarks::markdown::{truncate_query, QUERY_WIDTH};
use search_bench_benchmarks::{CategoryComparison, ComparisonRow};
use std::fmt::Write;

const COLUMN_WIDTH: usize = 16;

const COLUMNS: [&str; 6] = [
    "Baseline avg",
    "Baseline stddev",
    "Contender avg",
    "Contender stddev",
    "Change",
    "p-value",
];

/// Column header line.
fn header() -> String {
    let mut line = format!("{:>width$}", "Query \\ Latency (μs)", width = QUERY_WIDTH);
    for column in COLUMNS {
        let _ = write!(line, " {:>width$}", column, width = COLUMN_WIDTH);
    }
    line
}

fn row_line(row: &ComparisonRow) -> String {
    let change = format!("{:>width$.2}%", row.percent_change, width = COLUMN_WIDTH);
    let change = if row.is_improvement() {
        change.green()
    } else {
        change.red()
    };
    format!(
        "{:>qw$} {:>w$.2} {:>w$.2} {:>w$.2} {:>w$.2} {} {:>w$.2}",
        truncate_query(&row.query, QUERY_WIDTH),
        row.baseline_mean,
        row.baseline_stddev,
        row.contender_mean,
        row.contender_stddev,
        change,
        row.p_value,
        qw = QUERY_WIDTH,
        w = COLUMN_WIDTH,
    )
}

/// Render one section per category, separated by blank lines.
pub fn render_comparison(comparisons: &[CategoryComparison]) -> String {
    let mut out = String::new();
    for (i, comparison) in comparisons.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", comparison.category.bold());
        let _ = writeln!(out, "{}", header());
        for row in &comparison.rows {
            let _ = writeln!(out, "{}", row_line(row));
        }
    }
    out
}
