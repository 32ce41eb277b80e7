//! CLI for search benchmark results.
//!
//! This crate provides the `search-bench` command-line interface: pairwise
//! comparison of two runs, latency history aggregation for the charts page,
//! the corpus line filter, and a status overview of the build tree.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use search_bench_benchmarks::compare::{compare_files, summarize};
use search_bench_benchmarks::extract::{categories, default_category};
use search_bench_benchmarks::io::{read_annotations, to_json_string, write_json, write_text};
use search_bench_benchmarks::markdown::{generate_comparison_report, generate_history_summary, SIGNIFICANCE_LEVEL};
use search_bench_benchmarks::{aggregate, BenchConfig, ChartPayload, RunLoader, TracingSink};
use search_bench_core::AnnotationTable;
use search_bench_corpus::CorpusTransformer;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Search benchmark CLI.
#[derive(Parser, Debug)]
#[command(name = "search-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "SEARCH_BENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose logging (debug level) unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format of the `compare` command.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned, coloured terminal table.
    Text,
    /// GitHub-flavoured markdown.
    Markdown,
    /// JSON rows.
    Json,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two result artifacts query by query.
    ///
    /// For every query of the contender prints mean and sample standard
    /// deviation of both runs, the percent change and the t-test p-value.
    Compare {
        /// Baseline results.json.
        baseline: PathBuf,

        /// Contender results.json.
        contender: PathBuf,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Aggregate every run under the build tree into latency time series.
    ///
    /// Writes the chart payload as JSON to stdout, or to --output.
    History {
        /// Build tree override.
        #[arg(long)]
        build_dir: Option<PathBuf>,

        /// Annotation file override.
        #[arg(long)]
        annotations: Option<PathBuf>,

        /// Restrict to these categories (repeatable); default: those of the latest run.
        #[arg(short, long = "category")]
        categories: Vec<String>,

        /// Write the chart payload here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write a markdown summary here.
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Normalize and bucket a JSON-lines corpus (stdin when no input).
    Corpus {
        /// Input file.
        input: Option<PathBuf>,
    },

    /// Show configuration and the latest run.
    Status {
        /// List the latest run's categories with their query counts.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `--verbose` selects `debug` and the
/// configured level applies. Diagnostics go to stderr.
pub fn init_tracing(config: &BenchConfig, verbose: bool) {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Run the CLI with the process arguments.
pub fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    execute(cli)
}

/// Run a parsed command line.
pub fn execute(cli: Cli) -> Result<()> {
    let config = BenchConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config, cli.verbose);
    debug!(?config, "configuration resolved");

    match cli.command {
        Commands::Compare {
            baseline,
            contender,
            format,
        } => cmd_compare(baseline, contender, format),
        Commands::History {
            build_dir,
            annotations,
            categories,
            output,
            summary,
        } => {
            let build_dir = build_dir.unwrap_or_else(|| config.build_dir.clone());
            let annotations = annotations.or_else(|| config.annotations.clone());
            cmd_history(&config, build_dir, annotations, categories, output, summary)
        }
        Commands::Corpus { input } => cmd_corpus(input),
        Commands::Status { detailed } => cmd_status(&config, detailed),
    }
}

fn cmd_compare(baseline: PathBuf, contender: PathBuf, format: ReportFormat) -> Result<()> {
    let comparisons = compare_files(&baseline, &contender, &mut TracingSink).with_context(|| {
        format!(
            "Failed to compare {} against {}",
            contender.display(),
            baseline.display()
        )
    })?;

    match format {
        ReportFormat::Text => print!("{}", output::render_comparison(&comparisons)),
        ReportFormat::Markdown => print!("{}", generate_comparison_report(&comparisons)),
        ReportFormat::Json => println!("{}", to_json_string(&comparisons)?),
    }

    let summary = summarize(comparisons.iter().flat_map(|c| &c.rows), SIGNIFICANCE_LEVEL);
    info!(
        compared = summary.total,
        improvements = summary.improvements,
        regressions = summary.regressions,
        significant_regressions = summary.significant_regressions,
        "comparison finished"
    );
    Ok(())
}

fn cmd_history(
    config: &BenchConfig,
    build_dir: PathBuf,
    annotations: Option<PathBuf>,
    categories: Vec<String>,
    output: Option<PathBuf>,
    summary: Option<PathBuf>,
) -> Result<()> {
    let mut sink = TracingSink;

    let table = match annotations {
        Some(path) => read_annotations(&path, &mut sink)
            .with_context(|| format!("Failed to read annotations from {}", path.display()))?,
        None => AnnotationTable::new(),
    };

    let runs = RunLoader::new()
        .with_artifact_name(config.artifact_name.as_str())
        .scan(&build_dir, &mut sink);
    if runs.is_empty() {
        info!(build_dir = %build_dir.display(), "no data");
    }

    let wanted: Option<BTreeSet<String>> =
        (!categories.is_empty()).then(|| categories.into_iter().collect());
    let history = aggregate(&runs, wanted.as_ref(), &table, &mut sink);
    let payload = ChartPayload::from_aggregation(&history, &config.default_category);

    match output {
        Some(path) => {
            write_json(&payload, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                runs = history.run_count,
                charts = payload.chart_count(),
                path = %path.display(),
                "history written"
            );
        }
        None => println!("{}", to_json_string(&payload)?),
    }

    if let Some(path) = summary {
        write_text(generate_history_summary(&history), &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

fn cmd_corpus(input: Option<PathBuf>) -> Result<()> {
    let transformer = CorpusTransformer::new()?;
    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());

    let stats = match input {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
            transformer.transform_stream(BufReader::new(file), writer)?
        }
        None => transformer.transform_stream(io::stdin().lock(), writer)?,
    };

    info!(
        lines = stats.lines,
        written = stats.written,
        malformed = stats.malformed,
        "corpus transformed"
    );
    Ok(())
}

fn cmd_status(config: &BenchConfig, detailed: bool) -> Result<()> {
    println!("{}", "Search Bench".bold());
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build tree:       {}", config.build_dir.display());
    println!("Artifact:         {}", config.artifact_name);
    println!("Default category: {}", config.default_category);
    match &config.annotations {
        Some(path) => println!("Annotations:      {}", path.display()),
        None => println!("Annotations:      {}", "none".dimmed()),
    }

    let loader = RunLoader::new().with_artifact_name(config.artifact_name.as_str());
    let runs = loader.scan(&config.build_dir, &mut TracingSink);
    println!();
    let Some(latest) = runs.last() else {
        println!("{}", "No runs found".yellow());
        return Ok(());
    };

    println!("Runs:             {}", runs.len());
    println!("Latest run:       {}", latest.timestamp().to_iso().green());

    let available = categories(latest);
    if let Some(shown) = default_category(&available, &config.default_category) {
        println!("Shown first:      {}", shown);
    }

    if detailed {
        println!("\nCategories:");
        for category in &available {
            let queries = search_bench_benchmarks::extract::extract(latest, category).len();
            println!("  - {} ({} queries)", category, queries);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_requires_two_paths() {
        assert!(Cli::try_parse_from(["search-bench", "compare", "a.json"]).is_err());
        assert!(Cli::try_parse_from(["search-bench", "compare", "a.json", "b.json", "c.json"]).is_err());

        let cli = Cli::try_parse_from(["search-bench", "compare", "a.json", "b.json"]).unwrap();
        match cli.command {
            Commands::Compare {
                baseline,
                contender,
                format,
            } => {
                assert_eq!(baseline, PathBuf::from("a.json"));
                assert_eq!(contender, PathBuf::from("b.json"));
                assert_eq!(format, ReportFormat::Text);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_history_flags() {
        let cli = Cli::try_parse_from([
            "search-bench",
            "--verbose",
            "history",
            "--build-dir",
            "nightly",
            "-c",
            "TOP_10",
            "--category",
            "COUNT",
            "--output",
            "site/history.json",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::History {
                build_dir,
                categories,
                output,
                summary,
                ..
            } => {
                assert_eq!(build_dir, Some(PathBuf::from("nightly")));
                assert_eq!(categories, vec!["TOP_10", "COUNT"]);
                assert_eq!(output, Some(PathBuf::from("site/history.json")));
                assert!(summary.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_format_values() {
        let cli = Cli::try_parse_from(["search-bench", "compare", "a", "b", "--format", "markdown"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Compare {
                format: ReportFormat::Markdown,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["search-bench", "compare", "a", "b", "--format", "html"]).is_err());
    }

    #[test]
    fn test_history_command_writes_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let run_dir = tmp.path().join("build").join("2025-11-22T11-01-12");
        std::fs::create_dir_all(&run_dir).unwrap();
        std::fs::write(
            run_dir.join("results.json"),
            r#"{"results": {"TOP_10": {"turbopuffer": [{"query": "the", "duration": [3, 2]}]}}}"#,
        )
        .unwrap();

        let output = tmp.path().join("site").join("history.json");
        let summary = tmp.path().join("site").join("summary.md");
        let config = BenchConfig::default();
        cmd_history(
            &config,
            tmp.path().join("build"),
            None,
            Vec::new(),
            Some(output.clone()),
            Some(summary.clone()),
        )
        .unwrap();

        let payload: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(payload["default_result_type"], "TOP_10");
        assert_eq!(payload["charts"]["TOP_10"][0]["latencies"], serde_json::json!([2.0]));
        assert!(std::fs::read_to_string(&summary).unwrap().contains("Runs aggregated: 1"));
    }
}
