//! Benchmark history aggregation and run comparison.
//!
//! This crate turns a build tree of timestamped benchmark runs into latency
//! time series, and compares two individual runs query by query with a
//! significance test.
//!
//! # Quick Start
//!
//! ```no_run
//! use search_bench_benchmarks::{aggregate, ChartPayload, RunLoader, TracingSink};
//! use search_bench_core::AnnotationTable;
//! use std::path::Path;
//!
//! let runs = RunLoader::new().scan(Path::new("build"), &mut TracingSink);
//! let history = aggregate(&runs, None, &AnnotationTable::new(), &mut TracingSink);
//! let payload = ChartPayload::from_aggregation(&history, "TOP_10");
//! println!("{} charts", payload.chart_count());
//! ```
//!
//! # Modules
//!
//! - [`loader`] - Discover and load runs under a build tree
//! - [`extract`] - Per-query samples of one category
//! - [`series`] - Latency time series across runs
//! - [`compare`] - Pairwise statistical comparison
//! - [`chart`] - Chart payload for the presentation layer
//! - [`markdown`] / [`io`] - Report rendering and file output

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod chart;
pub mod compare;
pub mod config;
pub mod extract;
pub mod io;
pub mod loader;
pub mod markdown;
pub mod order;
pub mod series;
pub mod stats;
pub mod warning;

pub use chart::{Chart, ChartMarker, ChartPayload};
pub use compare::{
    compare, compare_documents, compare_files, CategoryComparison, CompareError, ComparisonRow,
    ComparisonSummary,
};
pub use config::{BenchConfig, ConfigError};
pub use extract::{LatencyTable, QuerySamples};
pub use loader::RunLoader;
pub use series::{aggregate, Aggregation, TimeSeriesPoint};
pub use warning::{CollectingSink, TracingSink, Warning, WarningSink};
