// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Core data model for search benchmark history.
//!
//! This crate holds the value types shared by the analysis and CLI crates:
//!
//! - [`run`] - run timestamps parsed from directory names, and loaded runs
//! - [`artifact`] - the typed measurement artifact (`results.json`)
//! - [`annotation`] - externally supplied markers keyed by run timestamp
//! - [`hash`] - the fixed, documented hash used for derived identifiers
//! - [`error`] - the crate error type

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod annotation;
pub mod artifact;
pub mod error;
pub mod hash;
pub mod run;

pub use annotation::{Annotation, AnnotationEntry, AnnotationTable};
pub use artifact::{QueryResult, ResultsDocument};
pub use error::{CoreError, Result};
pub use run::{Run, RunTimestamp};

/// Engine name identifying the system under test inside every artifact.
pub const ENGINE: &str = "turbopuffer";

/// File name of the measurement artifact inside a run directory.
pub const ARTIFACT_FILE: &str = "results.json";

/// Category shown first when a caller does not pick one.
pub const DEFAULT_CATEGORY: &str = "TOP_10";
