// Copyright 2025 Search Bench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Stable string hashing.
//!
//! Identifiers derived from strings (sampling buckets, chart element ids) must
//! be identical across processes and builds. All of them use seedless XXH3-64
//! over the UTF-8 bytes of the input.

use xxhash_rust::xxh3::xxh3_64;

/// XXH3-64 hash of a string's UTF-8 bytes.
pub fn stable_hash(s: &str) -> u64 {
    xxh3_64(s.as_bytes())
}

/// Chart element id for a query: `chart_<hash % 1_000_000>`.
pub fn chart_id(query: &str) -> String {
    format!("chart_{}", stable_hash(query) % 1_000_000)
}
