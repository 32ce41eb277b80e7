//! Deterministic sampling buckets.

use search_bench_core::hash::stable_hash;

/// Roughly 80% of documents.
pub const BUCKET_80: &str = "80%";
/// Roughly 20% of documents.
pub const BUCKET_20: &str = "20%";
/// Roughly 5% of documents.
pub const BUCKET_5: &str = "5%";

/// Buckets a document URL belongs to, in `80%`, `20%`, `5%` order.
///
/// Each bucket is tested independently against the same hash, so the buckets
/// are not nested: a URL can be in `5%` without being in `80%`.
pub fn sampling_buckets(url: &str) -> Vec<&'static str> {
    let hash = stable_hash(url);
    let mut buckets = Vec::with_capacity(3);
    if hash % 100 < 80 {
        buckets.push(BUCKET_80);
    }
    if hash % 5 == 3 {
        buckets.push(BUCKET_20);
    }
    if hash % 20 == 13 {
        buckets.push(BUCKET_5);
    }
    buckets
}
