//! Bucket hashing and the staged capacity sequence.
//!
//! Keys are hashed with a polynomial accumulator over their bytes
//! (`h = h * 65599 + byte`, left to right, wrapping `usize` arithmetic) and
//! reduced modulo the current bucket count. Capacities come from a fixed
//! ascending list of primes just below powers of two; a table starts on the
//! first tier and only ever moves up.

/// Bucket counts a table may take, smallest first.
pub const BUCKET_COUNTS: [usize; 8] = [509, 1021, 2039, 4093, 8191, 16381, 32749, 65521];

const HASH_MULTIPLIER: usize = 65599;

/// Raw accumulator value for `key`, before reduction.
#[inline]
pub(crate) fn raw_hash(key: &str) -> usize {
    key.bytes().fold(0usize, |h, b| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(usize::from(b))
    })
}

/// Index of the bucket holding `key` in a table of `bucket_count` buckets.
#[inline]
pub fn bucket_index(key: &str, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0, "bucket count must be non-zero");
    raw_hash(key) % bucket_count
}

/// Position of `bucket_count` in [`BUCKET_COUNTS`], if it is a tier.
pub(crate) fn tier_of(bucket_count: usize) -> Option<usize> {
    BUCKET_COUNTS.iter().position(|&c| c == bucket_count)
}

/// The tier after `bucket_count`, or `None` once the last tier is reached.
pub(crate) fn next_bucket_count(bucket_count: usize) -> Option<usize> {
    tier_of(bucket_count).and_then(|i| BUCKET_COUNTS.get(i + 1).copied())
}
