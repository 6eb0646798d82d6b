//! Window hash index
//!
//! Hashes every window of `length` consecutive token ids and maps each hash to the
//! window start positions. A run of at least `length` equal tokens can only start at a
//! pair of positions whose windows share a hash, so the tiler probes these buckets
//! instead of rescanning the whole right stream.
//!
//! # Performance
//!
//! - Rolling hash: O(n) to hash all windows of a stream
//! - Index built once per comparison; start positions stay sorted per bucket

use rustc_hash::FxHashMap;

use super::marking::TokenMarks;

/// Multiplier of the polynomial rolling hash
const HASH_BASE: u64 = 0x0000_0100_0000_01b3;

/// Hash of every window `ids[i..i + length]`, indexed by `i`
pub fn window_hashes(ids: &[u32], length: usize) -> Vec<u64> {
    if length == 0 || ids.len() < length {
        return Vec::new();
    }

    let mut leading_power: u64 = 1;
    for _ in 1..length {
        leading_power = leading_power.wrapping_mul(HASH_BASE);
    }

    let value = |id: u32| u64::from(id) + 1;
    let mut hash = ids[..length]
        .iter()
        .fold(0u64, |h, &id| h.wrapping_mul(HASH_BASE).wrapping_add(value(id)));

    let mut hashes = Vec::with_capacity(ids.len() - length + 1);
    hashes.push(hash);
    for start in 1..=ids.len() - length {
        hash = hash
            .wrapping_sub(value(ids[start - 1]).wrapping_mul(leading_power))
            .wrapping_mul(HASH_BASE)
            .wrapping_add(value(ids[start + length - 1]));
        hashes.push(hash);
    }
    hashes
}

pub struct WindowIndex {
    buckets: FxHashMap<u64, Vec<usize>>,
}

impl WindowIndex {
    /// Index the windows of a stream that contain no marked token
    pub fn build(ids: &[u32], marks: &TokenMarks, length: usize) -> Self {
        let mut buckets: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
        for (start, hash) in window_hashes(ids, length).into_iter().enumerate() {
            if marks.is_free(start..start + length) {
                buckets.entry(hash).or_default().push(start);
            }
        }
        Self { buckets }
    }

    /// Window starts with this hash, ascending
    pub fn candidates(&self, hash: u64) -> &[usize] {
        self.buckets.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
