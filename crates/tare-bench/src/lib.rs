//! Shared input builders for the Tare benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use tare_core::{InstanceId, StateRecord, Tag};

/// A record with `len` seeded pseudo-random values in `[-1, 1]`.
///
/// Uses `StdRng` rather than the kernel's xorshift so benchmark inputs
/// do not correlate with the streams under measurement.
pub fn bench_record(seed: u64, len: usize) -> StateRecord {
    let mut rng = StdRng::seed_from_u64(seed);
    StateRecord {
        id: InstanceId(1),
        name: "bench-record".into(),
        values: (0..len).map(|_| rng.random::<f64>() * 2.0 - 1.0).collect(),
        bias: 0.01,
        scale: 1.01,
        created_at: 1_700_000_000,
        tag: Tag::Alpha,
    }
}

/// Sequence lengths benchmarked across the kernel operations.
pub const LENGTHS: [usize; 3] = [64, 1024, 16_384];
