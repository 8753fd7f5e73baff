//! Test fixtures for Tare development.
//!
//! Deterministic state records and instance specs used across the
//! workspace's unit and integration tests, plus a seeded ChaCha8 value
//! stream for tests and benches that want varied-but-reproducible
//! input that is independent of the kernel's own xorshift stream.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use tare_core::{InstanceId, InstanceSpec, StateRecord, Tag};

/// Pinned construction timestamp for tests that compare across builds.
pub const FIXED_CREATED_AT: i64 = 1_700_000_000;

/// A record whose values are all `value`.
pub fn constant_record(id: u32, len: usize, value: f64) -> StateRecord {
    StateRecord {
        id: InstanceId(id),
        name: format!("rec-{id:04x}"),
        values: vec![value; len],
        bias: 0.0,
        scale: 1.0,
        created_at: FIXED_CREATED_AT,
        tag: Tag::Alpha,
    }
}

/// A record whose values ramp linearly (`i * 0.25`), with non-identity
/// bias and scale so affine-map behavior is visible in tests.
pub fn ramp_record(id: u32, len: usize) -> StateRecord {
    StateRecord {
        id: InstanceId(id),
        name: format!("rec-{id:04x}"),
        values: (0..len).map(|i| i as f64 * 0.25).collect(),
        bias: 0.01,
        scale: 1.02,
        created_at: FIXED_CREATED_AT,
        tag: Tag::Beta,
    }
}

/// An instance spec mirroring [`ramp_record`], for factory tests.
pub fn ramp_spec(id: u32, len: usize) -> InstanceSpec {
    let record = ramp_record(id, len);
    InstanceSpec {
        id: record.id,
        name: record.name,
        values: record.values,
        bias: record.bias,
        scale: record.scale,
        tag: record.tag,
    }
}

/// Seeded ChaCha8 stream of values in `[-1, 1]`.
///
/// Independent of the kernel's xorshift stream so fixtures never
/// accidentally correlate with the sequences under test.
pub fn chacha_values(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.next_u64() as f64 / u64::MAX as f64 * 2.0 - 1.0)
        .collect()
}
