//! The state record and its categorical tag set.

use std::fmt;
use std::mem;

use crate::id::InstanceId;

/// Closed categorical label attached to a state record.
///
/// Exactly three labels exist; population generation cycles through them.
/// The label's string form feeds the checksum byte-by-byte, so the set
/// is deliberately closed — an open string would make the checksum
/// domain unbounded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// First label in the cycle.
    Alpha,
    /// Second label in the cycle.
    Beta,
    /// Third label in the cycle.
    Gamma,
}

impl Tag {
    /// All labels, in cycle order.
    pub const ALL: [Tag; 3] = [Tag::Alpha, Tag::Beta, Tag::Gamma];

    /// The label's string form, as folded into the checksum.
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Alpha => "alpha",
            Tag::Beta => "beta",
            Tag::Gamma => "gamma",
        }
    }

    /// Label for the `i`-th generated instance (`i % 3` into the cycle).
    pub fn cycle(i: usize) -> Tag {
        Self::ALL[i % Self::ALL.len()]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unit of mutable data underlying one logical instance.
///
/// Every kernel operation is a deterministic function of this record and
/// its explicit arguments — no hidden counters, no clock reads. Only
/// [`created_at`](StateRecord::created_at) may depend on the wall clock,
/// and it is stamped exactly once at construction.
///
/// Invariant: `values.len()` never changes after construction. Elements
/// are mutated in place by the kernel; the sequence itself is fixed.
#[derive(Clone, Debug, PartialEq)]
pub struct StateRecord {
    /// Unique within a population, immutable.
    pub id: InstanceId,
    /// Display string, mutable post-construction. Only its length feeds
    /// the checksum; the content feeds display text alone.
    pub name: String,
    /// Fixed-length value sequence, elements mutable in place.
    pub values: Vec<f64>,
    /// Linear-transform offset, mutated by normalization and scramble.
    pub bias: f64,
    /// Linear-transform gain, mutated by normalization and scramble.
    pub scale: f64,
    /// Unix-seconds timestamp captured once at construction, immutable.
    pub created_at: i64,
    /// Categorical label, immutable.
    pub tag: Tag,
}

impl StateRecord {
    /// Bytes held on the heap by this record (name and value buffers).
    ///
    /// Counts lengths, not capacities, so the figure is deterministic
    /// for a given record regardless of allocation history.
    pub fn heap_bytes(&self) -> usize {
        self.values.len() * mem::size_of::<f64>() + self.name.len()
    }
}
