//! Per-instance layout descriptor.

use crate::id::InstanceId;
use crate::state::Tag;
use crate::strategy::StrategyKind;

/// Plain-data description of one instance's memory layout.
///
/// Produced by [`Instance::layout`](crate::Instance::layout) and consumed
/// by the snapshot graph builder and the footprint report. Byte figures
/// count lengths rather than capacities so two instances built from the
/// same spec always report the same layout.
#[derive(Clone, Debug, PartialEq)]
pub struct InstanceLayout {
    /// The strategy that built this instance.
    pub strategy: StrategyKind,
    /// Instance identifier.
    pub id: InstanceId,
    /// Current display name.
    pub name: String,
    /// Categorical label.
    pub tag: Tag,
    /// Construction timestamp (unix seconds).
    pub created_at: i64,
    /// Number of elements in the value sequence.
    pub value_count: usize,
    /// Bytes of the state record struct itself.
    pub state_bytes: usize,
    /// Bytes of the heap-held value buffer.
    pub buffer_bytes: usize,
    /// Bytes of the heap-held name string.
    pub name_bytes: usize,
    /// Bytes of per-instance dispatch machinery (zero for shared
    /// dispatch, the closure allocations for the closure strategy, the
    /// forwarding table for the delegating strategy).
    pub dispatch_bytes: usize,
}

impl InstanceLayout {
    /// Total bytes attributable to this instance.
    pub fn total_bytes(&self) -> usize {
        self.state_bytes + self.buffer_bytes + self.name_bytes + self.dispatch_bytes
    }
}
